//! Schema module for the species indexer pipeline.
//!
//! Brings the live index schema up to the desired field set. Fields are only
//! ever added: the reconciler never deletes or retypes a declared field.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::errors::PipelineError;
use species_indexer_repository::{LiveField, SearchIndexProvider};
use species_indexer_shared::SchemaField;

/// Outcome of a reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Desired fields already declared compatibly.
    pub existing: Vec<String>,
    /// Fields added by this call.
    pub added: Vec<String>,
    /// Compatible fields whose fast-lookup flag differs from the desired one.
    pub drifted: Vec<String>,
}

/// Reconciler between the desired schema and the live index schema.
pub struct SchemaReconciler {
    provider: Arc<dyn SearchIndexProvider>,
}

impl SchemaReconciler {
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self { provider }
    }

    /// Add every desired field missing from the live schema.
    ///
    /// All incompatibilities are detected before the first field is added, so
    /// a conflicting schema is never partially modified.
    ///
    /// # Errors
    ///
    /// * `PipelineError::SchemaConflict` - A live field differs in type or cardinality
    /// * `PipelineError::IndexUnavailable` - The schema could not be read or extended
    #[instrument(skip_all, fields(desired = desired.len()))]
    pub async fn reconcile(&self, desired: &[SchemaField]) -> Result<ReconcileReport, PipelineError> {
        let live = self.provider.list_fields().await?;
        let live: HashMap<&str, &LiveField> =
            live.iter().map(|field| (field.name.as_str(), field)).collect();

        let mut report = ReconcileReport::default();
        let mut missing = Vec::new();
        let mut conflicts = Vec::new();

        for field in desired {
            match live.get(field.name.as_str()) {
                Some(current) if !current.is_compatible_with(field) => {
                    conflicts.push(format!(
                        "{} is {} but {} is required",
                        field.name,
                        describe_live(current),
                        describe_desired(field)
                    ));
                }
                Some(current) => {
                    if current.fast_lookup != field.fast_lookup {
                        warn!(
                            field = %field.name,
                            live = current.fast_lookup,
                            desired = field.fast_lookup,
                            "Fast-lookup flag drift, leaving field unchanged"
                        );
                        report.drifted.push(field.name.clone());
                    }
                    report.existing.push(field.name.clone());
                }
                None => missing.push(field),
            }
        }

        if !conflicts.is_empty() {
            error!(conflicts = ?conflicts, "Live schema conflicts with desired schema");
            return Err(PipelineError::schema_conflict(conflicts.join("; ")));
        }

        for field in missing {
            self.provider.add_field(field).await?;
            info!(
                field = %field.name,
                field_type = %field.field_type,
                multi_valued = field.multi_valued,
                fast_lookup = field.fast_lookup,
                "Added schema field"
            );
            report.added.push(field.name.clone());
        }

        info!(
            existing = report.existing.len(),
            added = report.added.len(),
            drifted = report.drifted.len(),
            "Schema reconciled"
        );

        Ok(report)
    }
}

fn describe_live(field: &LiveField) -> String {
    let cardinality = if field.multi_valued { "multi-valued" } else { "single-valued" };
    format!("{} {}", cardinality, field.backend_type)
}

fn describe_desired(field: &SchemaField) -> String {
    let cardinality = if field.multi_valued { "multi-valued" } else { "single-valued" };
    format!("{} {}", cardinality, field.field_type)
}
