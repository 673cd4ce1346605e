//! Catalog enumeration.

use crate::errors::PipelineError;
use species_indexer_shared::GENERATION_RANGES;

/// The ordered catalog ids a run fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPlan {
    ids: Vec<u32>,
}

impl CatalogPlan {
    /// Every generation.
    pub fn all() -> Self {
        Self {
            ids: GENERATION_RANGES.iter().flat_map(|range| range.ids()).collect(),
        }
    }

    /// The listed generations, in generation order.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Config` for a generation outside the range table.
    pub fn generations(generations: &[u32]) -> Result<Self, PipelineError> {
        if let Some(unknown) = generations
            .iter()
            .find(|g| !GENERATION_RANGES.iter().any(|range| range.generation == **g))
        {
            return Err(PipelineError::config(format!("unknown generation {}", unknown)));
        }

        let ids = GENERATION_RANGES
            .iter()
            .filter(|range| generations.contains(&range.generation))
            .flat_map(|range| range.ids())
            .collect();

        Ok(Self { ids })
    }

    /// An explicit id list, fetched in the given order.
    pub fn from_ids(ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_covers_national_catalog() {
        let plan = CatalogPlan::all();

        assert_eq!(plan.len(), 1025);
        assert_eq!(plan.ids().first(), Some(&1));
        assert_eq!(plan.ids().last(), Some(&1025));
    }

    #[test]
    fn test_generation_subset_in_order() {
        let plan = CatalogPlan::generations(&[3, 1]).unwrap();

        assert_eq!(plan.len(), 151 + 135);
        assert_eq!(plan.ids()[0], 1);
        assert_eq!(plan.ids()[151], 252);
    }

    #[test]
    fn test_unknown_generation_rejected() {
        assert!(matches!(
            CatalogPlan::generations(&[1, 10]),
            Err(PipelineError::Config(_))
        ));
    }
}
