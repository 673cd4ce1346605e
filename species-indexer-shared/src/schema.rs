//! Index field definitions.
//!
//! The desired schema lists every field an [`IndexDocument`](crate::IndexDocument)
//! serializes. Field names and types are append-only across runs: the reconciler
//! adds what is missing and never changes what exists.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value type of an index field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Integer,
    Float,
    Boolean,
    /// Exact-match token.
    String,
    /// Analyzed free text.
    Text,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::String => "string",
            FieldType::Text => "text",
        };
        f.write_str(name)
    }
}

/// One field definition of the search index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    pub field_type: FieldType,
    pub multi_valued: bool,
    /// Sort/facet capable (doc values).
    pub fast_lookup: bool,
}

impl SchemaField {
    /// Create a single-valued field without fast lookup.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            multi_valued: false,
            fast_lookup: false,
        }
    }

    /// Mark the field as multi-valued.
    pub fn multi_valued(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    /// Enable sorting and faceting on the field.
    pub fn fast_lookup(mut self) -> Self {
        self.fast_lookup = true;
        self
    }
}

/// The fields an `IndexDocument` requires, in declaration order.
pub fn desired_schema() -> Vec<SchemaField> {
    let sortable_ints = [
        "pokemon_id",
        "generation",
        "stat_hp",
        "stat_attack",
        "stat_defense",
        "stat_special_attack",
        "stat_special_defense",
        "stat_speed",
        "total_stats",
        "height",
        "weight",
        "base_experience",
        "capture_rate",
        "base_happiness",
    ];

    let mut fields = vec![SchemaField::new("id", FieldType::String).fast_lookup()];
    fields.extend(
        sortable_ints
            .iter()
            .map(|name| SchemaField::new(*name, FieldType::Integer).fast_lookup()),
    );
    fields.extend([
        SchemaField::new("name", FieldType::String).fast_lookup(),
        SchemaField::new("primary_type", FieldType::String).fast_lookup(),
        SchemaField::new("secondary_type", FieldType::String),
        SchemaField::new("color", FieldType::String).fast_lookup(),
        SchemaField::new("habitat", FieldType::String).fast_lookup(),
        SchemaField::new("evolves_from", FieldType::String),
        SchemaField::new("is_legendary", FieldType::Boolean).fast_lookup(),
        SchemaField::new("is_mythical", FieldType::Boolean).fast_lookup(),
        SchemaField::new("types", FieldType::String).multi_valued(),
        SchemaField::new("abilities", FieldType::String).multi_valued(),
        SchemaField::new("hidden_abilities", FieldType::String).multi_valued(),
        SchemaField::new("all_abilities", FieldType::String).multi_valued(),
        SchemaField::new("levelup_moves", FieldType::String).multi_valued(),
        SchemaField::new("flavor_text", FieldType::Text),
    ]);
    fields
}
