//! Solr field type mapping.
//!
//! Maps portable [`FieldType`]s onto the field types of Solr's default
//! configset and back.

use serde_json::{json, Value};
use species_indexer_shared::{FieldType, SchemaField};

/// The Solr field type used to declare a field of the given type.
pub fn solr_type_name(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Integer => "pint",
        FieldType::Float => "pfloat",
        FieldType::Boolean => "boolean",
        FieldType::String => "string",
        FieldType::Text => "text_en",
    }
}

/// Map a Solr field type name onto a portable type.
///
/// Returns the type and whether the Solr type is multi-valued by default
/// (the plural types of the default configset). Unknown names map to `None`.
pub fn field_type_from_solr(type_name: &str) -> Option<(FieldType, bool)> {
    let mapped = match type_name {
        "pint" | "plong" | "int" | "long" => (FieldType::Integer, false),
        "pints" | "plongs" => (FieldType::Integer, true),
        "pfloat" | "pdouble" | "float" | "double" => (FieldType::Float, false),
        "pfloats" | "pdoubles" => (FieldType::Float, true),
        "boolean" => (FieldType::Boolean, false),
        "booleans" => (FieldType::Boolean, true),
        "string" => (FieldType::String, false),
        "strings" => (FieldType::String, true),
        other if other.starts_with("text_") => (FieldType::Text, false),
        _ => return None,
    };
    Some(mapped)
}

/// Build the Schema API `add-field` definition for a field.
///
/// Every field is indexed and stored; doc values are enabled only for
/// fast-lookup fields.
pub fn field_definition(field: &SchemaField) -> Value {
    json!({
        "name": field.name,
        "type": solr_type_name(field.field_type),
        "multiValued": field.multi_valued,
        "docValues": field.fast_lookup,
        "indexed": true,
        "stored": true
    })
}
