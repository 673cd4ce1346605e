//! Types describing the live state of the search index.

use species_indexer_shared::{FieldType, SchemaField};

/// A field definition as reported by the live index.
///
/// `field_type` is `None` when the backend type has no counterpart in
/// [`FieldType`]; `backend_type` always keeps the name the backend reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveField {
    /// The field name.
    pub name: String,
    /// The portable type, if the backend type maps to one.
    pub field_type: Option<FieldType>,
    /// The backend's own type name (e.g. `pint`, `text_en`).
    pub backend_type: String,
    /// Whether the field accepts multiple values.
    pub multi_valued: bool,
    /// Whether the field is sort/facet capable.
    pub fast_lookup: bool,
}

impl LiveField {
    /// Whether the live field matches the desired field's type and cardinality.
    pub fn is_compatible_with(&self, desired: &SchemaField) -> bool {
        self.field_type == Some(desired.field_type) && self.multi_valued == desired.multi_valued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live(field_type: Option<FieldType>, multi_valued: bool) -> LiveField {
        LiveField {
            name: "types".to_string(),
            field_type,
            backend_type: "string".to_string(),
            multi_valued,
            fast_lookup: true,
        }
    }

    #[test]
    fn test_compatibility() {
        let desired = SchemaField::new("types", FieldType::String).multi_valued();

        assert!(live(Some(FieldType::String), true).is_compatible_with(&desired));
        assert!(!live(Some(FieldType::String), false).is_compatible_with(&desired));
        assert!(!live(Some(FieldType::Text), true).is_compatible_with(&desired));
        assert!(!live(None, true).is_compatible_with(&desired));
    }

    #[test]
    fn test_fast_lookup_does_not_affect_compatibility() {
        let desired = SchemaField::new("types", FieldType::String).multi_valued();
        let mut field = live(Some(FieldType::String), true);
        field.fast_lookup = false;

        assert!(field.is_compatible_with(&desired));
    }
}
