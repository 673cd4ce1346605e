//! Raw catalog payloads.
//!
//! These mirror the JSON returned by the catalog API closely and deserialize
//! leniently: absent lists become empty lists and absent scalars become `None`.
//! Validation of required fields happens in the transformer, not here.

use serde::{Deserialize, Serialize};

/// A `{ "name": ..., "url": ... }` reference to another API resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamedResource {
    pub name: String,
    pub url: Option<String>,
}

/// One entry of a catalog record's `types` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeSlot {
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

/// One entry of a catalog record's `abilities` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilitySlot {
    pub ability: NamedResource,
    pub is_hidden: bool,
    pub slot: u32,
}

/// One base-stat entry of a catalog record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatEntry {
    pub base_stat: u32,
    pub stat: NamedResource,
}

/// How and when a move is learned in one version group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionGroupDetail {
    pub level_learned_at: u32,
    pub move_learn_method: Option<NamedResource>,
}

/// One entry of a catalog record's `moves` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveEntry {
    #[serde(rename = "move")]
    pub move_ref: NamedResource,
    pub version_group_details: Vec<VersionGroupDetail>,
}

/// A raw catalog record (`GET /{catalog_endpoint}/{id}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogEntry {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub height: Option<u32>,
    pub weight: Option<u32>,
    pub base_experience: Option<u32>,
    pub types: Vec<TypeSlot>,
    pub abilities: Vec<AbilitySlot>,
    pub stats: Vec<StatEntry>,
    pub moves: Vec<MoveEntry>,
    pub species: Option<NamedResource>,
}

/// A localized flavor-text blurb of a species record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlavorTextEntry {
    pub flavor_text: String,
    pub language: NamedResource,
    pub version: Option<NamedResource>,
}

/// A raw species record (`GET /{species_endpoint}/{id}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesEntry {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub generation: Option<NamedResource>,
    pub is_legendary: bool,
    pub is_mythical: bool,
    pub flavor_text_entries: Vec<FlavorTextEntry>,
    pub color: Option<NamedResource>,
    pub habitat: Option<NamedResource>,
    pub capture_rate: Option<u32>,
    pub base_happiness: Option<u32>,
    pub evolves_from_species: Option<NamedResource>,
}

/// Inclusive range of catalog identifiers introduced by one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRange {
    pub generation: u32,
    pub first_id: u32,
    pub last_id: u32,
}

impl GenerationRange {
    const fn new(generation: u32, first_id: u32, last_id: u32) -> Self {
        Self {
            generation,
            first_id,
            last_id,
        }
    }

    /// Iterate over every identifier in the range.
    pub fn ids(&self) -> std::ops::RangeInclusive<u32> {
        self.first_id..=self.last_id
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids().contains(&id)
    }

    pub fn len(&self) -> usize {
        (self.last_id - self.first_id + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.last_id < self.first_id
    }
}

/// Catalog identifier ranges per generation, as of generation IX (Pecharunt, #1025).
pub const GENERATION_RANGES: [GenerationRange; 9] = [
    GenerationRange::new(1, 1, 151),
    GenerationRange::new(2, 152, 251),
    GenerationRange::new(3, 252, 386),
    GenerationRange::new(4, 387, 493),
    GenerationRange::new(5, 494, 649),
    GenerationRange::new(6, 650, 721),
    GenerationRange::new(7, 722, 809),
    GenerationRange::new(8, 810, 905),
    GenerationRange::new(9, 906, 1025),
];

/// Look up the generation that introduced `id`.
pub fn generation_for_id(id: u32) -> Option<u32> {
    GENERATION_RANGES
        .iter()
        .find(|range| range.contains(id))
        .map(|range| range.generation)
}

/// Parse a generation tag such as `generation-iv` into its number.
pub fn parse_generation_tag(tag: &str) -> Option<u32> {
    let numeral = tag.trim().strip_prefix("generation-")?;
    roman_to_u32(numeral)
}

fn roman_to_u32(numeral: &str) -> Option<u32> {
    if numeral.is_empty() {
        return None;
    }

    let mut total = 0u32;
    let mut previous = 0u32;

    // Right to left: a smaller digit before a larger one is subtracted.
    for c in numeral.chars().rev() {
        let value = match c.to_ascii_lowercase() {
            'i' => 1,
            'v' => 5,
            'x' => 10,
            'l' => 50,
            'c' => 100,
            _ => return None,
        };

        if value < previous {
            total = total.checked_sub(value)?;
        } else {
            total += value;
            previous = value;
        }
    }

    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_generation_tag() {
        assert_eq!(parse_generation_tag("generation-i"), Some(1));
        assert_eq!(parse_generation_tag("generation-iv"), Some(4));
        assert_eq!(parse_generation_tag("generation-viii"), Some(8));
        assert_eq!(parse_generation_tag("generation-ix"), Some(9));
        assert_eq!(parse_generation_tag("generation-"), None);
        assert_eq!(parse_generation_tag("gen-4"), None);
        assert_eq!(parse_generation_tag("generation-q"), None);
    }

    #[test]
    fn test_generation_for_id() {
        assert_eq!(generation_for_id(1), Some(1));
        assert_eq!(generation_for_id(151), Some(1));
        assert_eq!(generation_for_id(152), Some(2));
        assert_eq!(generation_for_id(1025), Some(9));
        assert_eq!(generation_for_id(0), None);
        assert_eq!(generation_for_id(1026), None);
    }

    #[test]
    fn test_generation_ranges_are_contiguous() {
        for pair in GENERATION_RANGES.windows(2) {
            assert_eq!(pair[0].last_id + 1, pair[1].first_id);
            assert_eq!(pair[0].generation + 1, pair[1].generation);
        }
        let total: usize = GENERATION_RANGES.iter().map(GenerationRange::len).sum();
        assert_eq!(total, 1025);
    }

    #[test]
    fn test_catalog_entry_lenient_deserialize() {
        let entry: CatalogEntry = serde_json::from_value(json!({
            "id": 25,
            "name": "pikachu",
            "base_experience": null,
            "types": [{ "slot": 1, "type": { "name": "electric", "url": "u" } }],
            "unknown_field": true
        }))
        .unwrap();

        assert_eq!(entry.id, Some(25));
        assert_eq!(entry.name.as_deref(), Some("pikachu"));
        assert_eq!(entry.base_experience, None);
        assert_eq!(entry.types[0].kind.name, "electric");
        assert!(entry.abilities.is_empty());
        assert!(entry.species.is_none());
    }

    #[test]
    fn test_species_entry_deserialize() {
        let species: SpeciesEntry = serde_json::from_value(json!({
            "generation": { "name": "generation-i" },
            "is_legendary": false,
            "habitat": null,
            "flavor_text_entries": [
                { "flavor_text": "Hello", "language": { "name": "en" }, "version": { "name": "red" } }
            ]
        }))
        .unwrap();

        assert_eq!(species.generation.unwrap().name, "generation-i");
        assert!(species.habitat.is_none());
        assert_eq!(species.flavor_text_entries.len(), 1);
        assert_eq!(species.flavor_text_entries[0].language.name, "en");
    }
}
