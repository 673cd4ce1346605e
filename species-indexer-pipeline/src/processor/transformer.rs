//! Catalog transformer implementation.
//!
//! Flattens a catalog entry and its species entry into an [`IndexDocument`].

use std::collections::BTreeSet;
use tracing::{debug, instrument};

use crate::processor::error::MalformedRecordError;
use crate::processor::text::{display_label, merge_flavor_text, title_case};
use species_indexer_shared::{
    generation_for_id, parse_generation_tag, CatalogEntry, FetchTask, IndexDocument, SpeciesEntry,
};

/// Default language for flavor text.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default species endpoint, used to build species fetch tasks.
pub const DEFAULT_SPECIES_ENDPOINT: &str = "pokemon-species";

const LEVEL_UP: &str = "level-up";

/// Transformer from raw catalog payloads to index documents.
///
/// The transformer is pure: it reads no clock and no global state, and
/// equal inputs always produce equal documents.
#[derive(Debug, Clone)]
pub struct CatalogTransformer {
    language: String,
    species_endpoint: String,
}

impl CatalogTransformer {
    /// Create a transformer keeping English flavor text.
    pub fn new() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            species_endpoint: DEFAULT_SPECIES_ENDPOINT.to_string(),
        }
    }

    /// Keep flavor text in `language` instead.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Build species tasks against `endpoint` instead.
    pub fn with_species_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.species_endpoint = endpoint.into();
        self
    }

    /// Derive the species fetch task from the entry's species reference.
    ///
    /// The species identifier is the trailing numeric segment of the
    /// reference URL (`.../pokemon-species/25/`).
    pub fn species_task(&self, entry: &CatalogEntry) -> Result<FetchTask, MalformedRecordError> {
        let record = record_label(entry);
        let species = entry
            .species
            .as_ref()
            .ok_or_else(|| MalformedRecordError::new(&record, "missing species reference"))?;

        let url = species
            .url
            .as_deref()
            .ok_or_else(|| MalformedRecordError::new(&record, "species reference has no url"))?;

        let id = url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .and_then(|segment| segment.parse::<u32>().ok())
            .ok_or_else(|| {
                MalformedRecordError::new(&record, format!("unparseable species url '{}'", url))
            })?;

        Ok(FetchTask::for_endpoint(&self.species_endpoint, id))
    }

    /// Transform one catalog entry and its species entry into a document.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecordError`] when the entry has no id or a blank name.
    #[instrument(skip_all, fields(id = ?entry.id))]
    pub fn transform(
        &self,
        entry: &CatalogEntry,
        species: &SpeciesEntry,
    ) -> Result<IndexDocument, MalformedRecordError> {
        let record = record_label(entry);
        let id = entry
            .id
            .ok_or_else(|| MalformedRecordError::new(&record, "missing id"))?;
        let name = match entry.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => return Err(MalformedRecordError::new(&record, "missing name")),
        };

        let mut doc = IndexDocument::new(id, title_case(name));

        let mut slots: Vec<_> = entry.types.iter().collect();
        slots.sort_by_key(|slot| slot.slot);
        doc.types = slots.iter().map(|slot| slot.kind.name.clone()).collect();
        doc.primary_type = doc
            .types
            .first()
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());
        doc.secondary_type = doc.types.get(1).cloned();

        for ability in &entry.abilities {
            let label = display_label(&ability.ability.name);
            if ability.is_hidden {
                doc.hidden_abilities.push(label);
            } else {
                doc.abilities.push(label);
            }
        }
        let mut seen = BTreeSet::new();
        doc.all_abilities = doc
            .abilities
            .iter()
            .chain(doc.hidden_abilities.iter())
            .filter(|label| seen.insert(*label))
            .cloned()
            .collect();

        for stat in &entry.stats {
            let value = stat.base_stat;
            match stat.stat.name.as_str() {
                "hp" => doc.stat_hp = value,
                "attack" => doc.stat_attack = value,
                "defense" => doc.stat_defense = value,
                "special-attack" => doc.stat_special_attack = value,
                "special-defense" => doc.stat_special_defense = value,
                "speed" => doc.stat_speed = value,
                _ => {}
            }
        }
        doc.total_stats = [
            doc.stat_attack,
            doc.stat_defense,
            doc.stat_special_attack,
            doc.stat_special_defense,
            doc.stat_speed,
        ]
        .into_iter()
        .fold(doc.stat_hp, u32::saturating_add);

        doc.height = entry.height.unwrap_or(0);
        doc.weight = entry.weight.unwrap_or(0);
        doc.base_experience = entry.base_experience.unwrap_or(0);

        doc.levelup_moves = entry
            .moves
            .iter()
            .filter(|learned| {
                learned.version_group_details.iter().any(|detail| {
                    detail
                        .move_learn_method
                        .as_ref()
                        .is_some_and(|method| method.name == LEVEL_UP)
                })
            })
            .map(|learned| display_label(&learned.move_ref.name))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        doc.generation = species
            .generation
            .as_ref()
            .and_then(|tag| parse_generation_tag(&tag.name))
            .or_else(|| generation_for_id(id))
            .unwrap_or(0);
        doc.is_legendary = species.is_legendary;
        doc.is_mythical = species.is_mythical;
        doc.capture_rate = species.capture_rate.unwrap_or(0);
        doc.base_happiness = species.base_happiness.unwrap_or(0);
        doc.color = species
            .color
            .as_ref()
            .map(|color| color.name.clone())
            .unwrap_or_default();
        doc.habitat = species
            .habitat
            .as_ref()
            .map(|habitat| habitat.name.clone())
            .unwrap_or_default();
        doc.evolves_from = species
            .evolves_from_species
            .as_ref()
            .map(|parent| title_case(&parent.name));

        doc.flavor_text = merge_flavor_text(
            species
                .flavor_text_entries
                .iter()
                .filter(|text| text.language.name == self.language)
                .map(|text| text.flavor_text.as_str()),
        );

        debug!(
            id = id,
            name = %doc.name,
            generation = doc.generation,
            "Transformed catalog entry"
        );

        Ok(doc)
    }
}

impl Default for CatalogTransformer {
    fn default() -> Self {
        Self::new()
    }
}

fn record_label(entry: &CatalogEntry) -> String {
    match (entry.id, entry.name.as_deref()) {
        (Some(id), _) => id.to_string(),
        (None, Some(name)) if !name.trim().is_empty() => name.to_string(),
        _ => "<unknown>".to_string(),
    }
}
