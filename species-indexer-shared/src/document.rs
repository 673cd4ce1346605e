//! The document persisted to the search index.

use serde::{Deserialize, Serialize};

/// A flattened, cleaned catalog record ready for indexing.
///
/// Serialized field names are the query contract of the index and only ever
/// grow. List fields are always present (empty when the source has no data);
/// optional scalars are omitted from the serialized form when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDocument {
    /// Document key: the catalog identifier in decimal.
    pub id: String,
    /// Numeric catalog identifier.
    pub pokemon_id: u32,
    pub name: String,

    /// Type names in slot order.
    pub types: Vec<String>,
    pub primary_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_type: Option<String>,

    /// Regular (non-hidden) abilities.
    pub abilities: Vec<String>,
    pub hidden_abilities: Vec<String>,
    /// Regular then hidden abilities, de-duplicated.
    pub all_abilities: Vec<String>,

    pub generation: u32,
    pub is_legendary: bool,
    pub is_mythical: bool,

    pub stat_hp: u32,
    pub stat_attack: u32,
    pub stat_defense: u32,
    pub stat_special_attack: u32,
    pub stat_special_defense: u32,
    pub stat_speed: u32,
    pub total_stats: u32,

    pub height: u32,
    pub weight: u32,
    pub base_experience: u32,
    pub capture_rate: u32,
    pub base_happiness: u32,
    pub color: String,
    pub habitat: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evolves_from: Option<String>,

    /// Moves learned by level-up, sorted and de-duplicated.
    pub levelup_moves: Vec<String>,

    /// Cleaned, de-duplicated flavor text joined by single spaces.
    pub flavor_text: String,
}

impl IndexDocument {
    /// Create a document for the given catalog identifier and display name.
    ///
    /// The document key is derived from the identifier so the two never diverge.
    pub fn new(pokemon_id: u32, name: impl Into<String>) -> Self {
        Self {
            id: pokemon_id.to_string(),
            pokemon_id,
            name: name.into(),
            primary_type: "unknown".to_string(),
            ..Default::default()
        }
    }
}
