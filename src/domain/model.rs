use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a generation roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub url: String,
}

/// Species list of one generation, in the order the API returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub pokemon_species: Vec<RosterEntry>,
}

impl Roster {
    pub fn identifiers(&self) -> Vec<String> {
        self.pokemon_species
            .iter()
            .map(|entry| entry.name.clone())
            .collect()
    }
}

/// Detail payload for one species, kept exactly as the API sent it.
///
/// Nothing is validated on the way in; the accessors below return `None`
/// (or an empty list) when a field is missing or has an unexpected type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetailRecord {
    pub data: serde_json::Value,
}

impl DetailRecord {
    pub fn new(data: serde_json::Value) -> Self {
        Self { data }
    }

    pub fn id(&self) -> Option<u64> {
        self.data.get("id").and_then(|v| v.as_u64())
    }

    pub fn name(&self) -> Option<&str> {
        self.data.get("name").and_then(|v| v.as_str())
    }

    pub fn sprite_url(&self) -> Option<&str> {
        self.data
            .pointer("/sprites/front_default")
            .and_then(|v| v.as_str())
    }

    pub fn ability_names(&self) -> Vec<&str> {
        self.data
            .get("abilities")
            .and_then(|v| v.as_array())
            .map(|abilities| {
                abilities
                    .iter()
                    .filter_map(|a| a.pointer("/ability/name").and_then(|n| n.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Why an identifier ended up missing from a result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub identifier: String,
    pub attempts: u32,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Fetched(DetailRecord),
    Skipped(SkippedItem),
}

impl FetchOutcome {
    pub fn into_record(self) -> Option<DetailRecord> {
        match self {
            FetchOutcome::Fetched(record) => Some(record),
            FetchOutcome::Skipped(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub records: Vec<DetailRecord>,
    pub skipped: Vec<SkippedItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub generation: u32,
    pub requested: usize,
    pub records: Vec<DetailRecord>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CatalogExport {
    pub generation: u32,
    pub json_output: Option<String>,
    pub csv_output: Option<String>,
}
