use crate::core::utils::to_id;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: i32,
    pub atk: i32,
    pub def: i32,
    pub spa: i32,
    pub spd: i32,
    pub spe: i32,
}

/// A species or one of its alternate forms.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpeciesData {
    pub id: String,
    pub num: i32,
    pub name: String,
    #[serde(rename = "baseSpecies", default)]
    pub base_species: Option<String>,
    #[serde(default, alias = "type")]
    pub types: Vec<String>,
    #[serde(rename = "baseStats")]
    pub base_stats: BaseStats,
    #[serde(rename = "weightkg", default)]
    pub weight_kg: f64,
    #[serde(default)]
    pub abilities: Vec<String>,
}

impl SpeciesData {
    /// Name of the base species; a base form is its own base species.
    pub fn base_species_name(&self) -> &str {
        self.base_species.as_deref().unwrap_or(&self.name)
    }

    pub fn base_species_id(&self) -> String {
        to_id(self.base_species_name())
    }
}

#[derive(Clone, Debug, Default)]
pub struct SpeciesDatabase {
    species: HashMap<String, SpeciesData>,
}

impl SpeciesDatabase {
    pub fn new() -> Self {
        Self {
            species: HashMap::new(),
        }
    }

    pub fn insert(&mut self, data: SpeciesData) {
        self.species.insert(data.id.clone(), data);
    }

    /// Looks a form up by id or display name ("Aegislash-Blade" and "aegislashblade" both work).
    pub fn get(&self, species: &str) -> Option<&SpeciesData> {
        self.species
            .get(species)
            .or_else(|| self.species.get(&to_id(species)))
    }

    pub fn contains(&self, species: &str) -> bool {
        self.get(species).is_some()
    }

    pub fn as_map(&self) -> &HashMap<String, SpeciesData> {
        &self.species
    }

    pub fn load_from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(json)?;
        let map_value = value
            .as_object()
            .and_then(|obj| obj.get("species"))
            .cloned()
            .unwrap_or(value);
        let map: HashMap<String, SpeciesData> = serde_json::from_value(map_value)?;
        let mut db = Self::new();
        for (_, data) in map {
            db.insert(data);
        }
        Ok(db)
    }

    pub fn load_default() -> Result<Self, serde_json::Error> {
        const DEFAULT_SPECIES_JSON: &str = include_str!("../../data/species.json");
        Self::load_from_json_str(DEFAULT_SPECIES_JSON)
    }
}
