use crate::core::state::BoostId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MoveData {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub move_type: String,
    pub category: MoveCategory,
    #[serde(default)]
    pub power: u32,
    #[serde(default)]
    pub accuracy: Option<f32>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub flags: BTreeSet<String>,
    /// Stage changes a status move applies to its user.
    #[serde(default)]
    pub boosts: BTreeMap<BoostId, i32>,
}

impl MoveData {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// A move as it is being executed. Handlers may rewrite it during `ModifyMove`.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveMove {
    pub id: String,
    pub name: String,
    pub move_type: String,
    pub category: MoveCategory,
    pub base_power: u32,
    pub priority: i32,
    pub flags: BTreeSet<String>,
    /// Sum of per-type effectiveness steps against the current target.
    pub type_mod: i32,
    /// Same-type attack bonus; 1.5 unless an effect says otherwise.
    pub stab: f64,
    pub infiltrates: bool,
    pub prankster_boosted: bool,
}

impl ActiveMove {
    pub fn from_data(data: &MoveData) -> Self {
        Self {
            id: data.id.clone(),
            name: data.display_name().to_string(),
            move_type: data.move_type.clone(),
            category: data.category,
            base_power: data.power,
            priority: data.priority,
            flags: data.flags.clone(),
            type_mod: 0,
            stab: 1.5,
            infiltrates: false,
            prankster_boosted: false,
        }
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    pub fn is_type(&self, move_type: &str) -> bool {
        self.move_type.eq_ignore_ascii_case(move_type)
    }

    pub fn is_status(&self) -> bool {
        self.category == MoveCategory::Status
    }
}

#[derive(Clone, Debug, Default)]
pub struct MoveDatabase {
    moves: HashMap<String, MoveData>,
}

impl MoveDatabase {
    pub fn new() -> Self {
        Self {
            moves: HashMap::new(),
        }
    }

    pub fn load_default() -> Result<Self, serde_yaml::Error> {
        const DEFAULT_MOVES_YAML: &str = include_str!("../../data/moves.yaml");
        Self::load_from_yaml_str(DEFAULT_MOVES_YAML)
    }

    pub fn insert(&mut self, move_data: MoveData) {
        self.moves.insert(move_data.id.clone(), move_data);
    }

    pub fn get(&self, move_id: &str) -> Option<&MoveData> {
        self.moves.get(move_id)
    }

    pub fn as_map(&self) -> &HashMap<String, MoveData> {
        &self.moves
    }

    /// Accepts either a list of moves or a mapping keyed by id.
    pub fn load_from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let mut db = Self::new();
        if let Ok(map) = serde_yaml::from_str::<HashMap<String, MoveData>>(yaml) {
            for (_, move_data) in map {
                db.insert(move_data);
            }
            return Ok(db);
        }
        let list: Vec<MoveData> = serde_yaml::from_str(yaml)?;
        for move_data in list {
            db.insert(move_data);
        }
        Ok(db)
    }
}
