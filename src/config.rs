use serde::{Deserialize, Serialize};

/// Per-battle knobs. Missing keys in a YAML file fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleOptions {
    /// Seed for the battle's random source. Same seed and same actions give the same battle.
    pub seed: u64,
    pub record_history: bool,
    /// The driver refuses to run turns past this.
    pub max_turns: u32,
}

impl Default for BattleOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            record_history: true,
            max_turns: 500,
        }
    }
}

impl BattleOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }
}
