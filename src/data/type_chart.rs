use std::collections::HashMap;

/// Defensive matchups per type.
#[derive(Clone, Debug, Default)]
struct Defense {
    weak_to: Vec<&'static str>,
    resists: Vec<&'static str>,
    immune_to: Vec<&'static str>,
}

#[derive(Clone, Debug)]
pub struct TypeChart {
    chart: HashMap<&'static str, Defense>,
}

impl Default for TypeChart {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeChart {
    pub fn new() -> Self {
        let mut chart = HashMap::new();
        let mut add = |defender: &'static str,
                       weak_to: &[&'static str],
                       resists: &[&'static str],
                       immune_to: &[&'static str]| {
            chart.insert(
                defender,
                Defense {
                    weak_to: weak_to.to_vec(),
                    resists: resists.to_vec(),
                    immune_to: immune_to.to_vec(),
                },
            );
        };

        add("normal", &["fighting"], &[], &["ghost"]);
        add("fire", &["water", "ground", "rock"], &["fire", "grass", "ice", "bug", "steel", "fairy"], &[]);
        add("water", &["electric", "grass"], &["fire", "water", "ice", "steel"], &[]);
        add("electric", &["ground"], &["electric", "flying", "steel"], &[]);
        add("grass", &["fire", "ice", "poison", "flying", "bug"], &["water", "electric", "grass", "ground"], &[]);
        add("ice", &["fire", "fighting", "rock", "steel"], &["ice"], &[]);
        add("fighting", &["flying", "psychic", "fairy"], &["bug", "rock", "dark"], &[]);
        add("poison", &["ground", "psychic"], &["grass", "fighting", "poison", "bug", "fairy"], &[]);
        add("ground", &["water", "grass", "ice"], &["poison", "rock"], &["electric"]);
        add("flying", &["electric", "ice", "rock"], &["grass", "fighting", "bug"], &["ground"]);
        add("psychic", &["bug", "ghost", "dark"], &["fighting", "psychic"], &[]);
        add("bug", &["fire", "flying", "rock"], &["grass", "fighting", "ground"], &[]);
        add("rock", &["water", "grass", "fighting", "ground", "steel"], &["normal", "fire", "poison", "flying"], &[]);
        add("ghost", &["ghost", "dark"], &["poison", "bug"], &["normal", "fighting"]);
        add("dragon", &["ice", "dragon", "fairy"], &["fire", "water", "electric", "grass"], &[]);
        add("dark", &["fighting", "bug", "fairy"], &["ghost", "dark"], &["psychic"]);
        add(
            "steel",
            &["fire", "fighting", "ground"],
            &["normal", "grass", "ice", "flying", "psychic", "bug", "rock", "dragon", "steel", "fairy"],
            &["poison"],
        );
        add("fairy", &["poison", "steel"], &["fighting", "bug", "dark"], &["dragon"]);

        Self { chart }
    }

    fn defense(&self, defender: &str) -> Option<&Defense> {
        self.chart.get(defender.to_ascii_lowercase().as_str())
    }

    pub fn is_immune(&self, move_type: &str, target_types: &[String]) -> bool {
        let move_key = move_type.to_ascii_lowercase();
        target_types.iter().any(|t| {
            self.defense(t)
                .map(|d| d.immune_to.iter().any(|i| *i == move_key))
                .unwrap_or(false)
        })
    }

    /// +1 per weakness, -1 per resistance. Unknown types (including `???`) are neutral.
    pub fn type_mod(&self, move_type: &str, target_types: &[String]) -> i32 {
        let move_key = move_type.to_ascii_lowercase();
        target_types
            .iter()
            .filter_map(|t| self.defense(t))
            .map(|d| {
                if d.weak_to.iter().any(|w| *w == move_key) {
                    1
                } else if d.resists.iter().any(|r| *r == move_key) {
                    -1
                } else {
                    0
                }
            })
            .sum()
    }

    pub fn effectiveness(&self, move_type: &str, target_types: &[String]) -> f64 {
        if self.is_immune(move_type, target_types) {
            return 0.0;
        }
        2f64.powi(self.type_mod(move_type, target_types))
    }
}
