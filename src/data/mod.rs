pub mod catalog;
pub mod moves;
pub mod species;
pub mod type_chart;

use crate::error::ContentError;
use moves::MoveDatabase;
use species::SpeciesDatabase;
use type_chart::TypeChart;

/// Static game data shared by every battle.
#[derive(Clone, Debug, Default)]
pub struct Dex {
    pub species: SpeciesDatabase,
    pub moves: MoveDatabase,
    pub types: TypeChart,
}

impl Dex {
    pub fn new(species: SpeciesDatabase, moves: MoveDatabase, types: TypeChart) -> Self {
        Self { species, moves, types }
    }

    pub fn load_default() -> Result<Self, ContentError> {
        let species = SpeciesDatabase::load_default().map_err(|e| ContentError::Malformed(e.to_string()))?;
        let moves = MoveDatabase::load_default().map_err(|e| ContentError::Malformed(e.to_string()))?;
        Ok(Self::new(species, moves, TypeChart::new()))
    }
}
