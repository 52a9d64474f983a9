//! Tunable rule constants shared by generation and the move engine.

use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Side length of the square maze.
    pub grid_size: usize,
    /// Minimum distinct toll booths a valid route must cross.
    pub min_tolls_to_cross: u32,
    /// Bounded retry budget for maze generation; exhausting it is fatal.
    pub max_generation_attempts: u32,
    /// Wall count bounds as a percentage of total cells.
    pub wall_percent_min: usize,
    pub wall_percent_max: usize,
    /// Random booths placed beyond the two mandatory waypoint booths.
    pub extra_booths_min: usize,
    pub extra_booths_max: usize,
    /// Per-level toll base cost range; the drawn base is multiplied by level.
    pub booth_base_min: u32,
    pub booth_base_max: u32,
    pub starting_money: u32,
    /// Completion bonus is `level_bonus * level`.
    pub level_bonus: u32,
    /// Clearing this level ends the run.
    pub max_level: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            grid_size: 8,
            min_tolls_to_cross: 2,
            max_generation_attempts: 10,
            wall_percent_min: 15,
            wall_percent_max: 25,
            extra_booths_min: 5,
            extra_booths_max: 8,
            booth_base_min: 5,
            booth_base_max: 15,
            starting_money: 100,
            level_bonus: 100,
            max_level: 5,
        }
    }
}
