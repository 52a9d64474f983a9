//! Toll-maze generation split into coherent submodules.

pub mod model;

mod booths;
mod generator;
mod seed;
mod solution;

pub use generator::MazeGenerator;
pub use model::{BoothSpawn, GeneratedMaze};

use crate::rules::Rules;
use crate::types::GenerationError;

pub fn generate_maze(
    run_seed: u64,
    level: u32,
    rules: &Rules,
) -> Result<GeneratedMaze, GenerationError> {
    MazeGenerator::new(run_seed, rules).generate(level)
}
