//! Generation orchestration: build a candidate, verify it, retry within budget.

use std::collections::BTreeSet;

use crate::rules::Rules;
use crate::search::route_with_min_tolls_exists;
use crate::state::Grid;
use crate::types::{GenerationError, Pos};

use super::booths::{place_booths, scatter_walls};
use super::model::GeneratedMaze;
use super::seed::derive_attempt_seed;
use super::solution::build_guaranteed_route;

pub struct MazeGenerator<'a> {
    run_seed: u64,
    rules: &'a Rules,
}

impl<'a> MazeGenerator<'a> {
    pub fn new(run_seed: u64, rules: &'a Rules) -> Self {
        Self { run_seed, rules }
    }

    /// Produce a verified maze for `level`, retrying with fresh attempt seeds
    /// until the breadth-first check accepts a candidate. Exhausting the
    /// budget is an explicit fatal error, never a silent fallback.
    pub fn generate(&self, level: u32) -> Result<GeneratedMaze, GenerationError> {
        debug_assert!(self.rules.grid_size >= 4, "grid too small for two waypoints");
        for attempt in 0..self.rules.max_generation_attempts {
            let attempt_seed = derive_attempt_seed(self.run_seed, level, attempt);
            let candidate = self.build_candidate(attempt_seed, level, attempt);
            let grid = Grid::from_generated(&candidate);
            if route_with_min_tolls_exists(&grid, self.rules.min_tolls_to_cross) {
                return Ok(candidate);
            }
        }
        Err(GenerationError::RetriesExhausted { attempts: self.rules.max_generation_attempts })
    }

    fn build_candidate(&self, attempt_seed: u64, level: u32, attempt: u32) -> GeneratedMaze {
        let size = self.rules.grid_size;
        let route = build_guaranteed_route(attempt_seed, size);
        let route_cells: BTreeSet<Pos> = route.cells.iter().copied().collect();
        let walls = scatter_walls(attempt_seed, self.rules, size, &route_cells);
        let booths =
            place_booths(attempt_seed, self.rules, level, size, &route, &route_cells, &walls);

        GeneratedMaze {
            size,
            walls,
            booths,
            start: Pos { y: 0, x: 0 },
            goal: Pos { y: (size - 1) as i32, x: (size - 1) as i32 },
            guaranteed_route: route.cells,
            attempt,
        }
    }
}
