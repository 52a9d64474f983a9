//! Wall scattering and toll booth placement around a guaranteed route.

use std::collections::BTreeSet;

use crate::rules::Rules;
use crate::types::{Pos, Weather};

use super::model::BoothSpawn;
use super::seed::random_usize;
use super::solution::GuaranteedRoute;

// Disjoint stream families so wall draws, booth draws, and pricing draws
// never alias each other within one attempt seed.
const WALL_COUNT_STREAM: u64 = 41;
const BOOTH_COUNT_STREAM: u64 = 42;
const WAYPOINT_PRICE_STREAM: u64 = 50;
const WALL_CANDIDATE_STREAM: u64 = 1_000;
const BOOTH_CANDIDATE_STREAM: u64 = 3_000;

/// Scatter walls over cells that are not on the guaranteed route. The target
/// count is drawn from the configured percentage band; crowded grids may fall
/// short of the target once candidate draws run out.
pub(super) fn scatter_walls(
    attempt_seed: u64,
    rules: &Rules,
    size: usize,
    route_cells: &BTreeSet<Pos>,
) -> Vec<bool> {
    let total = size * size;
    let minimum = total * rules.wall_percent_min / 100;
    let maximum = total * rules.wall_percent_max / 100;
    let target = random_usize(attempt_seed, WALL_COUNT_STREAM, minimum, maximum);

    let mut walls = vec![false; total];
    let mut placed = 0;
    let mut stream = WALL_CANDIDATE_STREAM;
    for _ in 0..target.saturating_mul(8) {
        if placed >= target {
            break;
        }
        let candidate = Pos {
            y: random_usize(attempt_seed, stream, 0, size - 1) as i32,
            x: random_usize(attempt_seed, stream + 1, 0, size - 1) as i32,
        };
        stream += 2;
        if route_cells.contains(&candidate) {
            // Start and goal are route cells, so they are covered here too.
            continue;
        }
        let index = (candidate.y as usize) * size + candidate.x as usize;
        if walls[index] {
            continue;
        }
        walls[index] = true;
        placed += 1;
    }
    walls
}

/// Price and place the two waypoint booths plus a drawn number of extra
/// booths on open cells away from the route.
pub(super) fn place_booths(
    attempt_seed: u64,
    rules: &Rules,
    level: u32,
    size: usize,
    route: &GuaranteedRoute,
    route_cells: &BTreeSet<Pos>,
    walls: &[bool],
) -> Vec<BoothSpawn> {
    let mut booths = Vec::new();
    let mut taken = BTreeSet::new();

    for (slot, &waypoint) in route.waypoints.iter().enumerate() {
        let stream = WAYPOINT_PRICE_STREAM + (slot as u64) * 2;
        booths.push(priced_booth(attempt_seed, stream, level, waypoint, rules));
        taken.insert(waypoint);
    }

    let extra_target = random_usize(
        attempt_seed,
        BOOTH_COUNT_STREAM,
        rules.extra_booths_min,
        rules.extra_booths_max,
    );
    let mut placed = 0;
    let mut stream = BOOTH_CANDIDATE_STREAM;
    for _ in 0..extra_target.saturating_mul(8) {
        if placed >= extra_target {
            break;
        }
        let candidate = Pos {
            y: random_usize(attempt_seed, stream, 0, size - 1) as i32,
            x: random_usize(attempt_seed, stream + 1, 0, size - 1) as i32,
        };
        let price_stream = stream + 2;
        stream += 4;
        if route_cells.contains(&candidate) || taken.contains(&candidate) {
            continue;
        }
        if walls[(candidate.y as usize) * size + candidate.x as usize] {
            continue;
        }
        booths.push(priced_booth(attempt_seed, price_stream, level, candidate, rules));
        taken.insert(candidate);
        placed += 1;
    }

    booths
}

fn priced_booth(attempt_seed: u64, stream: u64, level: u32, pos: Pos, rules: &Rules) -> BoothSpawn {
    let base = random_usize(
        attempt_seed,
        stream,
        rules.booth_base_min as usize,
        rules.booth_base_max as usize,
    ) as u32
        * level;
    let weather =
        Weather::ALL[random_usize(attempt_seed, stream + 1, 0, Weather::ALL.len() - 1)];
    BoothSpawn { pos, cost: base * weather.surcharge_percent() / 100, weather }
}
