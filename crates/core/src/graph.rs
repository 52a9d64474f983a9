//! Graph-mode toll trekking: a randomized directed road map navigated by hand.
//!
//! Unlike the grid variant, generation here performs no reachability pass;
//! a road map may have no open route from start to destination. The move
//! handler only validates individual edges.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use slotmap::SlotMap;

use crate::types::{NodeId, Pos, TrekError, TrekOutcome};

/// Side of the square layout area node positions are drawn in.
pub const CANVAS_SIZE: i32 = 800;
const NODE_MARGIN: i32 = 100;

const ROAD_COST_MIN: u64 = 3;
const ROAD_COST_MAX: u64 = 10;
/// One in four roads is blocked.
const BLOCKED_ONE_IN: u64 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Road {
    pub to: NodeId,
    pub cost: u32,
    pub blocked: bool,
}

#[derive(Clone, Debug)]
pub struct RoadNode {
    pub id: NodeId,
    pub label: char,
    /// Layout position for a renderer; core logic ignores it.
    pub pos: Pos,
    pub roads: Vec<Road>,
}

#[derive(Clone, Debug)]
pub struct RoadMap {
    pub nodes: SlotMap<NodeId, RoadNode>,
    /// Generation order; the first entry is the start, the last the destination.
    pub order: Vec<NodeId>,
    pub start: NodeId,
    pub destination: NodeId,
}

impl RoadMap {
    /// Build `5 + 2 * level` labeled nodes with 1..=3 outgoing roads each.
    /// Roads to already-connected destinations are skipped rather than
    /// duplicated, so a node can end up with a single road.
    pub fn generate(run_seed: u64, level: u32) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(level_seed(run_seed, level));
        let node_count = 5 + 2 * level as usize;

        let mut nodes: SlotMap<NodeId, RoadNode> = SlotMap::with_key();
        let mut order = Vec::with_capacity(node_count);
        let span = (CANVAS_SIZE - 2 * NODE_MARGIN + 1) as u64;
        for index in 0..node_count {
            let pos = Pos {
                y: NODE_MARGIN + (rng.next_u64() % span) as i32,
                x: NODE_MARGIN + (rng.next_u64() % span) as i32,
            };
            let id = nodes.insert(RoadNode {
                id: NodeId::default(),
                label: node_label(index),
                pos,
                roads: Vec::new(),
            });
            nodes[id].id = id;
            order.push(id);
        }

        for from_index in 0..node_count {
            let from = order[from_index];
            let attempts = 1 + rng.next_u64() % 3;
            for _ in 0..attempts {
                let mut other = (rng.next_u64() % (node_count as u64 - 1)) as usize;
                if other >= from_index {
                    other += 1;
                }
                let to = order[other];
                if nodes[from].roads.iter().any(|road| road.to == to) {
                    continue;
                }
                let cost = (ROAD_COST_MIN + rng.next_u64() % (ROAD_COST_MAX - ROAD_COST_MIN + 1))
                    as u32;
                nodes[from].roads.push(Road { to, cost, blocked: false });
            }
        }

        for &id in &order {
            for road in &mut nodes[id].roads {
                road.blocked = rng.next_u64() % BLOCKED_ONE_IN == 0;
            }
        }

        let start = order[0];
        let destination = order[node_count - 1];
        Self { nodes, order, start, destination }
    }

    pub fn label_of(&self, id: NodeId) -> char {
        self.nodes.get(id).map(|node| node.label).unwrap_or('?')
    }
}

pub struct Trek {
    run_seed: u64,
    pub map: RoadMap,
    pub current: NodeId,
    pub path: Vec<NodeId>,
    pub total_cost: u32,
    pub level: u32,
    pub complete: bool,
}

impl Trek {
    pub fn new(run_seed: u64, level: u32) -> Self {
        let map = RoadMap::generate(run_seed, level);
        let start = map.start;
        Self { run_seed, map, current: start, path: vec![start], total_cost: 0, level, complete: false }
    }

    /// Drive to a neighboring node. Blocked roads and non-neighbors are
    /// rejected with the trek untouched.
    pub fn move_car(&mut self, to: NodeId) -> Result<TrekOutcome, TrekError> {
        if self.complete {
            return Err(TrekError::LevelOver);
        }
        let Some(road) =
            self.map.nodes[self.current].roads.iter().find(|road| road.to == to).copied()
        else {
            return Err(TrekError::NotAdjacent { to: self.map.label_of(to) });
        };
        if road.blocked {
            return Err(TrekError::RoadBlocked {
                from: self.map.label_of(self.current),
                to: self.map.label_of(to),
            });
        }

        self.total_cost += road.cost;
        self.current = to;
        self.path.push(to);
        if to == self.map.destination {
            self.complete = true;
            return Ok(TrekOutcome::LevelComplete { total_cost: self.total_cost });
        }
        Ok(TrekOutcome::Moved { cost: road.cost })
    }

    /// Regenerate at the next level and reset per-level trek state.
    pub fn next_level(&mut self) {
        self.level += 1;
        self.map = RoadMap::generate(self.run_seed, self.level);
        self.current = self.map.start;
        self.path = vec![self.current];
        self.total_cost = 0;
        self.complete = false;
    }

    pub fn open_roads(&self) -> impl Iterator<Item = &Road> {
        self.map.nodes[self.current].roads.iter().filter(|road| !road.blocked)
    }

    pub fn path_labels(&self) -> Vec<char> {
        self.path.iter().map(|&id| self.map.label_of(id)).collect()
    }
}

fn node_label(index: usize) -> char {
    // Past 'Z' the labels continue through the following ASCII range; the
    // label is an identity, not display text.
    char::from_u32('A' as u32 + index as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn level_seed(run_seed: u64, level: u32) -> u64 {
    let mut mixed = run_seed ^ (level as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    mixed ^= mixed >> 30;
    mixed = mixed.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= mixed >> 27;
    mixed = mixed.wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^ (mixed >> 31)
}
