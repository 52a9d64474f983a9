use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct NodeId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    pub fn apply(self, pos: Pos) -> Pos {
        match self {
            Self::Up => Pos { y: pos.y - 1, x: pos.x },
            Self::Right => Pos { y: pos.y, x: pos.x + 1 },
            Self::Down => Pos { y: pos.y + 1, x: pos.x },
            Self::Left => Pos { y: pos.y, x: pos.x - 1 },
        }
    }

    /// The single move that takes `from` to the adjacent cell `to`, if any.
    pub fn between(from: Pos, to: Pos) -> Option<Self> {
        Self::ALL.into_iter().find(|direction| direction.apply(from) == to)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weather {
    Clear,
    Rain,
    Storm,
    Fog,
}

impl Weather {
    pub const ALL: [Self; 4] = [Self::Clear, Self::Rain, Self::Storm, Self::Fog];

    /// Toll surcharge as an integer percent; costs are `base * percent / 100`.
    pub fn surcharge_percent(self) -> u32 {
        match self {
            Self::Clear => 100,
            Self::Rain => 120,
            Self::Storm => 150,
            Self::Fog => 130,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationError {
    /// Every candidate layout in the retry budget failed verification.
    RetriesExhausted { attempts: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveError {
    /// Recoverable; state unchanged.
    OutOfBounds { attempted: Pos },
    /// Recoverable; state unchanged.
    WallBlocked { pos: Pos },
    /// The run already reached a terminal outcome.
    RunOver,
    /// Regenerating the next level's maze failed. Fatal; the session must end.
    MazeRegeneration(GenerationError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrekError {
    NotAdjacent { to: char },
    RoadBlocked { from: char, to: char },
    LevelOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Victory { money: u32, total_spent: u32, levels_cleared: u32 },
    Bankrupt { required: u32, available: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    TollPaid { cost: u32, weather: Weather },
    LevelCleared { bonus: u32, next_level: u32 },
    Finished(RunOutcome),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintResponse {
    Step(Pos),
    NoMoreHints,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrekOutcome {
    Moved { cost: u32 },
    LevelComplete { total_cost: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogEvent {
    MazeAccepted { level: u32, attempt: u32 },
    MoveRejected { attempted: Pos, reason: MoveError },
    TollPaid { pos: Pos, cost: u32, weather: Weather },
    RouteReplanned { from: Pos, constrained: bool },
    HintServed { target: Pos },
    LevelCleared { level: u32, bonus: u32 },
    RunEnded { outcome: RunOutcome },
}
