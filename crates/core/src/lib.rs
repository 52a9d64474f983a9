pub mod game;
pub mod graph;
pub mod journal;
pub mod journal_file;
pub mod mazegen;
pub mod replay;
pub mod rules;
pub mod search;
pub mod state;
pub mod types;

pub use game::Game;
pub use graph::{Road, RoadMap, RoadNode, Trek};
pub use journal::{InputJournal, InputPayload, InputRecord};
pub use mazegen::{BoothSpawn, GeneratedMaze, MazeGenerator, generate_maze};
pub use replay::*;
pub use rules::Rules;
pub use search::{PlannedRoute, plan_cheapest_route, route_with_min_tolls_exists};
pub use state::{GameState, Grid, TollBooth};
pub use types::*;
