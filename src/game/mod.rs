//! Game play against a known board

pub mod batch;
pub mod report;
pub mod rng;
pub mod session;

pub use batch::{play_boards, play_directory, BatchSummary};
pub use report::{GameOutcome, GameReport, GameSummary, MoveSource, TurnRecord};
pub use rng::GameRng;
pub use session::GameSession;
