//! League structure and the shared quota pass that feeds every team's schedule.

pub mod quota;
pub mod structure;

pub use quota::{ordered_pair, QuotaTable};
pub use structure::{Conference, LeagueStructure, TeamId, TeamInfo};
