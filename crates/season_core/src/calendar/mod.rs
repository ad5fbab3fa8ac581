//! Season calendar: event model, schedule generation, phases, playoff series
//! and the team/league orchestrators built on top of them.

pub mod event;
pub mod league;
pub mod phase;
pub mod playoffs;
pub mod schedule;
pub mod season;

pub use event::{CalendarEvent, EventKind, GameInfo};
pub use league::LeagueCalendar;
pub use phase::{
    classify_league_phase, classify_team_phase, LeagueKeyDates, SeasonKeyDates, SeasonPhase,
};
pub use playoffs::{build_playoff_series, PlayoffSeriesRequest};
pub use schedule::{place_game_dates, ScheduleGenerator};
pub use season::SeasonCalendar;
