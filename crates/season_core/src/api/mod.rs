pub mod calendar_json;

pub use calendar_json::{
    build_league_calendar, build_league_calendar_json, phase_for_date, phase_for_date_json,
    team_schedule, team_schedule_json, LeagueCalendarRequest, LeagueCalendarResponse,
    PhaseResponse, TeamScheduleRequest, TeamScheduleResponse, TeamScheduleSummary,
};
