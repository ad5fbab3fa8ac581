// One team's season: its ordered event timeline, current date/phase and record
use super::event::CalendarEvent;
use super::phase::{classify_team_phase, SeasonKeyDates, SeasonPhase};
use super::playoffs::{build_playoff_series, PlayoffSeriesRequest};
use super::schedule::ScheduleGenerator;
use crate::error::{CalendarError, Result};
use crate::league::TeamId;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonCalendar {
    season_year: i32,
    team_id: TeamId,
    key_dates: SeasonKeyDates,
    /// Sorted ascending by date at all times
    events: Vec<CalendarEvent>,
    current_phase: SeasonPhase,
    current_date: NaiveDate,
    games_played: u32,
    games_remaining: u32,
    wins: u32,
    losses: u32,
}

impl SeasonCalendar {
    /// Calendar over an arbitrary event set; events are sorted once here
    pub fn with_events(
        season_year: i32,
        team_id: impl Into<TeamId>,
        key_dates: SeasonKeyDates,
        start_date: NaiveDate,
        events: Vec<CalendarEvent>,
    ) -> Result<Self> {
        key_dates.validate()?;

        let mut calendar = Self {
            season_year,
            team_id: team_id.into(),
            key_dates,
            events: Vec::new(),
            current_phase: classify_team_phase(start_date, &key_dates),
            current_date: start_date,
            games_played: 0,
            games_remaining: 0,
            wins: 0,
            losses: 0,
        };
        calendar.extend_events(events);
        Ok(calendar)
    }

    /// Generates the regular season for `team_id` and wraps it in a calendar
    pub fn generate(
        generator: &ScheduleGenerator<'_>,
        team_id: &str,
        key_dates: SeasonKeyDates,
        start_date: NaiveDate,
    ) -> Result<Self> {
        let events = generator.generate(team_id, &key_dates)?;
        Self::with_events(generator.season_year(), team_id, key_dates, start_date, events)
    }

    // ========================
    // Mutation
    // ========================

    /// Ordered insert; equal dates keep insertion order
    pub fn insert_event(&mut self, event: CalendarEvent) {
        let idx = self.events.partition_point(|e| e.date() <= event.date());
        self.events.insert(idx, event);
        self.refresh_remaining();
    }

    /// Bulk append followed by a single stable sort
    pub fn extend_events(&mut self, events: impl IntoIterator<Item = CalendarEvent>) {
        self.events.extend(events);
        self.events.sort_by_key(|e| e.date());
        self.refresh_remaining();
    }

    pub fn add_playoff_series(&mut self, request: &PlayoffSeriesRequest) -> Result<()> {
        let games = build_playoff_series(self.season_year, &self.team_id, request)?;
        self.extend_events(games);
        log::info!(
            "{}: added round {} series vs {} starting {}",
            self.team_id,
            request.round,
            request.opponent,
            request.start_date
        );
        Ok(())
    }

    pub fn advance_day(&mut self) {
        self.set_date(self.current_date + Duration::days(1));
    }

    pub fn advance_to(&mut self, date: NaiveDate) -> Result<()> {
        if date < self.current_date {
            return Err(CalendarError::DateRegression { current: self.current_date, requested: date });
        }
        self.set_date(date);
        Ok(())
    }

    /// Infallible date move used when the league drives every team in lockstep
    pub(crate) fn set_date(&mut self, date: NaiveDate) {
        self.current_date = date;
        self.current_phase = classify_team_phase(date, &self.key_dates);
    }

    /// Completes the earliest unplayed game and updates the record.
    ///
    /// Results are taken in timeline order, not by the current date: a
    /// result may be recorded for a game that is still ahead of the calendar.
    pub fn record_game_result(&mut self, won: bool) -> Result<&CalendarEvent> {
        if self.games_remaining == 0 {
            return Err(CalendarError::NoRemainingGames { team: self.team_id.clone() });
        }
        let idx = self
            .events
            .iter()
            .position(|e| e.is_game() && !e.is_completed())
            .ok_or_else(|| CalendarError::NoRemainingGames { team: self.team_id.clone() })?;

        self.events[idx].mark_completed();
        self.games_played += 1;
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.refresh_remaining();
        Ok(&self.events[idx])
    }

    fn refresh_remaining(&mut self) {
        self.games_remaining = (self.total_games() as u32).saturating_sub(self.games_played);
    }

    // ========================
    // Queries
    // ========================

    /// Events with `start <= date < end`
    pub fn events_between(&self, start: NaiveDate, end: NaiveDate) -> &[CalendarEvent] {
        if end <= start {
            return &[];
        }
        let lower = self.events.partition_point(|e| e.date() < start);
        let upper = self.events.partition_point(|e| e.date() < end);
        &self.events[lower..upper]
    }

    /// Events from `start` on, up to `days` days long; a window reaching past
    /// the last representable date runs to the end of the timeline
    fn events_from(&self, start: NaiveDate, days: u32) -> &[CalendarEvent] {
        match start.checked_add_signed(Duration::days(days.into())) {
            Some(end) => self.events_between(start, end),
            None => {
                let lower = self.events.partition_point(|e| e.date() < start);
                &self.events[lower..]
            }
        }
    }

    pub fn events_on(&self, date: NaiveDate) -> &[CalendarEvent] {
        self.events_from(date, 1)
    }

    /// Today plus the following `days - 1` days
    pub fn upcoming_events(&self, days: u32) -> &[CalendarEvent] {
        self.events_from(self.current_date, days)
    }

    pub fn events_in_month(&self, year: i32, month: u32) -> &[CalendarEvent] {
        let Some(start) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return &[];
        };
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        match end {
            Some(end) => self.events_between(start, end),
            None => &[],
        }
    }

    /// First unplayed game on or after the current date
    pub fn next_game(&self) -> Option<&CalendarEvent> {
        let from = self.events.partition_point(|e| e.date() < self.current_date);
        self.events[from..].iter().find(|e| e.is_game() && !e.is_completed())
    }

    pub fn remaining_games(&self) -> Vec<&CalendarEvent> {
        self.events.iter().filter(|e| e.is_game() && !e.is_completed()).collect()
    }

    pub fn games_against(&self, opponent: &str) -> Vec<&CalendarEvent> {
        self.events.iter().filter(|e| e.opponent() == Some(opponent)).collect()
    }

    pub fn has_game_on(&self, date: NaiveDate) -> bool {
        self.events_on(date).iter().any(|e| e.is_game())
    }

    /// A game today and another one yesterday
    pub fn is_back_to_back(&self) -> bool {
        self.has_game_on(self.current_date) && self.has_game_on(self.current_date - Duration::days(1))
    }

    pub fn games_in_window(&self, days: u32) -> usize {
        self.upcoming_events(days).iter().filter(|e| e.is_game()).count()
    }

    /// `None` once no unplayed game is left
    pub fn days_until_next_game(&self) -> Option<i64> {
        self.next_game().map(|game| (game.date() - self.current_date).num_days())
    }

    pub fn total_games(&self) -> usize {
        self.events.iter().filter(|e| e.is_game()).count()
    }

    pub fn home_games(&self) -> usize {
        self.events.iter().filter(|e| e.is_home_game()).count()
    }

    /// Back-to-back pairs across the whole schedule
    pub fn back_to_back_count(&self) -> usize {
        let days: Vec<NaiveDate> =
            self.events.iter().filter(|e| e.is_game()).map(|e| e.date()).collect();
        super::schedule::count_back_to_backs(&days)
    }

    pub fn games_in_month(&self, date: NaiveDate) -> usize {
        self.events_in_month(date.year(), date.month()).iter().filter(|e| e.is_game()).count()
    }

    // ========================
    // Accessors
    // ========================

    pub fn season_year(&self) -> i32 {
        self.season_year
    }

    pub fn team_id(&self) -> &str {
        &self.team_id
    }

    pub fn key_dates(&self) -> &SeasonKeyDates {
        &self.key_dates
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    pub fn current_phase(&self) -> SeasonPhase {
        self.current_phase
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn games_remaining(&self) -> u32 {
        self.games_remaining
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn record(&self) -> (u32, u32) {
        (self.wins, self.losses)
    }
}
