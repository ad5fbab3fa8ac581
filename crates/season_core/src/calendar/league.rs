//! League-wide calendar: one [`SeasonCalendar`] per team driven by a single
//! authoritative date.
//!
//! Team schedules are generated in parallel (they share nothing but the
//! read-only quota table). Everything after that goes through `&mut self`,
//! so day advancement and playoff injection always have a single writer.

use super::phase::{classify_league_phase, LeagueKeyDates, SeasonPhase};
use super::playoffs::{build_playoff_series, PlayoffSeriesRequest};
use super::schedule::ScheduleGenerator;
use super::season::SeasonCalendar;
use crate::config::ScheduleConfig;
use crate::error::{CalendarError, Result};
use crate::league::{LeagueStructure, QuotaTable, TeamId};
use chrono::{Duration, NaiveDate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueCalendar {
    season_year: i32,
    current_date: NaiveDate,
    current_phase: SeasonPhase,
    key_dates: LeagueKeyDates,
    teams: BTreeMap<TeamId, SeasonCalendar>,
}

impl LeagueCalendar {
    /// League year with the canonical key dates for `season_year`
    pub fn new(season_year: i32, structure: &LeagueStructure, config: &ScheduleConfig) -> Result<Self> {
        let key_dates = LeagueKeyDates::for_season(season_year)?;
        Self::with_key_dates(season_year, structure, config, key_dates)
    }

    /// Builds every team calendar up front. The league starts on draft day.
    pub fn with_key_dates(
        season_year: i32,
        structure: &LeagueStructure,
        config: &ScheduleConfig,
        key_dates: LeagueKeyDates,
    ) -> Result<Self> {
        config.validate()?;
        key_dates.validate()?;

        let quotas = QuotaTable::build(structure, config, season_year)?;
        let generator = ScheduleGenerator::new(&quotas, config);
        let team_dates = key_dates.team_dates();
        let start = key_dates.draft;

        let calendars = structure
            .team_ids()
            .par_iter()
            .map(|team_id| SeasonCalendar::generate(&generator, team_id, team_dates, start))
            .collect::<Result<Vec<_>>>()?;

        let teams: BTreeMap<TeamId, SeasonCalendar> =
            calendars.into_iter().map(|c| (c.team_id().to_string(), c)).collect();

        log::info!(
            "League calendar {} created: {} teams, {} games scheduled",
            season_year,
            teams.len(),
            teams.values().map(|c| c.total_games()).sum::<usize>() / 2
        );

        Ok(Self {
            season_year,
            current_date: start,
            current_phase: classify_league_phase(start, &key_dates),
            key_dates,
            teams,
        })
    }

    // ========================
    // Advancement
    // ========================

    /// Moves the league and every team one day forward; returns the new phase
    pub fn advance_day(&mut self) -> SeasonPhase {
        let next = self.current_date + Duration::days(1);
        self.move_to(next);
        self.current_phase
    }

    pub fn advance_to(&mut self, date: NaiveDate) -> Result<SeasonPhase> {
        if date < self.current_date {
            return Err(CalendarError::DateRegression { current: self.current_date, requested: date });
        }
        self.move_to(date);
        Ok(self.current_phase)
    }

    fn move_to(&mut self, date: NaiveDate) {
        let phase = classify_league_phase(date, &self.key_dates);
        for calendar in self.teams.values_mut() {
            calendar.set_date(date);
        }
        if phase != self.current_phase {
            log::info!(
                "League phase {} -> {} on {}",
                self.current_phase.display_name(),
                phase.display_name(),
                date
            );
        }
        self.current_date = date;
        self.current_phase = phase;
    }

    // ========================
    // Phase queries
    // ========================

    /// Pure lookup; does not touch the current date
    pub fn phase_for_date(&self, date: NaiveDate) -> SeasonPhase {
        classify_league_phase(date, &self.key_dates)
    }

    /// Days from today to the first day of `phase` (negative once it started)
    pub fn days_until_phase(&self, phase: SeasonPhase) -> i64 {
        (self.key_dates.boundary_of(phase) - self.current_date).num_days()
    }

    // ========================
    // Results & playoffs
    // ========================

    pub fn record_game_result(&mut self, team_id: &str, won: bool) -> Result<()> {
        self.team_entry(team_id)?.record_game_result(won)?;
        Ok(())
    }

    /// Appends a series to one team's calendar only
    pub fn inject_playoff_series(&mut self, team_id: &str, request: &PlayoffSeriesRequest) -> Result<()> {
        if !self.teams.contains_key(&request.opponent) {
            return Err(CalendarError::TeamNotFound(request.opponent.clone()));
        }
        self.team_entry(team_id)?.add_playoff_series(request)
    }

    /// Schedules a series on both calendars; the higher seed holds home court.
    /// Both sides are built before either calendar changes.
    pub fn schedule_playoff_series(
        &mut self,
        higher: &str,
        lower: &str,
        round: u8,
        higher_seed: u8,
        lower_seed: u8,
        start_date: NaiveDate,
    ) -> Result<()> {
        for team_id in [higher, lower] {
            if !self.teams.contains_key(team_id) {
                return Err(CalendarError::TeamNotFound(team_id.to_string()));
            }
        }

        let higher_request = PlayoffSeriesRequest {
            opponent: lower.to_string(),
            round,
            seed: higher_seed,
            opponent_seed: lower_seed,
            has_home_court: true,
            start_date,
        };
        let lower_request = PlayoffSeriesRequest {
            opponent: higher.to_string(),
            round,
            seed: lower_seed,
            opponent_seed: higher_seed,
            has_home_court: false,
            start_date,
        };
        let higher_games = build_playoff_series(self.season_year, higher, &higher_request)?;
        let lower_games = build_playoff_series(self.season_year, lower, &lower_request)?;

        self.team_entry(higher)?.extend_events(higher_games);
        self.team_entry(lower)?.extend_events(lower_games);
        log::info!(
            "Round {} series scheduled: ({}) {} vs ({}) {} from {}",
            round,
            higher_seed,
            higher,
            lower_seed,
            lower,
            start_date
        );
        Ok(())
    }

    fn team_entry(&mut self, team_id: &str) -> Result<&mut SeasonCalendar> {
        self.teams.get_mut(team_id).ok_or_else(|| CalendarError::TeamNotFound(team_id.to_string()))
    }

    // ========================
    // Accessors
    // ========================

    pub fn team(&self, team_id: &str) -> Option<&SeasonCalendar> {
        self.teams.get(team_id)
    }

    pub fn teams(&self) -> impl Iterator<Item = &SeasonCalendar> {
        self.teams.values()
    }

    pub fn team_ids(&self) -> impl Iterator<Item = &str> {
        self.teams.keys().map(String::as_str)
    }

    /// Regular-season meetings `a` has on its calendar against `b`
    pub fn regular_season_games_between(&self, a: &str, b: &str) -> usize {
        self.team(a)
            .map(|c| c.games_against(b).iter().filter(|g| !g.is_playoff_game()).count())
            .unwrap_or(0)
    }

    pub fn season_year(&self) -> i32 {
        self.season_year
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    pub fn current_phase(&self) -> SeasonPhase {
        self.current_phase
    }

    pub fn key_dates(&self) -> &LeagueKeyDates {
        &self.key_dates
    }
}
