//! # Season Phases
//!
//! Maps a date plus a set of boundary dates to exactly one [`SeasonPhase`].
//!
//! Every boundary is a half-open interval `[start, end)`. Rules are checked in
//! a fixed priority order, short windows first (trade deadline, all-star
//! break), so overlapping ranges always resolve the same way. Anything no
//! rule claims is `Offseason`, so classification never fails.

use crate::error::{CalendarError, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// All-star weekend plus the break days after it
pub const ALL_STAR_BREAK_DAYS: i64 = 6;
/// Parade and celebration after the championship
pub const CELEBRATION_DAYS: i64 = 7;
/// Team calendars have no finals date; playoffs last at most this long
pub const PLAYOFF_WINDOW_DAYS: i64 = 60;
/// Preseason length seen by a team calendar
pub const PRESEASON_DAYS: i64 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeasonPhase {
    Offseason,
    Draft,
    FreeAgency,
    SummerLeague,
    TrainingCamp,
    Preseason,
    RegularSeason,
    AllStarBreak,
    TradeDeadline,
    Playoffs,
    Finals,
    ChampionshipCelebration,
}

impl SeasonPhase {
    pub const ALL: [SeasonPhase; 12] = [
        SeasonPhase::Offseason,
        SeasonPhase::Draft,
        SeasonPhase::FreeAgency,
        SeasonPhase::SummerLeague,
        SeasonPhase::TrainingCamp,
        SeasonPhase::Preseason,
        SeasonPhase::RegularSeason,
        SeasonPhase::AllStarBreak,
        SeasonPhase::TradeDeadline,
        SeasonPhase::Playoffs,
        SeasonPhase::Finals,
        SeasonPhase::ChampionshipCelebration,
    ];

    /// Position in the league year. Sub-phases share the rank of the phase
    /// they interrupt, so the rank never decreases as a league year advances.
    pub fn stage(&self) -> u8 {
        match self {
            SeasonPhase::Offseason => 0,
            SeasonPhase::Draft => 1,
            SeasonPhase::FreeAgency | SeasonPhase::SummerLeague => 2,
            SeasonPhase::TrainingCamp => 3,
            SeasonPhase::Preseason => 4,
            SeasonPhase::RegularSeason | SeasonPhase::AllStarBreak | SeasonPhase::TradeDeadline => 5,
            SeasonPhase::Playoffs => 6,
            SeasonPhase::Finals => 7,
            SeasonPhase::ChampionshipCelebration => 8,
        }
    }

    pub fn is_in_season(&self) -> bool {
        matches!(
            self,
            SeasonPhase::RegularSeason
                | SeasonPhase::AllStarBreak
                | SeasonPhase::TradeDeadline
                | SeasonPhase::Playoffs
                | SeasonPhase::Finals
        )
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SeasonPhase::Offseason => "Offseason",
            SeasonPhase::Draft => "Draft",
            SeasonPhase::FreeAgency => "Free Agency",
            SeasonPhase::SummerLeague => "Summer League",
            SeasonPhase::TrainingCamp => "Training Camp",
            SeasonPhase::Preseason => "Preseason",
            SeasonPhase::RegularSeason => "Regular Season",
            SeasonPhase::AllStarBreak => "All-Star Break",
            SeasonPhase::TradeDeadline => "Trade Deadline",
            SeasonPhase::Playoffs => "Playoffs",
            SeasonPhase::Finals => "Finals",
            SeasonPhase::ChampionshipCelebration => "Championship Celebration",
        }
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        CalendarError::Configuration(format!("invalid date {year:04}-{month:02}-{day:02}"))
    })
}

fn ensure_order(pairs: &[(&str, NaiveDate, &str, NaiveDate)]) -> Result<()> {
    for (first_name, first, second_name, second) in pairs {
        if first > second {
            return Err(CalendarError::Configuration(format!(
                "{first_name} ({first}) must not be after {second_name} ({second})"
            )));
        }
    }
    Ok(())
}

/// Boundary dates a single team calendar works with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonKeyDates {
    pub season_start: NaiveDate,
    pub all_star: NaiveDate,
    pub trade_deadline: NaiveDate,
    pub regular_season_end: NaiveDate,
    pub playoffs_start: NaiveDate,
}

impl SeasonKeyDates {
    /// Canonical dates for the season starting in the autumn of `season_year`
    pub fn for_season(season_year: i32) -> Result<Self> {
        let next = following_year(season_year)?;
        let dates = Self {
            season_start: ymd(season_year, 10, 21)?,
            all_star: ymd(next, 2, 13)?,
            trade_deadline: ymd(next, 2, 5)?,
            regular_season_end: ymd(next, 4, 12)?,
            playoffs_start: ymd(next, 4, 18)?,
        };
        dates.validate()?;
        Ok(dates)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_order(&[
            ("season_start", self.season_start, "trade_deadline", self.trade_deadline),
            ("season_start", self.season_start, "all_star", self.all_star),
            ("trade_deadline", self.trade_deadline, "regular_season_end", self.regular_season_end),
            ("all_star", self.all_star, "regular_season_end", self.regular_season_end),
            ("regular_season_end", self.regular_season_end, "playoffs_start", self.playoffs_start),
        ])
    }

    /// First day after the all-star break
    pub fn all_star_break_end(&self) -> NaiveDate {
        self.all_star + Duration::days(ALL_STAR_BREAK_DAYS)
    }

    pub fn in_all_star_break(&self, date: NaiveDate) -> bool {
        self.all_star <= date && date < self.all_star_break_end()
    }
}

/// League-wide boundary dates of one league year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueKeyDates {
    pub draft: NaiveDate,
    pub free_agency: NaiveDate,
    pub summer_league_start: NaiveDate,
    /// Exclusive
    pub summer_league_end: NaiveDate,
    pub training_camp: NaiveDate,
    pub preseason: NaiveDate,
    pub regular_season_start: NaiveDate,
    pub all_star: NaiveDate,
    pub trade_deadline: NaiveDate,
    pub regular_season_end: NaiveDate,
    pub playoffs_start: NaiveDate,
    pub finals_start: NaiveDate,
    /// Championship decided; celebration starts here
    pub season_end: NaiveDate,
}

impl LeagueKeyDates {
    /// League year that opens with the June draft of `season_year`
    pub fn for_season(season_year: i32) -> Result<Self> {
        let next = following_year(season_year)?;
        let dates = Self {
            draft: ymd(season_year, 6, 26)?,
            free_agency: ymd(season_year, 7, 1)?,
            summer_league_start: ymd(season_year, 7, 10)?,
            summer_league_end: ymd(season_year, 7, 21)?,
            training_camp: ymd(season_year, 9, 30)?,
            preseason: ymd(season_year, 10, 5)?,
            regular_season_start: ymd(season_year, 10, 21)?,
            all_star: ymd(next, 2, 13)?,
            trade_deadline: ymd(next, 2, 5)?,
            regular_season_end: ymd(next, 4, 12)?,
            playoffs_start: ymd(next, 4, 18)?,
            finals_start: ymd(next, 6, 4)?,
            season_end: ymd(next, 6, 21)?,
        };
        dates.validate()?;
        Ok(dates)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_order(&[
            ("draft", self.draft, "free_agency", self.free_agency),
            ("free_agency", self.free_agency, "summer_league_start", self.summer_league_start),
            ("summer_league_start", self.summer_league_start, "summer_league_end", self.summer_league_end),
            ("summer_league_end", self.summer_league_end, "training_camp", self.training_camp),
            ("training_camp", self.training_camp, "preseason", self.preseason),
            ("preseason", self.preseason, "regular_season_start", self.regular_season_start),
            ("regular_season_start", self.regular_season_start, "trade_deadline", self.trade_deadline),
            ("regular_season_start", self.regular_season_start, "all_star", self.all_star),
            ("trade_deadline", self.trade_deadline, "regular_season_end", self.regular_season_end),
            ("all_star", self.all_star, "regular_season_end", self.regular_season_end),
            ("regular_season_end", self.regular_season_end, "playoffs_start", self.playoffs_start),
            ("playoffs_start", self.playoffs_start, "finals_start", self.finals_start),
            ("finals_start", self.finals_start, "season_end", self.season_end),
        ])
    }

    /// The subset a team calendar needs
    pub fn team_dates(&self) -> SeasonKeyDates {
        SeasonKeyDates {
            season_start: self.regular_season_start,
            all_star: self.all_star,
            trade_deadline: self.trade_deadline,
            regular_season_end: self.regular_season_end,
            playoffs_start: self.playoffs_start,
        }
    }

    /// First day of `phase` within this league year
    pub fn boundary_of(&self, phase: SeasonPhase) -> NaiveDate {
        match phase {
            SeasonPhase::Offseason => self.season_end + Duration::days(CELEBRATION_DAYS),
            SeasonPhase::Draft => self.draft,
            SeasonPhase::FreeAgency => self.free_agency,
            SeasonPhase::SummerLeague => self.summer_league_start,
            SeasonPhase::TrainingCamp => self.training_camp,
            SeasonPhase::Preseason => self.preseason,
            SeasonPhase::RegularSeason => self.regular_season_start,
            SeasonPhase::AllStarBreak => self.all_star,
            SeasonPhase::TradeDeadline => self.trade_deadline,
            SeasonPhase::Playoffs => self.playoffs_start,
            SeasonPhase::Finals => self.finals_start,
            SeasonPhase::ChampionshipCelebration => self.season_end,
        }
    }
}

fn following_year(season_year: i32) -> Result<i32> {
    season_year
        .checked_add(1)
        .ok_or_else(|| CalendarError::Configuration(format!("season year {season_year} out of range")))
}

type PhaseRule = (SeasonPhase, NaiveDate, NaiveDate);

fn first_match(date: NaiveDate, rules: &[PhaseRule]) -> SeasonPhase {
    rules
        .iter()
        .find(|(_, start, end)| *start <= date && date < *end)
        .map(|(phase, _, _)| *phase)
        .unwrap_or(SeasonPhase::Offseason)
}

pub fn classify_league_phase(date: NaiveDate, dates: &LeagueKeyDates) -> SeasonPhase {
    let rules = [
        (SeasonPhase::TradeDeadline, dates.trade_deadline, dates.trade_deadline + Duration::days(1)),
        (
            SeasonPhase::AllStarBreak,
            dates.all_star,
            dates.all_star + Duration::days(ALL_STAR_BREAK_DAYS),
        ),
        (
            SeasonPhase::ChampionshipCelebration,
            dates.season_end,
            dates.season_end + Duration::days(CELEBRATION_DAYS),
        ),
        (SeasonPhase::Finals, dates.finals_start, dates.season_end),
        (SeasonPhase::Playoffs, dates.playoffs_start, dates.finals_start),
        (SeasonPhase::RegularSeason, dates.regular_season_start, dates.playoffs_start),
        (SeasonPhase::Preseason, dates.preseason, dates.regular_season_start),
        (SeasonPhase::TrainingCamp, dates.training_camp, dates.preseason),
        (SeasonPhase::SummerLeague, dates.summer_league_start, dates.summer_league_end),
        (SeasonPhase::FreeAgency, dates.free_agency, dates.training_camp),
        (SeasonPhase::Draft, dates.draft, dates.free_agency),
    ];
    first_match(date, &rules)
}

pub fn classify_team_phase(date: NaiveDate, dates: &SeasonKeyDates) -> SeasonPhase {
    let rules = [
        (SeasonPhase::TradeDeadline, dates.trade_deadline, dates.trade_deadline + Duration::days(1)),
        (SeasonPhase::AllStarBreak, dates.all_star, dates.all_star_break_end()),
        (
            SeasonPhase::Playoffs,
            dates.playoffs_start,
            dates.playoffs_start + Duration::days(PLAYOFF_WINDOW_DAYS),
        ),
        (SeasonPhase::RegularSeason, dates.season_start, dates.playoffs_start),
        (
            SeasonPhase::Preseason,
            dates.season_start - Duration::days(PRESEASON_DAYS),
            dates.season_start,
        ),
    ];
    first_match(date, &rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_league_phase_landmarks() {
        let dates = LeagueKeyDates::for_season(2025).unwrap();
        let cases = [
            (d(2025, 6, 1), SeasonPhase::Offseason),
            (d(2025, 6, 26), SeasonPhase::Draft),
            (d(2025, 7, 2), SeasonPhase::FreeAgency),
            (d(2025, 7, 15), SeasonPhase::SummerLeague),
            (d(2025, 8, 15), SeasonPhase::FreeAgency),
            (d(2025, 9, 30), SeasonPhase::TrainingCamp),
            (d(2025, 10, 10), SeasonPhase::Preseason),
            (d(2025, 12, 25), SeasonPhase::RegularSeason),
            (d(2026, 2, 5), SeasonPhase::TradeDeadline),
            (d(2026, 2, 6), SeasonPhase::RegularSeason),
            (d(2026, 2, 15), SeasonPhase::AllStarBreak),
            (d(2026, 2, 19), SeasonPhase::RegularSeason),
            (d(2026, 4, 14), SeasonPhase::RegularSeason),
            (d(2026, 4, 18), SeasonPhase::Playoffs),
            (d(2026, 6, 4), SeasonPhase::Finals),
            (d(2026, 6, 21), SeasonPhase::ChampionshipCelebration),
            (d(2026, 6, 28), SeasonPhase::Offseason),
        ];
        for (date, expected) in cases {
            assert_eq!(classify_league_phase(date, &dates), expected, "{date}");
        }
    }

    #[test]
    fn test_trade_deadline_beats_overlapping_all_star() {
        let mut dates = LeagueKeyDates::for_season(2025).unwrap();
        dates.trade_deadline = dates.all_star + Duration::days(1);
        assert_eq!(classify_league_phase(dates.trade_deadline, &dates), SeasonPhase::TradeDeadline);
        assert_eq!(classify_league_phase(dates.all_star, &dates), SeasonPhase::AllStarBreak);
    }

    #[test]
    fn test_team_phase_landmarks() {
        let dates = SeasonKeyDates::for_season(2025).unwrap();
        assert_eq!(classify_team_phase(d(2025, 8, 1), &dates), SeasonPhase::Offseason);
        assert_eq!(classify_team_phase(d(2025, 10, 1), &dates), SeasonPhase::Preseason);
        assert_eq!(classify_team_phase(d(2025, 10, 21), &dates), SeasonPhase::RegularSeason);
        assert_eq!(classify_team_phase(d(2026, 2, 5), &dates), SeasonPhase::TradeDeadline);
        assert_eq!(classify_team_phase(d(2026, 2, 13), &dates), SeasonPhase::AllStarBreak);
        assert_eq!(classify_team_phase(d(2026, 4, 20), &dates), SeasonPhase::Playoffs);
        assert_eq!(classify_team_phase(d(2026, 7, 1), &dates), SeasonPhase::Offseason);
    }

    #[test]
    fn test_team_dates_projection_agrees_in_season() {
        let league = LeagueKeyDates::for_season(2025).unwrap();
        let team = league.team_dates();
        let mut date = league.regular_season_start;
        while date < league.playoffs_start {
            assert_eq!(classify_team_phase(date, &team), classify_league_phase(date, &league));
            date += Duration::days(1);
        }
    }

    #[test]
    fn test_boundary_of_starts_phase() {
        let dates = LeagueKeyDates::for_season(2025).unwrap();
        for phase in SeasonPhase::ALL {
            assert_eq!(classify_league_phase(dates.boundary_of(phase), &dates), phase, "{phase:?}");
        }
    }

    #[test]
    fn test_invalid_order_rejected() {
        let mut dates = LeagueKeyDates::for_season(2025).unwrap();
        dates.finals_start = dates.playoffs_start - Duration::days(1);
        assert!(dates.validate().is_err());

        let mut team = SeasonKeyDates::for_season(2025).unwrap();
        team.playoffs_start = team.season_start;
        assert!(team.validate().is_err());
    }

    #[test]
    fn test_out_of_range_season_year() {
        assert!(matches!(
            LeagueKeyDates::for_season(i32::MAX),
            Err(CalendarError::Configuration(_))
        ));
        assert!(matches!(
            SeasonKeyDates::for_season(i32::MAX),
            Err(CalendarError::Configuration(_))
        ));
        assert!(LeagueKeyDates::for_season(-300_000).is_err());
    }

    #[test]
    fn test_stage_ordering() {
        assert!(SeasonPhase::Draft.stage() < SeasonPhase::FreeAgency.stage());
        assert_eq!(SeasonPhase::TradeDeadline.stage(), SeasonPhase::RegularSeason.stage());
        assert!(SeasonPhase::Finals.stage() > SeasonPhase::Playoffs.stage());
        assert!(SeasonPhase::Playoffs.is_in_season());
        assert!(!SeasonPhase::Draft.is_in_season());
    }

    proptest! {
        /// Property: classification has no hidden state
        #[test]
        fn prop_league_phase_idempotent(offset in 0i64..800) {
            let dates = LeagueKeyDates::for_season(2025).unwrap();
            let date = d(2025, 1, 1) + Duration::days(offset);
            prop_assert_eq!(classify_league_phase(date, &dates), classify_league_phase(date, &dates));
        }

        /// Property: within one league year the phase never moves backwards
        #[test]
        fn prop_league_phase_monotonic(a in 0i64..365, b in 0i64..365) {
            let dates = LeagueKeyDates::for_season(2025).unwrap();
            let (early, late) = if a <= b { (a, b) } else { (b, a) };
            let first = classify_league_phase(dates.draft + Duration::days(early), &dates);
            let second = classify_league_phase(dates.draft + Duration::days(late), &dates);
            prop_assert!(first.stage() <= second.stage(), "{:?} then {:?}", first, second);
        }

        /// Property: team phases advance monotonically from preseason through the playoff window
        #[test]
        fn prop_team_phase_monotonic(a in 0i64..250, b in 0i64..250) {
            let dates = SeasonKeyDates::for_season(2030).unwrap();
            let origin = dates.season_start - Duration::days(PRESEASON_DAYS);
            let (early, late) = if a <= b { (a, b) } else { (b, a) };
            let first = classify_team_phase(origin + Duration::days(early), &dates);
            let second = classify_team_phase(origin + Duration::days(late), &dates);
            prop_assert!(first.stage() <= second.stage());
        }
    }
}
