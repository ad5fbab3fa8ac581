//! # Regular-Season Schedule Generator
//!
//! Turns the league quota table into one team's dated game list:
//!
//! 1. quotas come from the shared [`QuotaTable`];
//! 2. game days are drawn from the regular-season window with an adaptive
//!    accept probability that is damped on the day after a game;
//! 3. opponents are dealt onto those days in repetition rounds, alternating
//!    the host on every meeting;
//! 4. each game may be picked for a national broadcast.
//!
//! All randomness comes from a seeded generator, so the same seed always
//! yields the same schedule.

use super::event::{CalendarEvent, EventKind};
use super::phase::{SeasonKeyDates, PRESEASON_DAYS};
use crate::config::ScheduleConfig;
use crate::error::{CalendarError, Result};
use crate::league::{ordered_pair, QuotaTable};
use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Awards night, counted from the first playoff day
const AWARDS_OFFSET_DAYS: i64 = 45;

/// Id shared by the home and away copies of a regular-season meeting.
///
/// The id names the n-th meeting of a pairing, not a dated game: each team
/// places its own dates, so the two copies usually fall on different days.
pub fn regular_season_game_id(season_year: i32, team: &str, opponent: &str, meeting: u8) -> String {
    let (low, high) = ordered_pair(team, opponent);
    format!("{season_year}-{low}-{high}-{meeting}")
}

/// Picks `required` game days out of `candidates` (sorted ascending).
///
/// When the games still needed equal the days left, every remaining day is
/// taken, so the result is always exactly `required` long. Only a window
/// shorter than the quota is an error.
pub fn place_game_dates<R: Rng + ?Sized>(
    team_id: &str,
    candidates: &[NaiveDate],
    required: usize,
    config: &ScheduleConfig,
    rng: &mut R,
) -> Result<Vec<NaiveDate>> {
    let available = candidates.len();
    if required > available {
        return Err(CalendarError::Capacity { team: team_id.to_string(), required, available });
    }

    let mut placed: Vec<NaiveDate> = Vec::with_capacity(required);
    let mut forced = 0usize;

    for (i, date) in candidates.iter().enumerate() {
        let needed = required - placed.len();
        if needed == 0 {
            break;
        }
        let left = available - i;

        let accept = if needed >= left {
            forced += 1;
            true
        } else {
            let mut p = (needed as f64 / left as f64 * config.placement_slack).min(1.0);
            let follows_game = placed.last().is_some_and(|last| *last + Duration::days(1) == *date);
            if follows_game {
                p *= config.back_to_back_factor;
            }
            rng.gen_bool(p)
        };

        if accept {
            placed.push(*date);
        }
    }

    if forced > 0 {
        if forced * 10 > required {
            log::warn!("{}: compacted {} of {} games into trailing days", team_id, forced, required);
        } else {
            log::debug!("{}: compacted {} trailing games", team_id, forced);
        }
    }

    Ok(placed)
}

/// Number of game days immediately preceded by another game day
pub fn count_back_to_backs(dates: &[NaiveDate]) -> usize {
    dates.windows(2).filter(|pair| pair[0] + Duration::days(1) == pair[1]).count()
}

pub struct ScheduleGenerator<'a> {
    quotas: &'a QuotaTable,
    config: &'a ScheduleConfig,
}

impl<'a> ScheduleGenerator<'a> {
    pub fn new(quotas: &'a QuotaTable, config: &'a ScheduleConfig) -> Self {
        Self { quotas, config }
    }

    pub fn season_year(&self) -> i32 {
        self.quotas.season_year()
    }

    /// Per-team seed; independent of generation order
    pub fn team_seed(&self, team_id: &str) -> u64 {
        fxhash::hash64(&(self.config.seed, self.quotas.season_year(), team_id))
    }

    /// Full regular season plus key-date events for one team
    pub fn generate(&self, team_id: &str, key_dates: &SeasonKeyDates) -> Result<Vec<CalendarEvent>> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.team_seed(team_id));
        self.generate_with_rng(team_id, key_dates, &mut rng)
    }

    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        team_id: &str,
        key_dates: &SeasonKeyDates,
        rng: &mut R,
    ) -> Result<Vec<CalendarEvent>> {
        if !self.quotas.contains(team_id) {
            return Err(CalendarError::Configuration(format!(
                "team {team_id} is not part of the league quota table"
            )));
        }
        key_dates.validate()?;

        let opponents = self.quotas.opponents_of(team_id);

        let required: usize = opponents.iter().map(|(_, games)| *games as usize).sum();
        let candidates = self.candidate_days(key_dates);
        let dates = place_game_dates(team_id, &candidates, required, self.config, rng)?;
        let slate = Self::deal_slate(&opponents, rng);

        let mut events = Vec::with_capacity(required + 7);
        for (date, (opponent, meeting)) in dates.into_iter().zip(slate) {
            events.push(self.build_game(team_id, opponent, meeting, date)?);
        }
        events.extend(self.key_events(team_id, key_dates)?);

        log::debug!(
            "Generated {} games for {} ({} back-to-backs)",
            required,
            team_id,
            count_back_to_backs(
                &events.iter().filter(|e| e.is_game()).map(|e| e.date()).collect::<Vec<_>>()
            )
        );
        Ok(events)
    }

    fn candidate_days(&self, key_dates: &SeasonKeyDates) -> Vec<NaiveDate> {
        key_dates
            .season_start
            .iter_days()
            .take_while(|day| *day <= key_dates.regular_season_end)
            .filter(|day| !(self.config.skip_all_star_break && key_dates.in_all_star_break(*day)))
            .collect()
    }

    /// Meeting r of every opponent comes before meeting r+1 of any opponent;
    /// order inside a round is shuffled.
    fn deal_slate<'o, R: Rng + ?Sized>(opponents: &[(&'o str, u8)], rng: &mut R) -> Vec<(&'o str, u8)> {
        let rounds = opponents.iter().map(|(_, games)| *games).max().unwrap_or(0);
        let mut slate = Vec::new();
        for meeting in 0..rounds {
            let mut round: Vec<&str> =
                opponents.iter().filter(|(_, games)| *games > meeting).map(|(o, _)| *o).collect();
            round.shuffle(rng);
            slate.extend(round.into_iter().map(|o| (o, meeting)));
        }
        slate
    }

    fn build_game(
        &self,
        team_id: &str,
        opponent: &str,
        meeting: u8,
        date: NaiveDate,
    ) -> Result<CalendarEvent> {
        let season_year = self.quotas.season_year();
        let is_home = self.quotas.hosts_first(team_id, opponent) == (meeting % 2 == 0);
        let (home, away) = if is_home { (team_id, opponent) } else { (opponent, team_id) };
        let id = regular_season_game_id(season_year, team_id, opponent, meeting + 1);
        let quota = self.quotas.games_between(team_id, opponent);

        let mut event = CalendarEvent::game(
            id.clone(),
            date,
            format!("{away} @ {home}"),
            home,
            away,
            team_id,
        )?
        .with_description(format!("Regular season meeting {} of {}", meeting + 1, quota));

        // Seeded by game id so both copies of a meeting agree
        let mut broadcast_rng = ChaCha8Rng::seed_from_u64(fxhash::hash64(&(self.config.seed, &id)));
        if broadcast_rng.gen_bool(self.config.broadcast_probability) {
            let pick = broadcast_rng.gen_range(0..self.config.broadcasters.len().max(1));
            if let Some(network) = self.config.broadcaster(pick) {
                event = event.with_broadcast(network);
            }
        }
        Ok(event)
    }

    fn key_events(&self, team_id: &str, dates: &SeasonKeyDates) -> Result<Vec<CalendarEvent>> {
        let year = self.quotas.season_year();
        let entries = [
            (
                "media-day",
                EventKind::MediaDay,
                dates.season_start - Duration::days(PRESEASON_DAYS),
                "Media Day",
            ),
            ("opening-night", EventKind::Milestone, dates.season_start, "Opening Night"),
            ("trade-deadline", EventKind::TradeDeadline, dates.trade_deadline, "Trade Deadline"),
            ("all-star", EventKind::AllStarEvent, dates.all_star, "All-Star Weekend"),
            ("season-end", EventKind::SeasonEnd, dates.regular_season_end, "Regular Season Finale"),
            ("playoffs-start", EventKind::PlayoffsStart, dates.playoffs_start, "Playoffs Begin"),
            (
                "awards",
                EventKind::Awards,
                dates.playoffs_start + Duration::days(AWARDS_OFFSET_DAYS),
                "League Awards",
            ),
        ];

        entries
            .into_iter()
            .map(|(slug, kind, date, title)| {
                CalendarEvent::non_game(
                    format!("{year}-{team_id}-{slug}"),
                    kind,
                    date,
                    title,
                    kind.display_name(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::LeagueStructure;
    use std::collections::{HashMap, HashSet};

    fn setup(seed: u64) -> (QuotaTable, ScheduleConfig) {
        let config = ScheduleConfig::testing(seed);
        let quotas = QuotaTable::build(&LeagueStructure::standard(), &config, 2025).unwrap();
        (quotas, config)
    }

    fn games(events: &[CalendarEvent]) -> Vec<&CalendarEvent> {
        events.iter().filter(|e| e.is_game()).collect()
    }

    #[test]
    fn test_every_team_gets_82_games() {
        let (quotas, config) = setup(1);
        let generator = ScheduleGenerator::new(&quotas, &config);
        let dates = SeasonKeyDates::for_season(2025).unwrap();
        for team in LeagueStructure::standard().team_ids() {
            let events = generator.generate(team, &dates).unwrap();
            assert_eq!(games(&events).len(), 82, "team {team}");
        }
    }

    #[test]
    fn test_game_counts_match_quota_per_opponent() {
        let (quotas, config) = setup(2);
        let generator = ScheduleGenerator::new(&quotas, &config);
        let dates = SeasonKeyDates::for_season(2025).unwrap();
        let events = generator.generate("LAL", &dates).unwrap();

        let mut counts: HashMap<&str, (u8, u8)> = HashMap::new();
        for game in games(&events) {
            let entry = counts.entry(game.opponent().unwrap()).or_default();
            entry.0 += 1;
            if game.is_home_game() {
                entry.1 += 1;
            }
        }
        for (opponent, quota) in quotas.opponents_of("LAL") {
            let (played, home) = counts[opponent];
            assert_eq!(played, quota, "vs {opponent}");
            assert_eq!(home, quotas.home_games_against("LAL", opponent), "home vs {opponent}");
        }
    }

    #[test]
    fn test_one_game_per_day_inside_window() {
        let (quotas, config) = setup(3);
        let generator = ScheduleGenerator::new(&quotas, &config);
        let dates = SeasonKeyDates::for_season(2025).unwrap();
        let events = generator.generate("MIA", &dates).unwrap();

        let mut days = HashSet::new();
        for game in games(&events) {
            assert!(days.insert(game.date()), "two games on {}", game.date());
            assert!(game.date() >= dates.season_start && game.date() <= dates.regular_season_end);
            assert!(!dates.in_all_star_break(game.date()));
        }
    }

    #[test]
    fn test_same_seed_same_schedule() {
        let (quotas, config) = setup(99);
        let generator = ScheduleGenerator::new(&quotas, &config);
        let dates = SeasonKeyDates::for_season(2025).unwrap();
        assert_eq!(generator.generate("DEN", &dates).unwrap(), generator.generate("DEN", &dates).unwrap());

        let (other_quotas, other_config) = setup(100);
        let other = ScheduleGenerator::new(&other_quotas, &other_config);
        assert_ne!(generator.generate("DEN", &dates).unwrap(), other.generate("DEN", &dates).unwrap());
    }

    #[test]
    fn test_back_to_backs_are_limited() {
        let (quotas, config) = setup(5);
        let generator = ScheduleGenerator::new(&quotas, &config);
        let dates = SeasonKeyDates::for_season(2025).unwrap();
        let events = generator.generate("BOS", &dates).unwrap();
        let days: Vec<NaiveDate> = games(&events).iter().map(|g| g.date()).collect();
        let mut sorted = days.clone();
        sorted.sort();
        // Undamped placement averages around 40 back-to-backs for this window
        assert!(count_back_to_backs(&sorted) < 35);
    }

    #[test]
    fn test_capacity_error_when_window_too_short() {
        let config = ScheduleConfig::default();
        let start = NaiveDate::from_ymd_opt(2025, 10, 21).unwrap();
        let window: Vec<NaiveDate> = start.iter_days().take(5).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let err = place_game_dates("BOS", &window, 10, &config, &mut rng).unwrap_err();
        match err {
            CalendarError::Capacity { required, available, .. } => {
                assert_eq!(required, 10);
                assert_eq!(available, 5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_compaction_fills_exact_window() {
        let config = ScheduleConfig::default();
        let start = NaiveDate::from_ymd_opt(2025, 10, 21).unwrap();
        let window: Vec<NaiveDate> = start.iter_days().take(10).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let placed = place_game_dates("BOS", &window, 10, &config, &mut rng).unwrap();
        assert_eq!(placed, window);

        let placed = place_game_dates("BOS", &window, 7, &config, &mut rng).unwrap();
        assert_eq!(placed.len(), 7);
    }

    #[test]
    fn test_generator_reports_capacity_for_short_season() {
        let (quotas, config) = setup(1);
        let generator = ScheduleGenerator::new(&quotas, &config);
        let mut dates = SeasonKeyDates::for_season(2025).unwrap();
        dates.regular_season_end = dates.season_start + Duration::days(40);
        dates.trade_deadline = dates.season_start + Duration::days(10);
        dates.all_star = dates.season_start + Duration::days(20);
        assert!(matches!(
            generator.generate("BOS", &dates),
            Err(CalendarError::Capacity { required: 82, .. })
        ));
    }

    #[test]
    fn test_unknown_team_is_configuration_error() {
        let (quotas, config) = setup(1);
        let generator = ScheduleGenerator::new(&quotas, &config);
        let dates = SeasonKeyDates::for_season(2025).unwrap();
        let err = generator.generate("XXX", &dates).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_key_events_present() {
        let (quotas, config) = setup(1);
        let generator = ScheduleGenerator::new(&quotas, &config);
        let dates = SeasonKeyDates::for_season(2025).unwrap();
        let events = generator.generate("BOS", &dates).unwrap();
        let kinds: HashSet<EventKind> =
            events.iter().filter(|e| !e.is_game()).map(|e| e.kind()).collect();
        for kind in [
            EventKind::MediaDay,
            EventKind::Milestone,
            EventKind::TradeDeadline,
            EventKind::AllStarEvent,
            EventKind::SeasonEnd,
            EventKind::PlayoffsStart,
            EventKind::Awards,
        ] {
            assert!(kinds.contains(&kind), "{kind:?} missing");
        }
    }

    #[test]
    fn test_broadcasts_follow_probability() {
        let quotas = QuotaTable::build(
            &LeagueStructure::standard(),
            &ScheduleConfig::default(),
            2025,
        )
        .unwrap();
        let always = ScheduleConfig { broadcast_probability: 1.0, ..ScheduleConfig::default() };
        let never = ScheduleConfig { broadcast_probability: 0.0, ..ScheduleConfig::default() };
        let dates = SeasonKeyDates::for_season(2025).unwrap();

        let flagged = ScheduleGenerator::new(&quotas, &always).generate("BOS", &dates).unwrap();
        assert!(games(&flagged).iter().all(|g| g.is_national_broadcast()));
        assert!(games(&flagged)
            .iter()
            .all(|g| always.broadcasters.iter().any(|b| Some(b.as_str()) == g.broadcaster())));

        let plain = ScheduleGenerator::new(&quotas, &never).generate("BOS", &dates).unwrap();
        assert!(games(&plain).iter().all(|g| !g.is_national_broadcast()));
    }

    #[test]
    fn test_shared_ids_between_opponents() {
        let (quotas, config) = setup(8);
        let generator = ScheduleGenerator::new(&quotas, &config);
        let dates = SeasonKeyDates::for_season(2025).unwrap();
        let bos = generator.generate("BOS", &dates).unwrap();
        let nyk = generator.generate("NYK", &dates).unwrap();

        let bos_ids: HashSet<&str> = games(&bos)
            .iter()
            .filter(|g| g.opponent() == Some("NYK"))
            .map(|g| g.id())
            .collect();
        let nyk_ids: HashSet<&str> = games(&nyk)
            .iter()
            .filter(|g| g.opponent() == Some("BOS"))
            .map(|g| g.id())
            .collect();
        assert_eq!(bos_ids.len(), 4);
        assert_eq!(bos_ids, nyk_ids);
    }
}
