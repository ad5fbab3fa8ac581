// Best-of-seven playoff series in the 2-2-1-1-1 format
use super::event::CalendarEvent;
use crate::error::{CalendarError, Result};
use crate::league::{ordered_pair, TeamId};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

pub const GAMES_PER_SERIES: usize = 7;

/// Home court for the team holding the advantage, games 1-7
const HOME_COURT_PATTERN: [bool; GAMES_PER_SERIES] = [true, true, false, false, true, false, true];

/// Two days between games, one extra rest day after games 2 and 4
const DAY_OFFSETS: [i64; GAMES_PER_SERIES] = [0, 2, 5, 7, 10, 12, 14];

/// Games beyond this number are only played if the series is still open
const MANDATORY_GAMES: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffSeriesRequest {
    pub opponent: TeamId,
    /// 1 = first round ... 4 = finals
    pub round: u8,
    pub seed: u8,
    pub opponent_seed: u8,
    pub has_home_court: bool,
    pub start_date: NaiveDate,
}

pub fn round_name(round: u8) -> &'static str {
    match round {
        1 => "First Round",
        2 => "Conference Semifinals",
        3 => "Conference Finals",
        4 => "Finals",
        _ => "Playoffs",
    }
}

/// Network (or pairing) carrying every game of a round
pub fn round_broadcaster(round: u8) -> &'static str {
    match round {
        4 => "ABC",
        2 | 3 => "ESPN/TNT",
        _ => "TNT/NBA TV",
    }
}

pub fn playoff_game_id(season_year: i32, round: u8, team: &str, opponent: &str, game: u8) -> String {
    let (low, high) = ordered_pair(team, opponent);
    format!("{season_year}-PO-R{round}-{low}-{high}-G{game}")
}

/// Builds all seven games of a series from `team_id`'s point of view.
///
/// Every game is produced even though the series may end early; deciding
/// which games are actually played is up to whoever resolves results.
pub fn build_playoff_series(
    season_year: i32,
    team_id: &str,
    request: &PlayoffSeriesRequest,
) -> Result<Vec<CalendarEvent>> {
    if !(1..=4).contains(&request.round) {
        return Err(CalendarError::InvalidPlayoffRound(request.round));
    }

    let round = round_name(request.round);
    let broadcaster = round_broadcaster(request.round);
    let (my_seed, their_seed) = (request.seed, request.opponent_seed);

    HOME_COURT_PATTERN
        .iter()
        .zip(DAY_OFFSETS)
        .enumerate()
        .map(|(idx, (holder_hosts, offset))| -> Result<CalendarEvent> {
            let game_number = idx as u8 + 1;
            let is_home = *holder_hosts == request.has_home_court;
            let opponent = request.opponent.as_str();
            let (home, away) = if is_home { (team_id, opponent) } else { (opponent, team_id) };

            let event = CalendarEvent::game(
                playoff_game_id(season_year, request.round, team_id, &request.opponent, game_number),
                request.start_date + Duration::days(offset),
                format!("{round} - Game {game_number} vs {}", request.opponent),
                home,
                away,
                team_id,
            )?
            .with_description(format!(
                "({my_seed}) {team_id} vs ({their_seed}) {}, {round}",
                request.opponent
            ))
            .with_playoff(request.round, game_number, game_number <= MANDATORY_GAMES)
            .with_broadcast(broadcaster);

            Ok(event)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(round: u8, has_home_court: bool) -> PlayoffSeriesRequest {
        PlayoffSeriesRequest {
            opponent: "MIA".to_string(),
            round,
            seed: 1,
            opponent_seed: 8,
            has_home_court,
            start_date: NaiveDate::from_ymd_opt(2026, 4, 18).unwrap(),
        }
    }

    #[test]
    fn test_first_round_with_home_court() {
        let games = build_playoff_series(2025, "BOS", &request(1, true)).unwrap();
        assert_eq!(games.len(), 7);

        let home: Vec<u8> = games.iter().map(|g| g.is_home_game() as u8).collect();
        assert_eq!(home, vec![1, 1, 0, 0, 1, 0, 1]);

        let start = request(1, true).start_date;
        let offsets: Vec<i64> = games.iter().map(|g| (g.date() - start).num_days()).collect();
        assert_eq!(offsets, vec![0, 2, 5, 7, 10, 12, 14]);

        // Regular spacing is 2 days; games 3 and 5 get one more
        let gaps: Vec<i64> = offsets.windows(2).map(|w| w[1] - w[0]).collect();
        assert_eq!(gaps, vec![2, 3, 2, 3, 2, 2]);
    }

    #[test]
    fn test_mirror_without_home_court() {
        let games = build_playoff_series(2025, "MIA", &PlayoffSeriesRequest {
            opponent: "BOS".to_string(),
            seed: 8,
            opponent_seed: 1,
            ..request(1, false)
        })
        .unwrap();
        let home: Vec<bool> = games.iter().map(|g| g.is_home_game()).collect();
        assert_eq!(home, vec![false, false, true, true, false, true, false]);
    }

    #[test]
    fn test_both_sides_agree() {
        let bos = build_playoff_series(2025, "BOS", &request(2, true)).unwrap();
        let mia = build_playoff_series(2025, "MIA", &PlayoffSeriesRequest {
            opponent: "BOS".to_string(),
            seed: 8,
            opponent_seed: 1,
            ..request(2, false)
        })
        .unwrap();
        for (a, b) in bos.iter().zip(&mia) {
            assert_eq!(a.id(), b.id());
            assert_eq!(a.date(), b.date());
            assert_eq!(a.game_info().unwrap().home_team, b.game_info().unwrap().home_team);
            assert_ne!(a.is_home_game(), b.is_home_game());
        }
    }

    #[test]
    fn test_titles_and_flags() {
        let games = build_playoff_series(2025, "BOS", &request(3, true)).unwrap();
        assert_eq!(games[2].title(), "Conference Finals - Game 3 vs MIA");
        assert!(games.iter().all(|g| g.is_playoff_game() && g.playoff_round() == 3));
        assert!(games.iter().all(|g| g.broadcaster() == Some("ESPN/TNT")));
        let mandatory: Vec<bool> = games.iter().map(|g| g.game_info().unwrap().mandatory).collect();
        assert_eq!(mandatory, vec![true, true, true, true, false, false, false]);
        assert_eq!(games[6].game_info().unwrap().game_number, 7);
    }

    #[test]
    fn test_broadcaster_by_round() {
        assert_eq!(round_broadcaster(4), "ABC");
        assert_eq!(round_broadcaster(2), "ESPN/TNT");
        assert_eq!(round_broadcaster(1), "TNT/NBA TV");
        let finals = build_playoff_series(2025, "BOS", &request(4, true)).unwrap();
        assert!(finals.iter().all(|g| g.broadcaster() == Some("ABC")));
        assert!(finals[0].title().starts_with("Finals"));
    }

    #[test]
    fn test_invalid_round() {
        assert!(matches!(
            build_playoff_series(2025, "BOS", &request(0, true)),
            Err(CalendarError::InvalidPlayoffRound(0))
        ));
        assert!(build_playoff_series(2025, "BOS", &request(5, true)).is_err());
    }

    #[test]
    fn test_self_matchup_rejected() {
        let mut req = request(1, true);
        req.opponent = "BOS".to_string();
        assert!(matches!(
            build_playoff_series(2025, "BOS", &req),
            Err(CalendarError::InvalidEvent(_))
        ));
    }
}
