// League-wide game quotas, computed once and shared by every team
use super::structure::{Conference, LeagueStructure, TeamId};
use crate::config::ScheduleConfig;
use crate::error::Result;
use std::collections::BTreeMap;

/// Orders a pairing so both sides derive the same key
pub fn ordered_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// How many regular-season games each pair of teams plays.
///
/// Every quota is written for both directions in a single step, so the
/// number of games A schedules against B always equals the number B
/// schedules against A.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaTable {
    season_year: i32,
    quotas: BTreeMap<TeamId, BTreeMap<TeamId, u8>>,
}

impl QuotaTable {
    pub fn build(
        structure: &LeagueStructure,
        config: &ScheduleConfig,
        season_year: i32,
    ) -> Result<Self> {
        config.validate()?;

        let mut table = Self { season_year, quotas: BTreeMap::new() };
        let teams = structure.teams();

        for (i, a) in teams.iter().enumerate() {
            table.quotas.entry(a.id.clone()).or_default();
            for b in &teams[i + 1..] {
                let games = if a.division == b.division {
                    config.division_games
                } else if a.conference != b.conference {
                    config.other_conference_games
                } else {
                    config.conference_high_games
                };
                table.set_pair(&a.id, &b.id, games);
            }
        }

        for conference in [Conference::East, Conference::West] {
            table.assign_lower_tier(structure, config, conference);
        }

        log::debug!(
            "Quota table for {} built: {} teams, {} total games",
            season_year,
            teams.len(),
            table.quotas.keys().map(|t| table.total_for(t)).sum::<usize>() / 2
        );
        Ok(table)
    }

    /// Moves a fixed number of opponents per division pairing into the lower
    /// tier using a circulant pattern, so with equal-sized divisions every
    /// team gets the same number of lower-tier opponents.
    fn assign_lower_tier(
        &mut self,
        structure: &LeagueStructure,
        config: &ScheduleConfig,
        conference: Conference,
    ) {
        let divisions = structure.divisions_in(conference);
        if divisions.len() < 2 {
            return;
        }
        let per_division = config.conference_low_tier_size as usize / (divisions.len() - 1);
        if per_division == 0 {
            return;
        }

        for (da, first) in divisions.iter().enumerate() {
            for second in &divisions[da + 1..] {
                let left = structure.division_members(first);
                let right = structure.division_members(second);
                let n = right.len();
                if n == 0 {
                    continue;
                }
                let k = per_division.min(n);
                let rotation = self.season_year.rem_euclid(n as i32) as usize;

                for (i, a) in left.iter().enumerate() {
                    for (j, b) in right.iter().enumerate() {
                        if (j + n - (i % n) + rotation) % n < k {
                            self.set_pair(&a.id, &b.id, config.conference_low_games);
                        }
                    }
                }
            }
        }
    }

    fn set_pair(&mut self, a: &str, b: &str, games: u8) {
        self.quotas.entry(a.to_string()).or_default().insert(b.to_string(), games);
        self.quotas.entry(b.to_string()).or_default().insert(a.to_string(), games);
    }

    pub fn season_year(&self) -> i32 {
        self.season_year
    }

    pub fn contains(&self, team_id: &str) -> bool {
        self.quotas.contains_key(team_id)
    }

    pub fn team_ids(&self) -> impl Iterator<Item = &str> {
        self.quotas.keys().map(String::as_str)
    }

    /// 0 for unknown teams and for a team against itself
    pub fn games_between(&self, a: &str, b: &str) -> u8 {
        self.quotas.get(a).and_then(|row| row.get(b)).copied().unwrap_or(0)
    }

    /// Opponents with their quota, sorted by opponent id
    pub fn opponents_of(&self, team_id: &str) -> Vec<(&str, u8)> {
        self.quotas
            .get(team_id)
            .map(|row| row.iter().map(|(id, games)| (id.as_str(), *games)).collect())
            .unwrap_or_default()
    }

    pub fn total_for(&self, team_id: &str) -> usize {
        self.quotas
            .get(team_id)
            .map(|row| row.values().map(|g| *g as usize).sum())
            .unwrap_or(0)
    }

    /// Whether `team_id` hosts the first meeting with `opponent`.
    /// Exactly one side of every pairing gets `true`.
    pub fn hosts_first(&self, team_id: &str, opponent: &str) -> bool {
        let (low, high) = ordered_pair(team_id, opponent);
        let low_hosts = fxhash::hash64(&(self.season_year, low, high)) % 2 == 0;
        if team_id == low {
            low_hosts
        } else {
            !low_hosts
        }
    }

    /// Home games `team_id` plays against `opponent`; the first host takes the odd game
    pub fn home_games_against(&self, team_id: &str, opponent: &str) -> u8 {
        let games = self.games_between(team_id, opponent);
        if self.hosts_first(team_id, opponent) {
            games.div_ceil(2)
        } else {
            games / 2
        }
    }
}
