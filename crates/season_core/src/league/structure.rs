// League structure: which teams exist and how they are grouped
use crate::error::{CalendarError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

pub type TeamId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Conference {
    East,
    West,
}

impl Conference {
    pub fn opposite(&self) -> Self {
        match self {
            Conference::East => Conference::West,
            Conference::West => Conference::East,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Conference::East => "Eastern Conference",
            Conference::West => "Western Conference",
        }
    }
}

/// Classification of a single franchise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub id: TeamId,
    pub name: String,
    pub conference: Conference,
    pub division: String,
}

impl TeamInfo {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        conference: Conference,
        division: impl Into<String>,
    ) -> Self {
        Self { id: id.into(), name: name.into(), conference, division: division.into() }
    }
}

/// Team → conference/division lookup handed to the calendar at construction.
///
/// Teams are kept sorted by id so every iteration over the league is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueStructure {
    teams: Vec<TeamInfo>,
}

impl LeagueStructure {
    pub fn new(mut teams: Vec<TeamInfo>) -> Result<Self> {
        if teams.len() < 2 {
            return Err(CalendarError::Configuration(format!(
                "a league needs at least 2 teams, got {}",
                teams.len()
            )));
        }

        let mut seen = HashSet::new();
        let mut division_conference: HashMap<&str, Conference> = HashMap::new();
        for team in &teams {
            if team.id.trim().is_empty() {
                return Err(CalendarError::Configuration("team id must not be empty".to_string()));
            }
            if team.division.trim().is_empty() {
                return Err(CalendarError::Configuration(format!(
                    "team {} has no division",
                    team.id
                )));
            }
            if !seen.insert(team.id.as_str()) {
                return Err(CalendarError::Configuration(format!(
                    "team {} is listed more than once",
                    team.id
                )));
            }
            match division_conference.get(team.division.as_str()) {
                Some(conference) if *conference != team.conference => {
                    return Err(CalendarError::Configuration(format!(
                        "division {} spans both conferences",
                        team.division
                    )));
                }
                Some(_) => {}
                None => {
                    division_conference.insert(team.division.as_str(), team.conference);
                }
            }
        }

        teams.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(Self { teams })
    }

    /// 30 teams, 2 conferences, 6 divisions of 5
    pub fn standard() -> Self {
        const LAYOUT: [(Conference, &str, [(&str, &str); 5]); 6] = [
            (
                Conference::East,
                "Atlantic",
                [
                    ("BOS", "Boston"),
                    ("BKN", "Brooklyn"),
                    ("NYK", "New York"),
                    ("PHI", "Philadelphia"),
                    ("TOR", "Toronto"),
                ],
            ),
            (
                Conference::East,
                "Central",
                [
                    ("CHI", "Chicago"),
                    ("CLE", "Cleveland"),
                    ("DET", "Detroit"),
                    ("IND", "Indiana"),
                    ("MIL", "Milwaukee"),
                ],
            ),
            (
                Conference::East,
                "Southeast",
                [
                    ("ATL", "Atlanta"),
                    ("CHA", "Charlotte"),
                    ("MIA", "Miami"),
                    ("ORL", "Orlando"),
                    ("WAS", "Washington"),
                ],
            ),
            (
                Conference::West,
                "Northwest",
                [
                    ("DEN", "Denver"),
                    ("MIN", "Minnesota"),
                    ("OKC", "Oklahoma City"),
                    ("POR", "Portland"),
                    ("UTA", "Utah"),
                ],
            ),
            (
                Conference::West,
                "Pacific",
                [
                    ("GSW", "Golden State"),
                    ("LAC", "LA Clippers"),
                    ("LAL", "LA Lakers"),
                    ("PHX", "Phoenix"),
                    ("SAC", "Sacramento"),
                ],
            ),
            (
                Conference::West,
                "Southwest",
                [
                    ("DAL", "Dallas"),
                    ("HOU", "Houston"),
                    ("MEM", "Memphis"),
                    ("NOP", "New Orleans"),
                    ("SAS", "San Antonio"),
                ],
            ),
        ];

        let mut teams: Vec<TeamInfo> = LAYOUT
            .iter()
            .flat_map(|(conference, division, members)| {
                members.iter().map(move |(id, name)| TeamInfo::new(*id, *name, *conference, *division))
            })
            .collect();
        teams.sort_by(|a, b| a.id.cmp(&b.id));
        Self { teams }
    }

    pub fn teams(&self) -> &[TeamInfo] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn team(&self, team_id: &str) -> Option<&TeamInfo> {
        self.teams
            .binary_search_by(|t| t.id.as_str().cmp(team_id))
            .ok()
            .map(|idx| &self.teams[idx])
    }

    /// Like [`Self::team`] but a missing team is a configuration error
    pub fn require(&self, team_id: &str) -> Result<&TeamInfo> {
        self.team(team_id).ok_or_else(|| {
            CalendarError::Configuration(format!("no conference/division data for team {team_id}"))
        })
    }

    pub fn contains(&self, team_id: &str) -> bool {
        self.team(team_id).is_some()
    }

    pub fn team_ids(&self) -> Vec<&str> {
        self.teams.iter().map(|t| t.id.as_str()).collect()
    }

    pub fn division_rivals(&self, team_id: &str) -> Vec<&TeamInfo> {
        match self.team(team_id) {
            Some(me) => self
                .teams
                .iter()
                .filter(|t| t.id != me.id && t.division == me.division)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Same conference, different division
    pub fn conference_opponents(&self, team_id: &str) -> Vec<&TeamInfo> {
        match self.team(team_id) {
            Some(me) => self
                .teams
                .iter()
                .filter(|t| t.conference == me.conference && t.division != me.division)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn other_conference_opponents(&self, team_id: &str) -> Vec<&TeamInfo> {
        match self.team(team_id) {
            Some(me) => self.teams.iter().filter(|t| t.conference != me.conference).collect(),
            None => Vec::new(),
        }
    }

    /// Division names of a conference, sorted
    pub fn divisions_in(&self, conference: Conference) -> Vec<&str> {
        self.teams
            .iter()
            .filter(|t| t.conference == conference)
            .map(|t| t.division.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Members of a division, sorted by id
    pub fn division_members(&self, division: &str) -> Vec<&TeamInfo> {
        self.teams.iter().filter(|t| t.division == division).collect()
    }
}
