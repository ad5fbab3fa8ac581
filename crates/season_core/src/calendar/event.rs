// Calendar entries: games and everything else that happens on a date
use crate::error::{CalendarError, Result};
use crate::league::TeamId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Game,
    Practice,
    AllStarEvent,
    Draft,
    FreeAgencyStart,
    TradeDeadline,
    PlayoffsStart,
    SeasonEnd,
    Milestone,
    MediaDay,
    Awards,
    Retirement,
}

impl EventKind {
    pub fn is_game(&self) -> bool {
        matches!(self, EventKind::Game)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EventKind::Game => "Game",
            EventKind::Practice => "Practice",
            EventKind::AllStarEvent => "All-Star Event",
            EventKind::Draft => "Draft",
            EventKind::FreeAgencyStart => "Free Agency Opens",
            EventKind::TradeDeadline => "Trade Deadline",
            EventKind::PlayoffsStart => "Playoffs Begin",
            EventKind::SeasonEnd => "Regular Season Ends",
            EventKind::Milestone => "Milestone",
            EventKind::MediaDay => "Media Day",
            EventKind::Awards => "Awards",
            EventKind::Retirement => "Retirement",
        }
    }
}

/// Game-only fields of an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    pub home_team: TeamId,
    pub away_team: TeamId,
    /// Relative to the calendar that owns this copy
    pub is_home: bool,
    /// 0 = regular season, 1-4 = playoff round
    pub playoff_round: u8,
    /// Game number within a playoff series (0 in the regular season)
    pub game_number: u8,
    pub mandatory: bool,
    pub national_broadcast: bool,
    pub broadcaster: Option<String>,
    pub completed: bool,
}

/// One dated entry of a team calendar.
///
/// Game events always carry [`GameInfo`] and non-game events never do; both
/// constructors enforce it. Once an event is inside a calendar the only
/// thing that changes is the completion flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    id: String,
    kind: EventKind,
    date: NaiveDate,
    title: String,
    description: String,
    game: Option<GameInfo>,
}

impl CalendarEvent {
    /// Regular-season game seen from `perspective`, which must be one of the two teams
    pub fn game(
        id: impl Into<String>,
        date: NaiveDate,
        title: impl Into<String>,
        home_team: &str,
        away_team: &str,
        perspective: &str,
    ) -> Result<Self> {
        if home_team.trim().is_empty() || away_team.trim().is_empty() {
            return Err(CalendarError::InvalidEvent("game needs both team ids".to_string()));
        }
        if home_team == away_team {
            return Err(CalendarError::InvalidEvent(format!(
                "{home_team} cannot play against itself"
            )));
        }
        if perspective != home_team && perspective != away_team {
            return Err(CalendarError::InvalidEvent(format!(
                "{perspective} is not part of {away_team} @ {home_team}"
            )));
        }

        Ok(Self {
            id: id.into(),
            kind: EventKind::Game,
            date,
            title: title.into(),
            description: String::new(),
            game: Some(GameInfo {
                home_team: home_team.to_string(),
                away_team: away_team.to_string(),
                is_home: perspective == home_team,
                playoff_round: 0,
                game_number: 0,
                mandatory: true,
                national_broadcast: false,
                broadcaster: None,
                completed: false,
            }),
        })
    }

    pub fn non_game(
        id: impl Into<String>,
        kind: EventKind,
        date: NaiveDate,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self> {
        if kind.is_game() {
            return Err(CalendarError::InvalidEvent(
                "game events must be built with CalendarEvent::game".to_string(),
            ));
        }
        Ok(Self {
            id: id.into(),
            kind,
            date,
            title: title.into(),
            description: description.into(),
            game: None,
        })
    }

    // Construction-time adjustments (consume self)

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_playoff(mut self, round: u8, game_number: u8, mandatory: bool) -> Self {
        if let Some(game) = self.game.as_mut() {
            game.playoff_round = round;
            game.game_number = game_number;
            game.mandatory = mandatory;
        }
        self
    }

    pub fn with_broadcast(mut self, broadcaster: impl Into<String>) -> Self {
        if let Some(game) = self.game.as_mut() {
            game.national_broadcast = true;
            game.broadcaster = Some(broadcaster.into());
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn game_info(&self) -> Option<&GameInfo> {
        self.game.as_ref()
    }

    pub fn is_game(&self) -> bool {
        self.kind.is_game()
    }

    pub fn is_playoff_game(&self) -> bool {
        self.game.as_ref().is_some_and(|g| g.playoff_round > 0)
    }

    pub fn is_home_game(&self) -> bool {
        self.game.as_ref().is_some_and(|g| g.is_home)
    }

    pub fn is_completed(&self) -> bool {
        self.game.as_ref().is_some_and(|g| g.completed)
    }

    pub fn is_national_broadcast(&self) -> bool {
        self.game.as_ref().is_some_and(|g| g.national_broadcast)
    }

    pub fn broadcaster(&self) -> Option<&str> {
        self.game.as_ref().and_then(|g| g.broadcaster.as_deref())
    }

    pub fn playoff_round(&self) -> u8 {
        self.game.as_ref().map_or(0, |g| g.playoff_round)
    }

    /// The other team, seen from the owning calendar
    pub fn opponent(&self) -> Option<&str> {
        self.game.as_ref().map(|g| {
            if g.is_home {
                g.away_team.as_str()
            } else {
                g.home_team.as_str()
            }
        })
    }

    pub fn involves(&self, team_id: &str) -> bool {
        self.game.as_ref().is_some_and(|g| g.home_team == team_id || g.away_team == team_id)
    }

    /// Returns false when the event is not a game or was already completed
    pub(crate) fn mark_completed(&mut self) -> bool {
        match self.game.as_mut() {
            Some(game) if !game.completed => {
                game.completed = true;
                true
            }
            _ => false,
        }
    }
}
