//! Domain model for darts league divisions: fixtures, matches,
//! tournaments, teams, seasons and the query filter.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

entity_id!(DivisionId);
entity_id!(SeasonId);
entity_id!(TeamId);
entity_id!(PlayerId);
entity_id!(FixtureId);
entity_id!(TournamentId);
entity_id!(NoteId);

/// Which side of a fixture a set of players belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamSide {
    Home,
    Away,
}

/// Lifecycle state of a fixture as seen by the aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Scheduled but no results recorded yet
    Pending,
    /// Results recorded
    Played,
    /// Called off; contributes no statistics
    Postponed,
}

/// A player as they appear within a fixture or tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamePlayer {
    pub id: PlayerId,
    pub name: String,
}

impl GamePlayer {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        GamePlayer {
            id,
            name: name.into(),
        }
    }
}

/// A player recorded for a notable event, e.g. a high checkout. The
/// `notes` field carries the checkout score as free text entered at the
/// oche, so it may not parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotablePlayer {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NotablePlayer {
    pub fn new(id: PlayerId, name: impl Into<String>, notes: Option<&str>) -> Self {
        NotablePlayer {
            id,
            name: name.into(),
            notes: notes.map(|n| n.to_string()),
        }
    }
}

/// One team's slot in a fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTeam {
    pub id: TeamId,
    pub name: String,
    /// Man of the match nominated by the opposing captain, if any
    #[serde(default)]
    pub man_of_the_match: Option<GamePlayer>,
}

impl GameTeam {
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        GameTeam {
            id,
            name: name.into(),
            man_of_the_match: None,
        }
    }
}

/// A single match (leg set) within a fixture: singles, pairs or triples
/// depending on how many players each side fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMatch {
    #[serde(default)]
    pub home_players: Vec<GamePlayer>,
    #[serde(default)]
    pub away_players: Vec<GamePlayer>,
    #[serde(default)]
    pub home_score: Option<u32>,
    #[serde(default)]
    pub away_score: Option<u32>,
}

impl GameMatch {
    /// A match counts as played once both scores are recorded.
    pub fn is_played(&self) -> bool {
        self.home_score.is_some() && self.away_score.is_some()
    }
}

/// A scheduled league (or knockout) fixture between two teams on a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    pub date: NaiveDate,
    pub season_id: SeasonId,
    pub division_id: DivisionId,
    pub home: GameTeam,
    pub away: GameTeam,
    #[serde(default)]
    pub matches: Vec<GameMatch>,
    /// 180s thrown during this fixture
    #[serde(default)]
    pub one_eighties: Vec<GamePlayer>,
    /// Checkouts over 100, with the score in the player notes
    #[serde(default)]
    pub over_100_checkouts: Vec<NotablePlayer>,
    /// Knockout fixtures feed player statistics but never league standings
    #[serde(default)]
    pub is_knockout: bool,
    #[serde(default)]
    pub postponed: bool,
    /// Proposed fixtures exist only as suggestions and are excluded from
    /// fixture-date output unless proposals were requested
    #[serde(default)]
    pub proposed: bool,
}

impl Fixture {
    pub fn state(&self) -> GameState {
        if self.postponed {
            GameState::Postponed
        } else if self.matches.iter().any(GameMatch::is_played) {
            GameState::Played
        } else {
            GameState::Pending
        }
    }

    /// Fixture winner determined by matches won per side. `None` when the
    /// fixture is unplayed or the match wins are level.
    pub fn winner(&self) -> Option<TeamSide> {
        let (home_wins, away_wins) = self.match_wins();
        match home_wins.cmp(&away_wins) {
            std::cmp::Ordering::Greater => Some(TeamSide::Home),
            std::cmp::Ordering::Less => Some(TeamSide::Away),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn match_wins(&self) -> (u32, u32) {
        let mut home_wins = 0;
        let mut away_wins = 0;
        for game_match in &self.matches {
            if let (Some(home), Some(away)) = (game_match.home_score, game_match.away_score) {
                match home.cmp(&away) {
                    std::cmp::Ordering::Greater => home_wins += 1,
                    std::cmp::Ordering::Less => away_wins += 1,
                    std::cmp::Ordering::Equal => {}
                }
            }
        }
        (home_wins, away_wins)
    }
}

/// One side entered into a tournament.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentSide {
    pub name: String,
    #[serde(default)]
    pub players: Vec<GamePlayer>,
}

/// A match within a tournament round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentMatch {
    pub side_a: TournamentSide,
    pub side_b: TournamentSide,
    #[serde(default)]
    pub score_a: Option<u32>,
    #[serde(default)]
    pub score_b: Option<u32>,
}

impl TournamentMatch {
    pub fn winner(&self) -> Option<&TournamentSide> {
        match (self.score_a, self.score_b) {
            (Some(a), Some(b)) if a > b => Some(&self.side_a),
            (Some(a), Some(b)) if b > a => Some(&self.side_b),
            _ => None,
        }
    }
}

/// A round of tournament matches. The last round in a tournament is the
/// final.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentRound {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub matches: Vec<TournamentMatch>,
}

/// A one-day tournament. Tournaments with no division are
/// cross-divisional and visible from every division's view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub date: NaiveDate,
    pub season_id: SeasonId,
    #[serde(default)]
    pub division_id: Option<DivisionId>,
    #[serde(default)]
    pub sides: Vec<TournamentSide>,
    #[serde(default)]
    pub rounds: Vec<TournamentRound>,
    #[serde(default)]
    pub one_eighties: Vec<GamePlayer>,
    #[serde(default)]
    pub over_100_checkouts: Vec<NotablePlayer>,
}

/// A player registered to a team for a season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPlayer {
    pub id: PlayerId,
    pub name: String,
}

/// A team's registration for one season, carrying the division they are
/// registered to and the season squad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSeason {
    pub season_id: SeasonId,
    #[serde(default)]
    pub division_id: Option<DivisionId>,
    #[serde(default)]
    pub players: Vec<TeamPlayer>,
    /// Soft-deletion marker; deleted registrations are ignored
    #[serde(default)]
    pub deleted: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub seasons: Vec<TeamSeason>,
    #[serde(default)]
    pub deleted: Option<DateTime<Utc>>,
}

impl Team {
    /// The team's non-deleted registration for the given season, if any.
    pub fn season_registration(&self, season_id: SeasonId) -> Option<&TeamSeason> {
        self.seasons
            .iter()
            .find(|ts| ts.season_id == season_id && ts.deleted.is_none())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: SeasonId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub deleted: Option<DateTime<Utc>>,
}

impl Season {
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.deleted.is_none() && self.start_date <= date && date <= self.end_date
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Division {
    pub id: DivisionId,
    pub name: String,
    #[serde(default)]
    pub deleted: Option<DateTime<Utc>>,
}

/// A free-text note pinned to a date, e.g. "finals night at the Crown".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub date: NaiveDate,
    pub season_id: SeasonId,
    #[serde(default)]
    pub division_id: Option<DivisionId>,
    pub text: String,
}

/// Rendering hints that never change what data is aggregated. Excluded
/// from cache identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    #[serde(default)]
    pub abbreviate_team_names: bool,
    #[serde(default)]
    pub highlight_team: Option<TeamId>,
}

/// The criteria for one division data query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DivisionDataFilter {
    #[serde(default)]
    pub division_ids: Vec<DivisionId>,
    #[serde(default)]
    pub season_id: Option<SeasonId>,
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
    /// Skip season date-range restriction entirely
    #[serde(default)]
    pub ignore_dates: bool,
    /// Include proposed (not yet saved) fixtures in fixture-date output
    #[serde(default)]
    pub include_proposals: bool,
    /// Display-only; not part of cache identity
    #[serde(default)]
    pub display: DisplayOptions,
}

impl DivisionDataFilter {
    pub fn for_division(division_id: DivisionId) -> Self {
        DivisionDataFilter {
            division_ids: vec![division_id],
            ..Default::default()
        }
    }

    pub fn for_season(season_id: SeasonId) -> Self {
        DivisionDataFilter {
            season_id: Some(season_id),
            ..Default::default()
        }
    }
}
