//! The mutable aggregate one traversal pass writes into.
//!
//! A fresh [`DivisionData`] is created per top-level query, mutated by
//! the visitor, converted into DTOs and discarded. It is never shared
//! between requests.

use crate::models::{FixtureId, PlayerId, TeamId};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Win/loss statistics for one player within one match-size bucket.
///
/// Rates accumulate legs: `player_win_rate` is legs won across every
/// match of this size the player appeared in, `player_loss_rate` legs
/// conceded. The team rates are only fed from the first player of the
/// side list, so a team-level figure exists without double counting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerPlayScore {
    pub matches_won: u32,
    pub matches_lost: u32,
    pub player_win_rate: u32,
    pub player_loss_rate: u32,
    pub team_win_rate: u32,
    pub team_loss_rate: u32,
}

impl PlayerPlayScore {
    pub fn matches_played(&self) -> u32 {
        self.matches_won + self.matches_lost
    }

    /// Percentage of matches won in this bucket, 0 when unplayed.
    pub fn win_percentage(&self) -> f64 {
        let played = self.matches_played();
        if played == 0 {
            0.0
        } else {
            f64::from(self.matches_won) * 100.0 / f64::from(played)
        }
    }
}

/// Everything accumulated for one player across a pass.
#[derive(Debug, Clone, Default)]
pub struct PlayerScore {
    /// Win/loss statistics partitioned by match size (1 = singles,
    /// 2 = pairs, 3 = triples...), since win-rate denominators differ
    /// by format.
    pub play_count: BTreeMap<usize, PlayerPlayScore>,
    pub one_eighties: u32,
    /// Highest checkout seen; a later lower value never overwrites it
    pub hi_checkout: Option<u32>,
    pub man_of_the_match: u32,
    /// Name as last seen in fixture data, used when the player has no
    /// season registration to resolve a name from
    pub player_name: Option<String>,
}

impl PlayerScore {
    pub fn bucket_mut(&mut self, match_size: usize) -> &mut PlayerPlayScore {
        self.play_count.entry(match_size).or_default()
    }

    pub fn bucket(&self, match_size: usize) -> PlayerPlayScore {
        self.play_count.get(&match_size).copied().unwrap_or_default()
    }

    pub fn note_name(&mut self, name: &str) {
        if self.player_name.is_none() && !name.is_empty() {
            self.player_name = Some(name.to_string());
        }
    }

    /// Records a checkout, keeping the maximum seen.
    pub fn record_checkout(&mut self, value: u32) {
        self.hi_checkout = Some(self.hi_checkout.unwrap_or(0).max(value));
    }
}

/// Per-team league standing counters, counted once per played league
/// fixture. Knockout fixtures never touch these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamScore {
    pub fixtures_played: u32,
    pub fixtures_won: u32,
    pub fixtures_lost: u32,
    pub fixtures_drawn: u32,
}

impl TeamScore {
    pub fn points(&self) -> u32 {
        use crate::constants::ranking;
        self.fixtures_won * ranking::POINTS_PER_WIN + self.fixtures_drawn * ranking::POINTS_PER_DRAW
    }
}

/// The accumulator a [`crate::division::DivisionDataGameVisitor`]
/// populates. Entries are created lazily on first visit.
#[derive(Debug, Default)]
pub struct DivisionData {
    pub players: HashMap<PlayerId, PlayerScore>,
    pub teams: HashMap<TeamId, TeamScore>,
    /// Human-readable inconsistency reports, surfaced verbatim on the
    /// result DTO
    pub data_errors: Vec<String>,
    /// Every date a player appeared, mapped to the fixture played that
    /// date. A player appearing in two fixtures on one date is
    /// detectable here; reporting that condition is the caller's call.
    pub players_to_fixtures: HashMap<PlayerId, HashMap<NaiveDate, FixtureId>>,
}

impl DivisionData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerScore {
        self.players.entry(id).or_default()
    }

    pub fn team_mut(&mut self, id: TeamId) -> &mut TeamScore {
        self.teams.entry(id).or_default()
    }

    pub fn record_player_fixture(&mut self, player: PlayerId, date: NaiveDate, fixture: FixtureId) {
        self.players_to_fixtures
            .entry(player)
            .or_default()
            .insert(date, fixture);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_score_derivations() {
        let score = PlayerPlayScore {
            matches_won: 3,
            matches_lost: 1,
            ..Default::default()
        };
        assert_eq!(score.matches_played(), 4);
        assert_eq!(score.win_percentage(), 75.0);

        assert_eq!(PlayerPlayScore::default().win_percentage(), 0.0);
    }

    #[test]
    fn test_lazy_entry_creation() {
        let mut data = DivisionData::new();
        assert!(data.players.is_empty());
        assert!(data.teams.is_empty());

        let player_id = PlayerId::new();
        data.player_mut(player_id).one_eighties += 1;
        assert_eq!(data.players.len(), 1);
        assert_eq!(data.players[&player_id].one_eighties, 1);

        let team_id = TeamId::new();
        data.team_mut(team_id).fixtures_played += 1;
        assert_eq!(data.teams[&team_id].fixtures_played, 1);
    }

    #[test]
    fn test_hi_checkout_keeps_maximum() {
        let mut score = PlayerScore::default();
        score.record_checkout(120);
        assert_eq!(score.hi_checkout, Some(120));

        score.record_checkout(110);
        assert_eq!(score.hi_checkout, Some(120));

        score.record_checkout(140);
        assert_eq!(score.hi_checkout, Some(140));
    }

    #[test]
    fn test_team_points() {
        let score = TeamScore {
            fixtures_played: 5,
            fixtures_won: 3,
            fixtures_lost: 1,
            fixtures_drawn: 1,
        };
        assert_eq!(score.points(), 7);
    }

    #[test]
    fn test_player_fixture_lookup_records_one_fixture_per_date() {
        let mut data = DivisionData::new();
        let player = PlayerId::new();
        let date = NaiveDate::from_ymd_opt(2025, 10, 3).unwrap();
        let first = FixtureId::new();
        let second = FixtureId::new();

        data.record_player_fixture(player, date, first);
        data.record_player_fixture(player, date, second);

        // Last appearance wins; the duplicate is visible to callers who
        // compare against the fixture they walked
        assert_eq!(data.players_to_fixtures[&player][&date], second);
        assert_eq!(data.players_to_fixtures[&player].len(), 1);
    }

    #[test]
    fn test_note_name_keeps_first_nonempty() {
        let mut score = PlayerScore::default();
        score.note_name("");
        assert_eq!(score.player_name, None);
        score.note_name("Ann");
        score.note_name("Annie");
        assert_eq!(score.player_name.as_deref(), Some("Ann"));
    }
}
