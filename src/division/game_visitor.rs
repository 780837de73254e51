//! The statistics visitor: turns one traversal into mutations of a
//! [`DivisionData`] accumulator, applying the league business rules.
//!
//! The rules split "league standings" from "player performance":
//! knockout fixtures never feed team standings nor player win/loss
//! rates, but 180s and high checkouts are personal achievements and
//! count from knockout and tournament play too. Postponed fixtures
//! contribute nothing.

use crate::division::accumulator::DivisionData;
use crate::division::visitor::{GameVisitor, VisitorScope};
use crate::models::{Fixture, GamePlayer, GameState, GameTeam, NotablePlayer, TeamSide};
use tracing::debug;

/// Visits fixtures and tournaments for one aggregation pass, writing
/// into an accumulator owned by the caller. This visitor never fails:
/// malformed input degrades to "ignore" or a recorded data error.
pub struct DivisionDataGameVisitor<'a> {
    data: &'a mut DivisionData,
}

impl<'a> DivisionDataGameVisitor<'a> {
    pub fn new(data: &'a mut DivisionData) -> Self {
        DivisionDataGameVisitor { data }
    }

    fn record_match_result(
        &mut self,
        players: &[GamePlayer],
        legs_for: u32,
        legs_against: u32,
        won: bool,
    ) {
        let match_size = players.len();
        for (index, player) in players.iter().enumerate() {
            let score = self.data.player_mut(player.id);
            score.note_name(&player.name);
            let bucket = score.bucket_mut(match_size);
            if won {
                bucket.matches_won += 1;
            } else {
                bucket.matches_lost += 1;
            }
            bucket.player_win_rate += legs_for;
            bucket.player_loss_rate += legs_against;
            // First player in the side list carries the team-level rate
            // so it is counted once per match, not once per player
            if index == 0 {
                bucket.team_win_rate += legs_for;
                bucket.team_loss_rate += legs_against;
            }
        }
    }
}

impl GameVisitor for DivisionDataGameVisitor<'_> {
    fn visit_game(&mut self, fixture: &Fixture) {
        if fixture.postponed {
            return;
        }
        for game_match in &fixture.matches {
            for player in game_match
                .home_players
                .iter()
                .chain(&game_match.away_players)
            {
                self.data
                    .record_player_fixture(player.id, fixture.date, fixture.id);
            }
        }
    }

    fn visit_team(&mut self, scope: VisitorScope, team: &GameTeam, state: GameState) {
        if scope.knockout || scope.postponed || state != GameState::Played {
            return;
        }
        self.data.team_mut(team.id).fixtures_played += 1;
    }

    fn visit_match_win(
        &mut self,
        scope: VisitorScope,
        players: &[GamePlayer],
        _side: TeamSide,
        winning_score: u32,
        losing_score: u32,
    ) {
        // Knockout matches are competitive play but not league standing,
        // so no win/loss rate is recorded for them
        if scope.knockout || scope.postponed || players.is_empty() {
            return;
        }
        self.record_match_result(players, winning_score, losing_score, true);
    }

    fn visit_match_lost(
        &mut self,
        scope: VisitorScope,
        players: &[GamePlayer],
        _side: TeamSide,
        losing_score: u32,
        winning_score: u32,
    ) {
        if scope.knockout || scope.postponed || players.is_empty() {
            return;
        }
        self.record_match_result(players, losing_score, winning_score, false);
    }

    fn visit_one_eighty(&mut self, scope: VisitorScope, player: &GamePlayer) {
        // Personal achievement: counts from knockout and tournament play
        if scope.postponed {
            return;
        }
        let score = self.data.player_mut(player.id);
        score.note_name(&player.name);
        score.one_eighties += 1;
    }

    fn visit_hi_checkout(&mut self, scope: VisitorScope, player: &NotablePlayer) {
        if scope.postponed {
            return;
        }
        // The checkout score arrives as free text; unparsable notes are
        // ignored without creating a player entry
        let Some(value) = player
            .notes
            .as_deref()
            .and_then(|notes| notes.trim().parse::<u32>().ok())
        else {
            debug!(
                "Ignoring unparsable hi-checkout notes for {}: {:?}",
                player.name, player.notes
            );
            return;
        };
        let score = self.data.player_mut(player.id);
        score.note_name(&player.name);
        score.record_checkout(value);
    }

    fn visit_game_winner(&mut self, scope: VisitorScope, team: &GameTeam) {
        if scope.knockout || scope.postponed {
            return;
        }
        self.data.team_mut(team.id).fixtures_won += 1;
    }

    fn visit_game_loser(&mut self, scope: VisitorScope, team: &GameTeam) {
        if scope.knockout || scope.postponed {
            return;
        }
        self.data.team_mut(team.id).fixtures_lost += 1;
    }

    fn visit_game_draw(&mut self, scope: VisitorScope, home: &GameTeam, away: &GameTeam) {
        if scope.knockout || scope.postponed {
            return;
        }
        self.data.team_mut(home.id).fixtures_drawn += 1;
        self.data.team_mut(away.id).fixtures_drawn += 1;
    }

    fn visit_man_of_the_match(&mut self, scope: VisitorScope, player: &GamePlayer) {
        if scope.knockout || scope.postponed {
            return;
        }
        let score = self.data.player_mut(player.id);
        score.note_name(&player.name);
        score.man_of_the_match += 1;
    }

    fn visit_data_error(&mut self, _scope: VisitorScope, message: &str) {
        self.data.data_errors.push(message.to_string());
    }
}
