//! Traversal contract for walking fixtures and tournaments.
//!
//! The `accept` drivers on [`Fixture`] and [`Tournament`] dispatch one
//! callback per structural element, so multiple consumers (statistics,
//! reports) can observe a single walk without re-reading the data.

use crate::models::{
    Fixture, GameMatch, GamePlayer, GameState, GameTeam, NotablePlayer, TeamSide, Tournament,
    TournamentMatch, TournamentRound, TournamentSide,
};

/// Identifies what kind of fixture the current callbacks belong to.
///
/// Carried on every callback so a visitor can apply knockout and
/// postponement rules without holding traversal state of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisitorScope {
    pub knockout: bool,
    pub postponed: bool,
    pub tournament: bool,
}

impl VisitorScope {
    pub fn for_fixture(fixture: &Fixture) -> Self {
        VisitorScope {
            knockout: fixture.is_knockout,
            postponed: fixture.postponed,
            tournament: false,
        }
    }

    pub fn for_tournament() -> Self {
        VisitorScope {
            knockout: false,
            postponed: false,
            tournament: true,
        }
    }
}

/// One callback per structural element encountered while walking a
/// fixture or tournament. All callbacks default to no-ops so a visitor
/// implements only what it cares about.
#[allow(unused_variables)]
pub trait GameVisitor {
    fn visit_game(&mut self, fixture: &Fixture) {}

    fn visit_team(&mut self, scope: VisitorScope, team: &GameTeam, state: GameState) {}

    fn visit_match(&mut self, scope: VisitorScope, game_match: &GameMatch) {}

    fn visit_match_win(
        &mut self,
        scope: VisitorScope,
        players: &[GamePlayer],
        side: TeamSide,
        winning_score: u32,
        losing_score: u32,
    ) {
    }

    fn visit_match_lost(
        &mut self,
        scope: VisitorScope,
        players: &[GamePlayer],
        side: TeamSide,
        losing_score: u32,
        winning_score: u32,
    ) {
    }

    fn visit_one_eighty(&mut self, scope: VisitorScope, player: &GamePlayer) {}

    fn visit_hi_checkout(&mut self, scope: VisitorScope, player: &NotablePlayer) {}

    fn visit_game_winner(&mut self, scope: VisitorScope, team: &GameTeam) {}

    fn visit_game_loser(&mut self, scope: VisitorScope, team: &GameTeam) {}

    fn visit_game_draw(&mut self, scope: VisitorScope, home: &GameTeam, away: &GameTeam) {}

    fn visit_man_of_the_match(&mut self, scope: VisitorScope, player: &GamePlayer) {}

    fn visit_data_error(&mut self, scope: VisitorScope, message: &str) {}

    fn visit_tournament(&mut self, tournament: &Tournament) {}

    fn visit_side(&mut self, scope: VisitorScope, side: &TournamentSide) {}

    fn visit_tournament_player(&mut self, scope: VisitorScope, player: &GamePlayer) {}

    fn visit_round(&mut self, scope: VisitorScope, round: &TournamentRound) {}

    fn visit_final(&mut self, scope: VisitorScope, final_match: &TournamentMatch) {}

    fn visit_tournament_winner(&mut self, scope: VisitorScope, side: &TournamentSide) {}
}

impl Fixture {
    /// Walks this fixture, dispatching callbacks in document order:
    /// game, teams, matches (with win/lost results), notable events,
    /// then the fixture outcome.
    ///
    /// Match results and the fixture outcome are never dispatched for
    /// postponed fixtures; `visit_game` and `visit_team` still are, so
    /// metadata consumers see the fixture.
    pub fn accept<V: GameVisitor>(&self, visitor: &mut V) {
        let scope = VisitorScope::for_fixture(self);
        let state = self.state();

        visitor.visit_game(self);
        visitor.visit_team(scope, &self.home, state);
        visitor.visit_team(scope, &self.away, state);

        if self.postponed {
            return;
        }

        for game_match in &self.matches {
            game_match.accept(scope, visitor);
        }

        for player in &self.one_eighties {
            visitor.visit_one_eighty(scope, player);
        }
        for player in &self.over_100_checkouts {
            visitor.visit_hi_checkout(scope, player);
        }
        if let Some(player) = &self.home.man_of_the_match {
            visitor.visit_man_of_the_match(scope, player);
        }
        if let Some(player) = &self.away.man_of_the_match {
            visitor.visit_man_of_the_match(scope, player);
        }

        if state == GameState::Played {
            match self.winner() {
                Some(TeamSide::Home) => {
                    visitor.visit_game_winner(scope, &self.home);
                    visitor.visit_game_loser(scope, &self.away);
                }
                Some(TeamSide::Away) => {
                    visitor.visit_game_winner(scope, &self.away);
                    visitor.visit_game_loser(scope, &self.home);
                }
                None => visitor.visit_game_draw(scope, &self.home, &self.away),
            }
        }
    }
}

impl GameMatch {
    /// Dispatches this match. A home/away player-count mismatch is
    /// reported as a data error and the result is not dispatched, since
    /// the match-size bucket would be ambiguous.
    pub fn accept<V: GameVisitor>(&self, scope: VisitorScope, visitor: &mut V) {
        visitor.visit_match(scope, self);

        if self.home_players.len() != self.away_players.len() {
            visitor.visit_data_error(
                scope,
                &format!(
                    "Mismatching number of players: Home players: [{}] vs Away players: [{}]",
                    player_names(&self.home_players),
                    player_names(&self.away_players)
                ),
            );
            return;
        }

        match (self.home_score, self.away_score) {
            (Some(home), Some(away)) if home > away => {
                visitor.visit_match_win(scope, &self.home_players, TeamSide::Home, home, away);
                visitor.visit_match_lost(scope, &self.away_players, TeamSide::Away, away, home);
            }
            (Some(home), Some(away)) if away > home => {
                visitor.visit_match_win(scope, &self.away_players, TeamSide::Away, away, home);
                visitor.visit_match_lost(scope, &self.home_players, TeamSide::Home, home, away);
            }
            _ => {}
        }
    }
}

impl Tournament {
    /// Walks this tournament: sides and their players, rounds, the final
    /// (last round's only match) and its winner, then notable events.
    pub fn accept<V: GameVisitor>(&self, visitor: &mut V) {
        let scope = VisitorScope::for_tournament();

        visitor.visit_tournament(self);

        for side in &self.sides {
            visitor.visit_side(scope, side);
            for player in &side.players {
                visitor.visit_tournament_player(scope, player);
            }
        }

        for round in &self.rounds {
            visitor.visit_round(scope, round);
        }

        if let Some(final_round) = self.rounds.last()
            && final_round.matches.len() == 1
        {
            let final_match = &final_round.matches[0];
            visitor.visit_final(scope, final_match);
            if let Some(winner) = final_match.winner() {
                visitor.visit_tournament_winner(scope, winner);
            }
        }

        for player in &self.one_eighties {
            visitor.visit_one_eighty(scope, player);
        }
        for player in &self.over_100_checkouts {
            visitor.visit_hi_checkout(scope, player);
        }
    }
}

fn player_names(players: &[GamePlayer]) -> String {
    players
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DivisionId, FixtureId, PlayerId, SeasonId, TeamId, TournamentId};
    use chrono::NaiveDate;

    /// Records every callback so tests can assert on dispatch order and
    /// suppression.
    #[derive(Default)]
    struct RecordingVisitor {
        calls: Vec<String>,
    }

    impl GameVisitor for RecordingVisitor {
        fn visit_game(&mut self, fixture: &Fixture) {
            self.calls.push(format!("game:{}", fixture.home.name));
        }
        fn visit_team(&mut self, _scope: VisitorScope, team: &GameTeam, state: GameState) {
            self.calls.push(format!("team:{}:{state:?}", team.name));
        }
        fn visit_match_win(
            &mut self,
            _scope: VisitorScope,
            players: &[GamePlayer],
            side: TeamSide,
            winning_score: u32,
            losing_score: u32,
        ) {
            self.calls.push(format!(
                "win:{side:?}:{}:{winning_score}-{losing_score}",
                players.len()
            ));
        }
        fn visit_match_lost(
            &mut self,
            _scope: VisitorScope,
            players: &[GamePlayer],
            side: TeamSide,
            losing_score: u32,
            winning_score: u32,
        ) {
            self.calls.push(format!(
                "lost:{side:?}:{}:{losing_score}-{winning_score}",
                players.len()
            ));
        }
        fn visit_game_winner(&mut self, _scope: VisitorScope, team: &GameTeam) {
            self.calls.push(format!("game_winner:{}", team.name));
        }
        fn visit_game_loser(&mut self, _scope: VisitorScope, team: &GameTeam) {
            self.calls.push(format!("game_loser:{}", team.name));
        }
        fn visit_game_draw(&mut self, _scope: VisitorScope, home: &GameTeam, away: &GameTeam) {
            self.calls
                .push(format!("game_draw:{}:{}", home.name, away.name));
        }
        fn visit_data_error(&mut self, _scope: VisitorScope, message: &str) {
            self.calls.push(format!("error:{message}"));
        }
        fn visit_one_eighty(&mut self, _scope: VisitorScope, player: &GamePlayer) {
            self.calls.push(format!("180:{}", player.name));
        }
        fn visit_tournament_winner(&mut self, _scope: VisitorScope, side: &TournamentSide) {
            self.calls.push(format!("t_winner:{}", side.name));
        }
        fn visit_side(&mut self, _scope: VisitorScope, side: &TournamentSide) {
            self.calls.push(format!("side:{}", side.name));
        }
    }

    fn player(name: &str) -> GamePlayer {
        GamePlayer::new(PlayerId::new(), name)
    }

    fn base_fixture() -> Fixture {
        Fixture {
            id: FixtureId::new(),
            date: NaiveDate::from_ymd_opt(2025, 10, 3).unwrap(),
            season_id: SeasonId::new(),
            division_id: DivisionId::new(),
            home: GameTeam::new(TeamId::new(), "Crown"),
            away: GameTeam::new(TeamId::new(), "Anchor"),
            matches: vec![],
            one_eighties: vec![],
            over_100_checkouts: vec![],
            is_knockout: false,
            postponed: false,
            proposed: false,
        }
    }

    #[test]
    fn test_played_fixture_dispatches_results_and_outcome() {
        let mut fixture = base_fixture();
        fixture.matches.push(GameMatch {
            home_players: vec![player("Ann")],
            away_players: vec![player("Bob")],
            home_score: Some(3),
            away_score: Some(1),
        });

        let mut visitor = RecordingVisitor::default();
        fixture.accept(&mut visitor);

        assert!(visitor.calls.contains(&"win:Home:1:3-1".to_string()));
        assert!(visitor.calls.contains(&"lost:Away:1:1-3".to_string()));
        assert!(visitor.calls.contains(&"game_winner:Crown".to_string()));
        assert!(visitor.calls.contains(&"game_loser:Anchor".to_string()));
    }

    #[test]
    fn test_postponed_fixture_dispatches_only_metadata() {
        let mut fixture = base_fixture();
        fixture.postponed = true;
        fixture.matches.push(GameMatch {
            home_players: vec![player("Ann")],
            away_players: vec![player("Bob")],
            home_score: Some(3),
            away_score: Some(1),
        });
        fixture.one_eighties.push(player("Ann"));

        let mut visitor = RecordingVisitor::default();
        fixture.accept(&mut visitor);

        assert_eq!(
            visitor.calls,
            vec![
                "game:Crown".to_string(),
                "team:Crown:Postponed".to_string(),
                "team:Anchor:Postponed".to_string(),
            ]
        );
    }

    #[test]
    fn test_mismatched_player_counts_reports_data_error() {
        let mut fixture = base_fixture();
        fixture.matches.push(GameMatch {
            home_players: vec![player("Ann")],
            away_players: vec![player("Bob"), player("Cat")],
            home_score: Some(3),
            away_score: Some(1),
        });

        let mut visitor = RecordingVisitor::default();
        fixture.accept(&mut visitor);

        assert!(visitor.calls.contains(
            &"error:Mismatching number of players: Home players: [Ann] vs Away players: [Bob, Cat]"
                .to_string()
        ));
        // The ambiguous result must not be dispatched
        assert!(!visitor.calls.iter().any(|c| c.starts_with("win:")));
        assert!(!visitor.calls.iter().any(|c| c.starts_with("lost:")));
    }

    #[test]
    fn test_level_match_wins_dispatch_draw() {
        let mut fixture = base_fixture();
        fixture.matches.push(GameMatch {
            home_players: vec![player("Ann")],
            away_players: vec![player("Bob")],
            home_score: Some(3),
            away_score: Some(1),
        });
        fixture.matches.push(GameMatch {
            home_players: vec![player("Cat")],
            away_players: vec![player("Dan")],
            home_score: Some(0),
            away_score: Some(3),
        });

        let mut visitor = RecordingVisitor::default();
        fixture.accept(&mut visitor);

        assert!(visitor.calls.contains(&"game_draw:Crown:Anchor".to_string()));
        assert!(!visitor.calls.iter().any(|c| c.starts_with("game_winner:")));
    }

    #[test]
    fn test_pending_fixture_has_no_outcome() {
        let fixture = base_fixture();
        let mut visitor = RecordingVisitor::default();
        fixture.accept(&mut visitor);

        assert_eq!(visitor.calls[0], "game:Crown");
        assert!(visitor.calls.contains(&"team:Crown:Pending".to_string()));
        assert!(!visitor.calls.iter().any(|c| c.starts_with("game_")));
    }

    #[test]
    fn test_tournament_dispatches_sides_final_and_winner() {
        let winner_side = TournamentSide {
            name: "Ann & Bob".to_string(),
            players: vec![player("Ann"), player("Bob")],
        };
        let runner_up = TournamentSide {
            name: "Cat & Dan".to_string(),
            players: vec![player("Cat"), player("Dan")],
        };
        let tournament = Tournament {
            id: TournamentId::new(),
            date: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            season_id: SeasonId::new(),
            division_id: None,
            sides: vec![winner_side.clone(), runner_up.clone()],
            rounds: vec![TournamentRound {
                name: Some("Final".to_string()),
                matches: vec![TournamentMatch {
                    side_a: winner_side,
                    side_b: runner_up,
                    score_a: Some(3),
                    score_b: Some(2),
                }],
            }],
            one_eighties: vec![player("Ann")],
            over_100_checkouts: vec![],
        };

        let mut visitor = RecordingVisitor::default();
        tournament.accept(&mut visitor);

        assert!(visitor.calls.contains(&"side:Ann & Bob".to_string()));
        assert!(visitor.calls.contains(&"t_winner:Ann & Bob".to_string()));
        assert!(visitor.calls.contains(&"180:Ann".to_string()));
    }
}
