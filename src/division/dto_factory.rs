//! Converts an aggregation pass into the presentation model: ranked
//! team and player tables, fixture dates, and the sentinel results used
//! when the query cannot be satisfied.

use crate::constants::ALL_DIVISIONS_PLACEHOLDER;
use crate::division::accumulator::DivisionData;
use crate::division::context::DivisionDataContext;
use crate::division::game_visitor::DivisionDataGameVisitor;
use crate::models::{
    Division, DivisionId, Fixture, FixtureId, Note, PlayerId, Season, SeasonId, Team, TeamId,
    Tournament, TournamentId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonDto {
    pub id: SeasonId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<&Season> for SeasonDto {
    fn from(season: &Season) -> Self {
        SeasonDto {
            id: season.id,
            name: season.name.clone(),
            start_date: season.start_date,
            end_date: season.end_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionDto {
    pub id: DivisionId,
    pub name: String,
}

impl From<&Division> for DivisionDto {
    fn from(division: &Division) -> Self {
        DivisionDto {
            id: division.id,
            name: division.name.clone(),
        }
    }
}

/// One row of the league table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionTeamDto {
    pub rank: usize,
    pub id: TeamId,
    pub name: String,
    pub played: u32,
    pub won: u32,
    pub lost: u32,
    pub drawn: u32,
    pub points: u32,
    /// Fixtures won minus fixtures lost
    pub difference: i64,
}

/// One row of the player table. Singles figures come from the
/// match-size-1 bucket; pairs and triples feed the win percentage shown
/// alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionPlayerDto {
    pub rank: usize,
    pub id: PlayerId,
    pub name: String,
    pub team: Option<String>,
    pub team_id: Option<TeamId>,
    pub singles_won: u32,
    pub singles_lost: u32,
    pub singles_played: u32,
    pub win_percentage: f64,
    pub one_eighties: u32,
    pub over_100_checkout: Option<u32>,
    pub man_of_the_match: u32,
}

/// A fixture as rendered within a fixture-date entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionFixtureDto {
    pub id: FixtureId,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub is_knockout: bool,
    pub postponed: bool,
    pub proposed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionTournamentDto {
    pub id: TournamentId,
    pub winner: Option<String>,
}

/// Everything happening on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureDateDto {
    pub date: NaiveDate,
    pub fixtures: Vec<DivisionFixtureDto>,
    pub tournaments: Vec<DivisionTournamentDto>,
    pub notes: Vec<String>,
}

/// The full response model for one division data query. Sentinel
/// variants (season/division not found) reuse this shape with the
/// relevant lists empty and the known seasons/divisions attached, so
/// callers can always render a picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionDataDto {
    pub id: Option<DivisionId>,
    pub name: String,
    pub season: Option<SeasonDto>,
    pub teams: Vec<DivisionTeamDto>,
    pub players: Vec<DivisionPlayerDto>,
    pub fixtures: Vec<FixtureDateDto>,
    pub data_errors: Vec<String>,
    pub seasons: Vec<SeasonDto>,
    pub divisions: Vec<DivisionDto>,
}

impl DivisionDataDto {
    fn empty(id: Option<DivisionId>, name: impl Into<String>) -> Self {
        DivisionDataDto {
            id,
            name: name.into(),
            season: None,
            teams: vec![],
            players: vec![],
            fixtures: vec![],
            data_errors: vec![],
            seasons: vec![],
            divisions: vec![],
        }
    }
}

/// Externally owned collaborator that renders one fixture-date entry.
/// The factory supplies the date's games, tournaments and notes and
/// consumes the output unmodified.
pub trait FixtureDateAdapter {
    fn create_fixture_date(
        &self,
        date: NaiveDate,
        games: &[&Fixture],
        tournaments: &[&Tournament],
        notes: &[&Note],
        teams: &[Team],
    ) -> FixtureDateDto;
}

/// Orchestrates one aggregation pass: runs the statistics visitor over
/// every relevant fixture and tournament, then assembles the ranked
/// presentation lists.
pub struct DivisionDataDtoFactory<A> {
    fixture_date_adapter: A,
}

impl<A: FixtureDateAdapter> DivisionDataDtoFactory<A> {
    pub fn new(fixture_date_adapter: A) -> Self {
        DivisionDataDtoFactory {
            fixture_date_adapter,
        }
    }

    #[instrument(skip(self, context, divisions))]
    pub fn create_division_data_dto(
        &self,
        context: &DivisionDataContext,
        divisions: &[Division],
        include_proposals: bool,
    ) -> DivisionDataDto {
        let division_ids: Vec<DivisionId> = divisions.iter().map(|d| d.id).collect();
        let games = self.relevant_games(context, &division_ids);
        let tournaments: Vec<&Tournament> =
            context.all_tournament_games(&division_ids).collect();

        let mut data = DivisionData::new();
        {
            let mut visitor = DivisionDataGameVisitor::new(&mut data);
            for game in &games {
                game.accept(&mut visitor);
            }
            for tournament in &tournaments {
                tournament.accept(&mut visitor);
            }
        }

        debug!(
            "Aggregated {} fixtures and {} tournaments into {} player and {} team scores",
            games.len(),
            tournaments.len(),
            data.players.len(),
            data.teams.len()
        );

        let (id, name) = division_identity(divisions);
        DivisionDataDto {
            id,
            name,
            season: Some(SeasonDto::from(&context.season)),
            teams: ranked_teams(context, &data),
            players: ranked_players(context, &data),
            fixtures: self.fixture_dates(context, &games, &tournaments, include_proposals),
            data_errors: data.data_errors,
            seasons: vec![],
            divisions: divisions.iter().map(DivisionDto::from).collect(),
        }
    }

    /// Sentinel: the requested (or auto-resolved) season does not exist.
    pub fn season_not_found(
        &self,
        divisions: &[Division],
        seasons: &[Season],
    ) -> DivisionDataDto {
        let (id, name) = division_identity(divisions);
        DivisionDataDto {
            seasons: seasons.iter().map(SeasonDto::from).collect(),
            divisions: divisions.iter().map(DivisionDto::from).collect(),
            ..DivisionDataDto::empty(id, name)
        }
    }

    /// Sentinel: the caller supplied neither a division nor a season.
    pub fn division_id_and_season_id_not_supplied(
        &self,
        division_id: Option<DivisionId>,
    ) -> DivisionDataDto {
        let name = division_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| ALL_DIVISIONS_PLACEHOLDER.to_string());
        DivisionDataDto::empty(division_id, name)
    }

    /// Sentinel: one or more requested divisions did not resolve. Carries
    /// whichever divisions DID resolve so the caller can re-prompt.
    pub fn division_not_found(
        &self,
        division_ids: &[DivisionId],
        found: &[Division],
    ) -> DivisionDataDto {
        let found_ids: HashSet<DivisionId> = found.iter().map(|d| d.id).collect();
        let missing: Vec<String> = division_ids
            .iter()
            .filter(|id| !found_ids.contains(id))
            .map(|id| id.to_string())
            .collect();

        let mut dto = DivisionDataDto::empty(None, ALL_DIVISIONS_PLACEHOLDER);
        dto.divisions = found.iter().map(DivisionDto::from).collect();
        dto.data_errors = vec![format!("Division not found: {}", missing.join(", "))];
        dto
    }

    /// The fixtures feeding one aggregation pass: the union of
    /// per-division views, deduplicated since a knockout fixture is
    /// visible from every requested division.
    fn relevant_games<'c>(
        &self,
        context: &'c DivisionDataContext,
        division_ids: &[DivisionId],
    ) -> Vec<&'c Fixture> {
        let mut seen: HashSet<FixtureId> = HashSet::new();
        let mut games = Vec::new();
        if division_ids.is_empty() {
            games.extend(context.all_games(None));
        } else {
            for division_id in division_ids {
                for game in context.all_games(Some(*division_id)) {
                    if seen.insert(game.id) {
                        games.push(game);
                    }
                }
            }
        }
        games
    }

    fn fixture_dates(
        &self,
        context: &DivisionDataContext,
        games: &[&Fixture],
        tournaments: &[&Tournament],
        include_proposals: bool,
    ) -> Vec<FixtureDateDto> {
        let visible_games: Vec<&Fixture> = games
            .iter()
            .copied()
            .filter(|g| include_proposals || !g.proposed)
            .collect();

        let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
        dates.extend(visible_games.iter().map(|g| g.date));
        dates.extend(tournaments.iter().map(|t| t.date));
        dates.extend(context.notes.keys().copied());

        dates
            .into_iter()
            .map(|date| {
                let games_on_date: Vec<&Fixture> = visible_games
                    .iter()
                    .copied()
                    .filter(|g| g.date == date)
                    .collect();
                let tournaments_on_date: Vec<&Tournament> = tournaments
                    .iter()
                    .copied()
                    .filter(|t| t.date == date)
                    .collect();
                let notes_on_date: Vec<&Note> = context
                    .notes
                    .get(&date)
                    .map(|notes| notes.iter().collect())
                    .unwrap_or_default();

                self.fixture_date_adapter.create_fixture_date(
                    date,
                    &games_on_date,
                    &tournaments_on_date,
                    &notes_on_date,
                    &context.teams,
                )
            })
            .collect()
    }
}

fn division_identity(divisions: &[Division]) -> (Option<DivisionId>, String) {
    match divisions {
        [] => (None, ALL_DIVISIONS_PLACEHOLDER.to_string()),
        [division] => (Some(division.id), division.name.clone()),
        many => (
            None,
            many.iter()
                .map(|d| d.name.as_str())
                .collect::<Vec<_>>()
                .join(" & "),
        ),
    }
}

/// Every team registered to the season appears in the table, played or
/// not; unplayed teams sink to the bottom through their zero points.
fn ranked_teams(context: &DivisionDataContext, data: &DivisionData) -> Vec<DivisionTeamDto> {
    let mut teams: Vec<DivisionTeamDto> = context
        .teams_in_season_and_division
        .iter()
        .map(|team| {
            let score = data.teams.get(&team.id).copied().unwrap_or_default();
            DivisionTeamDto {
                rank: 0,
                id: team.id,
                name: team.name.clone(),
                played: score.fixtures_played,
                won: score.fixtures_won,
                lost: score.fixtures_lost,
                drawn: score.fixtures_drawn,
                points: score.points(),
                difference: i64::from(score.fixtures_won) - i64::from(score.fixtures_lost),
            }
        })
        .collect();

    teams.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.won.cmp(&a.won))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    for (index, team) in teams.iter_mut().enumerate() {
        team.rank = index + 1;
    }
    teams
}

fn ranked_players(context: &DivisionDataContext, data: &DivisionData) -> Vec<DivisionPlayerDto> {
    let registrations = player_registrations(context);

    let mut players: Vec<DivisionPlayerDto> = data
        .players
        .iter()
        .map(|(id, score)| {
            let registration = registrations.get(id);
            let name = registration
                .map(|(name, _, _)| name.clone())
                .or_else(|| score.player_name.clone())
                .unwrap_or_else(|| "Unknown".to_string());
            let singles = score.bucket(1);
            DivisionPlayerDto {
                rank: 0,
                id: *id,
                name,
                team: registration.map(|(_, team_name, _)| team_name.clone()),
                team_id: registration.map(|(_, _, team_id)| *team_id),
                singles_won: singles.matches_won,
                singles_lost: singles.matches_lost,
                singles_played: singles.matches_played(),
                win_percentage: singles.win_percentage(),
                one_eighties: score.one_eighties,
                over_100_checkout: score.hi_checkout,
                man_of_the_match: score.man_of_the_match,
            }
        })
        .collect();

    players.sort_by(|a, b| {
        b.singles_won
            .cmp(&a.singles_won)
            .then_with(|| b.win_percentage.total_cmp(&a.win_percentage))
            .then(b.one_eighties.cmp(&a.one_eighties))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    for (index, player) in players.iter_mut().enumerate() {
        player.rank = index + 1;
    }
    players
}

/// player id -> (name, team name, team id) from season registrations.
fn player_registrations(
    context: &DivisionDataContext,
) -> HashMap<PlayerId, (String, String, TeamId)> {
    let mut lookup = HashMap::new();
    for team in &context.teams_in_season_and_division {
        if let Some(registration) = team.season_registration(context.season.id) {
            for player in &registration.players {
                lookup
                    .entry(player.id)
                    .or_insert_with(|| (player.name.clone(), team.name.clone(), team.id));
            }
        }
    }
    lookup
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DivisionDataFilter, GameMatch, GamePlayer, GameTeam, NotablePlayer, TeamPlayer,
        TeamSeason,
    };
    use crate::testing_utils::SimpleFixtureDateAdapter;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn season() -> Season {
        Season {
            id: SeasonId::new(),
            name: "2025/26".to_string(),
            start_date: date(2025, 9, 1),
            end_date: date(2026, 4, 30),
            deleted: None,
        }
    }

    fn division(name: &str) -> Division {
        Division {
            id: DivisionId::new(),
            name: name.to_string(),
            deleted: None,
        }
    }

    fn registered_team(name: &str, season_id: SeasonId, division_id: DivisionId) -> Team {
        Team {
            id: TeamId::new(),
            name: name.to_string(),
            seasons: vec![TeamSeason {
                season_id,
                division_id: Some(division_id),
                players: vec![],
                deleted: None,
            }],
            deleted: None,
        }
    }

    fn singles_match(home: &GamePlayer, away: &GamePlayer, home_score: u32, away_score: u32) -> GameMatch {
        GameMatch {
            home_players: vec![home.clone()],
            away_players: vec![away.clone()],
            home_score: Some(home_score),
            away_score: Some(away_score),
        }
    }

    fn factory() -> DivisionDataDtoFactory<SimpleFixtureDateAdapter> {
        DivisionDataDtoFactory::new(SimpleFixtureDateAdapter)
    }

    struct Setup {
        season: Season,
        division: Division,
        home: Team,
        away: Team,
        fixture: Fixture,
    }

    /// One played league fixture: home loses 1-2 on matches. The away
    /// side records a 180 and a 112 checkout.
    fn played_fixture_setup() -> Setup {
        let season = season();
        let division = division("Division One");
        let mut home = registered_team("Crown", season.id, division.id);
        let mut away = registered_team("Anchor", season.id, division.id);

        let ann = GamePlayer::new(PlayerId::new(), "Ann");
        let bob = GamePlayer::new(PlayerId::new(), "Bob");
        home.seasons[0].players = vec![TeamPlayer {
            id: ann.id,
            name: "Ann".to_string(),
        }];
        away.seasons[0].players = vec![TeamPlayer {
            id: bob.id,
            name: "Bob".to_string(),
        }];

        let fixture = Fixture {
            id: FixtureId::new(),
            date: date(2025, 10, 3),
            season_id: season.id,
            division_id: division.id,
            home: GameTeam::new(home.id, "Crown"),
            away: GameTeam::new(away.id, "Anchor"),
            matches: vec![
                singles_match(&ann, &bob, 3, 2),
                singles_match(&ann, &bob, 1, 3),
                singles_match(&ann, &bob, 0, 3),
            ],
            one_eighties: vec![bob.clone()],
            over_100_checkouts: vec![NotablePlayer::new(bob.id, "Bob", Some("112"))],
            is_knockout: false,
            postponed: false,
            proposed: false,
        };

        Setup {
            season,
            division,
            home,
            away,
            fixture,
        }
    }

    fn context_for(setup: &Setup) -> DivisionDataContext {
        DivisionDataContext::new(
            vec![setup.fixture.clone()],
            vec![setup.home.clone(), setup.away.clone()],
            vec![setup.home.clone(), setup.away.clone()],
            vec![],
            HashMap::new(),
            setup.season.clone(),
            DivisionDataFilter::default(),
        )
    }

    #[test]
    fn test_winning_team_ranks_first() {
        let setup = played_fixture_setup();
        let context = context_for(&setup);
        let dto = factory().create_division_data_dto(&context, &[setup.division.clone()], false);

        assert_eq!(dto.name, "Division One");
        assert_eq!(dto.id, Some(setup.division.id));
        assert_eq!(dto.teams.len(), 2);
        assert_eq!(dto.teams[0].name, "Anchor");
        assert_eq!(dto.teams[0].rank, 1);
        assert_eq!(dto.teams[0].points, 2);
        assert_eq!(dto.teams[0].won, 1);
        assert_eq!(dto.teams[1].name, "Crown");
        assert_eq!(dto.teams[1].points, 0);
        assert_eq!(dto.teams[1].played, 1);
    }

    #[test]
    fn test_player_table_resolves_names_and_achievements() {
        let setup = played_fixture_setup();
        let context = context_for(&setup);
        let dto = factory().create_division_data_dto(&context, &[setup.division.clone()], false);

        assert_eq!(dto.players.len(), 2);
        let bob = &dto.players[0];
        assert_eq!(bob.name, "Bob");
        assert_eq!(bob.rank, 1);
        assert_eq!(bob.team.as_deref(), Some("Anchor"));
        assert_eq!(bob.singles_won, 2);
        assert_eq!(bob.singles_lost, 1);
        assert_eq!(bob.one_eighties, 1);
        assert_eq!(bob.over_100_checkout, Some(112));

        let ann = &dto.players[1];
        assert_eq!(ann.name, "Ann");
        assert_eq!(ann.singles_won, 1);
        assert_eq!(ann.win_percentage, 100.0 / 3.0);
    }

    #[test]
    fn test_unregistered_season_team_still_listed_at_bottom() {
        let setup = played_fixture_setup();
        let idle = registered_team("Bell", setup.season.id, setup.division.id);
        let mut context = context_for(&setup);
        context.teams_in_season_and_division.push(idle.clone());

        let dto = factory().create_division_data_dto(&context, &[setup.division.clone()], false);
        assert_eq!(dto.teams.len(), 3);
        // Bell never played, so it carries zero points like the beaten
        // Crown; the name tiebreak puts Bell ahead of Crown
        assert_eq!(dto.teams[0].name, "Anchor");
        assert_eq!(dto.teams[1].name, "Bell");
        assert_eq!(dto.teams[1].played, 0);
        assert_eq!(dto.teams[2].name, "Crown");
        assert_eq!(dto.teams[2].rank, 3);
    }

    #[test]
    fn test_equal_points_tie_broken_by_name_case_insensitive() {
        let season = season();
        let division = division("Division One");
        let alpha = registered_team("anchor", season.id, division.id);
        let beta = registered_team("Bell", season.id, division.id);
        let context = DivisionDataContext::new(
            vec![],
            vec![alpha.clone(), beta.clone()],
            vec![beta.clone(), alpha.clone()],
            vec![],
            HashMap::new(),
            season,
            DivisionDataFilter::default(),
        );

        let dto = factory().create_division_data_dto(&context, &[division], false);
        assert_eq!(dto.teams[0].name, "anchor");
        assert_eq!(dto.teams[1].name, "Bell");
    }

    #[test]
    fn test_data_errors_surfaced_verbatim() {
        let mut setup = played_fixture_setup();
        setup.fixture.matches.push(GameMatch {
            home_players: vec![GamePlayer::new(PlayerId::new(), "A")],
            away_players: vec![
                GamePlayer::new(PlayerId::new(), "B"),
                GamePlayer::new(PlayerId::new(), "C"),
            ],
            home_score: Some(3),
            away_score: Some(2),
        });
        let context = context_for(&setup);
        let dto = factory().create_division_data_dto(&context, &[setup.division.clone()], false);

        assert_eq!(
            dto.data_errors,
            vec!["Mismatching number of players: Home players: [A] vs Away players: [B, C]"]
        );
    }

    #[test]
    fn test_proposed_fixtures_excluded_from_dates_unless_requested() {
        let mut setup = played_fixture_setup();
        setup.fixture.proposed = true;
        let context = context_for(&setup);

        let without = factory().create_division_data_dto(&context, &[setup.division.clone()], false);
        assert!(without.fixtures.is_empty());

        let with = factory().create_division_data_dto(&context, &[setup.division.clone()], true);
        assert_eq!(with.fixtures.len(), 1);
        assert_eq!(with.fixtures[0].date, setup.fixture.date);
        assert!(with.fixtures[0].fixtures[0].proposed);
    }

    #[test]
    fn test_knockout_fixture_from_another_division_is_aggregated_once() {
        let mut setup = played_fixture_setup();
        setup.fixture.is_knockout = true;
        let other = division("Division Two");
        let context = context_for(&setup);

        let dto = factory().create_division_data_dto(
            &context,
            &[setup.division.clone(), other],
            false,
        );
        // Knockout: no team standings at all, achievements counted once
        assert!(dto.teams.iter().all(|t| t.played == 0));
        let bob = dto.players.iter().find(|p| p.name == "Bob").unwrap();
        assert_eq!(bob.one_eighties, 1);
        assert_eq!(dto.name, "Division One & Division Two");
        assert_eq!(dto.id, None);
    }

    #[test]
    fn test_notes_produce_fixture_date_entries() {
        let setup = played_fixture_setup();
        let mut context = context_for(&setup);
        let notes_date = date(2025, 12, 19);
        context.notes.insert(
            notes_date,
            vec![Note {
                id: crate::models::NoteId::new(),
                date: notes_date,
                season_id: setup.season.id,
                division_id: None,
                text: "Finals night".to_string(),
            }],
        );

        let dto = factory().create_division_data_dto(&context, &[setup.division.clone()], false);
        assert_eq!(dto.fixtures.len(), 2);
        let finals = dto.fixtures.iter().find(|f| f.date == notes_date).unwrap();
        assert_eq!(finals.notes, vec!["Finals night"]);
    }

    #[test]
    fn test_season_not_found_sentinel_carries_pickers() {
        let seasons = vec![season()];
        let division = division("Division One");
        let dto = factory().season_not_found(&[division.clone()], &seasons);

        assert_eq!(dto.name, "Division One");
        assert_eq!(dto.id, Some(division.id));
        assert!(dto.season.is_none());
        assert_eq!(dto.seasons.len(), 1);
        assert_eq!(dto.divisions.len(), 1);
        assert!(dto.teams.is_empty());
    }

    #[test]
    fn test_not_supplied_sentinel_uses_placeholder() {
        let dto = factory().division_id_and_season_id_not_supplied(None);
        assert_eq!(dto.name, ALL_DIVISIONS_PLACEHOLDER);
        assert_eq!(dto.id, None);

        let id = DivisionId::new();
        let dto = factory().division_id_and_season_id_not_supplied(Some(id));
        assert_eq!(dto.name, id.to_string());
    }

    #[test]
    fn test_division_not_found_lists_missing_and_found() {
        let found = division("Division One");
        let missing_id = DivisionId::new();
        let dto = factory().division_not_found(&[found.id, missing_id], &[found.clone()]);

        assert_eq!(dto.divisions.len(), 1);
        assert_eq!(dto.divisions[0].name, "Division One");
        assert_eq!(dto.data_errors.len(), 1);
        assert!(dto.data_errors[0].contains(&missing_id.to_string()));
        assert!(!dto.data_errors[0].contains(&found.id.to_string()));
    }

    #[test]
    fn test_dto_serializes_to_json() {
        let setup = played_fixture_setup();
        let context = context_for(&setup);
        let dto = factory().create_division_data_dto(&context, &[setup.division.clone()], false);

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["name"], "Division One");
        assert!(json["teams"].as_array().is_some_and(|t| t.len() == 2));
    }
}
