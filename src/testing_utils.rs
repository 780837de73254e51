//! Shared builders and in-memory collaborators for tests.
//!
//! These are used by unit tests and the integration test suite alike,
//! so they live in the library rather than a test module.

use crate::division::dto_factory::{
    DivisionDataDto, DivisionDto, DivisionFixtureDto, DivisionTournamentDto, FixtureDateAdapter,
    FixtureDateDto,
};
use crate::division::service::{
    DivisionDataService, DivisionRepository, GameQuery, GameRepository, NoteRepository,
    RequestContext, SeasonRepository, TeamRepository, TournamentQuery, TournamentRepository,
};
use crate::error::AppError;
use crate::models::{
    Division, DivisionDataFilter, DivisionId, Fixture, FixtureId, GameMatch, GamePlayer, GameState,
    GameTeam, Note, PlayerId, Season, SeasonId, Team, TeamId, TeamPlayer, TeamSeason, Tournament,
};
use chrono::NaiveDate;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Minimal fixture-date adapter: maps fixtures, tournament winners and
/// note text straight through.
pub struct SimpleFixtureDateAdapter;

impl FixtureDateAdapter for SimpleFixtureDateAdapter {
    fn create_fixture_date(
        &self,
        date: NaiveDate,
        games: &[&Fixture],
        tournaments: &[&Tournament],
        notes: &[&Note],
        _teams: &[Team],
    ) -> FixtureDateDto {
        FixtureDateDto {
            date,
            fixtures: games
                .iter()
                .map(|g| {
                    let scores = if g.state() == GameState::Played {
                        let (home, away) = g.match_wins();
                        (Some(home), Some(away))
                    } else {
                        (None, None)
                    };
                    DivisionFixtureDto {
                        id: g.id,
                        home_team: g.home.name.clone(),
                        away_team: g.away.name.clone(),
                        home_score: scores.0,
                        away_score: scores.1,
                        is_knockout: g.is_knockout,
                        postponed: g.postponed,
                        proposed: g.proposed,
                    }
                })
                .collect(),
            tournaments: tournaments
                .iter()
                .map(|t| DivisionTournamentDto {
                    id: t.id,
                    winner: t
                        .rounds
                        .last()
                        .and_then(|r| r.matches.first())
                        .and_then(|m| m.winner())
                        .map(|side| side.name.clone()),
                })
                .collect(),
            notes: notes.iter().map(|n| n.text.clone()).collect(),
        }
    }
}

pub fn season(name: &str, start_date: NaiveDate, end_date: NaiveDate) -> Season {
    Season {
        id: SeasonId::new(),
        name: name.to_string(),
        start_date,
        end_date,
        deleted: None,
    }
}

/// A team registered to the given season and division with two named
/// players ("<name> One", "<name> Two").
pub fn registered_team(name: &str, season_id: SeasonId, division_id: DivisionId) -> Team {
    Team {
        id: TeamId::new(),
        name: name.to_string(),
        seasons: vec![TeamSeason {
            season_id,
            division_id: Some(division_id),
            players: vec![
                TeamPlayer {
                    id: PlayerId::new(),
                    name: format!("{name} One"),
                },
                TeamPlayer {
                    id: PlayerId::new(),
                    name: format!("{name} Two"),
                },
            ],
            deleted: None,
        }],
        deleted: None,
    }
}

fn side_player(team: &Team, season_id: SeasonId, index: usize) -> GamePlayer {
    let registration = team
        .season_registration(season_id)
        .expect("team registered for season");
    let player = &registration.players[index];
    GamePlayer::new(player.id, player.name.clone())
}

/// A played league fixture the away side wins 2-1 on matches.
pub fn league_fixture(
    home: &Team,
    away: &Team,
    season_id: SeasonId,
    division_id: DivisionId,
    date: NaiveDate,
) -> Fixture {
    let home_one = side_player(home, season_id, 0);
    let home_two = side_player(home, season_id, 1);
    let away_one = side_player(away, season_id, 0);
    let away_two = side_player(away, season_id, 1);

    Fixture {
        id: FixtureId::new(),
        date,
        season_id,
        division_id,
        home: GameTeam::new(home.id, home.name.clone()),
        away: GameTeam::new(away.id, away.name.clone()),
        matches: vec![
            GameMatch {
                home_players: vec![home_one.clone()],
                away_players: vec![away_one.clone()],
                home_score: Some(3),
                away_score: Some(1),
            },
            GameMatch {
                home_players: vec![home_two.clone()],
                away_players: vec![away_two.clone()],
                home_score: Some(1),
                away_score: Some(3),
            },
            GameMatch {
                home_players: vec![home_one, home_two],
                away_players: vec![away_one, away_two],
                home_score: Some(0),
                away_score: Some(3),
            },
        ],
        one_eighties: vec![],
        over_100_checkouts: vec![],
        is_knockout: false,
        postponed: false,
        proposed: false,
    }
}

#[derive(Default)]
struct Store {
    divisions: Vec<Division>,
    seasons: Vec<Season>,
    teams: Vec<Team>,
    games: Vec<Fixture>,
    tournaments: Vec<Tournament>,
    notes: Vec<Note>,
}

/// One in-memory store implementing every repository trait the service
/// needs. Cloning shares the underlying store.
#[derive(Clone, Default)]
pub struct InMemoryRepositories {
    store: Arc<Mutex<Store>>,
}

impl InMemoryRepositories {
    pub fn add_division(&self, name: &str) -> Division {
        let division = Division {
            id: DivisionId::new(),
            name: name.to_string(),
            deleted: None,
        };
        self.store.lock().unwrap().divisions.push(division.clone());
        division
    }

    pub fn replace_division(&self, division: Division) {
        let mut store = self.store.lock().unwrap();
        store.divisions.retain(|d| d.id != division.id);
        store.divisions.push(division);
    }

    pub fn add_season(&self, season: Season) -> Season {
        self.store.lock().unwrap().seasons.push(season.clone());
        season
    }

    pub fn add_team(&self, team: Team) {
        self.store.lock().unwrap().teams.push(team);
    }

    pub fn add_game(&self, game: Fixture) {
        self.store.lock().unwrap().games.push(game);
    }

    pub fn add_tournament(&self, tournament: Tournament) {
        self.store.lock().unwrap().tournaments.push(tournament);
    }

    pub fn add_note(&self, note: Note) {
        self.store.lock().unwrap().notes.push(note);
    }
}

impl DivisionRepository for InMemoryRepositories {
    async fn get(&self, id: DivisionId) -> Result<Option<Division>, AppError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .divisions
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    async fn get_all(&self) -> Result<Vec<Division>, AppError> {
        Ok(self.store.lock().unwrap().divisions.clone())
    }

    async fn upsert(&self, division: Division) -> Result<Division, AppError> {
        self.replace_division(division.clone());
        Ok(division)
    }

    async fn delete(&self, id: DivisionId) -> Result<Option<Division>, AppError> {
        let mut store = self.store.lock().unwrap();
        let found = store.divisions.iter().find(|d| d.id == id).cloned();
        store.divisions.retain(|d| d.id != id);
        Ok(found)
    }
}

impl SeasonRepository for InMemoryRepositories {
    async fn get(&self, id: SeasonId) -> Result<Option<Season>, AppError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .seasons
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn get_all(&self) -> Result<Vec<Season>, AppError> {
        Ok(self.store.lock().unwrap().seasons.clone())
    }
}

impl TeamRepository for InMemoryRepositories {
    async fn get_all(&self) -> Result<Vec<Team>, AppError> {
        Ok(self.store.lock().unwrap().teams.clone())
    }
}

impl GameRepository for InMemoryRepositories {
    async fn get_some(&self, query: &GameQuery) -> Result<Vec<Fixture>, AppError> {
        let store = self.store.lock().unwrap();
        Ok(match query {
            GameQuery::DivisionsOrKnockout { division_ids } => store
                .games
                .iter()
                .filter(|g| g.is_knockout || division_ids.contains(&g.division_id))
                .cloned()
                .collect(),
            GameQuery::Season { season_id } => store
                .games
                .iter()
                .filter(|g| g.season_id == *season_id)
                .cloned()
                .collect(),
        })
    }
}

impl TournamentRepository for InMemoryRepositories {
    async fn get_some(&self, query: &TournamentQuery) -> Result<Vec<Tournament>, AppError> {
        let store = self.store.lock().unwrap();
        Ok(match query {
            TournamentQuery::DivisionsOrCrossDivision { division_ids } => store
                .tournaments
                .iter()
                .filter(|t| t.division_id.is_none_or(|d| division_ids.contains(&d)))
                .cloned()
                .collect(),
            TournamentQuery::Season { season_id } => store
                .tournaments
                .iter()
                .filter(|t| t.season_id == *season_id)
                .cloned()
                .collect(),
        })
    }
}

impl NoteRepository for InMemoryRepositories {
    async fn get_for_season(&self, season_id: SeasonId) -> Result<Vec<Note>, AppError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .notes
            .iter()
            .filter(|n| n.season_id == season_id)
            .cloned()
            .collect())
    }
}

/// Per-method call counters for asserting how often a wrapped service
/// was actually hit.
#[derive(Debug, Default)]
pub struct ServiceCallCounts {
    pub division_data: AtomicU64,
    pub get: AtomicU64,
    pub get_all: AtomicU64,
    pub get_where: AtomicU64,
    pub upsert: AtomicU64,
    pub delete: AtomicU64,
}

impl ServiceCallCounts {
    pub fn division_data_calls(&self) -> u64 {
        self.division_data.load(Ordering::Relaxed)
    }

    pub fn get_all_calls(&self) -> u64 {
        self.get_all.load(Ordering::Relaxed)
    }
}

/// Decorates any [`DivisionDataService`] with call counting.
pub struct CountingDivisionService<S> {
    inner: S,
    pub counts: Arc<ServiceCallCounts>,
}

impl<S> CountingDivisionService<S> {
    pub fn new(inner: S) -> Self {
        CountingDivisionService {
            inner,
            counts: Arc::new(ServiceCallCounts::default()),
        }
    }
}

impl<S: DivisionDataService + Sync> DivisionDataService for CountingDivisionService<S> {
    async fn get_division_data(
        &self,
        filter: &DivisionDataFilter,
        ctx: &RequestContext,
    ) -> Result<DivisionDataDto, AppError> {
        self.counts.division_data.fetch_add(1, Ordering::Relaxed);
        self.inner.get_division_data(filter, ctx).await
    }

    async fn get(
        &self,
        id: DivisionId,
        ctx: &RequestContext,
    ) -> Result<Option<DivisionDto>, AppError> {
        self.counts.get.fetch_add(1, Ordering::Relaxed);
        self.inner.get(id, ctx).await
    }

    async fn get_all(&self, ctx: &RequestContext) -> Result<Vec<DivisionDto>, AppError> {
        self.counts.get_all.fetch_add(1, Ordering::Relaxed);
        self.inner.get_all(ctx).await
    }

    async fn get_where(
        &self,
        query: &str,
        ctx: &RequestContext,
    ) -> Result<Vec<DivisionDto>, AppError> {
        self.counts.get_where.fetch_add(1, Ordering::Relaxed);
        self.inner.get_where(query, ctx).await
    }

    async fn upsert(
        &self,
        division: Division,
        ctx: &RequestContext,
    ) -> Result<DivisionDto, AppError> {
        self.counts.upsert.fetch_add(1, Ordering::Relaxed);
        self.inner.upsert(division, ctx).await
    }

    async fn delete(
        &self,
        id: DivisionId,
        ctx: &RequestContext,
    ) -> Result<Option<DivisionDto>, AppError> {
        self.counts.delete.fetch_add(1, Ordering::Relaxed);
        self.inner.delete(id, ctx).await
    }
}
