//! Gathers raw repository data into a [`DivisionDataContext`], resolves
//! season selection, enforces cross-division visibility, and delegates
//! to the DTO factory.

use crate::division::context::DivisionDataContext;
use crate::division::dto_factory::{
    DivisionDataDto, DivisionDataDtoFactory, DivisionDto, FixtureDateAdapter,
};
use crate::error::AppError;
use crate::models::{
    Division, DivisionDataFilter, DivisionId, Fixture, Note, Season, SeasonId, Team, TeamId,
    Tournament,
};
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Typed fixture query handed to the games repository. The repository
/// translates this into whatever its provider understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameQuery {
    /// Fixtures in any of the divisions, or flagged knockout
    DivisionsOrKnockout { division_ids: Vec<DivisionId> },
    /// Every fixture in the season
    Season { season_id: SeasonId },
}

/// Typed tournament query, mirroring [`GameQuery`] with the
/// cross-division rule in place of knockout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TournamentQuery {
    /// Tournaments in any of the divisions, or cross-divisional
    DivisionsOrCrossDivision { division_ids: Vec<DivisionId> },
    /// Every tournament in the season
    Season { season_id: SeasonId },
}

pub trait DivisionRepository {
    fn get(
        &self,
        id: DivisionId,
    ) -> impl Future<Output = Result<Option<Division>, AppError>> + Send;
    fn get_all(&self) -> impl Future<Output = Result<Vec<Division>, AppError>> + Send;
    fn upsert(&self, division: Division)
    -> impl Future<Output = Result<Division, AppError>> + Send;
    fn delete(
        &self,
        id: DivisionId,
    ) -> impl Future<Output = Result<Option<Division>, AppError>> + Send;
}

pub trait SeasonRepository {
    fn get(&self, id: SeasonId) -> impl Future<Output = Result<Option<Season>, AppError>> + Send;
    fn get_all(&self) -> impl Future<Output = Result<Vec<Season>, AppError>> + Send;
}

pub trait TeamRepository {
    fn get_all(&self) -> impl Future<Output = Result<Vec<Team>, AppError>> + Send;
}

pub trait GameRepository {
    fn get_some(
        &self,
        query: &GameQuery,
    ) -> impl Future<Output = Result<Vec<Fixture>, AppError>> + Send;
}

pub trait TournamentRepository {
    fn get_some(
        &self,
        query: &TournamentQuery,
    ) -> impl Future<Output = Result<Vec<Tournament>, AppError>> + Send;
}

pub trait NoteRepository {
    fn get_for_season(
        &self,
        season_id: SeasonId,
    ) -> impl Future<Output = Result<Vec<Note>, AppError>> + Send;
}

/// The authenticated caller, if any. Anonymous requests pass `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserContext {
    pub can_manage_games: bool,
    pub can_manage_divisions: bool,
}

impl UserContext {
    /// Whether this user holds any access claim at all. Callers with
    /// access always see fresh data, never the public cache.
    pub fn has_any_access(&self) -> bool {
        self.can_manage_games || self.can_manage_divisions
    }
}

/// Per-call request details threaded from the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user: Option<UserContext>,
    /// Derived from a no-cache request header; bypasses the cache for
    /// this call without repopulating it
    pub no_cache: bool,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        RequestContext::default()
    }

    pub fn for_user(user: UserContext) -> Self {
        RequestContext {
            user: Some(user),
            no_cache: false,
        }
    }

    pub fn can_manage_games(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.can_manage_games)
    }
}

/// The service interface the caching decorator wraps. One method per
/// cached query shape, plus the mutations that invalidate them.
pub trait DivisionDataService {
    fn get_division_data(
        &self,
        filter: &DivisionDataFilter,
        ctx: &RequestContext,
    ) -> impl Future<Output = Result<DivisionDataDto, AppError>> + Send;

    fn get(
        &self,
        id: DivisionId,
        ctx: &RequestContext,
    ) -> impl Future<Output = Result<Option<DivisionDto>, AppError>> + Send;

    fn get_all(
        &self,
        ctx: &RequestContext,
    ) -> impl Future<Output = Result<Vec<DivisionDto>, AppError>> + Send;

    /// Name-substring lookup; the query string is opaque to callers.
    fn get_where(
        &self,
        query: &str,
        ctx: &RequestContext,
    ) -> impl Future<Output = Result<Vec<DivisionDto>, AppError>> + Send;

    fn upsert(
        &self,
        division: Division,
        ctx: &RequestContext,
    ) -> impl Future<Output = Result<DivisionDto, AppError>> + Send;

    fn delete(
        &self,
        id: DivisionId,
        ctx: &RequestContext,
    ) -> impl Future<Output = Result<Option<DivisionDto>, AppError>> + Send;
}

/// Orchestrates one division data query against the repositories.
pub struct DivisionService<D, S, T, G, U, N, A> {
    divisions: D,
    seasons: S,
    teams: T,
    games: G,
    tournaments: U,
    notes: N,
    factory: DivisionDataDtoFactory<A>,
    /// Injected clock for season auto-resolution; production uses today
    today: fn() -> NaiveDate,
}

impl<D, S, T, G, U, N, A> DivisionService<D, S, T, G, U, N, A>
where
    D: DivisionRepository + Sync,
    S: SeasonRepository + Sync,
    T: TeamRepository + Sync,
    G: GameRepository + Sync,
    U: TournamentRepository + Sync,
    N: NoteRepository + Sync,
    A: FixtureDateAdapter + Sync,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        divisions: D,
        seasons: S,
        teams: T,
        games: G,
        tournaments: U,
        notes: N,
        fixture_date_adapter: A,
    ) -> Self {
        DivisionService {
            divisions,
            seasons,
            teams,
            games,
            tournaments,
            notes,
            factory: DivisionDataDtoFactory::new(fixture_date_adapter),
            today: || Utc::now().date_naive(),
        }
    }

    #[cfg(test)]
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    #[instrument(skip(self, filter, ctx))]
    pub async fn get_division_data(
        &self,
        filter: &DivisionDataFilter,
        ctx: &RequestContext,
    ) -> Result<DivisionDataDto, AppError> {
        // 1. Without a division or a season there is nothing to scope by
        if filter.division_ids.is_empty() && filter.season_id.is_none() {
            debug!("Neither division nor season supplied");
            return Ok(self.factory.division_id_and_season_id_not_supplied(None));
        }

        // 2. Resolve requested divisions; soft-deleted count as missing
        let mut divisions: Vec<Division> = Vec::with_capacity(filter.division_ids.len());
        for division_id in &filter.division_ids {
            match self.divisions.get(*division_id).await? {
                Some(division) if division.deleted.is_none() => divisions.push(division),
                _ => {
                    info!("Division {division_id} not found or deleted");
                    return Ok(self
                        .factory
                        .division_not_found(&filter.division_ids, &divisions));
                }
            }
        }

        // 3. Resolve the season, auto-selecting the active season with
        // the greatest end date when none was requested
        let Some(season) = self.resolve_season(filter.season_id).await? else {
            let all_seasons = self.active_candidates().await?;
            return Ok(self.factory.season_not_found(&divisions, &all_seasons));
        };

        // 4-5. Fetch teams, games, tournaments and notes for the scope
        let games_query = game_query(filter, season.id);
        let tournaments_query = tournament_query(filter, season.id);
        let (all_teams, mut games, tournaments, notes) = futures::try_join!(
            self.teams.get_all(),
            self.games.get_some(&games_query),
            self.tournaments.get_some(&tournaments_query),
            self.notes.get_for_season(season.id),
        )?;

        let team_lookup = team_division_lookup(&all_teams, season.id);

        // 6. Without manage-games permission a division-scoped view must
        // not leak other divisions' fixtures through the knockout union
        if !ctx.can_manage_games() && !filter.division_ids.is_empty() {
            games.retain(|g| filter.division_ids.contains(&g.division_id));
        }

        let teams_in_scope: Vec<Team> = all_teams
            .iter()
            .filter(|team| {
                team.deleted.is_none()
                    && team.season_registration(season.id).is_some_and(|reg| {
                        filter.division_ids.is_empty()
                            || reg
                                .division_id
                                .is_some_and(|d| filter.division_ids.contains(&d))
                    })
            })
            .cloned()
            .collect();

        let notes_by_date = group_notes_by_date(notes);

        debug!(
            "Assembled context: {} games, {} tournaments, {} teams in scope",
            games.len(),
            tournaments.len(),
            teams_in_scope.len()
        );

        let context = DivisionDataContext::new(
            games,
            all_teams,
            teams_in_scope,
            tournaments,
            notes_by_date,
            season,
            filter.clone(),
        )
        .with_team_divisions(team_lookup);

        // 7. Aggregate
        Ok(self
            .factory
            .create_division_data_dto(&context, &divisions, filter.include_proposals))
    }

    /// Season selection: an explicit id wins; otherwise the non-deleted
    /// season covering today with the greatest end date.
    async fn resolve_season(
        &self,
        season_id: Option<SeasonId>,
    ) -> Result<Option<Season>, AppError> {
        match season_id {
            Some(id) => Ok(self
                .seasons
                .get(id)
                .await?
                .filter(|season| season.deleted.is_none())),
            None => {
                let today = (self.today)();
                let candidates = self.active_candidates().await?;
                Ok(candidates
                    .into_iter()
                    .filter(|season| season.is_active_on(today))
                    .max_by_key(|season| season.end_date))
            }
        }
    }

    async fn active_candidates(&self) -> Result<Vec<Season>, AppError> {
        Ok(self
            .seasons
            .get_all()
            .await?
            .into_iter()
            .filter(|season| season.deleted.is_none())
            .collect())
    }

    async fn get_division_dto(&self, id: DivisionId) -> Result<Option<DivisionDto>, AppError> {
        Ok(self
            .divisions
            .get(id)
            .await?
            .filter(|d| d.deleted.is_none())
            .map(|d| DivisionDto::from(&d)))
    }
}

impl<D, S, T, G, U, N, A> DivisionDataService for DivisionService<D, S, T, G, U, N, A>
where
    D: DivisionRepository + Sync,
    S: SeasonRepository + Sync,
    T: TeamRepository + Sync,
    G: GameRepository + Sync,
    U: TournamentRepository + Sync,
    N: NoteRepository + Sync,
    A: FixtureDateAdapter + Sync,
{
    async fn get_division_data(
        &self,
        filter: &DivisionDataFilter,
        ctx: &RequestContext,
    ) -> Result<DivisionDataDto, AppError> {
        DivisionService::get_division_data(self, filter, ctx).await
    }

    async fn get(
        &self,
        id: DivisionId,
        _ctx: &RequestContext,
    ) -> Result<Option<DivisionDto>, AppError> {
        self.get_division_dto(id).await
    }

    async fn get_all(&self, _ctx: &RequestContext) -> Result<Vec<DivisionDto>, AppError> {
        Ok(self
            .divisions
            .get_all()
            .await?
            .iter()
            .filter(|d| d.deleted.is_none())
            .map(DivisionDto::from)
            .collect())
    }

    async fn get_where(
        &self,
        query: &str,
        _ctx: &RequestContext,
    ) -> Result<Vec<DivisionDto>, AppError> {
        let needle = query.to_lowercase();
        Ok(self
            .divisions
            .get_all()
            .await?
            .iter()
            .filter(|d| d.deleted.is_none() && d.name.to_lowercase().contains(&needle))
            .map(DivisionDto::from)
            .collect())
    }

    async fn upsert(
        &self,
        division: Division,
        _ctx: &RequestContext,
    ) -> Result<DivisionDto, AppError> {
        let stored = self.divisions.upsert(division).await?;
        Ok(DivisionDto::from(&stored))
    }

    async fn delete(
        &self,
        id: DivisionId,
        _ctx: &RequestContext,
    ) -> Result<Option<DivisionDto>, AppError> {
        Ok(self.divisions.delete(id).await?.map(|d| DivisionDto::from(&d)))
    }
}

fn game_query(filter: &DivisionDataFilter, season_id: SeasonId) -> GameQuery {
    if filter.division_ids.is_empty() {
        GameQuery::Season { season_id }
    } else {
        GameQuery::DivisionsOrKnockout {
            division_ids: filter.division_ids.clone(),
        }
    }
}

fn tournament_query(filter: &DivisionDataFilter, season_id: SeasonId) -> TournamentQuery {
    if filter.division_ids.is_empty() {
        TournamentQuery::Season { season_id }
    } else {
        TournamentQuery::DivisionsOrCrossDivision {
            division_ids: filter.division_ids.clone(),
        }
    }
}

/// Every team maps to whichever division its non-deleted membership for
/// the season names.
fn team_division_lookup(
    teams: &[Team],
    season_id: SeasonId,
) -> HashMap<TeamId, Option<DivisionId>> {
    teams
        .iter()
        .filter_map(|team| {
            team.season_registration(season_id)
                .map(|reg| (team.id, reg.division_id))
        })
        .collect()
}

fn group_notes_by_date(notes: Vec<Note>) -> HashMap<NaiveDate, Vec<Note>> {
    let mut by_date: HashMap<NaiveDate, Vec<Note>> = HashMap::new();
    for note in notes {
        by_date.entry(note.date).or_default().push(note);
    }
    by_date
}
