//! The filtered, read-only view of everything relevant to one query.

use crate::models::{
    DivisionDataFilter, DivisionId, Fixture, Note, Season, Team, TeamId, Tournament,
};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Built once per query from raw repository results, consumed by the
/// DTO factory, then discarded. Holds no persisted identity.
#[derive(Debug)]
pub struct DivisionDataContext {
    pub games: Vec<Fixture>,
    /// Every team in the season
    pub teams: Vec<Team>,
    /// Teams registered to the season and (when filtered) the requested
    /// divisions; these form the ranked table, played or not
    pub teams_in_season_and_division: Vec<Team>,
    pub tournament_games: Vec<Tournament>,
    pub notes: HashMap<NaiveDate, Vec<Note>>,
    pub season: Season,
    pub team_id_to_division_id: HashMap<TeamId, Option<DivisionId>>,
    pub filter: DivisionDataFilter,
}

impl DivisionDataContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        games: Vec<Fixture>,
        teams: Vec<Team>,
        teams_in_season_and_division: Vec<Team>,
        tournament_games: Vec<Tournament>,
        notes: HashMap<NaiveDate, Vec<Note>>,
        season: Season,
        filter: DivisionDataFilter,
    ) -> Self {
        DivisionDataContext {
            games,
            teams,
            teams_in_season_and_division,
            tournament_games,
            notes,
            season,
            team_id_to_division_id: HashMap::new(),
            filter,
        }
    }

    pub fn with_team_divisions(
        mut self,
        lookup: HashMap<TeamId, Option<DivisionId>>,
    ) -> Self {
        self.team_id_to_division_id = lookup;
        self
    }

    /// League fixtures whose division matches (or all, when `None`),
    /// UNION all knockout fixtures regardless of division: knockout
    /// fixtures are visible cross-division.
    pub fn all_games(&self, division_id: Option<DivisionId>) -> impl Iterator<Item = &Fixture> {
        self.games
            .iter()
            .filter(move |g| {
                g.is_knockout || division_id.is_none_or(|d| g.division_id == d)
            })
            .filter(|g| self.in_date_range(g.date))
    }

    /// Tournaments that are cross-divisional (`division_id == None`) or
    /// belong to one of the given divisions.
    pub fn all_tournament_games(
        &self,
        division_ids: &[DivisionId],
    ) -> impl Iterator<Item = &Tournament> {
        self.tournament_games
            .iter()
            .filter(move |t| {
                t.division_id
                    .is_none_or(|d| division_ids.is_empty() || division_ids.contains(&d))
            })
            .filter(|t| self.in_date_range(t.date))
    }

    pub fn division_id_for_team(&self, team_id: TeamId) -> Option<DivisionId> {
        self.team_id_to_division_id.get(&team_id).copied().flatten()
    }

    /// Date-range restriction: the filter's explicit range when given,
    /// otherwise the season's. `ignore_dates` skips the check entirely,
    /// for league fixtures and tournaments alike.
    fn in_date_range(&self, date: NaiveDate) -> bool {
        if self.filter.ignore_dates {
            return true;
        }
        let from = self.filter.date_from.unwrap_or(self.season.start_date);
        let to = self.filter.date_to.unwrap_or(self.season.end_date);
        from <= date && date <= to
    }
}
