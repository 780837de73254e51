//! The division data aggregation engine: visitor protocol, accumulator,
//! statistics visitor, query context, DTO factory and service.

pub mod accumulator;
pub mod context;
pub mod dto_factory;
pub mod game_visitor;
pub mod service;
pub mod visitor;

pub use accumulator::{DivisionData, PlayerPlayScore, PlayerScore, TeamScore};
pub use context::DivisionDataContext;
pub use dto_factory::{
    DivisionDataDto, DivisionDataDtoFactory, DivisionDto, DivisionFixtureDto, DivisionPlayerDto,
    DivisionTeamDto, DivisionTournamentDto, FixtureDateAdapter, FixtureDateDto, SeasonDto,
};
pub use game_visitor::DivisionDataGameVisitor;
pub use service::{
    DivisionDataService, DivisionRepository, DivisionService, GameQuery, GameRepository,
    NoteRepository, RequestContext, SeasonRepository, TeamRepository, TournamentQuery,
    TournamentRepository, UserContext,
};
pub use visitor::{GameVisitor, VisitorScope};
