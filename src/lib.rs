//! Division Data Aggregation Engine for darts leagues
//!
//! This library turns a season's raw fixtures, tournaments, notes and
//! teams into ranked division tables and player statistics, behind a
//! request-scoped cache with explicit invalidation.
//!
//! # Examples
//!
//! ```rust,no_run
//! use darts_division::cache::CachingDivisionService;
//! use darts_division::division::{DivisionDataService, DivisionService, RequestContext};
//! use darts_division::error::AppError;
//! use darts_division::models::DivisionDataFilter;
//! use darts_division::testing_utils::{InMemoryRepositories, SimpleFixtureDateAdapter};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let repos = InMemoryRepositories::default();
//!     let division = repos.add_division("Division One");
//!
//!     let service = DivisionService::new(
//!         repos.clone(),
//!         repos.clone(),
//!         repos.clone(),
//!         repos.clone(),
//!         repos.clone(),
//!         repos.clone(),
//!         SimpleFixtureDateAdapter,
//!     );
//!     let cached = CachingDivisionService::new(service, 100, Duration::from_secs(300));
//!
//!     let dto = cached
//!         .get_division_data(
//!             &DivisionDataFilter::for_division(division.id),
//!             &RequestContext::anonymous(),
//!         )
//!         .await?;
//!     println!("{}: {} teams", dto.name, dto.teams.len());
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod constants;
pub mod division;
pub mod error;
pub mod logging;
pub mod models;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use cache::{CacheKey, CacheStats, CachingDivisionService};
pub use config::Config;
pub use division::{
    DivisionData, DivisionDataContext, DivisionDataDto, DivisionDataDtoFactory,
    DivisionDataGameVisitor, DivisionDataService, DivisionService, GameVisitor, RequestContext,
    UserContext, VisitorScope,
};
pub use error::AppError;
pub use models::{Division, DivisionDataFilter, Fixture, Season, Team, Tournament};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
