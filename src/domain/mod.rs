//! Exchange-agnostic domain logic.

mod asset;
mod exchange;
mod ranking;
mod report;
mod result;

pub use asset::{AssetBuildError, AssetObservation, AssetObservationBuilder};
pub use exchange::ExchangeId;
pub use ranking::{rank, Ranking, DEFAULT_RANK_LIMIT};
pub use report::AggregateReport;
pub use result::ExchangeResult;
