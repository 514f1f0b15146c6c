//! Gainer/loser ranking.

use rust_decimal::Decimal;

use super::asset::AssetObservation;

/// Default cap on gainers and losers kept per exchange.
pub const DEFAULT_RANK_LIMIT: usize = 50;

/// Ranked movers for one exchange.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    /// Strictly positive movers, largest percentage change first.
    pub gainers: Vec<AssetObservation>,
    /// Strictly negative movers, largest percentage drop first.
    pub losers: Vec<AssetObservation>,
}

/// Split observations into gainers and losers and keep the top `limit` of each.
///
/// Sorting is stable: observations with equal percentage change keep the
/// order the provider returned them in. Unchanged assets (exactly 0%) are
/// neither gainers nor losers.
pub fn rank(observations: Vec<AssetObservation>, limit: usize) -> Ranking {
    let (mut gainers, rest): (Vec<_>, Vec<_>) = observations
        .into_iter()
        .partition(|obs| obs.change_percent() > Decimal::ZERO);
    let mut losers: Vec<_> = rest
        .into_iter()
        .filter(|obs| obs.change_percent() < Decimal::ZERO)
        .collect();

    gainers.sort_by(|a, b| b.change_percent().cmp(&a.change_percent()));
    losers.sort_by(|a, b| a.change_percent().cmp(&b.change_percent()));

    gainers.truncate(limit);
    losers.truncate(limit);

    Ranking { gainers, losers }
}
