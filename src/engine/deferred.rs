//! Deferred simulation for async callers.
//!
//! Waits out a cosmetic delay on the tokio timer, then runs the synchronous
//! engine on the blocking pool. There is no cancellation: dropping the future
//! simply discards the result.

use std::time::Duration;

use crate::engine::{simulate, SimulationResult};
use crate::error::{CampaignError, CampaignResult};
use crate::goal::CampaignGoal;
use crate::selection::CampaignSelection;

/// Runs `simulate` after `delay`.
pub async fn simulate_deferred(
    goal: CampaignGoal,
    selections: Vec<CampaignSelection>,
    delay: Duration,
) -> CampaignResult<SimulationResult> {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    tokio::task::spawn_blocking(move || simulate(&goal, &selections))
        .await
        .map_err(|e| CampaignError::internal(format!("simulation task failed: {e}")))?
        .map_err(CampaignError::from)
}
