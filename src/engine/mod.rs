//! Simulation engine for campaign rosters.
//!
//! `simulate` is a pure function: it maps a goal and a list of committed
//! selections to per-creator and aggregate cost/impression/CPM figures. It
//! never mutates its inputs and keeps no state between calls, so running it
//! twice on the same inputs yields bit-identical output.

/// Worker-pool runtime delivering results over channels.
pub mod runtime;

/// Tokio wrapper around the synchronous engine.
#[cfg(feature = "async")]
pub mod deferred;

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::goal::CampaignGoal;
use crate::selection::CampaignSelection;

/// Width of the fair-value band around target CPM, in percent.
///
/// Both edges belong to the fair band.
pub const FAIR_BAND_PERCENT: f64 = 15.0;

/// Cost per 1,000 impressions is this many times the sponsored rate (percent).
pub const SPONSORED_RATE_MULTIPLIER: f64 = 10.0;

/// Cost-efficiency of a line item relative to the campaign's target CPM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueStatus {
    /// CPM more than 15% below target.
    Undervalued,
    /// CPM within 15% of target, edges included.
    Fair,
    /// CPM more than 15% above target.
    Overvalued,
}

impl ValueStatus {
    /// Classifies a CPM percentage difference against target.
    #[must_use]
    pub fn classify(cpm_percentage_difference: f64) -> Self {
        if cpm_percentage_difference < -FAIR_BAND_PERCENT {
            Self::Undervalued
        } else if cpm_percentage_difference > FAIR_BAND_PERCENT {
            Self::Overvalued
        } else {
            Self::Fair
        }
    }
}

impl fmt::Display for ValueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undervalued => write!(f, "undervalued"),
            Self::Fair => write!(f, "fair"),
            Self::Overvalued => write!(f, "overvalued"),
        }
    }
}

/// A committed selection enriched with its simulated figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorResult {
    /// The line item as committed, serialized inline.
    #[serde(flatten)]
    pub selection: CampaignSelection,

    /// Average views times post count.
    pub expected_impressions: u64,

    /// Impressions in thousands times the sponsored rate times ten.
    pub estimated_cost: f64,

    /// Cost per 1,000 impressions; zero for a zero-impression line.
    pub cpm: f64,

    /// Classification of `cpm_percentage_difference`.
    pub value_status: ValueStatus,

    /// `cpm - target_cpm`.
    pub cpm_difference: f64,

    /// `cpm_difference` as a percentage of the target CPM.
    pub cpm_percentage_difference: f64,
}

/// Aggregate figures across every line item.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of expected impressions.
    pub impressions: u64,
    /// Sum of estimated costs.
    pub cost: f64,
    /// Blended CPM over all lines; zero when there are no impressions.
    pub cpm: f64,
}

/// How the aggregate figures compare to the goal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    /// Total minus target impressions, saturated to the `i64` range.
    pub impression_difference: i64,
    /// Total impressions as a percentage of the target.
    pub impression_percentage: f64,
    /// Total cost minus budget; positive means over budget.
    pub budget_difference: f64,
    /// Total cost as a percentage of the budget.
    pub budget_percentage: f64,
    /// Blended CPM minus target CPM.
    pub cpm_difference: f64,
}

/// Full output of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Budget per 1,000 target impressions.
    pub target_cpm: f64,
    /// One entry per selection, in input order.
    pub creator_results: Vec<CreatorResult>,
    /// Aggregates over all lines.
    pub totals: Totals,
    /// Aggregates measured against the goal.
    pub comparison: Comparison,
}

impl SimulationResult {
    /// Returns true if the run had no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.creator_results.is_empty()
    }

    /// Number of line items with the given status.
    #[must_use]
    pub fn count_by_status(&self, status: ValueStatus) -> usize {
        self.creator_results
            .iter()
            .filter(|r| r.value_status == status)
            .count()
    }

    /// Returns true if the estimated total cost exceeds the budget.
    #[must_use]
    pub fn is_over_budget(&self) -> bool {
        self.comparison.budget_difference > 0.0
    }

    /// Returns true if the roster reaches at least the target impressions.
    #[must_use]
    pub fn meets_impression_target(&self) -> bool {
        self.comparison.impression_difference >= 0
    }
}

/// Runs the simulation.
///
/// # Errors
/// - `NonPositiveBudget` / `NonPositiveTargetImpressions` when the target CPM is undefined.
///   No line item is evaluated in that case.
/// - `ImpressionOverflow` if a line's impression count does not fit in `u64`.
/// - `TotalImpressionOverflow` if the sum over all lines does not.
///
/// An empty `selections` slice is not an error: it yields zeroed totals.
pub fn simulate(
    goal: &CampaignGoal,
    selections: &[CampaignSelection],
) -> Result<SimulationResult, ValidationError> {
    let target_cpm = goal.target_cpm()?;

    tracing::debug!(
        selections = selections.len(),
        target_cpm,
        campaign_type = %goal.campaign_type,
        "running campaign simulation"
    );

    let creator_results = selections
        .iter()
        .map(|s| evaluate(s, target_cpm))
        .collect::<Result<Vec<_>, _>>()?;

    let impressions = creator_results
        .iter()
        .try_fold(0u64, |acc, r| acc.checked_add(r.expected_impressions))
        .ok_or(ValidationError::TotalImpressionOverflow)?;
    let cost = ordered_sum(creator_results.iter().map(|r| r.estimated_cost));
    let cpm = per_mille(cost, impressions);

    #[allow(clippy::cast_precision_loss)]
    let (total_f, target_f) = (impressions as f64, goal.target_impressions as f64);

    let comparison = Comparison {
        impression_difference: signed_difference(impressions, goal.target_impressions),
        impression_percentage: total_f / target_f * 100.0,
        budget_difference: cost - goal.budget,
        budget_percentage: cost / goal.budget * 100.0,
        cpm_difference: cpm - target_cpm,
    };

    let result = SimulationResult {
        target_cpm,
        creator_results,
        totals: Totals {
            impressions,
            cost,
            cpm,
        },
        comparison,
    };

    tracing::debug!(
        impressions = result.totals.impressions,
        cost = result.totals.cost,
        cpm = result.totals.cpm,
        overvalued = result.count_by_status(ValueStatus::Overvalued),
        undervalued = result.count_by_status(ValueStatus::Undervalued),
        "campaign simulation complete"
    );

    Ok(result)
}

fn evaluate(selection: &CampaignSelection, target_cpm: f64) -> Result<CreatorResult, ValidationError> {
    let metrics = &selection.metrics;
    let expected_impressions = metrics
        .avg_views
        .checked_mul(u64::from(selection.post_count))
        .ok_or_else(|| ValidationError::ImpressionOverflow {
            creator: selection.creator_name.clone(),
            platform: selection.platform.clone(),
        })?;

    #[allow(clippy::cast_precision_loss)]
    let impressions_f = expected_impressions as f64;
    let estimated_cost =
        (impressions_f / 1000.0) * (metrics.sponsored_rate_percent * SPONSORED_RATE_MULTIPLIER);
    let cpm = per_mille(estimated_cost, expected_impressions);

    let cpm_difference = cpm - target_cpm;
    let cpm_percentage_difference = (cpm - target_cpm) / target_cpm * 100.0;

    Ok(CreatorResult {
        selection: selection.clone(),
        expected_impressions,
        estimated_cost,
        cpm,
        value_status: ValueStatus::classify(cpm_percentage_difference),
        cpm_difference,
        cpm_percentage_difference,
    })
}

/// Cost per thousand impressions; zero when there are no impressions.
fn per_mille(cost: f64, impressions: u64) -> f64 {
    if impressions == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let impressions = impressions as f64;
    cost / impressions * 1000.0
}

/// Sums in a canonical order so the result does not depend on input order.
fn ordered_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values.into_iter().fold(0.0, |acc, v| acc + v)
}

fn signed_difference(total: u64, target: u64) -> i64 {
    let diff = i128::from(total) - i128::from(target);
    i64::try_from(diff).unwrap_or(match diff.cmp(&0) {
        Ordering::Less => i64::MIN,
        _ => i64::MAX,
    })
}
