//! Campaign goal: the budget and reach target a roster is measured against.
//!
//! A goal is immutable once submitted. Changing any field means building a
//! new goal and replacing the old one wholesale.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// What the campaign is optimizing for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CampaignType {
    /// Reach as many people as possible.
    Awareness,
    /// Drive clicks, sign-ups or sales.
    Performance,
}

impl Default for CampaignType {
    fn default() -> Self {
        Self::Awareness
    }
}

impl fmt::Display for CampaignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Awareness => write!(f, "Awareness"),
            Self::Performance => write!(f, "Performance"),
        }
    }
}

/// Budget and reach target for a campaign.
///
/// # Examples
///
/// ```
/// use campaignsim::{CampaignGoal, CampaignType};
///
/// let goal = CampaignGoal::builder()
///     .budget(10_000.0)
///     .target_impressions(1_000_000)
///     .campaign_type(CampaignType::Awareness)
///     .creator_count(5)
///     .build()
///     .unwrap();
///
/// assert!((goal.target_cpm().unwrap() - 10.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignGoal {
    /// Total spend ceiling in currency units.
    pub budget: f64,

    /// Impressions the campaign is expected to reach.
    pub target_impressions: u64,

    /// Informational only; it does not change the math.
    #[serde(default)]
    pub campaign_type: CampaignType,

    /// Number of creators the campaign plans to work with.
    pub creator_count: u32,
}

impl CampaignGoal {
    /// Creates a goal, validating every field.
    pub fn new(
        budget: f64,
        target_impressions: u64,
        campaign_type: CampaignType,
        creator_count: u32,
    ) -> Result<Self, ValidationError> {
        let goal = Self {
            budget,
            target_impressions,
            campaign_type,
            creator_count,
        };
        goal.validate()?;
        Ok(goal)
    }

    /// Creates a builder for constructing a goal.
    #[must_use]
    pub fn builder() -> CampaignGoalBuilder {
        CampaignGoalBuilder::new()
    }

    /// Validates every field of the goal.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.target_cpm()?;
        if self.creator_count == 0 {
            return Err(ValidationError::NonPositiveCreatorCount);
        }
        Ok(())
    }

    /// Cost per thousand impressions implied by the budget and target.
    ///
    /// Fails when the budget is not a positive finite amount or the
    /// target impressions are zero, since the ratio is undefined.
    pub fn target_cpm(&self) -> Result<f64, ValidationError> {
        if !self.budget.is_finite() || self.budget <= 0.0 {
            return Err(ValidationError::NonPositiveBudget {
                budget: self.budget,
            });
        }
        if self.target_impressions == 0 {
            return Err(ValidationError::NonPositiveTargetImpressions);
        }

        #[allow(clippy::cast_precision_loss)]
        let target = self.target_impressions as f64;
        Ok(self.budget / target * 1000.0)
    }
}

/// Builder for [`CampaignGoal`].
#[derive(Debug, Clone, Default)]
pub struct CampaignGoalBuilder {
    budget: Option<f64>,
    target_impressions: Option<u64>,
    campaign_type: CampaignType,
    creator_count: Option<u32>,
}

impl CampaignGoalBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the budget (required).
    #[must_use]
    pub fn budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Set the target impressions (required).
    #[must_use]
    pub fn target_impressions(mut self, target: u64) -> Self {
        self.target_impressions = Some(target);
        self
    }

    /// Set the campaign type (default: Awareness).
    #[must_use]
    pub fn campaign_type(mut self, campaign_type: CampaignType) -> Self {
        self.campaign_type = campaign_type;
        self
    }

    /// Set the planned creator count (required).
    #[must_use]
    pub fn creator_count(mut self, count: u32) -> Self {
        self.creator_count = Some(count);
        self
    }

    /// Build the goal.
    pub fn build(self) -> Result<CampaignGoal, ValidationError> {
        let budget = self.budget.ok_or(ValidationError::MissingField {
            field: "budget".to_string(),
        })?;

        let target_impressions = self.target_impressions.ok_or(ValidationError::MissingField {
            field: "target_impressions".to_string(),
        })?;

        let creator_count = self.creator_count.ok_or(ValidationError::MissingField {
            field: "creator_count".to_string(),
        })?;

        CampaignGoal::new(budget, target_impressions, self.campaign_type, creator_count)
    }
}
