//! Per-platform creator metrics as supplied by a creator directory.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Creator size classification, assigned by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    /// Smallest audiences.
    Nano,
    /// Small audiences.
    Micro,
    /// Mid-sized audiences.
    Mid,
    /// Large audiences.
    Macro,
    /// Largest audiences.
    Mega,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nano => write!(f, "Nano"),
            Self::Micro => write!(f, "Micro"),
            Self::Mid => write!(f, "Mid"),
            Self::Macro => write!(f, "Macro"),
            Self::Mega => write!(f, "Mega"),
        }
    }
}

/// Audience and engagement figures for one creator on one platform.
///
/// Rates are engagement percentages (5.2 means 5.2%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformMetrics {
    /// Account handle on the platform, e.g. `@brettchody`.
    pub handle: String,

    /// Size classification.
    pub tier: Tier,

    /// Followers on the platform.
    pub follower_count: u64,

    /// Average views per post. Drives impression estimates.
    pub avg_views: u64,

    /// Engagement rate on organic posts.
    pub organic_rate_percent: f64,

    /// Engagement rate on sponsored posts. Drives cost estimates.
    pub sponsored_rate_percent: f64,
}

impl PlatformMetrics {
    /// Creates a metrics record.
    pub fn new(
        handle: impl Into<String>,
        tier: Tier,
        follower_count: u64,
        avg_views: u64,
        organic_rate_percent: f64,
        sponsored_rate_percent: f64,
    ) -> Self {
        Self {
            handle: handle.into(),
            tier,
            follower_count,
            avg_views,
            organic_rate_percent,
            sponsored_rate_percent,
        }
    }

    /// Checks that the handle is present and both rates are finite and non-negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.handle.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "handle".to_string(),
            });
        }
        validate_rate("organic_rate_percent", self.organic_rate_percent)?;
        validate_rate("sponsored_rate_percent", self.sponsored_rate_percent)?;
        Ok(())
    }
}

fn validate_rate(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidRate {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}
