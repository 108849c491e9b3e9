//! Committed campaign line items.
//!
//! A `CampaignSelection` is one (creator × platform × post type) commitment.
//! It owns a snapshot of the creator's metrics taken at commit time, so later
//! directory changes never alter a committed line.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::PlatformMetrics;

/// Stable identifier of a committed line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionId(uuid::Uuid);

impl SelectionId {
    /// Creates a new random selection ID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SelectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content format committed on a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostType {
    /// Regular feed post.
    FeedPost,
    /// Ephemeral story.
    Story,
    /// Short-form vertical video.
    Reel,
    /// Long-form video.
    Video,
    /// Multi-image post.
    Carousel,
}

impl Default for PostType {
    fn default() -> Self {
        Self::FeedPost
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FeedPost => write!(f, "Feed Post"),
            Self::Story => write!(f, "Story"),
            Self::Reel => write!(f, "Reel"),
            Self::Video => write!(f, "Video"),
            Self::Carousel => write!(f, "Carousel"),
        }
    }
}

/// One committed line item of a campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSelection {
    /// Stable id; kept across post-count edits.
    pub id: SelectionId,

    /// Creator name as spelled in the directory.
    pub creator_name: String,

    /// Platform name as spelled in the directory.
    pub platform: String,

    /// Content format booked.
    pub post_type: PostType,

    /// Posts booked. Zero yields a zero-impression line.
    pub post_count: u32,

    /// Metrics as they were when this line was committed.
    pub metrics: PlatformMetrics,

    /// When the line was committed.
    pub committed_at: DateTime<Utc>,
}

impl CampaignSelection {
    /// Commits a new line item, snapshotting `metrics`.
    pub fn new(
        creator_name: impl Into<String>,
        platform: impl Into<String>,
        post_type: PostType,
        post_count: u32,
        metrics: PlatformMetrics,
    ) -> Self {
        Self {
            id: SelectionId::new(),
            creator_name: creator_name.into(),
            platform: platform.into(),
            post_type,
            post_count,
            metrics,
            committed_at: Utc::now(),
        }
    }

    /// Returns a copy of this line item with a different post count.
    ///
    /// Identity and metrics snapshot are preserved.
    #[must_use]
    pub fn with_post_count(&self, post_count: u32) -> Self {
        Self {
            post_count,
            ..self.clone()
        }
    }
}
