//! # campaignsim - Campaign performance simulation for creator marketing
//!
//! Given a campaign goal (budget, target impressions, campaign type, planned
//! creator count) and a list of booked creator placements, campaignsim
//! estimates delivered impressions and cost for each placement, rates each
//! one against the target CPM, and aggregates totals against the goal.
//!
//! ## Core Concepts
//!
//! - **CampaignGoal**: What the campaign wants to buy, and at what budget
//! - **CampaignSelection**: One booked placement with a metrics snapshot taken at commit time
//! - **SimulationResult**: Per-creator estimates plus totals and the comparison with the goal
//! - **CreatorDirectory**: Where creator metrics come from; the engine never calls it
//!
//! ## Usage
//!
//! ```rust,ignore
//! use campaignsim::{simulate, CampaignGoal, CampaignSelection, CampaignType, PlatformMetrics, PostType, Tier};
//!
//! let goal = CampaignGoal::new(10_000.0, 1_000_000, CampaignType::Awareness, 1)?;
//! let metrics = PlatformMetrics::new("@brettchody", Tier::Micro, 50_000, 25_000, 5.2, 3.8);
//! let selection = CampaignSelection::new("Brett Chody", "Instagram", PostType::Reel, 2, metrics);
//!
//! let result = simulate(&goal, &[selection])?;
//! assert_eq!(result.totals.impressions, 50_000);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core types
pub mod error;
pub mod goal;
pub mod metrics;
pub mod selection;

// Engine and runtime
pub mod engine;

// Surrounding planner state
pub mod directory;
pub mod roster;
pub mod session;
pub mod staging;

pub mod config;
pub mod report;

// Re-export primary types at crate root for convenience
pub use config::{ConfigError, SimulatorConfig};
pub use directory::{sample_directory, CreatorDirectory, CreatorProfile, DirectoryError, InMemoryDirectory};
pub use engine::runtime::{RuntimeConfig, SimulationHandle, SimulationRuntime};
pub use engine::{simulate, Comparison, CreatorResult, SimulationResult, Totals, ValueStatus};
pub use error::{CampaignError, CampaignResult, ExecutionError, ValidationError};
pub use goal::{CampaignGoal, CampaignGoalBuilder, CampaignType};
pub use metrics::{PlatformMetrics, Tier};
pub use roster::{CampaignRoster, RosterEntry};
pub use selection::{CampaignSelection, PostType, SelectionId};
pub use session::CampaignSession;
pub use staging::{SelectionStager, StagedPlatform};

#[cfg(feature = "async")]
pub use engine::deferred::simulate_deferred;
