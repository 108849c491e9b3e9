//! Campaign session: the state a planner works against.
//!
//! Holds the current goal, the roster and the current result slot, and
//! resolves creators through an injected [`CreatorDirectory`]. Every
//! simulation recomputes the whole result from the goal and the committed
//! selections; the previous result is discarded, never patched.

use std::sync::Arc;

use crate::directory::CreatorDirectory;
use crate::engine::runtime::SimulationRuntime;
use crate::engine::{simulate, SimulationResult};
use crate::error::{CampaignResult, ExecutionError, ValidationError};
use crate::goal::CampaignGoal;
use crate::roster::CampaignRoster;
use crate::selection::{CampaignSelection, PostType, SelectionId};

/// Planner state for one campaign.
pub struct CampaignSession {
    directory: Arc<dyn CreatorDirectory>,
    goal: Option<CampaignGoal>,
    roster: CampaignRoster,
    result: Option<SimulationResult>,
}

impl CampaignSession {
    /// Creates a session resolving creators through `directory`.
    pub fn new(directory: Arc<dyn CreatorDirectory>) -> Self {
        Self {
            directory,
            goal: None,
            roster: CampaignRoster::new(),
            result: None,
        }
    }

    /// Sets the campaign goal, replacing any previous one.
    ///
    /// The current result is cleared since it was measured against the old goal.
    pub fn set_goal(&mut self, goal: CampaignGoal) -> Result<(), ValidationError> {
        goal.validate()?;
        tracing::info!(
            budget = goal.budget,
            target_impressions = goal.target_impressions,
            campaign_type = %goal.campaign_type,
            creator_count = goal.creator_count,
            "campaign goal set"
        );
        self.goal = Some(goal);
        self.result = None;
        Ok(())
    }

    /// The current goal.
    #[must_use]
    pub fn goal(&self) -> Option<&CampaignGoal> {
        self.goal.as_ref()
    }

    /// Searches the directory by creator name.
    pub fn search(&self, query: &str) -> CampaignResult<Vec<String>> {
        Ok(self.directory.search(query)?)
    }

    /// Adds a creator from the directory to the roster.
    pub fn add_creator(&mut self, name: &str) -> CampaignResult<()> {
        let profile = self
            .directory
            .profile(name)?
            .ok_or_else(|| ExecutionError::CreatorNotFound {
                name: name.to_string(),
            })?;
        self.roster.add_creator(profile)?;
        Ok(())
    }

    /// Commits a single line item, resolving metrics from the directory.
    pub fn book(
        &mut self,
        creator: &str,
        platform: &str,
        post_type: PostType,
        post_count: u32,
    ) -> CampaignResult<SelectionId> {
        let profile = self
            .directory
            .profile(creator)?
            .ok_or_else(|| ExecutionError::CreatorNotFound {
                name: creator.to_string(),
            })?;
        let metrics = self
            .directory
            .lookup(&profile.name, platform)?
            .ok_or_else(|| ExecutionError::PlatformNotFound {
                name: profile.name.clone(),
                platform: platform.to_string(),
            })?;
        let platform_name = profile
            .platform_name(platform)
            .map_or_else(|| platform.to_string(), str::to_string);

        let selection = CampaignSelection::new(profile.name, platform_name, post_type, post_count, metrics);
        let id = selection.id;
        self.roster.append([selection]);
        Ok(id)
    }

    /// The roster.
    #[must_use]
    pub fn roster(&self) -> &CampaignRoster {
        &self.roster
    }

    /// Mutable access to the roster for staging and line-item edits.
    pub fn roster_mut(&mut self) -> &mut CampaignRoster {
        &mut self.roster
    }

    /// Runs the simulation synchronously and stores the result.
    pub fn simulate(&mut self) -> CampaignResult<&SimulationResult> {
        let goal = self.goal.as_ref().ok_or(ValidationError::MissingGoal)?;
        let result = simulate(goal, self.roster.selections())?;
        Ok(&*self.result.insert(result))
    }

    /// Runs the simulation on `runtime` and stores the result.
    pub fn simulate_on(&mut self, runtime: &SimulationRuntime) -> CampaignResult<&SimulationResult> {
        let goal = self.goal.clone().ok_or(ValidationError::MissingGoal)?;
        let result = runtime.run(goal, self.roster.selections().to_vec())?;
        Ok(&*self.result.insert(result))
    }

    /// The result of the last simulation, if any.
    #[must_use]
    pub fn result(&self) -> Option<&SimulationResult> {
        self.result.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::directory::sample_directory;
    use crate::engine::runtime::RuntimeConfig;
    use crate::error::CampaignError;
    use crate::goal::CampaignType;

    fn session() -> CampaignSession {
        CampaignSession::new(Arc::new(sample_directory().unwrap()))
    }

    fn goal() -> CampaignGoal {
        CampaignGoal::new(10_000.0, 1_000_000, CampaignType::Awareness, 2).unwrap()
    }

    #[test]
    fn simulate_requires_goal() {
        let mut s = session();
        let err = s.simulate().unwrap_err();
        assert!(matches!(err, CampaignError::Validation(ValidationError::MissingGoal)));
    }

    #[test]
    fn add_unknown_creator_fails() {
        let mut s = session();
        let err = s.add_creator("Nobody Famous").unwrap_err();
        assert!(matches!(err, CampaignError::Execution(ExecutionError::CreatorNotFound { .. })));
    }

    #[test]
    fn book_unknown_platform_fails() {
        let mut s = session();
        let err = s.book("Tech Guru", "TikTok", PostType::Video, 1).unwrap_err();
        assert!(matches!(err, CampaignError::Execution(ExecutionError::PlatformNotFound { .. })));
    }

    #[test]
    fn book_uses_canonical_names() {
        let mut s = session();
        s.book("tech guru", "youtube", PostType::Video, 1).unwrap();
        let line = &s.roster().selections()[0];
        assert_eq!(line.creator_name, "Tech Guru");
        assert_eq!(line.platform, "YouTube");
    }

    #[test]
    fn simulate_stores_result_and_new_goal_clears_it() {
        let mut s = session();
        s.set_goal(goal()).unwrap();
        s.book("Brett Chody", "Instagram", PostType::FeedPost, 2).unwrap();

        let impressions = s.simulate().unwrap().totals.impressions;
        assert_eq!(impressions, 50_000);
        assert!(s.result().is_some());

        s.set_goal(CampaignGoal::new(5_000.0, 100_000, CampaignType::Performance, 1).unwrap())
            .unwrap();
        assert!(s.result().is_none());
    }

    #[test]
    fn edits_are_reflected_on_rerun() {
        let mut s = session();
        s.set_goal(goal()).unwrap();
        let id = s.book("Brett Chody", "Instagram", PostType::FeedPost, 1).unwrap();
        assert_eq!(s.simulate().unwrap().totals.impressions, 25_000);

        s.roster_mut().update_post_count(id, 4).unwrap();
        assert_eq!(s.simulate().unwrap().totals.impressions, 100_000);
    }

    #[test]
    fn simulate_on_runtime_matches_sync() {
        let mut s = session();
        s.set_goal(goal()).unwrap();
        s.book("Sarah Martinez", "TikTok", PostType::Reel, 1).unwrap();

        let sync = s.simulate().unwrap().clone();
        let runtime = SimulationRuntime::new(RuntimeConfig::default()).unwrap();
        let threaded = s.simulate_on(&runtime).unwrap();
        assert_eq!(&sync, threaded);
    }
}
