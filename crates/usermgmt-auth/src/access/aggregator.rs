//! Aggregation of a user's profile links into access profiles.

use std::sync::Arc;

use tracing::debug;

use usermgmt_core::result::AppResult;
use usermgmt_core::types::UserId;
use usermgmt_database::store::ProfileLinkStore;
use usermgmt_entity::link::AccessProfile;
use usermgmt_entity::profile::ProfileType;

/// Builds the ordered list of profiles a user can reach.
///
/// Individual-derived entries always precede employer-derived entries, and
/// each group keeps the order returned by the link store. Nothing is
/// filtered out, restricted-tier links included. Nothing is cached.
#[derive(Debug, Clone)]
pub struct AccessProfileAggregator {
    links: Arc<dyn ProfileLinkStore>,
}

impl AccessProfileAggregator {
    /// Creates a new aggregator over the given link store.
    pub fn new(links: Arc<dyn ProfileLinkStore>) -> Self {
        Self { links }
    }

    /// Computes the access profiles for `user_id`.
    pub async fn access_profiles(&self, user_id: UserId) -> AppResult<Vec<AccessProfile>> {
        let (individual, employer) = tokio::try_join!(
            self.links.find_by_user(ProfileType::Individual, user_id),
            self.links.find_by_user(ProfileType::Employer, user_id),
        )?;

        let profiles: Vec<AccessProfile> = individual
            .iter()
            .chain(employer.iter())
            .map(AccessProfile::from)
            .collect();

        debug!(
            user_id = %user_id,
            individual = individual.len(),
            employer = employer.len(),
            "Aggregated access profiles"
        );
        Ok(profiles)
    }
}
