//! Authorization checks combining attributes with policy decisions.

use std::sync::Arc;

use tracing::{debug, warn};

use usermgmt_core::error::AppError;
use usermgmt_core::result::AppResult;

use super::engine::{PolicyEngine, Principal, ProfileAction, ResourceDescriptor};
use crate::access::PrincipalAttributeProvider;
use crate::context::SecurityContext;

/// Entry point for every profile access check.
///
/// Attributes are recomputed for each check so that link changes take
/// effect on the next request.
#[derive(Debug, Clone)]
pub struct AuthorizationHandler {
    attributes: PrincipalAttributeProvider,
    engine: Arc<dyn PolicyEngine>,
}

impl AuthorizationHandler {
    pub fn new(attributes: PrincipalAttributeProvider, engine: Arc<dyn PolicyEngine>) -> Self {
        Self { attributes, engine }
    }

    /// Returns whether the caller may perform `action` on `resource`.
    pub async fn is_allowed(
        &self,
        context: &dyn SecurityContext,
        action: ProfileAction,
        resource: &ResourceDescriptor,
    ) -> AppResult<bool> {
        let principal = Principal {
            id: context.user_id(),
            attributes: self.attributes.attributes(context).await?,
        };
        let allowed = self.engine.is_allowed(&principal, action, resource).await?;

        debug!(
            user_id = ?principal.id,
            action = %action,
            profile_id = %resource.id,
            profile_type = %resource.profile_type,
            allowed,
            "Authorization decision"
        );
        Ok(allowed)
    }

    /// Like [`is_allowed`](Self::is_allowed), but denial is an error.
    pub async fn require(
        &self,
        context: &dyn SecurityContext,
        action: ProfileAction,
        resource: &ResourceDescriptor,
    ) -> AppResult<()> {
        if self.is_allowed(context, action, resource).await? {
            Ok(())
        } else {
            warn!(
                user_id = ?context.user_id(),
                action = %action,
                profile_id = %resource.id,
                "Access denied"
            );
            Err(AppError::authorization(format!(
                "Not allowed to {action} {} profile {}",
                resource.profile_type.label(),
                resource.id
            )))
        }
    }
}
