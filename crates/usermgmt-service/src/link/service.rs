//! Profile link management with audit events.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use usermgmt_auth::{AuthorizationHandler, ProfileAction, ResourceDescriptor, SecurityContext};
use usermgmt_core::error::AppError;
use usermgmt_core::result::AppResult;
use usermgmt_core::types::{PageResponse, ProfileId, ProfileLinkId, UserId};
use usermgmt_database::store::ProfileLinkStore;
use usermgmt_entity::link::{NewProfileLink, ProfileLink};
use usermgmt_entity::profile::{ProfileAccessLevel, ProfileType};

use super::filters::{LinkFilterBuilder, ProfileLinkFilters};
use crate::audit::handlers::ProfileUserAccessLevelHandler;
use crate::audit::{AuditEventSink, AuditSession, events, record_best_effort};
use crate::context::RequestContext;

/// Request to link a user to a profile, or change an existing link's level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertLinkRequest {
    pub profile_id: ProfileId,
    pub profile_type: ProfileType,
    pub user_id: UserId,
    pub access_level: ProfileAccessLevel,
}

/// Manages the links between users and profiles.
#[derive(Debug, Clone)]
pub struct ProfileLinkService {
    /// Link store.
    links: Arc<dyn ProfileLinkStore>,
    /// Row-level filter builder for listings.
    filters: LinkFilterBuilder,
    /// Policy checks.
    authz: AuthorizationHandler,
    /// Audit event sink.
    audit: Arc<dyn AuditEventSink>,
}

impl ProfileLinkService {
    /// Creates a new profile link service.
    pub fn new(
        links: Arc<dyn ProfileLinkStore>,
        filters: LinkFilterBuilder,
        authz: AuthorizationHandler,
        audit: Arc<dyn AuditEventSink>,
    ) -> Self {
        Self {
            links,
            filters,
            authz,
            audit,
        }
    }

    /// Links a user to a profile, or changes the level of the existing link.
    ///
    /// A new link posts a "user added" event. A level change on an existing
    /// link is audited with the access level handler.
    pub async fn upsert_link(
        &self,
        ctx: &RequestContext,
        req: UpsertLinkRequest,
    ) -> AppResult<ProfileLink> {
        let resource = ResourceDescriptor {
            id: req.profile_id,
            profile_type: req.profile_type,
        };
        self.authz.require(ctx, ProfileAction::Link, &resource).await?;

        let existing = self
            .links
            .find_by_profile_and_user(req.profile_type, req.profile_id, req.user_id)
            .await?;

        match existing {
            Some(link) => self.apply_access_level(ctx, link, req.access_level).await,
            None => {
                let link = NewProfileLink {
                    profile_id: req.profile_id,
                    user_id: req.user_id,
                    profile_type: req.profile_type,
                    access_level: req.access_level,
                    created_by: ctx.user_id,
                }
                .into_link();
                let saved = self.links.insert(&link).await?;

                info!(
                    link_id = %saved.id,
                    profile_id = %saved.profile_id,
                    user_id = %saved.user_id,
                    access_level = %saved.access_level,
                    "Profile user added"
                );
                record_best_effort(
                    self.audit.as_ref(),
                    events::user_added(&saved, ctx.user_id),
                    ctx.user_id,
                    ctx.trace_id.clone(),
                )
                .await;
                Ok(saved)
            }
        }
    }

    /// Changes the access level of an existing link.
    pub async fn change_access_level(
        &self,
        ctx: &RequestContext,
        link_id: ProfileLinkId,
        access_level: ProfileAccessLevel,
    ) -> AppResult<ProfileLink> {
        let link = self.get_link(link_id).await?;
        self.authz
            .require(ctx, ProfileAction::Link, &resource_of(&link))
            .await?;
        self.apply_access_level(ctx, link, access_level).await
    }

    /// Removes the link between a user and a profile.
    pub async fn remove_link(
        &self,
        ctx: &RequestContext,
        profile_type: ProfileType,
        profile_id: ProfileId,
        user_id: UserId,
    ) -> AppResult<()> {
        let resource = ResourceDescriptor {
            id: profile_id,
            profile_type,
        };
        self.authz
            .require(ctx, ProfileAction::DeleteLink, &resource)
            .await?;

        let link = self
            .links
            .find_by_profile_and_user(profile_type, profile_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Profile link not found"))?;

        if !self.links.delete(link.id).await? {
            return Err(AppError::not_found("Profile link not found"));
        }

        info!(
            link_id = %link.id,
            profile_id = %profile_id,
            user_id = %user_id,
            "Profile user removed"
        );
        record_best_effort(
            self.audit.as_ref(),
            events::user_removed(&link, ctx.user_id),
            ctx.user_id,
            ctx.trace_id.clone(),
        )
        .await;
        Ok(())
    }

    /// Pages through links of one profile type.
    ///
    /// Listing the users of one profile requires view access to it; listing
    /// across profiles is reserved for privileged callers.
    pub async fn search(
        &self,
        ctx: &RequestContext,
        profile_type: ProfileType,
        filters: &ProfileLinkFilters,
    ) -> AppResult<PageResponse<ProfileLink>> {
        match filters.profile_id {
            Some(profile_id) => {
                let resource = ResourceDescriptor {
                    id: profile_id,
                    profile_type,
                };
                self.authz.require(ctx, ProfileAction::View, &resource).await?;
            }
            None if !ctx.is_privileged() => {
                return Err(AppError::authorization(
                    "Listing links across profiles requires a privileged caller",
                ));
            }
            None => {}
        }

        let predicates = self.filters.build(filters, ctx).await?;
        self.links
            .search(profile_type, &predicates, &filters.page, filters.sort.as_ref())
            .await
    }

    /// All links of one type held by `user_id`.
    ///
    /// Callers may read their own links; privileged callers may read anyone's.
    pub async fn links_for_user(
        &self,
        ctx: &RequestContext,
        profile_type: ProfileType,
        user_id: UserId,
    ) -> AppResult<Vec<ProfileLink>> {
        if ctx.user_id != user_id && !ctx.is_privileged() {
            return Err(AppError::authorization("Not allowed to read another user's links"));
        }

        let links = self.links.find_by_user(profile_type, user_id).await?;
        if ctx.is_privileged() {
            return Ok(links);
        }
        Ok(links
            .into_iter()
            .filter(|l| !l.access_level.is_hidden_for_public_users())
            .collect())
    }

    async fn get_link(&self, link_id: ProfileLinkId) -> AppResult<ProfileLink> {
        self.links
            .find_by_id(link_id)
            .await?
            .ok_or_else(|| AppError::not_found("Profile link not found"))
    }

    async fn apply_access_level(
        &self,
        ctx: &RequestContext,
        link: ProfileLink,
        access_level: ProfileAccessLevel,
    ) -> AppResult<ProfileLink> {
        let links = self.links.clone();
        let updated_by = ctx.user_id;

        AuditSession::new(
            ProfileUserAccessLevelHandler::for_profile_type(link.profile_type),
            self.audit.clone(),
        )
        .with_trace_id(ctx.trace_id.clone())
        .run_audited(link, ctx.user_id, |mut link| async move {
            link.set_access_level(access_level, updated_by);
            links.update(&link).await
        })
        .await
    }
}

fn resource_of(link: &ProfileLink) -> ResourceDescriptor {
    ResourceDescriptor {
        id: link.profile_id,
        profile_type: link.profile_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::testing::RecordingSink;
    use usermgmt_auth::{AccessProfileAggregator, LocalPolicyEngine, PrincipalAttributeProvider};
    use usermgmt_core::error::ErrorKind;
    use usermgmt_core::events::AuditActivityType;
    use usermgmt_database::memory::{MemoryIdentityLookup, MemoryProfileLinkStore};
    use usermgmt_entity::user::UserType;

    struct Fixture {
        service: ProfileLinkService,
        store: Arc<MemoryProfileLinkStore>,
        sink: Arc<RecordingSink>,
        admin: RequestContext,
        profile_id: ProfileId,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryProfileLinkStore::new());
        let sink = Arc::new(RecordingSink::default());
        let authz = AuthorizationHandler::new(
            PrincipalAttributeProvider::new(AccessProfileAggregator::new(store.clone())),
            Arc::new(LocalPolicyEngine::new()),
        );
        let service = ProfileLinkService::new(
            store.clone(),
            LinkFilterBuilder::new(Arc::new(MemoryIdentityLookup::new())),
            authz,
            sink.clone(),
        );

        let admin = RequestContext::new(UserId::new(), UserType::Public).with_trace_id("trace-1");
        let profile_id = ProfileId::new();
        let owner = NewProfileLink {
            profile_id,
            user_id: admin.user_id,
            profile_type: ProfileType::Employer,
            access_level: ProfileAccessLevel::Admin,
            created_by: admin.user_id,
        }
        .into_link();
        store.insert(&owner).await.unwrap();

        Fixture {
            service,
            store,
            sink,
            admin,
            profile_id,
        }
    }

    fn upsert(profile_id: ProfileId, user_id: UserId, level: ProfileAccessLevel) -> UpsertLinkRequest {
        UpsertLinkRequest {
            profile_id,
            profile_type: ProfileType::Employer,
            user_id,
            access_level: level,
        }
    }

    #[tokio::test]
    async fn test_new_link_posts_user_added() {
        let f = fixture().await;
        let member = UserId::new();

        let link = f
            .service
            .upsert_link(&f.admin, upsert(f.profile_id, member, ProfileAccessLevel::Reader))
            .await
            .unwrap();

        assert_eq!(link.created_by, f.admin.user_id);
        let events = f.sink.recorded().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].activity_type, AuditActivityType::EmployerProfileUserAdded);
        assert_eq!(events[0].request_context.trace_id.as_deref(), Some("trace-1"));
    }

    #[tokio::test]
    async fn test_existing_link_level_change_is_audited() {
        let f = fixture().await;
        let member = UserId::new();
        f.service
            .upsert_link(&f.admin, upsert(f.profile_id, member, ProfileAccessLevel::Reader))
            .await
            .unwrap();

        let updated = f
            .service
            .upsert_link(&f.admin, upsert(f.profile_id, member, ProfileAccessLevel::Writer))
            .await
            .unwrap();

        assert_eq!(updated.access_level, ProfileAccessLevel::Writer);
        assert_eq!(updated.last_updated_by, Some(f.admin.user_id));
        let events = f.sink.recorded().await;
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1].activity_type,
            AuditActivityType::EmployerProfileUserAccessLevelChanged
        );
    }

    #[tokio::test]
    async fn test_same_level_upsert_publishes_nothing_new() {
        let f = fixture().await;
        let member = UserId::new();
        let req = upsert(f.profile_id, member, ProfileAccessLevel::Reader);
        f.service.upsert_link(&f.admin, req.clone()).await.unwrap();
        f.service.upsert_link(&f.admin, req).await.unwrap();

        assert_eq!(f.sink.recorded().await.len(), 1);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_link() {
        let f = fixture().await;
        let member = RequestContext::new(UserId::new(), UserType::Public);
        f.service
            .upsert_link(&f.admin, upsert(f.profile_id, member.user_id, ProfileAccessLevel::Writer))
            .await
            .unwrap();

        let err = f
            .service
            .upsert_link(&member, upsert(f.profile_id, UserId::new(), ProfileAccessLevel::Reader))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_remove_link_posts_user_removed() {
        let f = fixture().await;
        let member = UserId::new();
        f.service
            .upsert_link(&f.admin, upsert(f.profile_id, member, ProfileAccessLevel::Reader))
            .await
            .unwrap();

        f.service
            .remove_link(&f.admin, ProfileType::Employer, f.profile_id, member)
            .await
            .unwrap();

        assert!(
            f.store
                .find_by_profile_and_user(ProfileType::Employer, f.profile_id, member)
                .await
                .unwrap()
                .is_none()
        );
        let events = f.sink.recorded().await;
        assert_eq!(
            events.last().unwrap().activity_type,
            AuditActivityType::EmployerProfileUserRemoved
        );
    }

    #[tokio::test]
    async fn test_remove_missing_link_is_not_found() {
        let f = fixture().await;
        let err = f
            .service
            .remove_link(&f.admin, ProfileType::Employer, f.profile_id, UserId::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_public_search_hides_restricted_links() {
        let f = fixture().await;
        f.service
            .upsert_link(&f.admin, upsert(f.profile_id, UserId::new(), ProfileAccessLevel::AgencyReadonly))
            .await
            .unwrap();
        f.service
            .upsert_link(&f.admin, upsert(f.profile_id, UserId::new(), ProfileAccessLevel::Reader))
            .await
            .unwrap();

        let filters = ProfileLinkFilters {
            profile_id: Some(f.profile_id),
            ..Default::default()
        };
        let page = f
            .service
            .search(&f.admin, ProfileType::Employer, &filters)
            .await
            .unwrap();

        assert_eq!(page.total_items, 2);
        assert!(
            page.items
                .iter()
                .all(|l| l.access_level != ProfileAccessLevel::AgencyReadonly)
        );
    }

    #[tokio::test]
    async fn test_privileged_search_includes_restricted_links() {
        let f = fixture().await;
        let restricted = f
            .service
            .upsert_link(&f.admin, upsert(f.profile_id, UserId::new(), ProfileAccessLevel::AgencyReadonly))
            .await
            .unwrap();

        let agency = RequestContext::new(UserId::new(), UserType::Agency);
        let page = f
            .service
            .search(&agency, ProfileType::Employer, &ProfileLinkFilters::default())
            .await
            .unwrap();

        assert_eq!(page.total_items, 2);
        assert!(page.items.iter().any(|l| l.id == restricted.id));
    }

    #[tokio::test]
    async fn test_unmatched_name_overrides_matching_user_id() {
        let f = fixture().await;
        let filters = ProfileLinkFilters {
            profile_id: Some(f.profile_id),
            user_id: Some(f.admin.user_id),
            ..Default::default()
        };
        let page = f
            .service
            .search(&f.admin, ProfileType::Employer, &filters)
            .await
            .unwrap();
        assert_eq!(page.total_items, 1);

        let filters = ProfileLinkFilters {
            name: Some("nobody by this name".to_string()),
            ..filters
        };
        let page = f
            .service
            .search(&f.admin, ProfileType::Employer, &filters)
            .await
            .unwrap();
        assert_eq!(page.total_items, 0);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_cross_profile_search_requires_privilege() {
        let f = fixture().await;
        let err = f
            .service
            .search(&f.admin, ProfileType::Employer, &ProfileLinkFilters::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let agency = RequestContext::new(UserId::new(), UserType::Agency);
        let page = f
            .service
            .search(&agency, ProfileType::Employer, &ProfileLinkFilters::default())
            .await
            .unwrap();
        assert_eq!(page.total_items, 1);
    }

    #[tokio::test]
    async fn test_links_for_user_is_scoped_to_caller() {
        let f = fixture().await;
        let own = f
            .service
            .links_for_user(&f.admin, ProfileType::Employer, f.admin.user_id)
            .await
            .unwrap();
        assert_eq!(own.len(), 1);

        let err = f
            .service
            .links_for_user(&f.admin, ProfileType::Employer, UserId::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }
}
