//! Profile link access level auditing.

use std::collections::BTreeMap;

use serde_json::json;
use uuid::Uuid;

use usermgmt_core::events::{AuditActivityType, AuditEvent, AuditEventBuilder};
use usermgmt_core::result::AppResult;
use usermgmt_core::types::{ProfileId, UserId};
use usermgmt_entity::link::ProfileLink;
use usermgmt_entity::profile::{ProfileAccessLevel, ProfileType};

use crate::audit::handler::AuditHandler;

const ACCESS_LEVEL: &str = "accessLevel";

/// Pre-update capture of a link.
#[derive(Debug, Clone)]
pub struct AccessLevelSnapshot {
    pub profile_id: ProfileId,
    pub user_id: UserId,
    pub created_by: UserId,
    pub access_level: ProfileAccessLevel,
}

/// Reports a change of a linked user's access level.
///
/// The employer variant files the event against the employer profile; the
/// individual variant files it against the linked user.
#[derive(Debug, Clone, Copy)]
pub struct ProfileUserAccessLevelHandler {
    profile_type: ProfileType,
}

impl ProfileUserAccessLevelHandler {
    pub fn employer() -> Self {
        Self::for_profile_type(ProfileType::Employer)
    }

    pub fn individual() -> Self {
        Self::for_profile_type(ProfileType::Individual)
    }

    pub fn for_profile_type(profile_type: ProfileType) -> Self {
        Self { profile_type }
    }

    fn activity_type(&self) -> AuditActivityType {
        match self.profile_type {
            ProfileType::Employer => AuditActivityType::EmployerProfileUserAccessLevelChanged,
            ProfileType::Individual => AuditActivityType::IndividualProfileUserAccessLevelChanged,
        }
    }

    fn business_object_id(&self, pre: &AccessLevelSnapshot) -> Uuid {
        match self.profile_type {
            ProfileType::Employer => pre.profile_id.into_uuid(),
            ProfileType::Individual => pre.user_id.into_uuid(),
        }
    }
}

fn access_level_state(level: ProfileAccessLevel) -> BTreeMap<String, String> {
    BTreeMap::from([(ACCESS_LEVEL.to_string(), level.as_str().to_string())])
}

impl AuditHandler for ProfileUserAccessLevelHandler {
    type Subject = ProfileLink;
    type PreState = AccessLevelSnapshot;
    type PostState = ProfileAccessLevel;

    fn describe(&self) -> &'static str {
        match self.profile_type {
            ProfileType::Employer => "employer profile user access level change",
            ProfileType::Individual => "individual profile user access level change",
        }
    }

    fn capture_pre(&self, link: &ProfileLink) -> AccessLevelSnapshot {
        AccessLevelSnapshot {
            profile_id: link.profile_id,
            user_id: link.user_id,
            created_by: link.created_by,
            access_level: link.access_level,
        }
    }

    fn capture_post(&self, link: &ProfileLink) -> ProfileAccessLevel {
        link.access_level
    }

    fn subject_id(&self, pre: &AccessLevelSnapshot) -> Uuid {
        pre.user_id.into_uuid()
    }

    fn build_event(
        &self,
        pre: AccessLevelSnapshot,
        post: ProfileAccessLevel,
        originator_id: UserId,
    ) -> AppResult<Option<AuditEventBuilder>> {
        if pre.access_level == post {
            return Ok(None);
        }

        let summary = format!(
            "Profile user access level changed to [{}] for {} profile user {} created by {}. \
             Previously it was [{}]",
            post.as_str(),
            self.profile_type.label(),
            pre.user_id,
            pre.created_by,
            pre.access_level.as_str()
        );
        let data = serde_json::to_string(&json!({
            "createdById": pre.created_by,
            "userId": pre.user_id,
        }))?;

        let builder = AuditEvent::builder(self.activity_type())
            .originator(originator_id)
            .user(originator_id)
            .summary(summary)
            .business_object(
                self.business_object_id(&pre),
                self.profile_type.business_object(),
            )
            .old_state(access_level_state(pre.access_level))
            .new_state(access_level_state(post))
            .data(data);
        Ok(Some(builder))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::audit::handler::{AuditOutcome, AuditSession};
    use crate::audit::testing::{FailingSink, RecordingSink};
    use usermgmt_core::events::AuditEventBusinessObject;
    use usermgmt_entity::link::NewProfileLink;

    fn link(profile_type: ProfileType, level: ProfileAccessLevel) -> ProfileLink {
        NewProfileLink {
            profile_id: ProfileId::new(),
            user_id: UserId::new(),
            profile_type,
            access_level: level,
            created_by: UserId::new(),
        }
        .into_link()
    }

    async fn change(
        handler: ProfileUserAccessLevelHandler,
        link: &mut ProfileLink,
        to: ProfileAccessLevel,
        sink: Arc<RecordingSink>,
    ) -> AuditOutcome {
        let originator = UserId::new();
        let pre = AuditSession::new(handler, sink).handle_pre_update_state(link);
        link.set_access_level(to, originator);
        pre.handle_post_update_state(link)
            .publish_audit_event(originator)
            .await
    }

    #[tokio::test]
    async fn test_same_level_publishes_nothing() {
        let sink = Arc::new(RecordingSink::default());
        let mut link = link(ProfileType::Employer, ProfileAccessLevel::Writer);

        let outcome = change(
            ProfileUserAccessLevelHandler::employer(),
            &mut link,
            ProfileAccessLevel::Writer,
            sink.clone(),
        )
        .await;

        assert_eq!(outcome, AuditOutcome::NoChange);
        assert!(sink.recorded().await.is_empty());
    }

    #[tokio::test]
    async fn test_employer_change_targets_profile() {
        let sink = Arc::new(RecordingSink::default());
        let mut link = link(ProfileType::Employer, ProfileAccessLevel::Reader);

        let outcome = change(
            ProfileUserAccessLevelHandler::employer(),
            &mut link,
            ProfileAccessLevel::Admin,
            sink.clone(),
        )
        .await;

        let event = outcome.event().unwrap();
        assert_eq!(
            event.summary,
            format!(
                "Profile user access level changed to [ADMIN] for employer profile user {} \
                 created by {}. Previously it was [READER]",
                link.user_id, link.created_by
            )
        );
        assert!(event.summary.contains("[ADMIN]"));
        assert!(event.summary.contains("[READER]"));
        assert_eq!(event.old_state, access_level_state(ProfileAccessLevel::Reader));
        assert_eq!(event.new_state, access_level_state(ProfileAccessLevel::Admin));
        assert_eq!(event.business_object.id, link.profile_id.into_uuid());
        assert_eq!(event.business_object.object_type, AuditEventBusinessObject::Employer);
        assert_eq!(
            event.activity_type,
            AuditActivityType::EmployerProfileUserAccessLevelChanged
        );
        assert_eq!(sink.recorded().await.len(), 1);
    }

    #[tokio::test]
    async fn test_individual_change_targets_user() {
        let sink = Arc::new(RecordingSink::default());
        let mut link = link(ProfileType::Individual, ProfileAccessLevel::Reader);

        let outcome = change(
            ProfileUserAccessLevelHandler::individual(),
            &mut link,
            ProfileAccessLevel::Writer,
            sink,
        )
        .await;

        let event = outcome.event().unwrap();
        assert_eq!(event.business_object.id, link.user_id.into_uuid());
        assert_ne!(event.business_object.id, link.profile_id.into_uuid());
        assert_eq!(
            event.business_object.object_type,
            AuditEventBusinessObject::Individual
        );
        assert!(event.summary.contains("for individual profile user"));
    }

    #[tokio::test]
    async fn test_payload_names_creator_and_user() {
        let sink = Arc::new(RecordingSink::default());
        let mut link = link(ProfileType::Employer, ProfileAccessLevel::Writer);

        let outcome = change(
            ProfileUserAccessLevelHandler::for_profile_type(link.profile_type),
            &mut link,
            ProfileAccessLevel::Reader,
            sink,
        )
        .await;

        let data: serde_json::Value =
            serde_json::from_str(outcome.event().unwrap().data.as_deref().unwrap()).unwrap();
        assert_eq!(data["createdById"], link.created_by.to_string());
        assert_eq!(data["userId"], link.user_id.to_string());
    }

    #[tokio::test]
    async fn test_dispatch_failure_is_swallowed() {
        let mut link = link(ProfileType::Employer, ProfileAccessLevel::Reader);
        let pre = AuditSession::new(ProfileUserAccessLevelHandler::employer(), Arc::new(FailingSink))
            .handle_pre_update_state(&link);
        link.set_access_level(ProfileAccessLevel::Admin, link.created_by);

        let outcome = pre
            .handle_post_update_state(&link)
            .publish_audit_event(UserId::new())
            .await;
        assert_eq!(outcome, AuditOutcome::Failed);
    }
}
