//! Audit events recorded for profile and profile-link changes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::types::id::UserId;

/// Closed set of auditable activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditActivityType {
    EmployerProfileCreated,
    EmployerProfileDataChanged,
    EmployerProfileUserAccessLevelChanged,
    EmployerProfileUserAdded,
    EmployerProfileUserRemoved,
    IndividualProfileCreated,
    IndividualProfileDataChanged,
    IndividualProfileUserAccessLevelChanged,
    IndividualProfileUserAdded,
    IndividualProfileUserRemoved,
    ProfileInvitationSent,
    ProfileInvitationClaimed,
    ProfileInvitationDeleted,
    ProfileInvitationResent,
}

impl AuditActivityType {
    /// Return the wire value, e.g. `"employer_profile_created"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmployerProfileCreated => "employer_profile_created",
            Self::EmployerProfileDataChanged => "employer_profile_data_changed",
            Self::EmployerProfileUserAccessLevelChanged => {
                "employer_profile_user_access_level_changed"
            }
            Self::EmployerProfileUserAdded => "employer_profile_user_added",
            Self::EmployerProfileUserRemoved => "employer_profile_user_removed",
            Self::IndividualProfileCreated => "individual_profile_created",
            Self::IndividualProfileDataChanged => "individual_profile_data_changed",
            Self::IndividualProfileUserAccessLevelChanged => {
                "individual_profile_user_access_level_changed"
            }
            Self::IndividualProfileUserAdded => "individual_profile_user_added",
            Self::IndividualProfileUserRemoved => "individual_profile_user_removed",
            Self::ProfileInvitationSent => "profile_invitation_sent",
            Self::ProfileInvitationClaimed => "profile_invitation_claimed",
            Self::ProfileInvitationDeleted => "profile_invitation_deleted",
            Self::ProfileInvitationResent => "profile_invitation_resent",
        }
    }
}

impl fmt::Display for AuditActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditActivityType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employer_profile_created" => Ok(Self::EmployerProfileCreated),
            "employer_profile_data_changed" => Ok(Self::EmployerProfileDataChanged),
            "employer_profile_user_access_level_changed" => {
                Ok(Self::EmployerProfileUserAccessLevelChanged)
            }
            "employer_profile_user_added" => Ok(Self::EmployerProfileUserAdded),
            "employer_profile_user_removed" => Ok(Self::EmployerProfileUserRemoved),
            "individual_profile_created" => Ok(Self::IndividualProfileCreated),
            "individual_profile_data_changed" => Ok(Self::IndividualProfileDataChanged),
            "individual_profile_user_access_level_changed" => {
                Ok(Self::IndividualProfileUserAccessLevelChanged)
            }
            "individual_profile_user_added" => Ok(Self::IndividualProfileUserAdded),
            "individual_profile_user_removed" => Ok(Self::IndividualProfileUserRemoved),
            "profile_invitation_sent" => Ok(Self::ProfileInvitationSent),
            "profile_invitation_claimed" => Ok(Self::ProfileInvitationClaimed),
            "profile_invitation_deleted" => Ok(Self::ProfileInvitationDeleted),
            "profile_invitation_resent" => Ok(Self::ProfileInvitationResent),
            other => Err(AppError::validation(format!(
                "Unknown audit activity type: {other}"
            ))),
        }
    }
}

/// Kind of entity an audit event is filed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditEventBusinessObject {
    User,
    Employer,
    Individual,
}

impl AuditEventBusinessObject {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Employer => "employer",
            Self::Individual => "individual",
        }
    }
}

impl fmt::Display for AuditEventBusinessObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who caused the audited change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRequestContext {
    /// Identity that initiated the request.
    pub originator_id: UserId,
    /// Identity acting on the business object.
    pub user_id: UserId,
    /// Trace identifier of the originating request, if any.
    pub trace_id: Option<String>,
}

/// Entity the event is filed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessObject {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub object_type: AuditEventBusinessObject,
}

/// An immutable audit record describing one observed change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub request_context: AuditRequestContext,
    pub summary: String,
    pub business_object: BusinessObject,
    /// Changed fields before the mutation.
    pub old_state: BTreeMap<String, String>,
    /// Changed fields after the mutation.
    pub new_state: BTreeMap<String, String>,
    /// Optional serialized JSON payload for downstream consumers.
    pub data: Option<String>,
    pub activity_type: AuditActivityType,
}

impl AuditEvent {
    /// Event type name used in the transport envelope.
    pub const EVENT_TYPE: &'static str = "AuditEvent";

    /// Start building an event for the given activity.
    pub fn builder(activity_type: AuditActivityType) -> AuditEventBuilder {
        AuditEventBuilder {
            activity_type,
            originator_id: None,
            user_id: None,
            trace_id: None,
            summary: None,
            business_object: None,
            old_state: BTreeMap::new(),
            new_state: BTreeMap::new(),
            data: None,
        }
    }
}

/// Builder for [`AuditEvent`].
#[derive(Debug)]
pub struct AuditEventBuilder {
    activity_type: AuditActivityType,
    originator_id: Option<UserId>,
    user_id: Option<UserId>,
    trace_id: Option<String>,
    summary: Option<String>,
    business_object: Option<BusinessObject>,
    old_state: BTreeMap<String, String>,
    new_state: BTreeMap<String, String>,
    data: Option<String>,
}

impl AuditEventBuilder {
    pub fn originator(mut self, originator_id: UserId) -> Self {
        self.originator_id = Some(originator_id);
        self
    }

    pub fn user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn trace_id(mut self, trace_id: Option<String>) -> Self {
        self.trace_id = trace_id;
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn business_object(mut self, id: Uuid, object_type: AuditEventBusinessObject) -> Self {
        self.business_object = Some(BusinessObject { id, object_type });
        self
    }

    pub fn old_state(mut self, state: BTreeMap<String, String>) -> Self {
        self.old_state = state;
        self
    }

    pub fn new_state(mut self, state: BTreeMap<String, String>) -> Self {
        self.new_state = state;
        self
    }

    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Finish the event.
    ///
    /// The acting user defaults to the originator when not set.
    pub fn build(self) -> Result<AuditEvent, AppError> {
        let originator_id = self
            .originator_id
            .ok_or_else(|| AppError::validation("Audit event requires an originator"))?;
        let summary = self
            .summary
            .ok_or_else(|| AppError::validation("Audit event requires a summary"))?;
        let business_object = self
            .business_object
            .ok_or_else(|| AppError::validation("Audit event requires a business object"))?;

        Ok(AuditEvent {
            request_context: AuditRequestContext {
                originator_id,
                user_id: self.user_id.unwrap_or(originator_id),
                trace_id: self.trace_id,
            },
            summary,
            business_object,
            old_state: self.old_state,
            new_state: self.new_state,
            data: self.data,
            activity_type: self.activity_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_type_parse() {
        let parsed: AuditActivityType = "employer_profile_user_access_level_changed".parse().unwrap();
        assert_eq!(parsed, AuditActivityType::EmployerProfileUserAccessLevelChanged);
        assert!("EMPLOYER_PROFILE_CREATED".parse::<AuditActivityType>().is_err());
    }

    #[test]
    fn test_activity_type_serde_matches_as_str() {
        let json = serde_json::to_string(&AuditActivityType::ProfileInvitationResent).unwrap();
        assert_eq!(json, "\"profile_invitation_resent\"");
    }

    #[test]
    fn test_builder_defaults_user_to_originator() {
        let originator = UserId::new();
        let object_id = Uuid::new_v4();
        let event = AuditEvent::builder(AuditActivityType::IndividualProfileDataChanged)
            .originator(originator)
            .summary("changed")
            .business_object(object_id, AuditEventBusinessObject::Individual)
            .build()
            .unwrap();

        assert_eq!(event.request_context.user_id, originator);
        assert_eq!(event.business_object.id, object_id);
        assert!(event.data.is_none());
    }

    #[test]
    fn test_builder_requires_summary() {
        let result = AuditEvent::builder(AuditActivityType::EmployerProfileCreated)
            .originator(UserId::new())
            .business_object(Uuid::new_v4(), AuditEventBusinessObject::Employer)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let event = AuditEvent::builder(AuditActivityType::EmployerProfileUserAdded)
            .originator(UserId::new())
            .summary("added")
            .business_object(Uuid::new_v4(), AuditEventBusinessObject::Employer)
            .build()
            .unwrap();
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["activityType"], "employer_profile_user_added");
        assert_eq!(value["businessObject"]["type"], "employer");
        assert!(value["requestContext"]["originatorId"].is_string());
    }
}
