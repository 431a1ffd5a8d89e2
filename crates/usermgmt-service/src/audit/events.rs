//! One-shot audit events with no before/after comparison.

use serde_json::json;

use usermgmt_core::events::{AuditActivityType, AuditEvent, AuditEventBuilder};
use usermgmt_core::result::AppResult;
use usermgmt_core::types::{ProfileId, UserId};
use usermgmt_entity::link::ProfileLink;
use usermgmt_entity::profile::ProfileType;

/// A profile was created by `created_by`.
pub fn profile_created(
    profile_type: ProfileType,
    profile_id: ProfileId,
    created_by: UserId,
) -> AppResult<AuditEventBuilder> {
    let activity = match profile_type {
        ProfileType::Employer => AuditActivityType::EmployerProfileCreated,
        ProfileType::Individual => AuditActivityType::IndividualProfileCreated,
    };
    let data = serde_json::to_string(&json!({ "createdBy": created_by }))?;

    Ok(AuditEvent::builder(activity)
        .originator(created_by)
        .user(created_by)
        .summary("Profile Created.")
        .business_object(profile_id.into_uuid(), profile_type.business_object())
        .data(data))
}

/// `link` was created by `originator_id`.
pub fn user_added(link: &ProfileLink, originator_id: UserId) -> AppResult<AuditEventBuilder> {
    let activity = match link.profile_type {
        ProfileType::Employer => AuditActivityType::EmployerProfileUserAdded,
        ProfileType::Individual => AuditActivityType::IndividualProfileUserAdded,
    };
    let data = serde_json::to_string(&json!({
        "userId": link.user_id,
        "addedBy": originator_id,
        "accessLevel": link.access_level.as_str(),
    }))?;

    Ok(AuditEvent::builder(activity)
        .originator(originator_id)
        .user(originator_id)
        .summary(format!("{} Profile User Added.", title(link.profile_type)))
        .business_object(link.profile_id.into_uuid(), link.profile_type.business_object())
        .data(data))
}

/// `link` was deleted by `originator_id`.
pub fn user_removed(link: &ProfileLink, originator_id: UserId) -> AppResult<AuditEventBuilder> {
    let activity = match link.profile_type {
        ProfileType::Employer => AuditActivityType::EmployerProfileUserRemoved,
        ProfileType::Individual => AuditActivityType::IndividualProfileUserRemoved,
    };
    let data = serde_json::to_string(&json!({
        "userId": link.user_id,
        "removedBy": originator_id,
    }))?;

    Ok(AuditEvent::builder(activity)
        .originator(originator_id)
        .user(originator_id)
        .summary(format!("{} Profile User Removed.", title(link.profile_type)))
        .business_object(link.profile_id.into_uuid(), link.profile_type.business_object())
        .data(data))
}

fn title(profile_type: ProfileType) -> &'static str {
    match profile_type {
        ProfileType::Employer => "Employer",
        ProfileType::Individual => "Individual",
    }
}
