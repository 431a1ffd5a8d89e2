//! Profile data change auditing.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use uuid::Uuid;

use usermgmt_core::events::{AuditActivityType, AuditEvent, AuditEventBuilder};
use usermgmt_core::result::AppResult;
use usermgmt_core::types::{ProfileId, UserId};
use usermgmt_entity::profile::{EmployerProfile, IndividualProfile, ProfileType};

use crate::audit::diff::remove_common_items;
use crate::audit::handler::AuditHandler;

/// A profile whose data fields are audited.
pub trait AuditedProfile: Send + Sync {
    const PROFILE_TYPE: ProfileType;
    const DATA_CHANGED: AuditActivityType;

    fn profile_id(&self) -> ProfileId;

    /// Flatten the audited fields into `key -> value` pairs. Unset fields
    /// are omitted.
    fn audit_fields(&self) -> BTreeMap<String, String>;
}

impl AuditedProfile for IndividualProfile {
    const PROFILE_TYPE: ProfileType = ProfileType::Individual;
    const DATA_CHANGED: AuditActivityType = AuditActivityType::IndividualProfileDataChanged;

    fn profile_id(&self) -> ProfileId {
        self.id
    }

    fn audit_fields(&self) -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();
        if let Some(ssn) = &self.ssn {
            fields.insert("ssn".to_string(), ssn.clone());
        }
        if let Some(address) = self.mailing_address() {
            address.flatten_into("mailingAddress", &mut fields);
        }
        if let Some(address) = self.primary_address() {
            address.flatten_into("primaryAddress", &mut fields);
        }
        fields
    }
}

impl AuditedProfile for EmployerProfile {
    const PROFILE_TYPE: ProfileType = ProfileType::Employer;
    const DATA_CHANGED: AuditActivityType = AuditActivityType::EmployerProfileDataChanged;

    fn profile_id(&self) -> ProfileId {
        self.id
    }

    fn audit_fields(&self) -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();
        let scalars = [
            ("fein", &self.fein),
            ("legalName", &self.legal_name),
            ("type", &self.employer_type),
            ("industry", &self.industry),
            ("summaryOfBusiness", &self.summary_of_business),
            ("businessPhone", &self.business_phone),
        ];
        for (key, value) in scalars {
            if let Some(value) = value {
                fields.insert(key.to_string(), value.clone());
            }
        }
        if !self.other_names.is_empty() {
            fields.insert("otherNames".to_string(), self.other_names.join(", "));
        }
        if let Some(address) = self.mailing_address() {
            address.flatten_into("mailingAddress", &mut fields);
        }
        for (i, location) in self.locations().iter().enumerate() {
            location.flatten_into(&format!("locations[{i}]"), &mut fields);
        }
        fields
    }
}

/// Pre-update capture: identifying id plus the audited fields.
#[derive(Debug, Clone)]
pub struct DataSnapshot {
    pub profile_id: ProfileId,
    pub fields: BTreeMap<String, String>,
}

/// Reports which audited fields of a profile changed.
///
/// Before/after hold only the changed keys. Nothing is published when the
/// two captures agree.
#[derive(Debug)]
pub struct ProfileDataChangedHandler<P> {
    _profile: PhantomData<fn() -> P>,
}

pub type IndividualDataChangedHandler = ProfileDataChangedHandler<IndividualProfile>;
pub type EmployerDataChangedHandler = ProfileDataChangedHandler<EmployerProfile>;

impl<P> ProfileDataChangedHandler<P> {
    pub fn new() -> Self {
        Self {
            _profile: PhantomData,
        }
    }
}

impl<P> Default for ProfileDataChangedHandler<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: AuditedProfile> AuditHandler for ProfileDataChangedHandler<P> {
    type Subject = P;
    type PreState = DataSnapshot;
    type PostState = BTreeMap<String, String>;

    fn describe(&self) -> &'static str {
        match P::PROFILE_TYPE {
            ProfileType::Individual => "individual profile data change",
            ProfileType::Employer => "employer profile data change",
        }
    }

    fn capture_pre(&self, subject: &P) -> DataSnapshot {
        DataSnapshot {
            profile_id: subject.profile_id(),
            fields: subject.audit_fields(),
        }
    }

    fn capture_post(&self, subject: &P) -> BTreeMap<String, String> {
        subject.audit_fields()
    }

    fn subject_id(&self, pre: &DataSnapshot) -> Uuid {
        pre.profile_id.into_uuid()
    }

    fn build_event(
        &self,
        pre: DataSnapshot,
        mut after: BTreeMap<String, String>,
        originator_id: UserId,
    ) -> AppResult<Option<AuditEventBuilder>> {
        let DataSnapshot {
            profile_id,
            fields: mut before,
        } = pre;
        remove_common_items(&mut before, &mut after);
        if before.is_empty() && after.is_empty() {
            return Ok(None);
        }

        let builder = AuditEvent::builder(P::DATA_CHANGED)
            .originator(originator_id)
            .user(originator_id)
            .summary(format!(
                "Data for {} profile {} changed.",
                P::PROFILE_TYPE.label(),
                profile_id
            ))
            .business_object(profile_id.into_uuid(), P::PROFILE_TYPE.business_object())
            .old_state(before)
            .new_state(after);
        Ok(Some(builder))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sqlx::types::Json;

    use super::*;
    use crate::audit::handler::{AuditOutcome, AuditSession};
    use crate::audit::testing::{FailingSink, RecordingSink};
    use usermgmt_core::events::AuditEventBusinessObject;
    use usermgmt_entity::profile::Address;

    fn address(city: &str) -> Address {
        Address {
            address1: Some("1 Main St".into()),
            city: Some(city.into()),
            state: Some("TX".into()),
            postal_code: Some("73301".into()),
            ..Default::default()
        }
    }

    fn individual() -> IndividualProfile {
        let mut profile = IndividualProfile::new(UserId::new());
        profile.ssn = Some("123-45-6789".into());
        profile.mailing_address = Some(Json(address("Austin")));
        profile.primary_address = Some(Json(address("Dallas")));
        profile
    }

    fn employer() -> EmployerProfile {
        let mut profile = EmployerProfile::new(UserId::new());
        profile.fein = Some("fein".into());
        profile.legal_name = Some("legalName".into());
        profile.employer_type = Some("LLC".into());
        profile.industry = Some("industry".into());
        profile.business_phone = Some("businessPhone".into());
        profile.summary_of_business = Some("summaryOfBusiness".into());
        profile.mailing_address = Some(Json(address("Austin")));
        profile.locations = Json(vec![address("Austin")]);
        profile
    }

    #[tokio::test]
    async fn test_unchanged_individual_publishes_nothing() {
        let sink = Arc::new(RecordingSink::default());
        let mut profile = individual();

        let pre = AuditSession::new(IndividualDataChangedHandler::new(), sink.clone())
            .handle_pre_update_state(&profile);
        profile.first_name = Some("not audited".into());
        let outcome = pre
            .handle_post_update_state(&profile)
            .publish_audit_event(UserId::new())
            .await;

        assert_eq!(outcome, AuditOutcome::NoChange);
        assert!(sink.recorded().await.is_empty());
    }

    #[tokio::test]
    async fn test_single_field_change_yields_single_key_states() {
        let sink = Arc::new(RecordingSink::default());
        let mut profile = individual();
        let originator = UserId::new();

        let pre = AuditSession::new(IndividualDataChangedHandler::new(), sink.clone())
            .handle_pre_update_state(&profile);
        profile.ssn = Some("987-65-4321".into());
        let outcome = pre
            .handle_post_update_state(&profile)
            .publish_audit_event(originator)
            .await;

        let event = outcome.event().expect("event published").clone();
        assert_eq!(event.old_state.len(), 1);
        assert_eq!(event.new_state.len(), 1);
        assert_eq!(event.old_state["ssn"], "123-45-6789");
        assert_eq!(event.new_state["ssn"], "987-65-4321");
        assert_eq!(
            event.summary,
            format!("Data for individual profile {} changed.", profile.id)
        );
        assert_eq!(event.business_object.id, profile.id.into_uuid());
        assert_eq!(
            event.business_object.object_type,
            AuditEventBusinessObject::Individual
        );
        assert_eq!(event.activity_type, AuditActivityType::IndividualProfileDataChanged);
        assert_eq!(event.request_context.originator_id, originator);
        assert_eq!(event.data, None);
        assert_eq!(sink.recorded().await, vec![event]);
    }

    #[tokio::test]
    async fn test_address_change_reports_prefixed_keys() {
        let sink = Arc::new(RecordingSink::default());
        let mut profile = individual();

        let pre = AuditSession::new(IndividualDataChangedHandler::new(), sink.clone())
            .handle_pre_update_state(&profile);
        profile.primary_address = Some(Json(address("Houston")));
        let outcome = pre
            .handle_post_update_state(&profile)
            .publish_audit_event(UserId::new())
            .await;

        let event = outcome.event().unwrap();
        assert_eq!(
            event.old_state.keys().collect::<Vec<_>>(),
            vec!["primaryAddress.city"]
        );
        assert_eq!(event.new_state["primaryAddress.city"], "Houston");
    }

    #[tokio::test]
    async fn test_employer_legal_name_change() {
        let sink = Arc::new(RecordingSink::default());
        let mut profile = employer();

        let pre = AuditSession::new(EmployerDataChangedHandler::new(), sink.clone())
            .handle_pre_update_state(&profile);
        profile.legal_name = Some("New Name".into());
        let outcome = pre
            .handle_post_update_state(&profile)
            .publish_audit_event(UserId::new())
            .await;

        let event = outcome.event().unwrap();
        assert_eq!(event.old_state["legalName"], "legalName");
        assert_eq!(event.new_state["legalName"], "New Name");
        assert_eq!(event.old_state.len(), 1);
        assert_eq!(
            event.summary,
            format!("Data for employer profile {} changed.", profile.id)
        );
        assert_eq!(event.business_object.object_type, AuditEventBusinessObject::Employer);
        assert_eq!(event.activity_type, AuditActivityType::EmployerProfileDataChanged);
    }

    #[tokio::test]
    async fn test_employer_added_location_appears_only_after() {
        let sink = Arc::new(RecordingSink::default());
        let mut profile = employer();

        let pre = AuditSession::new(EmployerDataChangedHandler::new(), sink.clone())
            .handle_pre_update_state(&profile);
        profile.locations.0.push(address("El Paso"));
        let outcome = pre
            .handle_post_update_state(&profile)
            .publish_audit_event(UserId::new())
            .await;

        let event = outcome.event().unwrap();
        assert!(event.old_state.is_empty());
        assert_eq!(event.new_state["locations[1].city"], "El Paso");
    }

    #[tokio::test]
    async fn test_unchanged_employer_publishes_nothing() {
        let sink = Arc::new(RecordingSink::default());
        let profile = employer();

        let outcome = AuditSession::new(EmployerDataChangedHandler::new(), sink.clone())
            .handle_pre_update_state(&profile)
            .handle_post_update_state(&profile)
            .publish_audit_event(UserId::new())
            .await;

        assert_eq!(outcome, AuditOutcome::NoChange);
        assert!(sink.recorded().await.is_empty());
    }

    #[tokio::test]
    async fn test_sink_failure_is_swallowed() {
        let mut profile = individual();

        let pre = AuditSession::new(IndividualDataChangedHandler::new(), Arc::new(FailingSink))
            .handle_pre_update_state(&profile);
        profile.ssn = None;
        let outcome = pre
            .handle_post_update_state(&profile)
            .publish_audit_event(UserId::new())
            .await;

        assert_eq!(outcome, AuditOutcome::Failed);
    }

    #[test]
    fn test_other_names_are_joined() {
        let mut profile = employer();
        profile.other_names = vec!["Acme".into(), "Acme Holdings".into()];
        assert_eq!(profile.audit_fields()["otherNames"], "Acme, Acme Holdings");
    }
}
