//! Profile creation, lookup, and audited updates.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use tracing::info;

use usermgmt_auth::{AuthorizationHandler, ProfileAction, ResourceDescriptor, SecurityContext};
use usermgmt_core::error::AppError;
use usermgmt_core::result::AppResult;
use usermgmt_core::types::{PageResponse, ProfileId};
use usermgmt_database::store::{EmployerProfileStore, IndividualProfileStore, ProfileLinkStore};
use usermgmt_entity::link::NewProfileLink;
use usermgmt_entity::profile::{
    Address, EmployerProfile, IndividualProfile, ProfileAccessLevel, ProfileType,
};
use usermgmt_entity::user::UserType;

use super::filters::IndividualProfileFilters;
use crate::audit::handlers::{EmployerDataChangedHandler, IndividualDataChangedHandler};
use crate::audit::{AuditEventSink, AuditSession, events, record_best_effort};
use crate::context::RequestContext;

/// Editable fields of an individual profile. Updates replace every field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndividualProfileData {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub ssn: Option<String>,
    pub mailing_address: Option<Address>,
    pub primary_address: Option<Address>,
}

impl IndividualProfileData {
    fn apply_to(self, profile: &mut IndividualProfile) {
        profile.first_name = self.first_name;
        profile.middle_name = self.middle_name;
        profile.last_name = self.last_name;
        profile.email = self.email;
        profile.ssn = self.ssn;
        profile.mailing_address = self.mailing_address.map(Json);
        profile.primary_address = self.primary_address.map(Json);
        profile.updated_at = Utc::now();
    }
}

/// Editable fields of an employer profile. Updates replace every field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmployerProfileData {
    pub fein: Option<String>,
    pub legal_name: Option<String>,
    pub other_names: Vec<String>,
    #[serde(rename = "type")]
    pub employer_type: Option<String>,
    pub industry: Option<String>,
    pub summary_of_business: Option<String>,
    pub business_phone: Option<String>,
    pub mailing_address: Option<Address>,
    pub locations: Vec<Address>,
}

impl EmployerProfileData {
    fn validate(&self) -> AppResult<()> {
        if self.legal_name.as_deref().is_none_or(|n| n.trim().is_empty()) {
            return Err(AppError::validation("Employer legal name is required"));
        }
        Ok(())
    }

    fn apply_to(self, profile: &mut EmployerProfile) {
        profile.fein = self.fein;
        profile.legal_name = self.legal_name;
        profile.other_names = self.other_names;
        profile.employer_type = self.employer_type;
        profile.industry = self.industry;
        profile.summary_of_business = self.summary_of_business;
        profile.business_phone = self.business_phone;
        profile.mailing_address = self.mailing_address.map(Json);
        profile.locations = Json(self.locations);
        profile.updated_at = Utc::now();
    }
}

/// Manages individual and employer profiles.
#[derive(Debug, Clone)]
pub struct ProfileService {
    individuals: Arc<dyn IndividualProfileStore>,
    employers: Arc<dyn EmployerProfileStore>,
    /// Used to link public creators to their new profiles.
    links: Arc<dyn ProfileLinkStore>,
    authz: AuthorizationHandler,
    audit: Arc<dyn AuditEventSink>,
}

impl ProfileService {
    /// Creates a new profile service.
    pub fn new(
        individuals: Arc<dyn IndividualProfileStore>,
        employers: Arc<dyn EmployerProfileStore>,
        links: Arc<dyn ProfileLinkStore>,
        authz: AuthorizationHandler,
        audit: Arc<dyn AuditEventSink>,
    ) -> Self {
        Self {
            individuals,
            employers,
            links,
            authz,
            audit,
        }
    }

    /// Creates an individual profile.
    ///
    /// A public creator is linked to the new profile as administrator.
    pub async fn create_individual(
        &self,
        ctx: &RequestContext,
        data: IndividualProfileData,
    ) -> AppResult<IndividualProfile> {
        let mut profile = IndividualProfile::new(ctx.user_id);
        data.apply_to(&mut profile);
        let saved = self.individuals.insert(&profile).await?;

        self.link_creator(ctx, ProfileType::Individual, saved.id).await?;
        info!(profile_id = %saved.id, created_by = %ctx.user_id, "Individual profile created");
        record_best_effort(
            self.audit.as_ref(),
            events::profile_created(ProfileType::Individual, saved.id, ctx.user_id),
            ctx.user_id,
            ctx.trace_id.clone(),
        )
        .await;
        Ok(saved)
    }

    /// Creates an employer profile.
    ///
    /// A public creator is linked to the new profile as administrator.
    pub async fn create_employer(
        &self,
        ctx: &RequestContext,
        data: EmployerProfileData,
    ) -> AppResult<EmployerProfile> {
        data.validate()?;
        let mut profile = EmployerProfile::new(ctx.user_id);
        data.apply_to(&mut profile);
        let saved = self.employers.insert(&profile).await?;

        self.link_creator(ctx, ProfileType::Employer, saved.id).await?;
        info!(profile_id = %saved.id, created_by = %ctx.user_id, "Employer profile created");
        record_best_effort(
            self.audit.as_ref(),
            events::profile_created(ProfileType::Employer, saved.id, ctx.user_id),
            ctx.user_id,
            ctx.trace_id.clone(),
        )
        .await;
        Ok(saved)
    }

    /// Gets an individual profile by ID.
    ///
    /// Authorization runs before the lookup, so callers without access get
    /// the same error whether or not the profile exists.
    pub async fn get_individual(
        &self,
        ctx: &RequestContext,
        id: ProfileId,
    ) -> AppResult<IndividualProfile> {
        self.authz
            .require(ctx, ProfileAction::View, &ResourceDescriptor::individual(id))
            .await?;
        let profile = self.find_individual(id).await?;
        Ok(profile)
    }

    /// Gets an employer profile by ID.
    pub async fn get_employer(
        &self,
        ctx: &RequestContext,
        id: ProfileId,
    ) -> AppResult<EmployerProfile> {
        self.authz
            .require(ctx, ProfileAction::View, &ResourceDescriptor::employer(id))
            .await?;
        let profile = self.find_employer(id).await?;
        Ok(profile)
    }

    /// Replaces an individual profile's data, auditing changed fields.
    pub async fn update_individual(
        &self,
        ctx: &RequestContext,
        id: ProfileId,
        data: IndividualProfileData,
    ) -> AppResult<IndividualProfile> {
        self.authz
            .require(ctx, ProfileAction::Update, &ResourceDescriptor::individual(id))
            .await?;
        let profile = self.find_individual(id).await?;

        let store = self.individuals.clone();
        AuditSession::new(IndividualDataChangedHandler::new(), self.audit.clone())
            .with_trace_id(ctx.trace_id.clone())
            .run_audited(profile, ctx.user_id, |mut profile| async move {
                data.apply_to(&mut profile);
                store.update(&profile).await
            })
            .await
    }

    /// Replaces an employer profile's data, auditing changed fields.
    pub async fn update_employer(
        &self,
        ctx: &RequestContext,
        id: ProfileId,
        data: EmployerProfileData,
    ) -> AppResult<EmployerProfile> {
        data.validate()?;
        self.authz
            .require(ctx, ProfileAction::Update, &ResourceDescriptor::employer(id))
            .await?;
        let profile = self.find_employer(id).await?;

        let store = self.employers.clone();
        AuditSession::new(EmployerDataChangedHandler::new(), self.audit.clone())
            .with_trace_id(ctx.trace_id.clone())
            .run_audited(profile, ctx.user_id, |mut profile| async move {
                data.apply_to(&mut profile);
                store.update(&profile).await
            })
            .await
    }

    /// Searches individual profiles. Privileged callers only.
    pub async fn search_individuals(
        &self,
        ctx: &RequestContext,
        filters: &IndividualProfileFilters,
    ) -> AppResult<PageResponse<IndividualProfile>> {
        if !ctx.is_privileged() {
            return Err(AppError::authorization(
                "Searching individual profiles requires a privileged caller",
            ));
        }
        self.individuals
            .search(&filters.predicates(), &filters.page)
            .await
    }

    async fn find_individual(&self, id: ProfileId) -> AppResult<IndividualProfile> {
        self.individuals
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::missing("Individual profile", id))
    }

    async fn find_employer(&self, id: ProfileId) -> AppResult<EmployerProfile> {
        self.employers
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::missing("Employer profile", id))
    }

    async fn link_creator(
        &self,
        ctx: &RequestContext,
        profile_type: ProfileType,
        profile_id: ProfileId,
    ) -> AppResult<()> {
        if ctx.user_type != UserType::Public {
            return Ok(());
        }
        let link = NewProfileLink {
            profile_id,
            user_id: ctx.user_id,
            profile_type,
            access_level: ProfileAccessLevel::Admin,
            created_by: ctx.user_id,
        }
        .into_link();
        self.links.insert(&link).await?;
        Ok(())
    }
}
