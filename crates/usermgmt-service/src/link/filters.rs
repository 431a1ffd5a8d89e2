//! Row-level filtering of profile link listings.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use usermgmt_auth::context::SecurityContext;
use usermgmt_core::result::AppResult;
use usermgmt_core::types::{
    FilterField, PageRequest, Predicate, PredicateSet, ProfileId, SortField, UserId,
};
use usermgmt_database::store::IdentityLookup;
use usermgmt_entity::profile::ProfileAccessLevel;

/// Criteria for listing profile links.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileLinkFilters {
    pub profile_id: Option<ProfileId>,
    pub user_id: Option<UserId>,
    /// Restrict to these users. An empty list matches nothing.
    pub user_ids: Option<Vec<UserId>>,
    /// Case-insensitive substring of the linked user's name.
    pub name: Option<String>,
    /// Case-insensitive substring of the linked user's email.
    pub email: Option<String>,
    pub page: PageRequest,
    pub sort: Option<SortField>,
}

impl ProfileLinkFilters {
    fn name_text(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    fn email_text(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// Translates [`ProfileLinkFilters`] into a conjunctive predicate set.
#[derive(Debug, Clone)]
pub struct LinkFilterBuilder {
    identities: Arc<dyn IdentityLookup>,
}

impl LinkFilterBuilder {
    pub fn new(identities: Arc<dyn IdentityLookup>) -> Self {
        Self { identities }
    }

    /// Build the predicates for `filters` as seen by `caller`.
    ///
    /// Unprivileged callers never see restricted-tier links. Name and email
    /// search resolve to the union of matching identities; when nobody
    /// matches the set is unsatisfiable.
    pub async fn build(
        &self,
        filters: &ProfileLinkFilters,
        caller: &dyn SecurityContext,
    ) -> AppResult<PredicateSet> {
        let mut predicates = PredicateSet::new();

        if let Some(profile_id) = filters.profile_id {
            predicates.push(FilterField::eq("profile_id", profile_id.into_uuid()));
        }
        if let Some(user_id) = filters.user_id {
            predicates.push(FilterField::eq("user_id", user_id.into_uuid()));
        }
        if let Some(user_ids) = &filters.user_ids {
            predicates.push(FilterField::in_ids(
                "user_id",
                user_ids.iter().map(|id| id.into_uuid()).collect(),
            ));
        }
        if let Some(identity) = self.identity_predicate(filters).await? {
            predicates.push(identity);
        }
        if !caller.is_privileged() {
            predicates.push(FilterField::ne(
                "access_level",
                ProfileAccessLevel::AgencyReadonly.as_str(),
            ));
        }

        debug!(
            conjuncts = predicates.len(),
            unsatisfiable = predicates.is_unsatisfiable(),
            "Built profile link filters"
        );
        Ok(predicates)
    }

    async fn identity_predicate(&self, filters: &ProfileLinkFilters) -> AppResult<Option<Predicate>> {
        let name = filters.name_text();
        let email = filters.email_text();
        if name.is_none() && email.is_none() {
            return Ok(None);
        }

        let mut ids = Vec::new();
        if let Some(name) = name {
            ids.extend(self.identities.find_ids_by_name_containing(name).await?);
        }
        if let Some(email) = email {
            ids.extend(self.identities.find_ids_by_email_containing(email).await?);
        }
        ids.sort_by_key(|id| id.into_uuid());
        ids.dedup();

        if ids.is_empty() {
            return Ok(Some(Predicate::Never));
        }
        Ok(Some(Predicate::Field(FilterField::in_ids(
            "user_id",
            ids.into_iter().map(UserId::into_uuid).collect(),
        ))))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use usermgmt_auth::context::Caller;
    use usermgmt_core::types::FilterOp;
    use usermgmt_database::memory::MemoryIdentityLookup;
    use usermgmt_entity::user::{UserEntity, UserType};

    async fn builder_with(users: &[(&str, &str, &str)]) -> (LinkFilterBuilder, Vec<UserId>) {
        let lookup = Arc::new(MemoryIdentityLookup::new());
        let mut ids = Vec::new();
        for (first, last, email) in users {
            let now = Utc::now();
            let user = UserEntity {
                id: UserId::new(),
                first_name: Some(first.to_string()),
                last_name: Some(last.to_string()),
                email: Some(email.to_string()),
                user_type: UserType::Public,
                created_at: now,
                updated_at: now,
            };
            ids.push(user.id);
            lookup.upsert(user).await;
        }
        (LinkFilterBuilder::new(lookup), ids)
    }

    fn public() -> Caller {
        Caller::authenticated(UserId::new(), UserType::Public)
    }

    fn agency() -> Caller {
        Caller::authenticated(UserId::new(), UserType::Agency)
    }

    fn redaction() -> Predicate {
        Predicate::Field(FilterField::ne("access_level", "AGENCY_READONLY"))
    }

    #[tokio::test]
    async fn test_no_filters_public_caller_gets_only_redaction() {
        let (builder, _) = builder_with(&[]).await;
        let set = builder.build(&ProfileLinkFilters::default(), &public()).await.unwrap();
        assert_eq!(set.predicates(), &[redaction()]);
    }

    #[tokio::test]
    async fn test_no_filters_privileged_caller_is_unconstrained() {
        let (builder, _) = builder_with(&[]).await;
        let set = builder.build(&ProfileLinkFilters::default(), &agency()).await.unwrap();
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_caller_class_is_redacted() {
        let (builder, _) = builder_with(&[]).await;
        let set = builder
            .build(&ProfileLinkFilters::default(), &Caller::anonymous())
            .await
            .unwrap();
        assert_eq!(set.predicates(), &[redaction()]);
    }

    #[tokio::test]
    async fn test_name_without_matches_is_unsatisfiable() {
        let (builder, _) = builder_with(&[("Ada", "Lovelace", "ada@example.com")]).await;
        let filters = ProfileLinkFilters {
            name: Some("zzz".into()),
            ..Default::default()
        };
        let set = builder.build(&filters, &agency()).await.unwrap();
        assert!(set.is_unsatisfiable());
        assert_eq!(set.predicates(), &[Predicate::Never]);
    }

    #[tokio::test]
    async fn test_name_and_email_are_unioned() {
        let (builder, ids) = builder_with(&[
            ("Ada", "Lovelace", "ada@example.com"),
            ("Grace", "Hopper", "grace@navy.mil"),
            ("Alan", "Turing", "alan@example.com"),
        ])
        .await;
        let filters = ProfileLinkFilters {
            name: Some("lovelace".into()),
            email: Some("navy".into()),
            ..Default::default()
        };
        let set = builder.build(&filters, &agency()).await.unwrap();

        let [Predicate::Field(field)] = set.predicates() else {
            panic!("expected a single identity predicate");
        };
        assert_eq!(field.op, FilterOp::In);
        let mut expected: Vec<_> = ids[..2].iter().map(|id| id.into_uuid()).collect();
        expected.sort();
        assert_eq!(field.value, usermgmt_core::types::FilterValue::UuidList(expected));
    }

    #[tokio::test]
    async fn test_filters_conjoin_in_order() {
        let (builder, _) = builder_with(&[]).await;
        let profile_id = ProfileId::new();
        let user_id = UserId::new();
        let filters = ProfileLinkFilters {
            profile_id: Some(profile_id),
            user_id: Some(user_id),
            ..Default::default()
        };
        let set = builder.build(&filters, &public()).await.unwrap();

        assert_eq!(
            set.predicates(),
            &[
                Predicate::Field(FilterField::eq("profile_id", profile_id.into_uuid())),
                Predicate::Field(FilterField::eq("user_id", user_id.into_uuid())),
                redaction(),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_user_id_list_matches_nothing() {
        let (builder, _) = builder_with(&[]).await;
        let filters = ProfileLinkFilters {
            user_ids: Some(Vec::new()),
            ..Default::default()
        };
        let set = builder.build(&filters, &agency()).await.unwrap();
        assert_eq!(
            set.predicates(),
            &[Predicate::Field(FilterField::in_ids("user_id", Vec::new()))]
        );
    }

    #[tokio::test]
    async fn test_blank_text_is_ignored() {
        let (builder, _) = builder_with(&[]).await;
        let filters = ProfileLinkFilters {
            name: Some("   ".into()),
            ..Default::default()
        };
        let set = builder.build(&filters, &agency()).await.unwrap();
        assert!(set.is_empty());
    }
}
