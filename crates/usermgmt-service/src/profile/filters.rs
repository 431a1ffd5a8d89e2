//! Individual profile search criteria.

use serde::{Deserialize, Serialize};

use usermgmt_core::types::{FilterField, PageRequest, Predicate, PredicateSet};

/// Criteria for searching individual profiles.
///
/// Criteria are alternatives: a profile matches when any given criterion
/// matches exactly. A name matches the first, middle, or last name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndividualProfileFilters {
    pub ssn: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub page: PageRequest,
}

impl IndividualProfileFilters {
    /// Build the predicate set. No criteria means no constraint.
    pub fn predicates(&self) -> PredicateSet {
        let mut any = Vec::new();
        if let Some(name) = non_blank(&self.name) {
            for field in ["first_name", "middle_name", "last_name"] {
                any.push(FilterField::eq(field, name));
            }
        }
        if let Some(ssn) = non_blank(&self.ssn) {
            any.push(FilterField::eq("ssn", ssn));
        }
        if let Some(email) = non_blank(&self.email) {
            any.push(FilterField::eq("email", email));
        }

        if any.is_empty() {
            PredicateSet::new()
        } else {
            PredicateSet::new().and(Predicate::AnyOf(any))
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
