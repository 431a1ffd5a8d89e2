//! Postal address value object.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A postal address, stored as JSONB on its owning profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub county: Option<String>,
}

impl Address {
    /// Flatten into `"{prefix}.{field}"` entries, skipping empty fields.
    pub fn flatten_into(&self, prefix: &str, out: &mut BTreeMap<String, String>) {
        let fields = [
            ("address1", &self.address1),
            ("address2", &self.address2),
            ("city", &self.city),
            ("state", &self.state),
            ("postalCode", &self.postal_code),
            ("country", &self.country),
            ("county", &self.county),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                out.insert(format!("{prefix}.{name}"), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_prefixes_and_skips_empty() {
        let address = Address {
            address1: Some("1 Main St".into()),
            city: Some("Springfield".into()),
            postal_code: Some("12345".into()),
            ..Default::default()
        };
        let mut out = BTreeMap::new();
        address.flatten_into("mailingAddress", &mut out);

        assert_eq!(out.len(), 3);
        assert_eq!(out["mailingAddress.address1"], "1 Main St");
        assert_eq!(out["mailingAddress.postalCode"], "12345");
        assert!(!out.contains_key("mailingAddress.address2"));
    }
}
