//! Test fixtures shared by this crate and downstream operation tests.

use crate::entities::{ItemPayload, LinkAttributes};
use crate::secret::SecretString;
use crate::traits::{Credentials, StoreConfig};

/// Creates a store config with test defaults.
pub fn test_store_config(base_url: &str) -> StoreConfig {
    StoreConfig::new("test-store", base_url)
}

/// Creates throwaway credentials.
pub fn test_credentials() -> Credentials {
    Credentials {
        org: "acme".to_string(),
        email: "integration@acme.example".to_string(),
        password: SecretString::from("not-a-real-password"),
    }
}

/// Creates an item payload with an optional federated id.
pub fn sample_item_payload(name: &str, federated_id: Option<&str>) -> ItemPayload {
    ItemPayload {
        name: name.to_string(),
        federated_id: federated_id.map(String::from),
        ..ItemPayload::default()
    }
}

/// Creates a small attribute map for join-record updates.
pub fn sample_link_attrs() -> LinkAttributes {
    let mut attrs = LinkAttributes::new();
    attrs.insert("carryover".to_string(), serde_json::json!(true));
    attrs.insert("retailPrice".to_string(), serde_json::json!(29.99));
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_item_payload() {
        let payload = sample_item_payload("Crew Tee", Some("erp:1"));
        assert_eq!(payload.name, "Crew Tee");
        assert_eq!(payload.federated_id.as_deref(), Some("erp:1"));
        assert!(payload.role.is_none());
    }

    #[test]
    fn test_sample_link_attrs() {
        let attrs = sample_link_attrs();
        assert_eq!(attrs["carryover"], serde_json::json!(true));
    }
}
