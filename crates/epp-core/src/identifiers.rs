//! External identifiers on authors and references

use serde::{Deserialize, Serialize};

/// identifiers.org registry URL marking a `PropertyValue` as an ORCID.
pub const ORCID_PROPERTY_ID: &str = "https://registry.identifiers.org/registry/orcid";

pub const ORCID_TYPE: &str = "orcid";

/// A recognised identifier attached to an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl Identifier {
    pub fn orcid(value: impl Into<String>) -> Self {
        Self {
            kind: ORCID_TYPE.to_string(),
            value: value.into(),
        }
    }

    pub fn is_orcid(&self) -> bool {
        self.kind == ORCID_TYPE
    }
}

/// A raw `PropertyValue` identifier as produced by document conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "propertyID", skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    pub value: String,
}

impl RegistryIdentifier {
    pub fn is_orcid(&self) -> bool {
        self.property_id.as_deref() == Some(ORCID_PROPERTY_ID)
    }
}

/// Keep only ORCID registry identifiers, as trimmed `orcid` identifiers.
pub fn orcid_identifiers(raw: &[RegistryIdentifier]) -> Vec<Identifier> {
    raw.iter()
        .filter(|identifier| identifier.is_orcid())
        .map(|identifier| Identifier::orcid(identifier.value.trim()))
        .collect()
}
