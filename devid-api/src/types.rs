//! Value types shared by resources and parameters.
pub mod string;

use self::string::{DateTime, Uri};
use serde::{Deserialize, Serialize};

/// Resource metadata maintained by the server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime>,
}

/// A link to another resource.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Literal reference, relative or absolute, e.g. `Device/42`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Text alternative for the resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Reference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self { reference: Some(reference.into()), display: None }
    }
}

/// A value that is unique within the namespace given by `system`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<Uri>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Identifier {
    pub fn new(system: Uri, value: impl Into<String>) -> Self {
        Self { system: Some(system), value: Some(value.into()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_str, json, to_value};

    #[test]
    fn omits_absent_fields() {
        assert_eq!(to_value(Meta::default()).expect("serialize"), json!({}));
        assert_eq!(
            to_value(Reference::new("Device/42")).expect("serialize"),
            json!({"reference": "Device/42"})
        );
    }

    #[test]
    fn identifier() {
        let identifier = from_str::<Identifier>(
            r#"{"system":"urn:ietf:rfc:3986","value":"urn:uuid:1234","extension":[]}"#,
        )
        .expect("unknown fields should be ignored");
        assert_eq!(
            identifier,
            Identifier::new("urn:ietf:rfc:3986".parse().expect("valid uri"), "urn:uuid:1234")
        );
        assert!(from_str::<Identifier>(r#"{"system":"not a uri"}"#).is_err());
    }
}
