//! The resources exchanged with the server.
use crate::parameter::Parameter;
use crate::types::string::{Code, DateTime};
use crate::types::{Identifier, Meta, Reference};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every resource kind known to the client.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceType {
    Parameters,
    CertificateRequest,
    CertificateResponse,
    Identity,
    OperationOutcome,
    GenericResource,
}

impl ResourceType {
    pub const ALL: [ResourceType; 6] = [
        Self::Parameters,
        Self::CertificateRequest,
        Self::CertificateResponse,
        Self::Identity,
        Self::OperationOutcome,
        Self::GenericResource,
    ];

    /// The default tag of this kind on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parameters => "Parameters",
            Self::CertificateRequest => "CertificateRequest",
            Self::CertificateResponse => "CertificateResponse",
            Self::Identity => "Identity",
            Self::OperationOutcome => "OperationOutcome",
            Self::GenericResource => "GenericResource",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource, discriminated on the wire by its type tag.
///
/// Use [`Codec`](crate::codec::Codec) to read and write the tagged JSON form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Parameters(Parameters),
    CertificateRequest(CertificateRequest),
    CertificateResponse(CertificateResponse),
    Identity(Identity),
    OperationOutcome(OperationOutcome),
    GenericResource(GenericResource),
}

impl Resource {
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Self::Parameters(_) => ResourceType::Parameters,
            Self::CertificateRequest(_) => ResourceType::CertificateRequest,
            Self::CertificateResponse(_) => ResourceType::CertificateResponse,
            Self::Identity(_) => ResourceType::Identity,
            Self::OperationOutcome(_) => ResourceType::OperationOutcome,
            Self::GenericResource(_) => ResourceType::GenericResource,
        }
    }
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Parameters(r) => r.id.as_deref(),
            Self::CertificateRequest(r) => r.id.as_deref(),
            Self::CertificateResponse(r) => r.id.as_deref(),
            Self::Identity(r) => r.id.as_deref(),
            Self::OperationOutcome(r) => r.id.as_deref(),
            Self::GenericResource(r) => r.id.as_deref(),
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Resource {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_variant!(
    Parameters,
    CertificateRequest,
    CertificateResponse,
    Identity,
    OperationOutcome,
    GenericResource
);

/// An ordered list of [`Parameter`]s.
///
/// Decoding goes through [`Codec`](crate::codec::Codec), which reports the path of
/// malformed parameters.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameter: Vec<Parameter>,
}

impl Parameters {
    pub fn new(parameter: Vec<Parameter>) -> Self {
        Self { parameter, ..Default::default() }
    }
    /// The first parameter named `name`.
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameter.iter().find(|p| p.name == name)
    }
}

/// A request to issue a certificate for the given signing request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    /// PEM or base64 encoded PKCS#10 signing request.
    pub csr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Code>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    pub certificate: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certificate_chain: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<Reference>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime>,
}

/// Errors and warnings about the outcome of an operation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OperationOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub issue: Vec<Issue>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// `fatal`, `error`, `warning` or `information`.
    pub severity: Code,
    pub code: Code,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}

/// A resource of no specific kind; only the common elements are kept.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenericResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}
