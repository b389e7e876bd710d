//! Tagged JSON encoding of [`Resource`]s.
use crate::parameter::decode_list;
use crate::resource::{
    CertificateRequest, CertificateResponse, GenericResource, Identity, OperationOutcome,
    Parameters, Resource, ResourceType,
};
use crate::types::Meta;
use devid_http::http::{HeaderMap, StatusCode};
use devid_http::{DecodeError, Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Options of a [`Codec`].
///
/// Each codec owns its configuration, so differently configured codecs can be used
/// side by side.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CodecConfig {
    /// Name of the field that carries the resource type tag.
    pub type_field: String,
    /// Tags that differ from the [default ones](ResourceType::as_str).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<ResourceType, String>,
    /// Indent the encoded output.
    pub pretty: bool,
    /// Accept parameters carrying several value fields, keeping the first one.
    pub lenient_parameters: bool,
}

impl CodecConfig {
    pub fn with_tag(mut self, resource_type: ResourceType, tag: impl Into<String>) -> Self {
        self.tags.insert(resource_type, tag.into());
        self
    }
    /// The tag written for `resource_type`.
    pub fn tag(&self, resource_type: ResourceType) -> &str {
        self.tags.get(&resource_type).map_or(resource_type.as_str(), String::as_str)
    }
    fn resource_type(&self, tag: &str) -> Option<ResourceType> {
        ResourceType::ALL.into_iter().find(|resource_type| self.tag(*resource_type) == tag)
    }
    /// Checks that the type field does not collide with a resource field and that
    /// every resource type has its own tag.
    pub fn validate(&self) -> Result<()> {
        if self.type_field.is_empty() || RESOURCE_FIELDS.contains(&self.type_field.as_str()) {
            return Err(Error::InvalidArgument(format!(
                "type field `{}` is not usable as a tag field",
                self.type_field
            )));
        }
        for (i, resource_type) in ResourceType::ALL.into_iter().enumerate() {
            let tag = self.tag(resource_type);
            if let Some(other) =
                ResourceType::ALL[..i].iter().find(|other| self.tag(**other) == tag)
            {
                return Err(Error::InvalidArgument(format!(
                    "tag `{tag}` is used by both {other} and {resource_type}"
                )));
            }
        }
        Ok(())
    }
}

/// Field names written by any resource body.
const RESOURCE_FIELDS: &[&str] = &[
    "id",
    "meta",
    "parameter",
    "subject",
    "csr",
    "profile",
    "certificate",
    "certificateChain",
    "request",
    "identifier",
    "active",
    "device",
    "created",
    "issue",
];

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            type_field: String::from("resourceType"),
            tags: BTreeMap::new(),
            pretty: false,
            lenient_parameters: true,
        }
    }
}

/// Reads the members of a JSON object, reporting failures at `{path}.{name}`.
struct Fields<'a> {
    object: &'a Map<String, Value>,
    path: &'a str,
}

impl Fields<'_> {
    fn path(&self, name: &str) -> String {
        format!("{}.{name}", self.path)
    }
    fn optional<T>(&self, name: &str) -> core::result::Result<Option<T>, DecodeError>
    where
        T: DeserializeOwned,
    {
        match self.object.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|e| DecodeError::from_json(self.path(name), &e)),
        }
    }
    fn required<T>(&self, name: &str) -> core::result::Result<T, DecodeError>
    where
        T: DeserializeOwned,
    {
        self.optional(name)?.ok_or_else(|| DecodeError::missing_field(self.path(name), name))
    }
    fn list<T>(&self, name: &str) -> core::result::Result<Vec<T>, DecodeError>
    where
        T: DeserializeOwned,
    {
        match self.object.get(name) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    T::deserialize(item)
                        .map_err(|e| DecodeError::from_json(format!("{}[{i}]", self.path(name)), &e))
                })
                .collect(),
            Some(_) => Err(DecodeError::new(self.path(name), "expected an array")),
        }
    }
    fn meta(&self) -> core::result::Result<Option<Meta>, DecodeError> {
        let path = self.path("meta");
        match self.object.get("meta") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(object)) => {
                let fields = Fields { object, path: &path };
                Ok(Some(Meta {
                    version_id: fields.optional("versionId")?,
                    last_updated: fields.optional("lastUpdated")?,
                }))
            }
            Some(_) => Err(DecodeError::new(path, "expected an object")),
        }
    }
}

/// Encodes and decodes [`Resource`]s.
///
/// The type tag is written first, followed by `id`, `meta` and the fields of the
/// resource in a fixed order, so the output for a given resource never changes.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    /// Fails with [`Error::InvalidArgument`] when `config` does not
    /// [validate](CodecConfig::validate).
    pub fn new(config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
    pub fn encode(&self, resource: &Resource) -> Result<Vec<u8>> {
        let value = self.encode_value(resource)?;
        if self.config.pretty {
            serde_json::to_vec_pretty(&value)
        } else {
            serde_json::to_vec(&value)
        }
        .map_err(|e| Error::InvalidArgument(format!("failed to encode resource: {e}")))
    }
    pub fn encode_value(&self, resource: &Resource) -> Result<Value> {
        let body = match resource {
            Resource::Parameters(r) => serde_json::to_value(r),
            Resource::CertificateRequest(r) => serde_json::to_value(r),
            Resource::CertificateResponse(r) => serde_json::to_value(r),
            Resource::Identity(r) => serde_json::to_value(r),
            Resource::OperationOutcome(r) => serde_json::to_value(r),
            Resource::GenericResource(r) => serde_json::to_value(r),
        }
        .map_err(|e| Error::InvalidArgument(format!("failed to encode resource: {e}")))?;
        let mut object = Map::new();
        object.insert(
            self.config.type_field.clone(),
            Value::String(self.config.tag(resource.resource_type()).to_owned()),
        );
        if let Value::Object(fields) = body {
            object.extend(fields);
        }
        Ok(Value::Object(object))
    }
    pub fn decode(&self, body: &[u8]) -> core::result::Result<Resource, DecodeError> {
        let value =
            serde_json::from_slice::<Value>(body).map_err(|e| DecodeError::from_json("$", &e))?;
        self.decode_value(&value)
    }
    pub fn decode_value(&self, value: &Value) -> core::result::Result<Resource, DecodeError> {
        let object = value.as_object().ok_or_else(|| DecodeError::new("$", "expected an object"))?;
        let type_field = &self.config.type_field;
        let tag_path = format!("$.{type_field}");
        let tag = match object.get(type_field) {
            Some(Value::String(tag)) => tag,
            Some(_) => return Err(DecodeError::new(tag_path, "expected a string")),
            None => return Err(DecodeError::missing_field(tag_path, type_field)),
        };
        let resource_type = self
            .config
            .resource_type(tag)
            .ok_or_else(|| DecodeError::new(&tag_path, format!("unknown resource type `{tag}`")))?;
        let fields = Fields { object, path: "$" };
        let (id, meta) = (fields.optional("id")?, fields.meta()?);
        Ok(match resource_type {
            ResourceType::Parameters => {
                let parameter = match object.get("parameter") {
                    None | Some(Value::Null) => Vec::new(),
                    Some(parameter) => {
                        decode_list(parameter, "$.parameter", self.config.lenient_parameters)?
                    }
                };
                Resource::Parameters(Parameters { id, meta, parameter })
            }
            ResourceType::CertificateRequest => Resource::CertificateRequest(CertificateRequest {
                id,
                meta,
                subject: fields.optional("subject")?,
                csr: fields.required("csr")?,
                profile: fields.optional("profile")?,
            }),
            ResourceType::CertificateResponse => {
                Resource::CertificateResponse(CertificateResponse {
                    id,
                    meta,
                    certificate: fields.required("certificate")?,
                    certificate_chain: fields.list("certificateChain")?,
                    request: fields.optional("request")?,
                })
            }
            ResourceType::Identity => Resource::Identity(Identity {
                id,
                meta,
                identifier: fields.list("identifier")?,
                active: fields.optional("active")?,
                device: fields.optional("device")?,
                created: fields.optional("created")?,
            }),
            ResourceType::OperationOutcome => Resource::OperationOutcome(OperationOutcome {
                id,
                meta,
                issue: fields.list("issue")?,
            }),
            ResourceType::GenericResource => {
                Resource::GenericResource(GenericResource { id, meta })
            }
        })
    }
    /// A response transform that decodes the body as a [`Resource`].
    pub fn decoder(&self) -> impl Fn(StatusCode, &HeaderMap, &[u8]) -> Result<Resource> + '_ {
        move |_: StatusCode, _: &HeaderMap, body: &[u8]| self.decode(body).map_err(Error::from)
    }
}
