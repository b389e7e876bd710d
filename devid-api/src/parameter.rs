//! Named, typed values: the flat records carried by a `Parameters` resource.
use crate::types::string::{Code, DateTime, Uri};
use crate::types::{Identifier, Reference};
use devid_http::DecodeError;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

/// A single named value. `value` is `None` for a parameter that carries nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub value: Option<ParameterValue>,
}

/// The value of a [`Parameter`]. Exactly one kind per parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterValue {
    String(String),
    Boolean(bool),
    Integer(i32),
    Decimal(i64),
    Code(Code),
    Uri(Uri),
    DateTime(DateTime),
    Reference(Reference),
    Identifier(Identifier),
    Part(Vec<Parameter>),
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        Self { name: name.into(), value: Some(value.into()) }
    }
    /// A parameter that groups `parts` under `name`.
    pub fn part(name: impl Into<String>, parts: Vec<Parameter>) -> Self {
        Self { name: name.into(), value: Some(ParameterValue::Part(parts)) }
    }
    /// A parameter with a name only.
    pub fn empty(name: impl Into<String>) -> Self {
        Self { name: name.into(), value: None }
    }
    /// Decodes a parameter object found at `path`.
    ///
    /// Parameters with several value fields are accepted when `lenient` is set: the first
    /// one in document order is kept and the others are skipped without validation.
    pub fn decode_at(value: &Value, path: &str, lenient: bool) -> Result<Self, DecodeError> {
        let object = value.as_object().ok_or_else(|| DecodeError::new(path, "expected an object"))?;
        let name = match object.get("name") {
            Some(Value::String(name)) => name.clone(),
            Some(_) => return Err(DecodeError::new(format!("{path}.name"), "expected a string")),
            None => return Err(DecodeError::missing_field(path, "name")),
        };
        let mut decoded: Option<(&str, ParameterValue)> = None;
        for (key, value) in object {
            if value.is_null() || !ParameterValue::FIELDS.contains(&key.as_str()) {
                continue;
            }
            let field_path = format!("{path}.{key}");
            if let Some((first, _)) = &decoded {
                if !lenient {
                    return Err(DecodeError::new(
                        field_path,
                        format!("more than one value field, `{first}` already present"),
                    ));
                }
                debug!(path = %field_path, kept = %first, "ignoring additional parameter value");
                continue;
            }
            let value = ParameterValue::decode_field(key, value, &field_path, lenient)?;
            decoded = Some((key.as_str(), value));
        }
        Ok(Self { name, value: decoded.map(|(_, value)| value) })
    }
}

/// Decodes a JSON array of parameters found at `path`.
pub fn decode_list(value: &Value, path: &str, lenient: bool) -> Result<Vec<Parameter>, DecodeError> {
    let items = value.as_array().ok_or_else(|| DecodeError::new(path, "expected an array"))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| Parameter::decode_at(item, &format!("{path}[{i}]"), lenient))
        .collect()
}

impl ParameterValue {
    /// Wire field names of every value kind.
    pub const FIELDS: [&'static str; 10] = [
        "valueString",
        "valueBoolean",
        "valueInteger",
        "valueDecimal",
        "valueCode",
        "valueUri",
        "valueDateTime",
        "valueReference",
        "valueIdentifier",
        "part",
    ];

    /// The wire field name of this value.
    pub fn field(&self) -> &'static str {
        match self {
            Self::String(_) => "valueString",
            Self::Boolean(_) => "valueBoolean",
            Self::Integer(_) => "valueInteger",
            Self::Decimal(_) => "valueDecimal",
            Self::Code(_) => "valueCode",
            Self::Uri(_) => "valueUri",
            Self::DateTime(_) => "valueDateTime",
            Self::Reference(_) => "valueReference",
            Self::Identifier(_) => "valueIdentifier",
            Self::Part(_) => "part",
        }
    }
    fn decode_field(
        field: &str,
        value: &Value,
        path: &str,
        lenient: bool,
    ) -> Result<Self, DecodeError> {
        let string = || value.as_str().ok_or_else(|| DecodeError::new(path, "expected a string"));
        let constrained = |e: &str| DecodeError::new(path, e);
        let json = |e: serde_json::Error| DecodeError::from_json(path, &e);
        Ok(match field {
            "valueString" => Self::String(string()?.to_owned()),
            "valueBoolean" => Self::Boolean(
                value.as_bool().ok_or_else(|| DecodeError::new(path, "expected a boolean"))?,
            ),
            "valueInteger" => Self::Integer(
                value
                    .as_i64()
                    .and_then(|n| i32::try_from(n).ok())
                    .ok_or_else(|| DecodeError::new(path, "expected a 32-bit integer"))?,
            ),
            "valueDecimal" => Self::Decimal(
                value.as_i64().ok_or_else(|| DecodeError::new(path, "expected a 64-bit integer"))?,
            ),
            "valueCode" => Self::Code(Code::new(string()?.to_owned()).map_err(constrained)?),
            "valueUri" => Self::Uri(Uri::new(string()?.to_owned()).map_err(constrained)?),
            "valueDateTime" => {
                Self::DateTime(DateTime::new(string()?.to_owned()).map_err(constrained)?)
            }
            "valueReference" => Self::Reference(Reference::deserialize(value).map_err(json)?),
            "valueIdentifier" => Self::Identifier(Identifier::deserialize(value).map_err(json)?),
            "part" => Self::Part(decode_list(value, path, lenient)?),
            _ => return Err(DecodeError::new(path, "unknown value field")),
        })
    }
}

impl Serialize for Parameter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &self.name)?;
        if let Some(value) = &self.value {
            let field = value.field();
            match value {
                ParameterValue::String(v) => map.serialize_entry(field, v)?,
                ParameterValue::Boolean(v) => map.serialize_entry(field, v)?,
                ParameterValue::Integer(v) => map.serialize_entry(field, v)?,
                ParameterValue::Decimal(v) => map.serialize_entry(field, v)?,
                ParameterValue::Code(v) => map.serialize_entry(field, v)?,
                ParameterValue::Uri(v) => map.serialize_entry(field, v)?,
                ParameterValue::DateTime(v) => map.serialize_entry(field, v)?,
                ParameterValue::Reference(v) => map.serialize_entry(field, v)?,
                ParameterValue::Identifier(v) => map.serialize_entry(field, v)?,
                ParameterValue::Part(v) => map.serialize_entry(field, v)?,
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Parameter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::decode_at(&value, "$", true).map_err(D::Error::custom)
    }
}

/// A Rust type that corresponds to one [`ParameterValue`] kind.
pub trait ValueKind: Sized {
    /// Wire field name of the kind.
    const FIELD: &'static str;

    fn from_value(value: &ParameterValue) -> Option<Self>;
    fn into_value(self) -> ParameterValue;
}

macro_rules! value_kind {
    ($($variant:ident($ty:ty) => $field:literal),* $(,)?) => {
        $(
            impl ValueKind for $ty {
                const FIELD: &'static str = $field;

                fn from_value(value: &ParameterValue) -> Option<Self> {
                    match value {
                        ParameterValue::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
                fn into_value(self) -> ParameterValue {
                    ParameterValue::$variant(self)
                }
            }

            impl From<$ty> for ParameterValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

value_kind!(
    String(String) => "valueString",
    Boolean(bool) => "valueBoolean",
    Integer(i32) => "valueInteger",
    Decimal(i64) => "valueDecimal",
    Code(Code) => "valueCode",
    Uri(Uri) => "valueUri",
    DateTime(DateTime) => "valueDateTime",
    Reference(Reference) => "valueReference",
    Identifier(Identifier) => "valueIdentifier",
);

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<Vec<Parameter>> for ParameterValue {
    fn from(value: Vec<Parameter>) -> Self {
        Self::Part(value)
    }
}
