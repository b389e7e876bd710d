//! Conversion between typed entities and flat [`Parameter`] lists.
//!
//! An entity becomes one parameter per present field, with nested entities written as
//! a parameter whose `part` holds their own parameters. Parameters whose names the
//! entity does not know are kept in its `additional_attributes` and written back last.
use crate::parameter::{Parameter, ParameterValue, ValueKind};
use crate::resource::Parameters;
use devid_http::DecodeError;

/// A typed entity that can be flattened into parameters and rebuilt from them.
pub trait ParameterEntity: Sized {
    fn to_wire(&self) -> Vec<Parameter>;
    /// Rebuilds the entity from `parameters`, reporting errors below `path`.
    fn from_wire_at(parameters: &[Parameter], path: &str) -> Result<Self, DecodeError>;
}

pub fn to_wire<E: ParameterEntity>(entity: &E) -> Vec<Parameter> {
    entity.to_wire()
}

pub fn to_entity<E: ParameterEntity>(parameters: &[Parameter]) -> Result<E, DecodeError> {
    E::from_wire_at(parameters, "$.parameter")
}

impl Parameters {
    pub fn from_entity<E: ParameterEntity>(entity: &E) -> Self {
        Self::new(entity.to_wire())
    }
    pub fn to_entity<E: ParameterEntity>(&self) -> Result<E, DecodeError> {
        to_entity(&self.parameter)
    }
}

/// Writes the fields of an entity in order.
#[derive(Debug, Default)]
pub struct ParameterWriter {
    parameters: Vec<Parameter>,
}

impl ParameterWriter {
    pub fn new() -> Self {
        Self::default()
    }
    /// Writes `value` under `name` if present.
    pub fn field<T: ValueKind>(mut self, name: &str, value: Option<T>) -> Self {
        if let Some(value) = value {
            self.parameters.push(Parameter::new(name, value.into_value()));
        }
        self
    }
    /// Writes a nested entity as a `part` parameter if present.
    pub fn entity<E: ParameterEntity>(mut self, name: &str, entity: Option<&E>) -> Self {
        if let Some(entity) = entity {
            self.parameters.push(Parameter::part(name, entity.to_wire()));
        }
        self
    }
    /// Appends parameters that the entity does not model, unchanged.
    pub fn additional(mut self, parameters: Option<&[Parameter]>) -> Self {
        self.parameters.extend(parameters.into_iter().flatten().cloned());
        self
    }
    pub fn finish(self) -> Vec<Parameter> {
        self.parameters
    }
}

/// Reads the fields of an entity from its parameters.
///
/// A field is read from the first parameter with its name. Later parameters with the
/// same name are ignored, and parameters with names outside `fields` are additional
/// attributes.
#[derive(Debug)]
pub struct ParameterReader<'a> {
    parameters: &'a [Parameter],
    path: &'a str,
    fields: &'a [&'a str],
}

impl<'a> ParameterReader<'a> {
    pub fn new(parameters: &'a [Parameter], path: &'a str, fields: &'a [&'a str]) -> Self {
        Self { parameters, path, fields }
    }
    fn first(&self, name: &str) -> Option<&'a ParameterValue> {
        self.parameters.iter().find(|p| p.name == name).and_then(|p| p.value.as_ref())
    }
    fn mismatch(&self, name: &str, expected: &str, found: &ParameterValue) -> DecodeError {
        DecodeError::new(
            format!("{}.{name}", self.path),
            format!("expected {expected}, found {}", found.field()),
        )
    }
    pub fn optional<T: ValueKind>(&self, name: &str) -> Result<Option<T>, DecodeError> {
        self.first(name)
            .map(|value| T::from_value(value).ok_or_else(|| self.mismatch(name, T::FIELD, value)))
            .transpose()
    }
    pub fn required<T: ValueKind>(&self, name: &str) -> Result<T, DecodeError> {
        self.optional(name)?.ok_or_else(|| DecodeError::missing_field(self.path, name))
    }
    /// Reads a nested entity from a `part` parameter.
    pub fn entity<E: ParameterEntity>(&self, name: &str) -> Result<Option<E>, DecodeError> {
        match self.first(name) {
            Some(ParameterValue::Part(parts)) => {
                E::from_wire_at(parts, &format!("{}.{name}", self.path)).map(Some)
            }
            Some(value) => Err(self.mismatch(name, "part", value)),
            None => Ok(None),
        }
    }
    /// Parameters not named in `fields`, in their original order, or `None` if there are
    /// none.
    pub fn additional(&self) -> Option<Vec<Parameter>> {
        let additional = self
            .parameters
            .iter()
            .filter(|p| !self.fields.contains(&p.name.as_str()))
            .cloned()
            .collect::<Vec<_>>();
        if additional.is_empty() {
            None
        } else {
            Some(additional)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Port {
        label: String,
        enabled: Option<bool>,
        additional: Option<Vec<Parameter>>,
    }

    impl ParameterEntity for Port {
        fn to_wire(&self) -> Vec<Parameter> {
            ParameterWriter::new()
                .field("label", Some(self.label.clone()))
                .field("enabled", self.enabled)
                .additional(self.additional.as_deref())
                .finish()
        }
        fn from_wire_at(parameters: &[Parameter], path: &str) -> Result<Self, DecodeError> {
            let reader = ParameterReader::new(parameters, path, &["label", "enabled"]);
            Ok(Self {
                label: reader.required("label")?,
                enabled: reader.optional("enabled")?,
                additional: reader.additional(),
            })
        }
    }

    #[derive(Debug, PartialEq)]
    struct Hub {
        port: Option<Port>,
    }

    impl ParameterEntity for Hub {
        fn to_wire(&self) -> Vec<Parameter> {
            ParameterWriter::new().entity("port", self.port.as_ref()).finish()
        }
        fn from_wire_at(parameters: &[Parameter], path: &str) -> Result<Self, DecodeError> {
            let reader = ParameterReader::new(parameters, path, &["port"]);
            Ok(Self { port: reader.entity("port")? })
        }
    }

    #[test]
    fn first_match_wins() {
        let port = to_entity::<Port>(&[
            Parameter::new("label", "first"),
            Parameter::new("label", "second"),
        ])
        .expect("to_entity");
        assert_eq!(port, Port { label: String::from("first"), enabled: None, additional: None });
    }

    #[test]
    fn missing_required_field() {
        let err = to_entity::<Port>(&[Parameter::new("enabled", true)]).expect_err("must be error");
        assert_eq!(err.path, "$.parameter");
        assert_eq!(err.message, "missing required field `label`");

        // a name without a value does not count as present
        let err = to_entity::<Port>(&[Parameter::empty("label")]).expect_err("must be error");
        assert_eq!(err.message, "missing required field `label`");
    }

    #[test]
    fn kind_mismatch() {
        let err = to_entity::<Port>(&[Parameter::new("label", "l"), Parameter::new("enabled", "yes")])
            .expect_err("must be error");
        assert_eq!(err.path, "$.parameter.enabled");
        assert_eq!(err.message, "expected valueBoolean, found valueString");

        let err = to_entity::<Hub>(&[Parameter::new("port", 1_i32)]).expect_err("must be error");
        assert_eq!(err.path, "$.parameter.port");
        assert_eq!(err.message, "expected part, found valueInteger");
    }

    #[test]
    fn nested_path() {
        let err = to_entity::<Hub>(&[Parameter::part("port", vec![Parameter::new("enabled", true)])])
            .expect_err("must be error");
        assert_eq!(err.path, "$.parameter.port");
        assert_eq!(err.message, "missing required field `label`");
    }

    #[test]
    fn additional_keep_order() {
        let parameters = vec![
            Parameter::new("x-first", 1_i32),
            Parameter::new("label", "l"),
            Parameter::new("x-second", 2_i32),
        ];
        let port = to_entity::<Port>(&parameters).expect("to_entity");
        assert_eq!(
            port.additional,
            Some(vec![Parameter::new("x-first", 1_i32), Parameter::new("x-second", 2_i32)])
        );
        // modeled fields come first, additional ones after them
        assert_eq!(
            to_wire(&port),
            vec![
                Parameter::new("label", "l"),
                Parameter::new("x-first", 1_i32),
                Parameter::new("x-second", 2_i32),
            ]
        );
    }

    #[test]
    fn parameters_resource() {
        let hub = Hub {
            port: Some(Port { label: String::from("eth0"), enabled: Some(true), additional: None }),
        };
        let parameters = Parameters::from_entity(&hub);
        assert_eq!(
            parameters.parameter,
            vec![Parameter::part(
                "port",
                vec![Parameter::new("label", "eth0"), Parameter::new("enabled", true)]
            )]
        );
        assert_eq!(parameters.to_entity::<Hub>().expect("to_entity"), hub);
    }
}
