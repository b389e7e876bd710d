//! Device identity entities carried in `Parameters` resources.
use crate::mapper::{ParameterEntity, ParameterReader, ParameterWriter};
use crate::parameter::Parameter;
use crate::types::string::{Code, DateTime, Uri};
use crate::types::{Identifier, Reference};
use devid_http::DecodeError;

/// The identity of a provisioned device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Provisioning profile kind, e.g. `IoTPRS`.
    pub r#type: String,
    pub device_identifier: Option<Identifier>,
    pub status: Option<Code>,
    pub profile: Option<Reference>,
    pub registered_at: Option<DateTime>,
    pub device_attributes: Option<DeviceAttributes>,
    pub additional_attributes: Option<Vec<Parameter>>,
}

impl DeviceIdentity {
    const FIELDS: [&'static str; 6] = [
        "type",
        "deviceIdentifier",
        "status",
        "profile",
        "registeredAt",
        "DeviceAttributes",
    ];

    pub fn new(r#type: impl Into<String>) -> Self {
        Self {
            r#type: r#type.into(),
            device_identifier: None,
            status: None,
            profile: None,
            registered_at: None,
            device_attributes: None,
            additional_attributes: None,
        }
    }
}

impl ParameterEntity for DeviceIdentity {
    fn to_wire(&self) -> Vec<Parameter> {
        ParameterWriter::new()
            .field("type", Some(self.r#type.clone()))
            .field("deviceIdentifier", self.device_identifier.clone())
            .field("status", self.status.clone())
            .field("profile", self.profile.clone())
            .field("registeredAt", self.registered_at.clone())
            .entity("DeviceAttributes", self.device_attributes.as_ref())
            .additional(self.additional_attributes.as_deref())
            .finish()
    }
    fn from_wire_at(parameters: &[Parameter], path: &str) -> Result<Self, DecodeError> {
        let reader = ParameterReader::new(parameters, path, &Self::FIELDS);
        Ok(Self {
            r#type: reader.required("type")?,
            device_identifier: reader.optional("deviceIdentifier")?,
            status: reader.optional("status")?,
            profile: reader.optional("profile")?,
            registered_at: reader.optional("registeredAt")?,
            device_attributes: reader.entity("DeviceAttributes")?,
            additional_attributes: reader.additional(),
        })
    }
}

/// Hardware description of a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAttributes {
    pub serial_number: String,
    pub manufacturer: Option<String>,
    pub model_number: Option<String>,
    pub firmware_version: Option<String>,
    pub port_count: Option<i32>,
    /// In bytes.
    pub memory_size: Option<i64>,
    pub secure_element: Option<bool>,
    pub documentation: Option<Uri>,
    pub additional_attributes: Option<Vec<Parameter>>,
}

impl DeviceAttributes {
    const FIELDS: [&'static str; 8] = [
        "serialNumber",
        "manufacturer",
        "modelNumber",
        "firmwareVersion",
        "portCount",
        "memorySize",
        "secureElement",
        "documentation",
    ];

    pub fn new(serial_number: impl Into<String>) -> Self {
        Self {
            serial_number: serial_number.into(),
            manufacturer: None,
            model_number: None,
            firmware_version: None,
            port_count: None,
            memory_size: None,
            secure_element: None,
            documentation: None,
            additional_attributes: None,
        }
    }
}

impl ParameterEntity for DeviceAttributes {
    fn to_wire(&self) -> Vec<Parameter> {
        ParameterWriter::new()
            .field("serialNumber", Some(self.serial_number.clone()))
            .field("manufacturer", self.manufacturer.clone())
            .field("modelNumber", self.model_number.clone())
            .field("firmwareVersion", self.firmware_version.clone())
            .field("portCount", self.port_count)
            .field("memorySize", self.memory_size)
            .field("secureElement", self.secure_element)
            .field("documentation", self.documentation.clone())
            .additional(self.additional_attributes.as_deref())
            .finish()
    }
    fn from_wire_at(parameters: &[Parameter], path: &str) -> Result<Self, DecodeError> {
        let reader = ParameterReader::new(parameters, path, &Self::FIELDS);
        Ok(Self {
            serial_number: reader.required("serialNumber")?,
            manufacturer: reader.optional("manufacturer")?,
            model_number: reader.optional("modelNumber")?,
            firmware_version: reader.optional("firmwareVersion")?,
            port_count: reader.optional("portCount")?,
            memory_size: reader.optional("memorySize")?,
            secure_element: reader.optional("secureElement")?,
            documentation: reader.optional("documentation")?,
            additional_attributes: reader.additional(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Codec;
    use crate::mapper::{to_entity, to_wire};
    use crate::resource::{Parameters, Resource};

    fn device() -> DeviceIdentity {
        DeviceIdentity {
            device_identifier: Some(Identifier::new(
                "urn:ietf:rfc:3986".parse().expect("valid uri"),
                "urn:uuid:6f1c2a52-8f1e-4b53-9d2c-1c2f0e5d9a10",
            )),
            status: Some("active".parse().expect("valid code")),
            profile: Some(Reference::new("Profile/iot-prs")),
            registered_at: Some("2024-03-01T12:00:00+09:00".parse().expect("valid date-time")),
            device_attributes: Some(DeviceAttributes {
                manufacturer: Some(String::from("Acme")),
                model_number: Some(String::from("GW-100")),
                firmware_version: Some(String::from("1.4.2")),
                port_count: Some(4),
                memory_size: Some(8_589_934_592),
                secure_element: Some(true),
                documentation: Some("https://acme.example.com/gw-100".parse().expect("valid uri")),
                additional_attributes: Some(vec![Parameter::new("color", "black")]),
                ..DeviceAttributes::new("SN-0001")
            }),
            additional_attributes: Some(vec![
                Parameter::new("someBoolean", true),
                Parameter::part("location", vec![Parameter::new("site", "factory-7")]),
            ]),
            ..DeviceIdentity::new("IoTPRS")
        }
    }

    #[test]
    fn round_trip() {
        let device = device();
        assert_eq!(to_entity::<DeviceIdentity>(&to_wire(&device)).expect("to_entity"), device);

        let minimal = DeviceIdentity::new("IoTPRS");
        assert_eq!(to_wire(&minimal), vec![Parameter::new("type", "IoTPRS")]);
        assert_eq!(to_entity::<DeviceIdentity>(&to_wire(&minimal)).expect("to_entity"), minimal);
    }

    #[test]
    fn round_trip_through_codec() {
        let codec = Codec::default();
        let device = device();
        let encoded =
            codec.encode(&Resource::Parameters(Parameters::from_entity(&device))).expect("encode");
        match codec.decode(&encoded).expect("decode") {
            Resource::Parameters(parameters) => {
                assert_eq!(parameters.to_entity::<DeviceIdentity>().expect("to_entity"), device)
            }
            resource => panic!("must be Parameters, got {resource:?}"),
        }
    }

    #[test]
    fn encode_matches_wire_shape() {
        let device = DeviceIdentity {
            device_attributes: Some(DeviceAttributes {
                manufacturer: Some(String::from("Acme")),
                ..DeviceAttributes::new("SN-0001")
            }),
            ..DeviceIdentity::new("IoTPRS")
        };
        let encoded = Codec::default()
            .encode(&Resource::Parameters(Parameters::from_entity(&device)))
            .expect("encode");
        assert_eq!(
            String::from_utf8(encoded).expect("utf-8"),
            r#"{"resourceType":"Parameters","parameter":[{"name":"type","valueString":"IoTPRS"},{"name":"DeviceAttributes","part":[{"name":"serialNumber","valueString":"SN-0001"},{"name":"manufacturer","valueString":"Acme"}]}]}"#
        );
    }

    #[test]
    fn unrecognized_parameter_is_additional() {
        let parameters = vec![
            Parameter::new("type", "IoTPRS"),
            Parameter::new("someBoolean", true),
            Parameter::new("status", "active".parse::<Code>().expect("valid code")),
        ];
        let device = to_entity::<DeviceIdentity>(&parameters).expect("to_entity");
        assert_eq!(device.additional_attributes, Some(vec![Parameter::new("someBoolean", true)]));
        assert_eq!(device.status, Some("active".parse().expect("valid code")));
        assert_eq!(device.device_attributes, None);
    }

    #[test]
    fn no_additional_attributes() {
        let device = to_entity::<DeviceIdentity>(&[
            Parameter::new("type", "IoTPRS"),
            Parameter::part("DeviceAttributes", vec![Parameter::new("serialNumber", "SN-0001")]),
        ])
        .expect("to_entity");
        assert_eq!(device.additional_attributes, None);
        assert_eq!(device.device_attributes, Some(DeviceAttributes::new("SN-0001")));
    }

    #[test]
    fn nested_errors() {
        let err = to_entity::<DeviceIdentity>(&[
            Parameter::new("type", "IoTPRS"),
            Parameter::part("DeviceAttributes", vec![Parameter::new("manufacturer", "Acme")]),
        ])
        .expect_err("must be error");
        assert_eq!(err.path, "$.parameter.DeviceAttributes");
        assert_eq!(err.message, "missing required field `serialNumber`");

        let err = to_entity::<DeviceIdentity>(&[
            Parameter::new("type", "IoTPRS"),
            Parameter::part(
                "DeviceAttributes",
                vec![Parameter::new("serialNumber", "SN-0001"), Parameter::new("portCount", "4")],
            ),
        ])
        .expect_err("must be error");
        assert_eq!(err.path, "$.parameter.DeviceAttributes.portCount");

        let err = to_entity::<DeviceIdentity>(&[]).expect_err("must be error");
        assert_eq!(err.message, "missing required field `type`");
    }
}
