//! Endpoint catalogue.

use std::fmt;

use crate::fields::REQUIRED_UA_FIELDS;
use crate::params::{ParamSchema, ParamSpec, ParamType};

static POLICY_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("os_sdk_version", ParamType::Int),
    ParamSpec::new("gms_version", ParamType::Double),
    ParamSpec::new("gos_version", ParamType::Int),
];

static PACKAGE_PARAMS: &[ParamSpec] = &[ParamSpec::new("package_names", ParamType::Set)];

/// Name of the path parameter carrying the device id.
pub const DEVICE_ID_PARAM: &str = "deviceId";

/// One logical operation of the API.
///
/// Each endpoint carries its route pattern (relative to the API prefix) and
/// the contract its requests are validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /devices/:deviceId`
    DeviceGroup,
    /// `GET /gos/devices/:deviceId/policy`
    DevicePolicy,
    /// `GET /packages`
    PackageKinds,
}

impl Endpoint {
    /// Every endpoint, in mount order.
    pub const ALL: [Self; 3] = [Self::DeviceGroup, Self::DevicePolicy, Self::PackageKinds];

    /// Returns the route pattern relative to the API prefix.
    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::DeviceGroup => "/devices/:deviceId",
            Self::DevicePolicy => "/gos/devices/:deviceId/policy",
            Self::PackageKinds => "/packages",
        }
    }

    /// Returns a short name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DeviceGroup => "device_group",
            Self::DevicePolicy => "device_policy",
            Self::PackageKinds => "package_kinds",
        }
    }

    /// Returns the User-Agent fields this endpoint requires, in reporting order.
    #[must_use]
    pub const fn required_fields(self) -> &'static [&'static str] {
        REQUIRED_UA_FIELDS
    }

    /// Returns the query parameters this endpoint requires.
    #[must_use]
    pub const fn query_schema(self) -> ParamSchema {
        match self {
            Self::DeviceGroup => ParamSchema::EMPTY,
            Self::DevicePolicy => ParamSchema::new(POLICY_PARAMS),
            Self::PackageKinds => ParamSchema::new(PACKAGE_PARAMS),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
