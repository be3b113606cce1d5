//! The shared request pipeline.
//!
//! Every endpoint runs the same steps, parameterised by its [`Endpoint`]:
//!
//! 1. parse the User-Agent header (a malformed header yields an empty map)
//! 2. verify the endpoint's required User-Agent fields
//! 3. verify the endpoint's query schema
//! 4. ask the endpoint's collaborator for the answer
//!
//! The first failing step ends the request.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::endpoint::Endpoint;
use crate::error::{ApiError, ApiResult, ValidationFailure};
use crate::fields::verify_required_fields;
use crate::params::verify_params;
use crate::query::QueryMap;
use crate::services::{
    CollaboratorError, DeviceGroupResolver, EchoDeviceGroups, NonGameClassifier,
    PackageClassifier, PackageEntry, PolicyProvider, StaticPolicy,
};
use crate::ua::{parse_user_agent, FieldMap, MalformedHeader};

/// The parts of a request the pipeline consumes.
#[derive(Debug, Clone, Default)]
pub struct RequestInput {
    /// Raw User-Agent header, `None` if absent or not UTF-8
    pub user_agent: Option<String>,
    /// Decoded query parameters
    pub query: QueryMap,
    /// `deviceId` path parameter, when the route has one
    pub device_id: Option<String>,
}

impl RequestInput {
    /// Creates an input with the given User-Agent header.
    #[must_use]
    pub fn new(user_agent: Option<&str>) -> Self {
        Self {
            user_agent: user_agent.map(str::to_string),
            ..Self::default()
        }
    }

    /// Sets the decoded query.
    #[must_use]
    pub fn with_query(mut self, query: QueryMap) -> Self {
        self.query = query;
        self
    }

    /// Sets the `deviceId` path parameter.
    #[must_use]
    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }
}

/// Body of a successful device group lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceGroupBody {
    /// Group the device belongs to
    pub device_group_name: String,
}

/// Successful result of an endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Success {
    /// `{device_group_name}`
    DeviceGroup(DeviceGroupBody),
    /// The policy document, verbatim
    Policy(Arc<Value>),
    /// `[{pkg_name, pkg_type}]`, in request order
    Packages(Vec<PackageEntry>),
}

impl Success {
    /// Serializes the body to JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be serialized.
    pub fn to_body(&self) -> serde_json::Result<Vec<u8>> {
        match self {
            Self::DeviceGroup(body) => serde_json::to_vec(body),
            Self::Policy(document) => serde_json::to_vec(document.as_ref()),
            Self::Packages(entries) => serde_json::to_vec(entries),
        }
    }
}

/// Runs the pipeline against the configured collaborators.
///
/// Cheap to clone; collaborators are shared.
///
/// # Example
///
/// ```
/// use gosd_core::{Endpoint, Handlers, RequestInput, Success};
///
/// let ua = "SGH (gms_version: 21.21; gos_version: 350200018; device_name: herolte; \
///     model_name: SM-G930F; al: 23; version_r: 6.0.1; version_i: G930FXXU8EUE1; \
///     uuid: b52aa00c534648e28dd8a4981cf308f8)";
/// let input = RequestInput::new(Some(ua)).with_device_id("herolte");
///
/// let result = Handlers::stubbed().handle(Endpoint::DeviceGroup, &input).unwrap();
/// assert!(matches!(result, Success::DeviceGroup(body) if body.device_group_name == "herolte"));
/// ```
#[derive(Clone)]
pub struct Handlers {
    groups: Arc<dyn DeviceGroupResolver>,
    policy: Arc<dyn PolicyProvider>,
    packages: Arc<dyn PackageClassifier>,
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers").finish_non_exhaustive()
    }
}

impl Default for Handlers {
    fn default() -> Self {
        Self::stubbed()
    }
}

impl Handlers {
    /// Creates handlers backed by the given collaborators.
    #[must_use]
    pub fn new(
        groups: Arc<dyn DeviceGroupResolver>,
        policy: Arc<dyn PolicyProvider>,
        packages: Arc<dyn PackageClassifier>,
    ) -> Self {
        Self {
            groups,
            policy,
            packages,
        }
    }

    /// Creates handlers backed by the stub collaborators and the built-in policy.
    #[must_use]
    pub fn stubbed() -> Self {
        Self::with_policy(StaticPolicy::builtin())
    }

    /// Creates handlers backed by the stubs and the given policy provider.
    #[must_use]
    pub fn with_policy(policy: impl PolicyProvider + 'static) -> Self {
        Self::new(
            Arc::new(EchoDeviceGroups),
            Arc::new(policy),
            Arc::new(NonGameClassifier),
        )
    }

    /// Runs `endpoint` for `input`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Validation`] for the first failed header or query check
    /// - [`ApiError::Internal`] if a collaborator fails or a routed device
    ///   id is missing
    pub fn handle(&self, endpoint: Endpoint, input: &RequestInput) -> ApiResult<Success> {
        let fields = fields_of(input.user_agent.as_deref());

        if let Some(missing) = verify_required_fields(&fields, endpoint.required_fields()) {
            return Err(ValidationFailure::missing_field(missing).into());
        }
        verify_params(&input.query, endpoint.query_schema())?;

        match endpoint {
            Endpoint::DeviceGroup => {
                let device_group_name = self
                    .groups
                    .resolve(device_id(input)?)
                    .map_err(collaborator_failed)?;
                Ok(Success::DeviceGroup(DeviceGroupBody { device_group_name }))
            }
            Endpoint::DevicePolicy => self
                .policy
                .policy(device_id(input)?, &fields, &input.query)
                .map(Success::Policy)
                .map_err(collaborator_failed),
            Endpoint::PackageKinds => {
                // presence is guaranteed by the query schema
                let names = input.query.get("package_names").unwrap_or_default();
                let entries = split_package_names(names)
                    .map(|pkg_name| {
                        let pkg_type = self.packages.classify(pkg_name)?;
                        Ok(PackageEntry {
                            pkg_name: pkg_name.to_string(),
                            pkg_type,
                        })
                    })
                    .collect::<Result<Vec<_>, CollaboratorError>>()
                    .map_err(collaborator_failed)?;
                Ok(Success::Packages(entries))
            }
        }
    }
}

/// Parses the header, degrading to an empty map when it is unusable.
fn fields_of(user_agent: Option<&str>) -> FieldMap {
    let parsed = user_agent
        .ok_or(MalformedHeader::Missing)
        .and_then(parse_user_agent);
    match parsed {
        Ok(fields) => fields,
        Err(e) => {
            tracing::warn!(error = %e, ?user_agent, "unusable User-Agent header");
            FieldMap::new()
        }
    }
}

/// Splits `package_names` on `,`. Items are kept verbatim, empty ones included.
fn split_package_names(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',')
}

fn device_id(input: &RequestInput) -> ApiResult<&str> {
    input
        .device_id
        .as_deref()
        .ok_or_else(|| ApiError::internal("route did not bind deviceId"))
}

fn collaborator_failed(e: CollaboratorError) -> ApiError {
    tracing::error!(error = %e, "collaborator failed");
    ApiError::internal(e.to_string())
}
