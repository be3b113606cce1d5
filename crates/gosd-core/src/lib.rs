//! # gosd Core
//!
//! Request validation and field extraction for the gosd API front.
//!
//! - [`parse_user_agent`] - User-Agent tokenization into a [`FieldMap`]
//! - [`verify_required_fields`] - first missing required User-Agent field
//! - [`verify_params`] - typed query parameter checks against a [`ParamSchema`]
//! - [`ApiError`] / [`ErrorEnvelope`] - the uniform error response
//! - [`Endpoint`] / [`Handlers`] - the per-endpoint pipeline and its collaborators

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod endpoint;
mod error;
mod fields;
mod handler;
mod params;
mod query;
pub mod services;
mod ua;

pub use endpoint::{Endpoint, DEVICE_ID_PARAM};
pub use error::{ApiError, ApiResult, ErrorEnvelope, ValidationFailure, ENVELOPE_VERSION};
pub use fields::{is_present, verify_required_fields, REQUIRED_UA_FIELDS};
pub use handler::{DeviceGroupBody, Handlers, RequestInput, Success};
pub use params::{verify_params, ParamSchema, ParamSpec, ParamType};
pub use query::QueryMap;
pub use services::{
    CollaboratorError, DeviceGroupResolver, EchoDeviceGroups, NonGameClassifier,
    PackageClassifier, PackageEntry, PackageKind, PolicyProvider, StaticPolicy,
};
pub use ua::{parse_user_agent, FieldMap, MalformedHeader, AGENT_KEY};
