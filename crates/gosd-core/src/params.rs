//! Typed query parameter verification.
//!
//! Checks are syntactic only: a parameter must be present and, for numeric
//! types, parse as a finite number (and an integral one for `int`). There are
//! no range checks.

use std::fmt;

use crate::error::ValidationFailure;
use crate::query::QueryMap;

/// Declared type of a query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Finite number with no fractional part.
    Int,
    /// Any finite number.
    Double,
    /// Presence-only string.
    String,
    /// Presence-only comma-separated list.
    Set,
}

impl ParamType {
    /// Returns the name used in client-facing messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Double => "double",
            Self::String => "string",
            Self::Set => "set",
        }
    }

    /// Returns true if values must parse as numbers.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Double)
    }

    /// Returns true if `raw` satisfies this type. Presence is checked separately.
    fn accepts(self, raw: &str) -> bool {
        match self {
            Self::String | Self::Set => true,
            // integral values are valid doubles
            Self::Double => parse_number(raw).is_some(),
            Self::Int => parse_number(raw).is_some_and(|n| n.fract() == 0.0),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Parameter name
    pub name: &'static str,
    /// Declared type
    pub ty: ParamType,
}

impl ParamSpec {
    /// Declares a parameter.
    #[must_use]
    pub const fn new(name: &'static str, ty: ParamType) -> Self {
        Self { name, ty }
    }
}

/// Ordered, immutable list of parameters an endpoint requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSchema(&'static [ParamSpec]);

impl ParamSchema {
    /// A schema with no parameters.
    pub const EMPTY: Self = Self(&[]);

    /// Wraps a static parameter list.
    #[must_use]
    pub const fn new(specs: &'static [ParamSpec]) -> Self {
        Self(specs)
    }

    /// Iterates the parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &'static ParamSpec> {
        self.0.iter()
    }

    /// Returns true if the schema declares no parameters.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Verifies `query` against `schema`, stopping at the first failure.
///
/// # Errors
///
/// - [`ValidationFailure::MissingParam`] if a parameter is absent or empty
/// - [`ValidationFailure::TypeMismatch`] if a numeric parameter does not parse,
///   is not finite, or (for `int`) is not integral
///
/// # Example
///
/// ```
/// use gosd_core::{verify_params, ParamSchema, ParamSpec, ParamType, QueryMap, ValidationFailure};
///
/// static SCHEMA: &[ParamSpec] = &[ParamSpec::new("x", ParamType::Int)];
///
/// let query = QueryMap::parse(Some("x=3.5"));
/// assert!(matches!(
///     verify_params(&query, ParamSchema::new(SCHEMA)),
///     Err(ValidationFailure::TypeMismatch { .. })
/// ));
/// ```
pub fn verify_params(query: &QueryMap, schema: ParamSchema) -> Result<(), ValidationFailure> {
    for spec in schema.iter() {
        let Some(value) = query.get(spec.name).filter(|v| !v.is_empty()) else {
            return Err(ValidationFailure::missing_param(spec.name, spec.ty));
        };
        if !spec.ty.accepts(value) {
            return Err(ValidationFailure::type_mismatch(spec.name, spec.ty));
        }
    }
    Ok(())
}

/// Parses a finite number, tolerating surrounding whitespace.
///
/// Accepts what `f64`'s parser accepts (`1e3`, `.5`, `5.`), minus
/// infinities and NaN.
fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    static INT_X: &[ParamSpec] = &[ParamSpec::new("x", ParamType::Int)];

    static POLICY: &[ParamSpec] = &[
        ParamSpec::new("os_sdk_version", ParamType::Int),
        ParamSpec::new("gms_version", ParamType::Double),
        ParamSpec::new("gos_version", ParamType::Int),
    ];

    fn check(schema: &'static [ParamSpec], raw: &str) -> Result<(), ValidationFailure> {
        verify_params(&QueryMap::parse(Some(raw)), ParamSchema::new(schema))
    }

    #[test]
    fn test_int_accepts_integer() {
        assert_eq!(check(INT_X, "x=3"), Ok(()));
    }

    #[test]
    fn test_int_rejects_fraction() {
        assert_eq!(
            check(INT_X, "x=3.5"),
            Err(ValidationFailure::type_mismatch("x", ParamType::Int))
        );
    }

    #[test]
    fn test_missing_param() {
        assert_eq!(
            check(INT_X, ""),
            Err(ValidationFailure::missing_param("x", ParamType::Int))
        );
        assert_eq!(
            check(INT_X, "x="),
            Err(ValidationFailure::missing_param("x", ParamType::Int))
        );
    }

    #[test]
    fn test_non_numeric_is_mismatch() {
        for raw in ["x=abc", "x=NaN", "x=inf", "x=-infinity", "x=%20", "x=1,5"] {
            assert_eq!(
                check(INT_X, raw),
                Err(ValidationFailure::type_mismatch("x", ParamType::Int)),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_loose_numeric_syntax_is_accepted() {
        for raw in ["x=1e3", "x=3.0", "x=-2", "x=+4", "x=%203%20", "x=0"] {
            assert_eq!(check(INT_X, raw), Ok(()), "{raw}");
        }
    }

    #[test]
    fn test_double_accepts_integral_values() {
        static D: &[ParamSpec] = &[ParamSpec::new("d", ParamType::Double)];
        assert_eq!(check(D, "d=21.21"), Ok(()));
        assert_eq!(check(D, "d=21"), Ok(()));
        assert_eq!(check(D, "d=.5"), Ok(()));
    }

    #[test]
    fn test_untyped_params_only_need_presence() {
        static S: &[ParamSpec] = &[
            ParamSpec::new("package_names", ParamType::Set),
            ParamSpec::new("label", ParamType::String),
        ];
        assert_eq!(check(S, "package_names=not,numbers&label=x"), Ok(()));
        assert_eq!(
            check(S, "label=x"),
            Err(ValidationFailure::missing_param("package_names", ParamType::Set))
        );
    }

    #[test]
    fn test_first_failure_wins() {
        // gms_version is missing and gos_version is malformed; only the
        // earlier-declared failure is reported
        assert_eq!(
            check(POLICY, "os_sdk_version=28&gos_version=abc"),
            Err(ValidationFailure::missing_param("gms_version", ParamType::Double))
        );
        assert_eq!(
            check(POLICY, "os_sdk_version=2.5&gms_version=x"),
            Err(ValidationFailure::type_mismatch("os_sdk_version", ParamType::Int))
        );
    }

    #[test]
    fn test_full_policy_query_passes() {
        assert_eq!(
            check(POLICY, "os_sdk_version=28&gms_version=21.21&gos_version=350200018"),
            Ok(())
        );
    }

    #[test]
    fn test_empty_schema_always_passes() {
        assert_eq!(verify_params(&QueryMap::new(), ParamSchema::EMPTY), Ok(()));
        assert!(ParamSchema::EMPTY.is_empty());
    }

    #[test]
    fn test_param_type_display() {
        assert_eq!(ParamType::Int.to_string(), "int");
        assert_eq!(ParamType::Double.to_string(), "double");
        assert_eq!(ParamType::Set.to_string(), "set");
        assert!(ParamType::Double.is_numeric());
        assert!(!ParamType::String.is_numeric());
    }
}
