//! Required User-Agent field verification.

use crate::ua::FieldMap;

/// User-Agent fields every endpoint requires, in reporting order.
///
/// | Field | Meaning | Example |
/// |-------|---------|---------|
/// | `gms_version` | Play services version, `major.minor` | `21.21` |
/// | `gos_version` | Companion app version code | `350200018` |
/// | `device_name` | Device codename | `herolte` |
/// | `model_name` | Device model | `SM-G930F` |
/// | `al` | Android API level | `23` |
/// | `version_r` | Android release version | `6.0.1` |
/// | `version_i` | Incremental build number | `G930FXXU8EUE1` |
/// | `uuid` | Device UUID without dashes | `b52aa00c534648e28dd8a4981cf308f8` |
pub const REQUIRED_UA_FIELDS: &[&str] = &[
    "gms_version",
    "gos_version",
    "device_name",
    "model_name",
    "al",
    "version_r",
    "version_i",
    "uuid",
];

/// Returns true if a field value counts as present.
///
/// Absent keys, empty strings and the literal `"0"` all count as missing.
/// The `"0"` case is long-standing service behaviour that clients rely on
/// being rejected.
#[must_use]
pub fn is_present(value: Option<&str>) -> bool {
    matches!(value, Some(v) if !v.is_empty() && v != "0")
}

/// Returns the first name in `required` that is not present in `fields`.
///
/// # Example
///
/// ```
/// use gosd_core::{verify_required_fields, FieldMap};
///
/// let fields: FieldMap = [("c", "1")].into_iter().collect();
/// assert_eq!(verify_required_fields(&fields, &["a", "b", "c"]), Some("a"));
/// ```
#[must_use]
pub fn verify_required_fields<'r>(fields: &FieldMap, required: &[&'r str]) -> Option<&'r str> {
    required
        .iter()
        .copied()
        .find(|name| !is_present(fields.get(name)))
}
