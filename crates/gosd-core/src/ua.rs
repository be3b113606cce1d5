//! User-Agent tokenization.
//!
//! Companion clients send a semi-structured User-Agent of the form
//!
//! ```text
//! <agent-name> (<key1>: <val1>; <key2>: <val2>; ...)
//! ```
//!
//! [`parse_user_agent`] turns that into a [`FieldMap`]. Parsing is
//! best-effort: segments that cannot be split into a key and a value are
//! skipped, and only a missing parenthesised block is reported as an error.

use std::collections::HashMap;

use thiserror::Error;

/// Key under which the agent name (text before the first `(`) is stored.
pub const AGENT_KEY: &str = "User-Agent";

/// Structural problems with a User-Agent header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedHeader {
    /// The header is absent or not valid UTF-8.
    #[error("User-Agent header is missing")]
    Missing,

    /// The header has no `(` opening the field block.
    #[error("User-Agent header has no '(' opening the field block")]
    NoOpenParen,

    /// The header has no `)` closing the field block.
    #[error("User-Agent header has no ')' closing the field block")]
    NoCloseParen,
}

/// Decoded key/value view of a User-Agent header.
///
/// When the header repeats a key, the later value wins.
///
/// # Example
///
/// ```
/// use gosd_core::parse_user_agent;
///
/// let fields = parse_user_agent("SGH (al: 23; uuid: b52a)").unwrap();
/// assert_eq!(fields.agent(), Some("SGH"));
/// assert_eq!(fields.get("al"), Some("23"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    fields: HashMap<String, String>,
}

impl FieldMap {
    /// Creates an empty field map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, replacing any earlier value for the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Returns the raw value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Returns the agent name.
    #[must_use]
    pub fn agent(&self) -> Option<&str> {
        self.get(AGENT_KEY)
    }

    /// Returns the number of fields, including the agent name.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the map holds no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over all fields in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Parses a raw User-Agent header into a [`FieldMap`].
///
/// Everything before the first `(` becomes the [`AGENT_KEY`] field. The text
/// between that `(` and the next `)` is split on `;`, and each segment on its
/// first `:`; both sides are trimmed. Values are otherwise kept verbatim.
///
/// # Errors
///
/// Returns [`MalformedHeader`] if the header has no `(` or no `)` after it.
pub fn parse_user_agent(raw: &str) -> Result<FieldMap, MalformedHeader> {
    let (agent, rest) = raw.split_once('(').ok_or(MalformedHeader::NoOpenParen)?;
    let (block, _) = rest.split_once(')').ok_or(MalformedHeader::NoCloseParen)?;

    let mut fields = FieldMap::new();
    fields.insert(AGENT_KEY, agent.trim());
    for (key, value) in block.split(';').filter_map(parse_segment) {
        fields.insert(key, value);
    }
    Ok(fields)
}

/// Splits one `key: value` segment. Returns `None` for segments to skip.
fn parse_segment(segment: &str) -> Option<(&str, &str)> {
    let Some((key, value)) = segment.split_once(':') else {
        if !segment.trim().is_empty() {
            tracing::debug!(segment, "skipping User-Agent segment without ':'");
        }
        return None;
    };

    let key = key.trim();
    if key.is_empty() {
        tracing::debug!(segment, "skipping User-Agent segment with empty key");
        return None;
    }
    Some((key, value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = "SGH (gms_version: 21.21; gos_version: 350200018; device_name: herolte; \
        model_name: SM-G930F; al: 23; version_r: 6.0.1; version_i: G930FXXU8EUE1; \
        uuid: b52aa00c534648e28dd8a4981cf308f8)";

    #[test]
    fn test_parse_sample_header() {
        let fields = parse_user_agent(SAMPLE).unwrap();

        assert_eq!(fields.agent(), Some("SGH"));
        assert_eq!(fields.get("gms_version"), Some("21.21"));
        assert_eq!(fields.get("device_name"), Some("herolte"));
        assert_eq!(fields.get("version_r"), Some("6.0.1"));
        assert_eq!(fields.get("uuid"), Some("b52aa00c534648e28dd8a4981cf308f8"));
        assert_eq!(fields.len(), 9);
    }

    #[test]
    fn test_segment_without_colon_is_skipped() {
        let fields = parse_user_agent("App (al: 23; garbage; uuid: x)").unwrap();
        assert_eq!(fields.get("al"), Some("23"));
        assert_eq!(fields.get("uuid"), Some("x"));
        assert_eq!(fields.get("garbage"), None);
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_empty_segments_are_skipped() {
        let fields = parse_user_agent("App (; al: 23;;  ;)").unwrap();
        assert_eq!(fields.get("al"), Some("23"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_empty_key_is_skipped() {
        let fields = parse_user_agent("App ( : orphan; al: 23)").unwrap();
        assert_eq!(fields.get(""), None);
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_value_keeps_later_colons() {
        let fields = parse_user_agent("App (uuid: a:b:c)").unwrap();
        assert_eq!(fields.get("uuid"), Some("a:b:c"));
    }

    #[test]
    fn test_duplicate_key_later_wins() {
        let fields = parse_user_agent("App (al: 23; al: 30)").unwrap();
        assert_eq!(fields.get("al"), Some("30"));
    }

    #[test]
    fn test_empty_value_is_kept() {
        let fields = parse_user_agent("App (uuid: )").unwrap();
        assert_eq!(fields.get("uuid"), Some(""));
    }

    #[test]
    fn test_no_case_normalisation() {
        let fields = parse_user_agent("App (Model_Name: SM-G930F)").unwrap();
        assert_eq!(fields.get("Model_Name"), Some("SM-G930F"));
        assert_eq!(fields.get("model_name"), None);
    }

    #[test]
    fn test_text_after_close_paren_is_ignored() {
        let fields = parse_user_agent("App (al: 23) trailing (uuid: x)").unwrap();
        assert_eq!(fields.get("al"), Some("23"));
        assert_eq!(fields.get("uuid"), None);
    }

    #[test]
    fn test_empty_agent_name() {
        let fields = parse_user_agent("(al: 23)").unwrap();
        assert_eq!(fields.agent(), Some(""));
    }

    #[test]
    fn test_missing_open_paren() {
        assert_eq!(
            parse_user_agent("okhttp/4.9.0"),
            Err(MalformedHeader::NoOpenParen)
        );
        assert_eq!(parse_user_agent(""), Err(MalformedHeader::NoOpenParen));
    }

    #[test]
    fn test_missing_close_paren() {
        assert_eq!(
            parse_user_agent("App (al: 23; uuid: x"),
            Err(MalformedHeader::NoCloseParen)
        );
        // a ')' before the '(' does not close the block
        assert_eq!(
            parse_user_agent("App) (al: 23"),
            Err(MalformedHeader::NoCloseParen)
        );
    }

    #[test]
    fn test_field_map_from_iter() {
        let fields: FieldMap = [("al", "23"), ("al", "24")].into_iter().collect();
        assert_eq!(fields.get("al"), Some("24"));
        assert!(!fields.is_empty());
    }

    fn ident() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,11}"
    }

    fn value() -> impl Strategy<Value = String> {
        "[A-Za-z0-9.\\-]{1,16}"
    }

    proptest! {
        #[test]
        fn prop_well_formed_headers_round_trip(
            agent in "[A-Za-z][A-Za-z0-9/.]{0,11}",
            pairs in proptest::collection::btree_map(ident(), value(), 1..8),
        ) {
            let block = pairs
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join("; ");
            let raw = format!("{agent} ({block})");

            let fields = parse_user_agent(&raw).unwrap();
            prop_assert_eq!(fields.agent(), Some(agent.as_str()));
            for (k, v) in &pairs {
                prop_assert_eq!(fields.get(k), Some(v.as_str()));
            }
            prop_assert_eq!(fields.len(), pairs.len() + 1);
        }

        #[test]
        fn prop_colonless_segments_never_fail(
            junk in proptest::collection::vec("[A-Za-z0-9 ._\\-]{0,12}", 0..6),
            key in ident(),
            val in value(),
        ) {
            let mut segments = junk.clone();
            segments.push(format!("{key}: {val}"));
            let raw = format!("Agent ({})", segments.join(";"));

            let fields = parse_user_agent(&raw).unwrap();
            prop_assert_eq!(fields.get(&key), Some(val.as_str()));
            prop_assert_eq!(fields.len(), 2);
        }
    }
}
