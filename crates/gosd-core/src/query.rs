//! Query string decoding.

use std::collections::HashMap;

/// Decoded query parameters of one request.
///
/// Values are `application/x-www-form-urlencoded` decoded. When a key
/// repeats, the last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMap {
    params: HashMap<String, String>,
}

impl QueryMap {
    /// Creates an empty query map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a raw query string (the part after `?`).
    ///
    /// # Example
    ///
    /// ```
    /// use gosd_core::QueryMap;
    ///
    /// let query = QueryMap::parse(Some("package_names=a%2Cb&gms_version=21.21"));
    /// assert_eq!(query.get("package_names"), Some("a,b"));
    /// assert_eq!(query.get("gms_version"), Some("21.21"));
    /// ```
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|r| !r.is_empty()) else {
            return Self::new();
        };
        match serde_urlencoded::from_str::<Vec<(String, String)>>(raw) {
            Ok(pairs) => pairs.into_iter().collect(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring undecodable query string");
                Self::new()
            }
        }
    }

    /// Inserts a parameter, replacing any earlier value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Returns the value of a parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns the number of distinct parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}
