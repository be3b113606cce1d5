//! HTTP method-based routing.
//!
//! [`MethodRouter`] maps HTTP methods to routed values for a single path.

use http::Method;

/// Maps HTTP methods to values for a single route.
///
/// # Example
///
/// ```rust
/// use gosd_router::MethodRouter;
/// use http::Method;
///
/// let router = MethodRouter::new().get("deviceGroup");
///
/// assert_eq!(router.get_value(&Method::GET), Some(&"deviceGroup"));
/// assert_eq!(router.get_value(&Method::HEAD), Some(&"deviceGroup"));
/// assert_eq!(router.get_value(&Method::POST), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRouter<T> {
    /// Registered (method, value) pairs, in registration order
    entries: Vec<(Method, T)>,
}

impl<T> Default for MethodRouter<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> MethodRouter<T> {
    /// Creates a new empty method router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a GET value.
    #[must_use]
    pub fn get(self, value: T) -> Self {
        self.method(&Method::GET, value)
    }

    /// Registers a value for an arbitrary method, replacing any earlier one.
    #[must_use]
    pub fn method(mut self, method: &Method, value: T) -> Self {
        self.set(method.clone(), value);
        self
    }

    /// Returns the value registered for a method.
    ///
    /// `HEAD` falls back to the `GET` value when it has none of its own.
    #[must_use]
    pub fn get_value(&self, method: &Method) -> Option<&T> {
        self.find(method).or_else(|| {
            if *method == Method::HEAD {
                self.find(&Method::GET)
            } else {
                None
            }
        })
    }

    /// Returns true if no method is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merges another method router into this one.
    ///
    /// Methods registered in `other` replace those already present.
    pub fn merge(&mut self, other: Self) {
        for (method, value) in other.entries {
            self.set(method, value);
        }
    }

    fn find(&self, method: &Method) -> Option<&T> {
        self.entries
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, v)| v)
    }

    fn set(&mut self, method: Method, value: T) {
        if let Some(slot) = self.entries.iter_mut().find(|(m, _)| *m == method) {
            slot.1 = value;
        } else {
            self.entries.push((method, value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_router_empty() {
        let router: MethodRouter<&str> = MethodRouter::new();
        assert!(router.is_empty());
        assert_eq!(router.get_value(&Method::GET), None);
    }

    #[test]
    fn test_method_router_get() {
        let router = MethodRouter::new().get("packages");
        assert_eq!(router.get_value(&Method::GET), Some(&"packages"));
        assert_eq!(router.get_value(&Method::POST), None);
    }

    #[test]
    fn test_head_falls_back_to_get() {
        let router = MethodRouter::new().get("packages");
        assert_eq!(router.get_value(&Method::HEAD), Some(&"packages"));

        let router = MethodRouter::new().get("get").method(&Method::HEAD, "head");
        assert_eq!(router.get_value(&Method::HEAD), Some(&"head"));

        let router = MethodRouter::new().method(&Method::PUT, "put");
        assert_eq!(router.get_value(&Method::HEAD), None);
    }

    #[test]
    fn test_method_router_replace() {
        let router = MethodRouter::new().get(1).get(2);
        assert_eq!(router.get_value(&Method::GET), Some(&2));
        assert_eq!(router.entries.len(), 1);
    }

    #[test]
    fn test_method_router_merge() {
        let mut router = MethodRouter::new().get("a");
        router.merge(MethodRouter::new().method(&Method::PUT, "b").get("c"));

        assert_eq!(router.get_value(&Method::GET), Some(&"c"));
        assert_eq!(router.get_value(&Method::PUT), Some(&"b"));
        let methods: Vec<_> = router.entries.iter().map(|(m, _)| m.clone()).collect();
        assert_eq!(methods, vec![Method::GET, Method::PUT]);
    }
}
