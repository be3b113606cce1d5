//! Radix tree node implementation.

use crate::method_router::MethodRouter;
use crate::params::Params;

/// Type of path segment in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Static path segment (e.g., "devices", "policy")
    Static,
    /// Named parameter (e.g., ":deviceId" or "{deviceId}")
    Param(String),
}

impl SegmentKind {
    /// Classifies a single pattern segment.
    fn of(segment: &str) -> Self {
        if let Some(name) = segment.strip_prefix(':') {
            return Self::Param(name.to_string());
        }
        match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => Self::Param(name.to_string()),
            None => Self::Static,
        }
    }
}

/// A node in the radix tree.
///
/// Nodes at route boundaries carry a [`MethodRouter`]. A node has any number
/// of static children and at most one parameter child; when two patterns
/// declare differently named parameters at the same depth, the name from the
/// first registered pattern is used.
#[derive(Debug, Clone)]
pub struct Node<T> {
    /// The path segment this node represents
    pub segment: String,

    /// The kind of segment
    pub kind: SegmentKind,

    /// Method router for this node (if it's a route endpoint)
    pub methods: Option<MethodRouter<T>>,

    /// Static children, sorted by segment for binary search
    pub static_children: Vec<Node<T>>,

    /// Parameter child
    pub param_child: Option<Box<Node<T>>>,
}

impl<T> Node<T> {
    fn new(segment: &str, kind: SegmentKind) -> Self {
        Self {
            segment: segment.to_string(),
            kind,
            methods: None,
            static_children: Vec::new(),
            param_child: None,
        }
    }

    /// Creates a root node for the tree.
    #[must_use]
    pub fn root() -> Self {
        Self::new("", SegmentKind::Static)
    }

    /// Inserts a route pattern into the tree.
    pub fn insert(&mut self, path: &str, methods: MethodRouter<T>) {
        let segments: Vec<&str> = split_path(path).collect();
        self.insert_segments(&segments, methods);
    }

    fn insert_segments(&mut self, segments: &[&str], methods: MethodRouter<T>) {
        let Some((segment, remaining)) = segments.split_first() else {
            match &mut self.methods {
                Some(existing) => existing.merge(methods),
                None => self.methods = Some(methods),
            }
            return;
        };

        match SegmentKind::of(segment) {
            SegmentKind::Static => {
                let idx = match self.static_index(segment) {
                    Ok(idx) => idx,
                    Err(idx) => {
                        self.static_children
                            .insert(idx, Node::new(segment, SegmentKind::Static));
                        idx
                    }
                };
                self.static_children[idx].insert_segments(remaining, methods);
            }
            kind @ SegmentKind::Param(_) => {
                self.param_child
                    .get_or_insert_with(|| Box::new(Node::new(segment, kind)))
                    .insert_segments(remaining, methods);
            }
        }
    }

    /// Matches a concrete path against the tree.
    ///
    /// Returns the method router and extracted parameters if a route ends at
    /// the path.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<T>, Params)> {
        let segments: Vec<&str> = split_path(path).collect();
        let mut params = Params::new();
        let methods = self.match_segments(&segments, &mut params)?;
        Some((methods, params))
    }

    fn match_segments<'a>(
        &'a self,
        segments: &[&str],
        params: &mut Params,
    ) -> Option<&'a MethodRouter<T>> {
        let Some((segment, remaining)) = segments.split_first() else {
            return self.methods.as_ref();
        };

        if let Ok(idx) = self.static_index(segment) {
            if let Some(found) = self.static_children[idx].match_segments(remaining, params) {
                return Some(found);
            }
        }

        if let Some(child) = &self.param_child {
            if let SegmentKind::Param(name) = &child.kind {
                let mark = params.len();
                params.push(name.clone(), *segment);
                if let Some(found) = child.match_segments(remaining, params) {
                    return Some(found);
                }
                params.truncate(mark);
            }
        }

        None
    }

    fn static_index(&self, segment: &str) -> Result<usize, usize> {
        self.static_children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
    }
}

/// Splits a path into non-empty segments, ignoring repeated and trailing slashes.
fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
