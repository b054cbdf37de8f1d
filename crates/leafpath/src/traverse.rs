//! Depth-first path generation.
//!
//! Every leaf of a [`Node`] tree is emitted together with an absolute path
//! that addresses it unambiguously. Paths are built one segment per element:
//!
//! ```text
//! tag [@attr="value"]... [N]
//! ```
//!
//! where the predicates come from [`IndexingPolicy::attributes_in_path`] and
//! the `[N]` index is the occurrence count of the segment's grouping key
//! (tag plus predicates) among its siblings, shown when
//! [`IndexingPolicy::should_show_index`] says so. The root segment is always
//! the bare root tag.

use crate::policy::IndexingPolicy;
use crate::types::{Document, Leaf, Node, NodeKind};
use std::collections::HashMap;

/// Occurrence counts for one parent's children, keyed by tag plus predicate.
#[derive(Debug, Default)]
pub struct SiblingCounters {
    counts: HashMap<String, usize>,
}

impl SiblingCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more occurrence of `key` and return its count (starting at 1).
    pub fn next(&mut self, key: &str) -> usize {
        let count = self.counts.entry(key.to_string()).or_insert(0);
        *count += 1;
        *count
    }
}

/// Render the `[@name="value"]` fragments for the configured attributes.
///
/// Fragments follow the order of `attributes`, not the order the node
/// declares them in. Attributes the node lacks are skipped. Values are
/// written verbatim; [`crate::reverse::strip_qualifiers`] reads them back
/// unless a value contains `"]`.
///
/// ```
/// use leafpath::v1::{Node, traverse};
///
/// let node = Node::new("field")
///     .with_attribute("id", "1")
///     .with_attribute("type", "t");
/// let attrs = vec!["type".to_string(), "id".to_string(), "lang".to_string()];
///
/// assert_eq!(traverse::build_predicate(&node, &attrs), r#"[@type="t"][@id="1"]"#);
/// ```
pub fn build_predicate(node: &Node, attributes: &[String]) -> String {
    let mut predicate = String::new();
    for name in attributes {
        if let Some(value) = node.attribute(name) {
            predicate.push_str(&format!("[@{}=\"{}\"]", name, value));
        }
    }
    predicate
}

pub fn assemble_segment(tag: &str, predicate: &str, index: Option<usize>) -> String {
    match index {
        Some(n) => format!("{}{}[{}]", tag, predicate, n),
        None => format!("{}{}", tag, predicate),
    }
}

pub fn assemble_path(parent: &str, segment: &str) -> String {
    format!("{}/{}", parent, segment)
}

/// Path of a document root: its tag alone, never indexed or predicated.
pub fn root_path(root: &Node) -> String {
    format!("/{}", root.tag)
}

/// Segment for one non-ignored child, advancing its parent's `counters`.
fn child_segment(child: &Node, counters: &mut SiblingCounters, policy: &IndexingPolicy) -> String {
    let predicate = build_predicate(child, &policy.attributes_in_path);
    let key = format!("{}{}", child.tag, predicate);
    let count = counters.next(&key);
    let index = policy
        .should_show_index(&child.tag, count)
        .then_some(count);
    assemble_segment(&child.tag, &predicate, index)
}

/// Absolute paths for the non-ignored children of `node`, in document order.
///
/// Ignored children are dropped before counting, so they never shift the
/// indices of their siblings.
fn child_paths<'a>(
    node: &'a Node,
    parent_path: &str,
    policy: &IndexingPolicy,
) -> Vec<(&'a Node, String)> {
    let mut counters = SiblingCounters::new();
    let mut paths = Vec::with_capacity(node.children.len());

    for child in &node.children {
        if policy.is_ignored(&child.tag) {
            tracing::trace!(tag = %child.tag, parent = parent_path, "skipping ignored element");
            continue;
        }
        let segment = child_segment(child, &mut counters, policy);
        paths.push((child, assemble_path(parent_path, &segment)));
    }

    paths
}

/// Recursively collect the leaves below `node`, which lives at `current_path`.
///
/// Leaves are returned in document (pre-)order. Each level allocates its own
/// copy of the path and uses one stack frame, so prefer [`traverse_iterative`]
/// for deep input.
pub fn traverse(node: &Node, current_path: &str, policy: &IndexingPolicy) -> Vec<Leaf> {
    let mut leaves = Vec::new();
    walk(node, current_path, policy, &mut leaves);
    leaves
}

fn walk(node: &Node, current_path: &str, policy: &IndexingPolicy, out: &mut Vec<Leaf>) {
    if policy.is_ignored(&node.tag) {
        return;
    }
    match node.kind() {
        NodeKind::Leaf => {
            if let Some(text) = node.leaf_text() {
                out.push(Leaf::new(text, current_path));
            }
        }
        NodeKind::Inert => {}
        NodeKind::Branch => {
            for (child, path) in child_paths(node, current_path, policy) {
                walk(child, &path, policy, out);
            }
        }
    }
}

/// A branch whose children are still being visited.
struct Frame<'a> {
    children: std::slice::Iter<'a, Node>,
    counters: SiblingCounters,
    /// Length of the shared path buffer up to and including this branch.
    base_len: usize,
}

impl<'a> Frame<'a> {
    fn new(node: &'a Node, base_len: usize) -> Self {
        Self {
            children: node.children.iter(),
            counters: SiblingCounters::new(),
            base_len,
        }
    }
}

/// Same contract as [`traverse`], using an explicit stack instead of recursion.
///
/// Use this for documents whose nesting depth is not under your control. The
/// current path lives in one buffer that is truncated and extended as the
/// walk moves, so only emitted leaves copy it.
pub fn traverse_iterative(node: &Node, current_path: &str, policy: &IndexingPolicy) -> Vec<Leaf> {
    let mut leaves = Vec::new();
    if policy.is_ignored(&node.tag) {
        return leaves;
    }
    match node.kind() {
        NodeKind::Leaf => {
            if let Some(text) = node.leaf_text() {
                leaves.push(Leaf::new(text, current_path));
            }
            return leaves;
        }
        NodeKind::Inert => return leaves,
        NodeKind::Branch => {}
    }

    let mut path = current_path.to_string();
    let mut stack = vec![Frame::new(node, path.len())];

    while let Some(frame) = stack.last_mut() {
        let Some(child) = frame.children.next() else {
            stack.pop();
            continue;
        };
        path.truncate(frame.base_len);
        if policy.is_ignored(&child.tag) {
            tracing::trace!(tag = %child.tag, parent = %path, "skipping ignored element");
            continue;
        }
        let segment = child_segment(child, &mut frame.counters, policy);
        path.push('/');
        path.push_str(&segment);

        match child.kind() {
            NodeKind::Leaf => {
                if let Some(text) = child.leaf_text() {
                    leaves.push(Leaf::new(text, path.as_str()));
                }
            }
            NodeKind::Inert => {}
            NodeKind::Branch => stack.push(Frame::new(child, path.len())),
        }
    }

    leaves
}

/// Flatten a whole document. A document without a root yields no leaves.
///
/// ```
/// use leafpath::v1::{Document, IndexingPolicy, Node, traverse};
///
/// let doc = Document::new(
///     Node::new("ROOT")
///         .with_child(Node::new("A").with_text("first"))
///         .with_child(Node::new("A").with_text("second")),
/// );
///
/// let lines: Vec<String> = traverse::flatten(&doc, &IndexingPolicy::default())
///     .iter()
///     .map(ToString::to_string)
///     .collect();
/// assert_eq!(lines, vec!["first : /ROOT/A", "second : /ROOT/A[2]"]);
/// ```
pub fn flatten(doc: &Document, policy: &IndexingPolicy) -> Vec<Leaf> {
    let Some(root) = &doc.root else {
        tracing::debug!("document has no root element");
        return Vec::new();
    };
    let leaves = traverse(root, &root_path(root), policy);
    tracing::debug!(root = %root.tag, leaves = leaves.len(), "flattened document");
    leaves
}

/// [`flatten`] backed by [`traverse_iterative`].
pub fn flatten_iterative(doc: &Document, policy: &IndexingPolicy) -> Vec<Leaf> {
    let Some(root) = &doc.root else {
        tracing::debug!("document has no root element");
        return Vec::new();
    };
    let leaves = traverse_iterative(root, &root_path(root), policy);
    tracing::debug!(root = %root.tag, leaves = leaves.len(), "flattened document (iterative)");
    leaves
}
