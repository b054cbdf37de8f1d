use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Document
// ============================================================================

/// A parsed markup document.
///
/// `root` is `None` for input that contains no element at all (an empty or
/// whitespace-only file). Flattening such a document yields no leaves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub root: Option<Node>,
}

impl Document {
    pub fn new(root: Node) -> Self {
        Self { root: Some(root) }
    }

    pub fn empty() -> Self {
        Self { root: None }
    }
}

// ============================================================================
// Node
// ============================================================================

/// One element of the input tree.
///
/// Whether a node is emitted, recursed into, or ignored depends only on its
/// shape, see [`Node::kind`]:
///
/// - a node with child elements is a **branch**; any text it carries is
///   ignored,
/// - a childless node whose trimmed text is non-empty is a **leaf**,
/// - anything else is **inert**.
///
/// # Builder API
///
/// ```
/// use leafpath::v1::{Node, NodeKind};
///
/// let item = Node::new("item")
///     .with_attribute("id", "7")
///     .with_child(Node::new("name").with_text("widget"))
///     .with_child(Node::new("price").with_text(" 9.99 "));
///
/// assert_eq!(item.kind(), NodeKind::Branch);
/// assert_eq!(item.children[1].leaf_text(), Some("9.99"));
/// assert_eq!(item.attribute("id"), Some("7"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Structural classification of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Branch,
    Leaf,
    Inert,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Value of the named attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn kind(&self) -> NodeKind {
        if !self.children.is_empty() {
            NodeKind::Branch
        } else if self.leaf_text().is_some() {
            NodeKind::Leaf
        } else {
            NodeKind::Inert
        }
    }

    /// Trimmed text of a childless node, or `None` when there is nothing to emit.
    pub fn leaf_text(&self) -> Option<&str> {
        if !self.children.is_empty() {
            return None;
        }
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Children are freed from an explicit worklist so that dropping a very deep
/// tree does not recurse once per level.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut child) = pending.pop() {
            pending.append(&mut child.children);
        }
    }
}

// ============================================================================
// Leaf
// ============================================================================

/// One emitted `(value, path)` pair.
///
/// Renders as `value : path`, the line format consumed by
/// [`crate::reverse`] and the `leafpath` CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    pub value: String,
    pub path: String,
}

impl Leaf {
    pub fn new(value: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.value, self.path)
    }
}

/// Join leaves into newline-separated `value : path` lines (no trailing newline).
pub fn render_lines(leaves: &[Leaf]) -> String {
    leaves
        .iter()
        .map(Leaf::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_branch_ignores_text() {
        let node = Node::new("a")
            .with_text("ignored")
            .with_child(Node::new("b").with_text("x"));
        assert_eq!(node.kind(), NodeKind::Branch);
        assert_eq!(node.leaf_text(), None);
    }

    #[test]
    fn test_kind_leaf_and_inert() {
        assert_eq!(Node::new("a").with_text(" x ").kind(), NodeKind::Leaf);
        assert_eq!(Node::new("a").with_text("   \n").kind(), NodeKind::Inert);
        assert_eq!(Node::new("a").kind(), NodeKind::Inert);
    }

    #[test]
    fn test_attribute_lookup() {
        let node = Node::new("a")
            .with_attribute("id", "1")
            .with_attribute("type", "t");
        assert_eq!(node.attribute("type"), Some("t"));
        assert_eq!(node.attribute("missing"), None);
    }

    #[test]
    fn test_leaf_display() {
        assert_eq!(Leaf::new("X", "/ROOT").to_string(), "X : /ROOT");
    }

    #[test]
    fn test_render_lines() {
        let leaves = vec![Leaf::new("1", "/r/a"), Leaf::new("2", "/r/a[2]")];
        assert_eq!(render_lines(&leaves), "1 : /r/a\n2 : /r/a[2]");
        assert_eq!(render_lines(&[]), "");
    }

    #[test]
    fn test_drop_deep_tree() {
        let mut node = Node::new("n").with_text("bottom");
        for _ in 0..200_000 {
            node = Node::new("n").with_child(node);
        }
        drop(node);
    }

    #[test]
    fn test_drop_wide_and_deep_tree() {
        let mut node = Node::new("n");
        for i in 0..10_000 {
            node = Node::new("n")
                .with_child(Node::new("x").with_text(i.to_string()))
                .with_child(node);
        }
        assert_eq!(node.children.len(), 2);
        drop(node);
    }

    #[test]
    fn test_node_json_roundtrip_skips_empty_fields() {
        let node = Node::new("a").with_text("x");
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"tag":"a","text":"x"}"#);
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
