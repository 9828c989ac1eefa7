use crate::tags;
use indexmap::IndexMap;
use indextree::{Arena, NodeId};

/// Element attributes in source order
pub type Attributes = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Document,
    Doctype(String),
    Element { tag: String, attributes: Attributes },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub kind: NodeKind,
}

impl NodeData {
    pub fn new(kind: NodeKind) -> Self {
        Self { kind }
    }
}

/// Arena-backed document tree.
///
/// Every node lives in one arena; parent links are indices, so moving a
/// subtree is a detach plus an append.
#[derive(Debug, Clone, Default)]
pub struct Dom {
    arena: Arena<NodeData>,
}

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        self.arena.new_node(NodeData::new(kind))
    }

    pub fn create_element(&mut self, tag: impl Into<String>, attributes: Attributes) -> NodeId {
        self.create(NodeKind::Element {
            tag: tag.into(),
            attributes,
        })
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.create(NodeKind::Text(text.into()))
    }

    pub fn create_document(&mut self) -> NodeId {
        self.create(NodeKind::Document)
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.arena
            .get(id)
            .filter(|node| !node.is_removed())
            .map(|node| &node.get().kind)
    }

    pub fn kind_mut(&mut self, id: NodeId) -> Option<&mut NodeKind> {
        self.arena
            .get_mut(id)
            .filter(|node| !node.is_removed())
            .map(|node| &mut node.get_mut().kind)
    }

    /// Tag of an element node
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            Some(NodeKind::Element { tag, .. }) => Some(tag),
            _ => None,
        }
    }

    pub fn attributes(&self, id: NodeId) -> Option<&Attributes> {
        match self.kind(id) {
            Some(NodeKind::Element { attributes, .. }) => Some(attributes),
            _ => None,
        }
    }

    pub fn is_element(&self, id: NodeId, tag: &str) -> bool {
        self.tag(id).map_or(false, |t| tags::tag_eq(t, tag))
    }

    /// Text nodes made only of whitespace
    pub fn is_whitespace(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Text(text)) if text.trim().is_empty())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|node| node.parent())
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        id.children(&self.arena).collect()
    }

    /// Children other than whitespace-only text
    pub fn significant_children(&self, id: NodeId) -> Vec<NodeId> {
        id.children(&self.arena)
            .filter(|child| !self.is_whitespace(*child))
            .collect()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|node| node.first_child())
    }

    /// All nodes of the subtree rooted at `id`, in document order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        id.descendants(&self.arena).collect()
    }

    /// First element with the given tag in document order, including `root`
    pub fn find_element(&self, root: NodeId, tag: &str) -> Option<NodeId> {
        root.descendants(&self.arena).find(|id| self.is_element(*id, tag))
    }

    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        child.detach(&mut self.arena);
        parent.append(child, &mut self.arena);
    }

    pub fn insert_before(&mut self, anchor: NodeId, node: NodeId) {
        node.detach(&mut self.arena);
        anchor.insert_before(node, &mut self.arena);
    }

    pub fn detach(&mut self, id: NodeId) {
        id.detach(&mut self.arena);
    }

    /// Remove a node together with its subtree
    pub fn remove(&mut self, id: NodeId) {
        id.remove_subtree(&mut self.arena);
    }

    /// Move every child of `from` to the end of `to`
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        for child in self.children(from) {
            self.append(to, child);
        }
    }

    /// Move every child of `from` in front of `anchor`
    pub fn move_children_before(&mut self, from: NodeId, anchor: NodeId) {
        for child in self.children(from) {
            self.insert_before(anchor, child);
        }
    }

    /// Put `replacement` where `target` is and remove `target`
    pub fn replace(&mut self, target: NodeId, replacement: NodeId) {
        if self.parent(target).is_some() {
            self.insert_before(target, replacement);
        }
        self.remove(target);
    }

    /// Turn an element into a bare element with a new tag
    pub fn retag(&mut self, id: NodeId, tag: &str) {
        for child in self.children(id) {
            self.remove(child);
        }
        if let Some(kind) = self.kind_mut(id) {
            *kind = NodeKind::Element {
                tag: tag.to_string(),
                attributes: Attributes::new(),
            };
        }
    }

    /// Number of live nodes in the arena
    pub fn count(&self) -> usize {
        self.arena.iter().filter(|node| !node.is_removed()).count()
    }
}
