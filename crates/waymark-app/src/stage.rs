#![forbid(unsafe_code)]

//! Retained tree of text views.
//!
//! The stage is what presenters render into: a tree of nodes, each
//! holding one [`View`]. Drawing walks the tree depth-first and
//! concatenates every view's markup lines, so sibling order is layout
//! order.
//!
//! # Invariants
//!
//! 1. Node ids are unique for the lifetime of the stage and never reused.
//! 2. [`Stage::replace`] keeps the sibling position of the old node and
//!    drops the old node's subtree.
//! 3. Unmounting a node unmounts its whole subtree.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Handle to a mounted node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

/// Where a new child lands among its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountPoint {
    Front,
    Back,
}

/// Lines of text a view wants on screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Markup {
    lines: Vec<String>,
}

impl Markup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Something the stage can draw.
pub trait View {
    fn markup(&self) -> Markup;
}

struct Node {
    id: NodeId,
    view: Rc<dyn View>,
    children: Vec<Node>,
}

impl Node {
    fn leaf(id: NodeId, view: Rc<dyn View>) -> Self {
        Self {
            id,
            view,
            children: Vec::new(),
        }
    }
}

/// The view tree. Shared by every presenter through `Rc`.
#[derive(Default)]
pub struct Stage {
    roots: RefCell<Vec<Node>>,
    next_id: Cell<u64>,
}

impl Stage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> NodeId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        NodeId(id)
    }

    /// Mount a view at the top level.
    pub fn mount_root(&self, at: MountPoint, view: Rc<dyn View>) -> NodeId {
        let id = self.next_id();
        let node = Node::leaf(id, view);
        match at {
            MountPoint::Front => self.roots.borrow_mut().insert(0, node),
            MountPoint::Back => self.roots.borrow_mut().push(node),
        }
        id
    }

    /// Mount a view under `parent`. Returns `None` when the parent is no
    /// longer mounted.
    pub fn mount(&self, parent: NodeId, at: MountPoint, view: Rc<dyn View>) -> Option<NodeId> {
        let id = self.next_id();
        let mut roots = self.roots.borrow_mut();
        let parent = find_mut(&mut roots, parent)?;
        let node = Node::leaf(id, view);
        match at {
            MountPoint::Front => parent.children.insert(0, node),
            MountPoint::Back => parent.children.push(node),
        }
        Some(id)
    }

    /// Swap the view at `old` for a fresh node in the same position.
    ///
    /// The old subtree is dropped. Returns the replacement's id, or
    /// `None` when `old` is not mounted.
    pub fn replace(&self, old: NodeId, view: Rc<dyn View>) -> Option<NodeId> {
        let id = self.next_id();
        let mut roots = self.roots.borrow_mut();
        let slot = find_mut(&mut roots, old)?;
        *slot = Node::leaf(id, view);
        Some(id)
    }

    /// Remove a node and its subtree. Returns whether anything was
    /// removed.
    pub fn unmount(&self, id: NodeId) -> bool {
        remove(&mut self.roots.borrow_mut(), id)
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        fn walk(nodes: &[Node], id: NodeId) -> bool {
            nodes
                .iter()
                .any(|node| node.id == id || walk(&node.children, id))
        }
        walk(&self.roots.borrow(), id)
    }

    /// Every mounted view's markup, in layout order.
    #[must_use]
    pub fn render_lines(&self) -> Vec<String> {
        fn walk(nodes: &[Node], out: &mut Vec<String>) {
            for node in nodes {
                out.extend(node.view.markup().lines.iter().cloned());
                walk(&node.children, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.roots.borrow(), &mut out);
        out
    }

    /// The whole tree as one string, lines joined with `\n`.
    #[must_use]
    pub fn render(&self) -> String {
        self.render_lines().join("\n")
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn count(nodes: &[Node]) -> usize {
            nodes.len() + nodes.iter().map(|n| count(&n.children)).sum::<usize>()
        }
        f.debug_struct("Stage")
            .field("nodes", &count(&self.roots.borrow()))
            .finish()
    }
}

fn find_mut(nodes: &mut Vec<Node>, id: NodeId) -> Option<&mut Node> {
    for node in nodes.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

fn remove(nodes: &mut Vec<Node>, id: NodeId) -> bool {
    if let Some(index) = nodes.iter().position(|node| node.id == id) {
        nodes.remove(index);
        return true;
    }
    nodes.iter_mut().any(|node| remove(&mut node.children, id))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
