//! Menu tree
//!
//! The menu is an arena of [`MenuNode`]s addressed by [`NodeId`]. Sibling,
//! parent and child relations are stored as indices, so navigation is O(1)
//! in every direction and no node owns another.
//!
//! Node 0 is a synthetic root. It is never shown or selected; its child is
//! the first top-level entry and every top-level entry names it as parent.
//!
//! ```text
//!  root
//!   └─ Status ─ Time ─ ... ─ Calibration ─ Language ─ SD Info ─ Back
//!                               └─ Tare ─ Calibrate ─ ... ─ Summary ─ Back
//! ```
//!
//! Trees are put together with [`MenuBuilder`] once at boot and never change
//! afterwards.

pub mod builder;
pub mod layout;

pub use builder::{Entry, Group, MenuBuilder};
pub use layout::{MenuAction, build_hive_menu};

use heapless::Vec;
use thiserror_no_std::Error;

use crate::text::TextId;

/// Node capacity of the device menu.
pub const MAX_NODES: usize = 32;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuError {
    #[error("menu has more nodes than the arena holds")]
    CapacityExceeded,
    #[error("menu group has no entries")]
    EmptyGroup,
    #[error("action entries cannot own a submenu")]
    ActionCannotNest,
    #[error("submenu already has a group")]
    DuplicateGroup,
    #[error("menu has no top-level entries")]
    EmptyMenu,
}

/// Stable handle of a node inside its [`MenuTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u8);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// What selecting a node does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind<A> {
    /// Runs an action.
    Action(A),
    /// Descends into the group starting at the given node.
    Submenu(NodeId),
    /// Nothing.
    Inert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuNode<A> {
    pub label: TextId,
    pub kind: NodeKind<A>,
    pub next: Option<NodeId>,
    pub prev: Option<NodeId>,
    pub parent: Option<NodeId>,
}

/// Immutable, fully linked menu.
#[derive(Debug, Clone)]
pub struct MenuTree<A, const N: usize = MAX_NODES> {
    nodes: Vec<MenuNode<A>, N>,
}

impl<A: Copy, const N: usize> MenuTree<A, N> {
    /// Only [`MenuBuilder::build`] creates trees; it checks the wiring.
    pub(crate) fn from_nodes(nodes: Vec<MenuNode<A>, N>) -> Self {
        Self { nodes }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// First top-level entry. The initial selection.
    pub fn first_top_level(&self) -> NodeId {
        self.child(NodeId::ROOT).unwrap_or(NodeId::ROOT)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| NodeId(i as u8))
    }

    pub fn node(&self, id: NodeId) -> &MenuNode<A> {
        &self.nodes[id.index()]
    }

    pub fn label(&self, id: NodeId) -> TextId {
        self.node(id).label
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next
    }

    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn child(&self, id: NodeId) -> Option<NodeId> {
        match self.node(id).kind {
            NodeKind::Submenu(child) => Some(child),
            _ => None,
        }
    }

    pub fn action(&self, id: NodeId) -> Option<A> {
        match self.node(id).kind {
            NodeKind::Action(action) => Some(action),
            _ => None,
        }
    }

    pub fn first_sibling(&self, id: NodeId) -> NodeId {
        let mut at = id;
        while let Some(prev) = self.prev(at) {
            at = prev;
        }
        at
    }

    pub fn last_sibling(&self, id: NodeId) -> NodeId {
        let mut at = id;
        while let Some(next) = self.next(at) {
            at = next;
        }
        at
    }

    /// 0-based rank of `id` within its sibling chain.
    pub fn index_in_group(&self, id: NodeId) -> usize {
        let mut at = id;
        let mut index = 0;
        while let Some(prev) = self.prev(at) {
            at = prev;
            index += 1;
        }
        index
    }

    /// The sibling chain containing `id`, front to back.
    pub fn siblings(&self, id: NodeId) -> Siblings<'_, A, N> {
        Siblings {
            tree: self,
            at: Some(self.first_sibling(id)),
        }
    }

    pub fn group_len(&self, id: NodeId) -> usize {
        self.siblings(id).count()
    }

    /// Whether `ancestor` lies on the parent path of `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut at = self.parent(id);
        // A parent path is never longer than the arena.
        for _ in 0..self.nodes.len() {
            match at {
                Some(p) if p == ancestor => return true,
                Some(p) => at = self.parent(p),
                None => return false,
            }
        }
        false
    }
}

/// Iterator over one sibling chain.
pub struct Siblings<'t, A, const N: usize> {
    tree: &'t MenuTree<A, N>,
    at: Option<NodeId>,
}

impl<A: Copy, const N: usize> Iterator for Siblings<'_, A, N> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.at?;
        self.at = self.tree.next(current);
        Some(current)
    }
}
