//! Checked construction of a [`MenuTree`]

use heapless::Vec;
use log::{debug, error};

use super::{MAX_NODES, MenuError, MenuNode, MenuTree, NodeId, NodeKind};
use crate::text::TextId;

/// One entry of a group passed to [`MenuBuilder::add_group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry<A> {
    Action(TextId, A),
    /// Filled by a later `add_group` on this entry.
    Submenu(TextId),
    Inert(TextId),
}

/// A sibling chain added to the builder. Its nodes have consecutive ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group {
    first: NodeId,
    len: u8,
}

impl Group {
    pub fn first(&self) -> NodeId {
        self.first
    }

    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The `index`-th entry of the group.
    pub fn nth(&self, index: usize) -> Option<NodeId> {
        (index < self.len()).then(|| NodeId(self.first.0 + index as u8))
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot<A> {
    Action(A),
    Branch(Option<NodeId>),
    Inert,
}

#[derive(Debug, Clone, Copy)]
struct Draft<A> {
    label: TextId,
    slot: Slot<A>,
    next: Option<NodeId>,
    prev: Option<NodeId>,
    parent: Option<NodeId>,
}

/// Builds a menu group by group.
///
/// The builder starts with the synthetic root. Each [`add_group`] call
/// appends one sibling chain under a root or submenu entry and wires its
/// `next`/`prev`/`parent` links.
///
/// [`add_group`]: MenuBuilder::add_group
pub struct MenuBuilder<A, const N: usize = MAX_NODES> {
    nodes: Vec<Draft<A>, N>,
}

impl<A: Copy, const N: usize> Default for MenuBuilder<A, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Copy, const N: usize> MenuBuilder<A, N> {
    pub fn new() -> Self {
        let mut nodes = Vec::new();
        // A zero-capacity arena is caught by `build`.
        nodes
            .push(Draft {
                label: TextId::Back,
                slot: Slot::Branch(None),
                next: None,
                prev: None,
                parent: None,
            })
            .ok();
        Self { nodes }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Append `entries` as the submenu of `parent`.
    pub fn add_group(&mut self, parent: NodeId, entries: &[Entry<A>]) -> Result<Group, MenuError> {
        if entries.is_empty() {
            return Err(MenuError::EmptyGroup);
        }

        let slot = self
            .nodes
            .get(parent.index())
            .map(|d| d.slot)
            .ok_or(MenuError::CapacityExceeded)?;
        match slot {
            Slot::Branch(None) => {}
            Slot::Branch(Some(_)) => return Err(MenuError::DuplicateGroup),
            Slot::Action(_) | Slot::Inert => return Err(MenuError::ActionCannotNest),
        }

        let start = self.nodes.len();
        if start + entries.len() > N.min(usize::from(u8::MAX) + 1) {
            error!("Menu group of {} entries overflows the arena", entries.len());
            return Err(MenuError::CapacityExceeded);
        }

        for (i, entry) in entries.iter().enumerate() {
            let at = start + i;
            let (label, slot) = match *entry {
                Entry::Action(label, action) => (label, Slot::Action(action)),
                Entry::Submenu(label) => (label, Slot::Branch(None)),
                Entry::Inert(label) => (label, Slot::Inert),
            };
            let draft = Draft {
                label,
                slot,
                prev: (i > 0).then(|| NodeId((at - 1) as u8)),
                next: (i + 1 < entries.len()).then(|| NodeId((at + 1) as u8)),
                parent: Some(parent),
            };
            self.nodes
                .push(draft)
                .map_err(|_| MenuError::CapacityExceeded)?;
        }

        let first = NodeId(start as u8);
        self.nodes[parent.index()].slot = Slot::Branch(Some(first));
        debug!(
            "Menu group of {} entries under node {}",
            entries.len(),
            parent.index()
        );

        Ok(Group {
            first,
            len: entries.len() as u8,
        })
    }

    /// Freeze the tree. Every submenu entry must have received a group.
    pub fn build(self) -> Result<MenuTree<A, N>, MenuError> {
        match self.nodes.first().map(|root| root.slot) {
            Some(Slot::Branch(Some(_))) => {}
            _ => return Err(MenuError::EmptyMenu),
        }

        let mut nodes = Vec::new();
        for draft in &self.nodes {
            let kind = match draft.slot {
                Slot::Action(action) => NodeKind::Action(action),
                Slot::Branch(Some(child)) => NodeKind::Submenu(child),
                Slot::Branch(None) => {
                    error!("Submenu {:?} has no entries", draft.label);
                    return Err(MenuError::EmptyGroup);
                }
                Slot::Inert => NodeKind::Inert,
            };
            nodes
                .push(MenuNode {
                    label: draft.label,
                    kind,
                    next: draft.next,
                    prev: draft.prev,
                    parent: draft.parent,
                })
                .map_err(|_| MenuError::CapacityExceeded)?;
        }

        Ok(MenuTree::from_nodes(nodes))
    }
}
