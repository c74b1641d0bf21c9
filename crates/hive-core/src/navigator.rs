//! Menu navigation and rendering
//!
//! The [`Navigator`] owns the menu tree, the current selection and the
//! scroll window. Buttons move the selection cyclically within the current
//! sibling chain, enter submenus and climb back to the parent entry.
//! Selecting an action entry does not change the selection; the action is
//! handed back to the caller.

use log::debug;

use crate::display::{TextDisplay, format_line, write_row};
use crate::input::Button;
use crate::menu::{MAX_NODES, MenuTree, NodeId, NodeKind};
use crate::text::{Language, text};

/// Result of feeding one button to the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<A> {
    /// Nothing changed, nothing to redraw.
    Ignored,
    /// The selection moved; the menu needs a redraw.
    Moved,
    /// The selected entry's action should run.
    Invoke(A),
}

pub struct Navigator<A, const N: usize = MAX_NODES> {
    tree: MenuTree<A, N>,
    current: NodeId,
    scroll: usize,
    visible_rows: usize,
}

impl<A: Copy, const N: usize> Navigator<A, N> {
    /// Start on the first top-level entry.
    pub fn new(tree: MenuTree<A, N>, visible_rows: u8) -> Self {
        let current = tree.first_top_level();
        Self {
            tree,
            current,
            scroll: 0,
            visible_rows: usize::from(visible_rows.max(1)),
        }
    }

    pub fn tree(&self) -> &MenuTree<A, N> {
        &self.tree
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    pub fn handle(&mut self, button: Button) -> Transition<A> {
        match button {
            Button::None => Transition::Ignored,
            Button::Up => self.up(),
            Button::Down => self.down(),
            Button::Select => self.select(),
            Button::Back => self.back(),
        }
    }

    /// Previous sibling, wrapping to the last one.
    pub fn up(&mut self) -> Transition<A> {
        let target = self
            .tree
            .prev(self.current)
            .unwrap_or_else(|| self.tree.last_sibling(self.current));
        self.move_to(target)
    }

    /// Next sibling, wrapping to the first one.
    pub fn down(&mut self) -> Transition<A> {
        let target = self
            .tree
            .next(self.current)
            .unwrap_or_else(|| self.tree.first_sibling(self.current));
        self.move_to(target)
    }

    /// Climb to the parent entry. A no-op on the top level.
    pub fn back(&mut self) -> Transition<A> {
        match self.tree.parent(self.current) {
            Some(parent) if parent != self.tree.root() => self.move_to(parent),
            _ => Transition::Ignored,
        }
    }

    pub fn select(&mut self) -> Transition<A> {
        match self.tree.node(self.current).kind {
            NodeKind::Action(action) => Transition::Invoke(action),
            NodeKind::Submenu(child) => self.move_to(child),
            NodeKind::Inert => Transition::Ignored,
        }
    }

    fn move_to(&mut self, target: NodeId) -> Transition<A> {
        // Cycling a one-entry chain keeps the selection where it is.
        if target == self.current {
            return Transition::Ignored;
        }

        self.current = target;
        let index = self.tree.index_in_group(target);
        if index < self.scroll {
            self.scroll = index;
        } else if index >= self.scroll + self.visible_rows {
            self.scroll = index + 1 - self.visible_rows;
        }

        debug!(
            "Menu selection {:?} (index {}, scroll {})",
            self.tree.label(target),
            index,
            self.scroll
        );
        Transition::Moved
    }

    /// Render the visible part of the current sibling chain.
    pub fn draw<D: TextDisplay>(&self, display: &mut D, language: Language) {
        let mut rows = self.tree.siblings(self.current).skip(self.scroll);

        for row in 0..self.visible_rows {
            match rows.next() {
                Some(id) => {
                    let marker = if id == self.current { '>' } else { ' ' };
                    let line =
                        format_line(format_args!("{}{}", marker, text(self.tree.label(id), language)));
                    write_row(display, row as u8, &line);
                }
                None => write_row(display, row as u8, ""),
            }
        }
    }
}
