//! Chain nodes - one arena entry per presented layer.

use crate::screen::Screen;

bitflags::bitflags! {
    /// Lifecycle state of a chain node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NodeFlags: u8 {
        /// The host reported the node's view finished mounting.
        const APPEARED = 1 << 0;
        /// The stack no longer covers this index; the view may still be
        /// animating out.
        const STALE = 1 << 1;
    }
}

/// Arena entry for stack position `index`.
///
/// `screen` is a snapshot taken whenever the stack covered this index, used
/// when the stack shrank but the view is still on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainNode {
    index: usize,
    screen: Screen,
    flags: NodeFlags,
}

impl ChainNode {
    pub(crate) fn new(index: usize, screen: Screen) -> Self {
        Self {
            index,
            screen,
            flags: NodeFlags::empty(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    pub fn is_appeared(&self) -> bool {
        self.flags.contains(NodeFlags::APPEARED)
    }

    pub fn is_stale(&self) -> bool {
        self.flags.contains(NodeFlags::STALE)
    }

    /// Mounted but no longer backed by the stack.
    pub fn is_dismissing(&self) -> bool {
        self.flags.contains(NodeFlags::APPEARED | NodeFlags::STALE)
    }

    /// Re-bind to the stack's current value at this index. A stale node
    /// coming back into range is a new presentation and starts over.
    pub(crate) fn refresh(&mut self, screen: Screen) {
        if self.is_stale() {
            self.flags = NodeFlags::empty();
        }
        self.screen = screen;
    }

    pub(crate) fn set_appeared(&mut self, appeared: bool) {
        self.flags.set(NodeFlags::APPEARED, appeared);
    }

    pub(crate) fn mark_stale(&mut self) {
        self.flags.insert(NodeFlags::STALE);
    }
}

/// Bring the arena in line with the stack.
///
/// In range: refresh or append. Past the end: mark stale, then drop the
/// trailing stale nodes that are no longer mounted.
pub(crate) fn reconcile(nodes: &mut Vec<ChainNode>, screens: &[Screen]) {
    for (index, screen) in screens.iter().enumerate() {
        match nodes.get_mut(index) {
            Some(node) => node.refresh(screen.clone()),
            None => nodes.push(ChainNode::new(index, screen.clone())),
        }
    }

    for node in nodes.iter_mut().skip(screens.len()) {
        node.mark_stale();
    }

    prune(nodes);
    tracing::trace!(len = screens.len(), arena = nodes.len(), "reconciled chain");
}

/// Drop trailing stale nodes that are not mounted.
pub(crate) fn prune(nodes: &mut Vec<ChainNode>) {
    while nodes
        .last()
        .is_some_and(|node| node.is_stale() && !node.is_appeared())
    {
        nodes.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screens(values: &[u32]) -> Vec<Screen> {
        values.iter().copied().map(Screen::new).collect()
    }

    #[test]
    fn test_reconcile_grows_arena() {
        let mut nodes = Vec::new();
        reconcile(&mut nodes, &screens(&[1, 2, 3]));

        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[2].index(), 2);
        assert_eq!(nodes[2].screen(), &Screen::new(3u32));
        assert!(nodes.iter().all(|n| n.flags().is_empty()));
    }

    #[test]
    fn test_shrink_drops_unmounted_nodes() {
        let mut nodes = Vec::new();
        reconcile(&mut nodes, &screens(&[1, 2, 3]));
        reconcile(&mut nodes, &screens(&[1]));
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_shrink_keeps_mounted_snapshot() {
        let mut nodes = Vec::new();
        reconcile(&mut nodes, &screens(&[1, 2, 3]));
        nodes[1].set_appeared(true);

        reconcile(&mut nodes, &screens(&[1]));
        assert_eq!(nodes.len(), 2, "node 1 is still mounted");
        assert!(nodes[1].is_dismissing());
        assert_eq!(nodes[1].screen(), &Screen::new(2u32));

        nodes[1].set_appeared(false);
        prune(&mut nodes);
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_stale_node_back_in_range_starts_over() {
        let mut nodes = Vec::new();
        reconcile(&mut nodes, &screens(&[1, 2]));
        nodes[1].set_appeared(true);
        reconcile(&mut nodes, &screens(&[1]));
        reconcile(&mut nodes, &screens(&[1, 9]));

        assert_eq!(nodes[1].flags(), NodeFlags::empty());
        assert_eq!(nodes[1].screen(), &Screen::new(9u32));
    }

    #[test]
    fn test_refresh_in_range_keeps_appeared() {
        let mut nodes = Vec::new();
        reconcile(&mut nodes, &screens(&[1, 2]));
        nodes[0].set_appeared(true);
        reconcile(&mut nodes, &screens(&[1, 2, 3]));
        assert!(nodes[0].is_appeared());
    }
}
