use std::ops::{Index, IndexMut};

pub(crate) type NodeHandle = usize;

#[derive(Debug, Clone)]
pub(crate) struct SearchNode<S> {
    pub(crate) state: S,
    pub(crate) g_cost: usize,
    pub(crate) f_cost: usize,
    // Cost of the single move from `parent` into this node.
    pub(crate) step_cost: usize,
    pub(crate) parent: Option<NodeHandle>,
}

impl<S> SearchNode<S> {
    pub(crate) fn root(state: S, h_cost: usize) -> Self {
        SearchNode {
            state,
            g_cost: 0,
            f_cost: h_cost,
            step_cost: 0,
            parent: None,
        }
    }
}

/// Owns every node created during one search run. Parents are indices into
/// the arena, so relaxing a frontier node only rewrites its fields.
#[derive(Debug)]
pub(crate) struct NodeArena<S> {
    nodes: Vec<SearchNode<S>>,
}

impl<S> Default for NodeArena<S> {
    fn default() -> Self {
        NodeArena { nodes: Vec::new() }
    }
}

impl<S> NodeArena<S> {
    pub(crate) fn push(&mut self, node: SearchNode<S>) -> NodeHandle {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes on the tree path from the root to `handle`, root first.
    pub(crate) fn lineage(&self, handle: NodeHandle) -> Vec<&SearchNode<S>> {
        let mut lineage = Vec::new();
        let mut current = Some(handle);
        while let Some(index) = current {
            let node = &self.nodes[index];
            lineage.push(node);
            current = node.parent;
        }
        lineage.reverse();
        lineage
    }
}

impl<S> Index<NodeHandle> for NodeArena<S> {
    type Output = SearchNode<S>;

    fn index(&self, handle: NodeHandle) -> &Self::Output {
        &self.nodes[handle]
    }
}

impl<S> IndexMut<NodeHandle> for NodeArena<S> {
    fn index_mut(&mut self, handle: NodeHandle) -> &mut Self::Output {
        &mut self.nodes[handle]
    }
}
