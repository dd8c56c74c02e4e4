//! Arena-backed search tree for the Monte Carlo loop.
//!
//! One invocation owns one `Tree`; nodes are stored in a flat vector and
//! addressed by index, so parent links are plain observing indices and the
//! whole tree is freed at once when the search returns.

use shakmaty::{CastlingMode, Chess, Move, Position};
use std::ops::{Index, IndexMut};

pub type NodeId = usize;

/// Index of the root node in every tree.
pub const ROOT: NodeId = 0;

/// One explored position, reached from the root by a unique move sequence.
#[derive(Debug)]
pub struct Node {
    /// Back-reference to the creating node; `None` only for the root.
    pub parent: Option<NodeId>,
    /// The move that led here from the parent; `None` only for the root.
    pub mv: Option<Move>,
    /// Sum of per-simulation rewards, each in [0, 1].
    pub total_value: f64,
    pub visits: u64,
    /// Legal moves not yet expanded into children. Populated once at
    /// construction; together with the children's moves it partitions the
    /// legal moves of this node's position.
    pub untried_moves: Vec<Move>,
    pub children: Vec<NodeId>,
}

impl Node {
    fn new(parent: Option<NodeId>, mv: Option<Move>, pos: &Chess) -> Self {
        Node {
            parent,
            mv,
            total_value: 0.0,
            visits: 0,
            untried_moves: pos.legal_moves().iter().cloned().collect(),
            children: Vec::new(),
        }
    }

    pub fn has_untried_moves(&self) -> bool {
        !self.untried_moves.is_empty()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Mean reward of this node's subtree, 0.0 before the first visit.
    pub fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_value / self.visits as f64
        }
    }
}

#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(root_pos: &Chess) -> Self {
        Tree {
            nodes: vec![Node::new(None, None, root_pos)],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Materializes a child of `parent` for `mv`, where `pos` is the
    /// position after the move. Returns the new node's id.
    pub fn add_child(&mut self, parent: NodeId, mv: Move, pos: &Chess) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new(Some(parent), Some(mv), pos));
        self.nodes[parent].children.push(id);
        id
    }

    /// Removes and returns a uniformly random untried move of `id`.
    /// Swap-removal keeps the pick O(1) without biasing later draws.
    /// Callers must ensure the node has untried moves left.
    pub fn pop_random_untried(&mut self, id: NodeId, rng: &mut impl rand::Rng) -> Move {
        let untried = &mut self.nodes[id].untried_moves;
        let idx = rng.gen_range(0..untried.len());
        untried.swap_remove(idx)
    }

    /// Renders the explored tree as Graphviz DOT, down to `depth_limit`.
    pub fn to_dot(&self, depth_limit: usize) -> String {
        let mut out = String::from("digraph mcts {\n");
        out.push_str("  node [shape=record, fontname=\"Arial\"];\n");
        self.dot_node(&mut out, ROOT, 0, depth_limit);
        out.push_str("}\n");
        out
    }

    fn dot_node(&self, out: &mut String, id: NodeId, depth: usize, limit: usize) {
        if depth > limit {
            return;
        }

        let node = &self.nodes[id];
        let label = match &node.mv {
            Some(m) => m.to_uci(CastlingMode::Standard).to_string(),
            None => "root".to_string(),
        };
        out.push_str(&format!(
            "  {} [label=\"{{ {} | N:{} | Q:{:.2} }}\"];\n",
            id,
            label,
            node.visits,
            node.mean_value()
        ));

        for &child in &node.children {
            out.push_str(&format!("  {} -> {};\n", id, child));
            self.dot_node(out, child, depth + 1, limit);
        }
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }
}

impl IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }
}
