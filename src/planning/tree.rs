//! Generic incremental search tree for RRT planners.
//!
//! All nodes for one planning attempt live in a single growable arena and
//! refer to each other by index, never by reference. The arena (and every
//! handle into it) is discarded atomically on `reset`, so there is no
//! per-node deletion and no way to leave a dangling parent or child link.

use itertools::Itertools;
use ordered_float::OrderedFloat;
use rand::Rng;

use crate::common::{PlannerError, PlannerResult, StateSpace};

/// Bounded retry count for `connect`. A single unobstructed step rarely
/// reaches a distant target; the connect loop walks toward it one step at
/// a time, checking every intermediate segment.
const MAX_CONNECT_ATTEMPTS: usize = 50;

/// Stable handle to a node in a [`Tree`] arena.
///
/// Handles are only meaningful for the tree that issued them and only
/// until that tree's next `reset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// One sampled state plus its links into the arena.
#[derive(Debug, Clone)]
pub struct TreeNode<T> {
    state: T,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    leaf: bool,
}

impl<T> TreeNode<T> {
    /// The point in the state space this node represents.
    pub fn state(&self) -> &T {
        &self.state
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Whether no node has been inserted with this node as its parent.
    pub fn is_leaf(&self) -> bool {
        self.leaf
    }
}

/// Arena-backed search tree over an abstract state type.
///
/// The tree owns every node created during one planning attempt and is
/// reset at the start of each run; it has no meaningful existence outside
/// an active attempt. Growth is append-only: nodes are never removed
/// individually.
#[derive(Debug, Clone)]
pub struct Tree<T> {
    nodes: Vec<TreeNode<T>>,
    step: f64,
}

impl<T: Clone + PartialEq> Tree<T> {
    /// Create an empty tree grown by hand through `insert_child`, for
    /// growth rules that build their own candidate states (the velocity
    /// planner integrates accelerations and never calls `extend`).
    pub fn new() -> Self {
        Self::with_step(0.0)
    }

    /// Create an empty tree growing by at most `step` per `extend`.
    pub fn with_step(step: f64) -> Self {
        Self { nodes: Vec::new(), step }
    }

    /// Max distance between a node and its parent; zero for trees that
    /// are grown by hand.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Discard all nodes so the tree can be seeded again. Idempotent.
    pub fn reset(&mut self) {
        self.nodes.clear();
    }

    /// Seed the tree with its single root node.
    ///
    /// Fails if nodes already exist; call `reset` first.
    pub fn insert_root(&mut self, state: T) -> PlannerResult<NodeId> {
        if !self.nodes.is_empty() {
            return Err(PlannerError::InvalidInput(
                "tree already seeded; reset before inserting a new root".to_string(),
            ));
        }
        self.nodes.push(TreeNode {
            state,
            parent: None,
            children: Vec::new(),
            leaf: true,
        });
        Ok(NodeId(0))
    }

    /// Register `state` as a new child of `parent`.
    ///
    /// Used directly by growth rules that build their candidate states
    /// themselves (the velocity planner integrates accelerations instead
    /// of stepping toward samples); `extend` goes through here too.
    pub fn insert_child(&mut self, parent: NodeId, state: T) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            state,
            parent: Some(parent),
            children: Vec::new(),
            leaf: true,
        });
        let parent_node = &mut self.nodes[parent.0];
        parent_node.children.push(id);
        parent_node.leaf = false;
        id
    }

    pub fn node(&self, id: NodeId) -> &TreeNode<T> {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The root node, or `None` if the tree is empty.
    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() { None } else { Some(NodeId(0)) }
    }

    /// The most recently inserted node.
    pub fn last(&self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(NodeId(self.nodes.len() - 1))
        }
    }

    /// Number of ancestors of `id`; 0 for the root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut n = 0;
        let mut current = self.nodes[id.0].parent;
        while let Some(p) = current {
            n += 1;
            current = self.nodes[p.0].parent;
        }
        n
    }

    /// A node drawn uniformly at random from the tree.
    pub fn random_node<R: Rng>(&self, rng: &mut R) -> Option<NodeId> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(NodeId(rng.gen_range(0..self.nodes.len())))
        }
    }

    /// The node minimizing squared distance to `target`, or `None` on an
    /// empty tree. Ties break toward insertion order, keeping the search
    /// deterministic for a fixed insertion sequence.
    pub fn nearest<S>(&self, space: &S, target: &T) -> Option<NodeId>
    where
        S: StateSpace<State = T>,
    {
        self.nodes
            .iter()
            .position_min_by_key(|node| {
                let d = space.distance(&node.state, target);
                OrderedFloat(d * d)
            })
            .map(NodeId)
    }

    /// Grow the tree one bounded step toward `target`.
    ///
    /// If `base` is `None` the nearest existing node is used. The
    /// candidate state is `target` itself when within one step, otherwise
    /// exactly one step toward it. The full segment from the base state
    /// to `target` is validated, not just the short step, so directions
    /// that pass through an obstacle are rejected even when the step
    /// itself looks clear. On failure the tree is unchanged.
    pub fn extend<S>(&mut self, space: &S, target: &T, base: Option<NodeId>) -> Option<NodeId>
    where
        S: StateSpace<State = T>,
    {
        let base = match base {
            Some(id) => id,
            None => self.nearest(space, target)?,
        };
        let base_state = self.nodes[base.0].state.clone();

        if !space.segment_is_valid(&base_state, target) {
            return None;
        }

        let candidate = space.step_toward(&base_state, target, self.step);
        Some(self.insert_child(base, candidate))
    }

    /// Walk toward `target` with chained `extend` calls until a produced
    /// state equals `target` exactly.
    ///
    /// Returns the connecting node on success; `None` the moment any
    /// extension fails or the retry bound is exhausted.
    pub fn connect<S>(&mut self, space: &S, target: &T) -> Option<NodeId>
    where
        S: StateSpace<State = T>,
    {
        let mut from = None;
        for _ in 0..MAX_CONNECT_ATTEMPTS {
            let node = self.extend(space, target, from)?;
            if self.nodes[node.0].state == *target {
                return Some(node);
            }
            from = Some(node);
        }
        None
    }

    /// States along the parent chain from `id` to the root.
    ///
    /// Root-to-node order by default; node-to-root when `reverse` is set.
    /// Output capacity is reserved up front from the known chain length.
    pub fn states_to_root(&self, id: NodeId, reverse: bool) -> Vec<T> {
        let mut out = Vec::with_capacity(self.depth(id) + 1);
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id.0];
            out.push(node.state.clone());
            current = node.parent;
        }
        if !reverse {
            out.reverse();
        }
        out
    }

    /// Parent/child state pairs for every edge, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&T, &T)> {
        self.nodes.iter().filter_map(move |node| {
            node.parent
                .map(|p| (&self.nodes[p.0].state, &node.state))
        })
    }
}

impl<T: Clone + PartialEq> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    /// Planar test space with an optional blocking circle.
    struct PlaneSpace {
        blocked: Option<(Vector2<f64>, f64)>,
    }

    impl PlaneSpace {
        fn open() -> Self {
            Self { blocked: None }
        }

        fn with_circle(center: Vector2<f64>, radius: f64) -> Self {
            Self { blocked: Some((center, radius)) }
        }
    }

    impl StateSpace for PlaneSpace {
        type State = Vector2<f64>;

        fn state_is_valid(&self, state: &Vector2<f64>) -> bool {
            match self.blocked {
                Some((c, r)) => (state - c).norm() > r,
                None => true,
            }
        }

        fn segment_is_valid(&self, from: &Vector2<f64>, to: &Vector2<f64>) -> bool {
            // sampled check is good enough for tests
            (0..=20).all(|i| {
                let t = i as f64 / 20.0;
                self.state_is_valid(&(from + (to - from) * t))
            })
        }

        fn random_state(&self) -> Vector2<f64> {
            Vector2::zeros()
        }

        fn distance(&self, a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
            (a - b).norm()
        }

        fn step_toward(
            &self,
            from: &Vector2<f64>,
            to: &Vector2<f64>,
            step: f64,
        ) -> Vector2<f64> {
            let delta = to - from;
            let d = delta.norm();
            if d < step { *to } else { from + delta / d * step }
        }
    }

    #[test]
    fn test_nearest_picks_closest_node() {
        let space = PlaneSpace::open();
        let mut tree = Tree::with_step(1.0);
        let root = tree.insert_root(Vector2::new(0.0, 0.0)).unwrap();
        let a = tree.insert_child(root, Vector2::new(5.0, 0.0));
        tree.insert_child(a, Vector2::new(10.0, 0.0));

        let found = tree.nearest(&space, &Vector2::new(6.0, 0.0)).unwrap();
        assert_eq!(*tree.node(found).state(), Vector2::new(5.0, 0.0));
    }

    #[test]
    fn test_nearest_tie_breaks_by_insertion_order() {
        let space = PlaneSpace::open();
        let mut tree = Tree::with_step(1.0);
        let root = tree.insert_root(Vector2::new(-1.0, 0.0)).unwrap();
        tree.insert_child(root, Vector2::new(1.0, 0.0));

        // both nodes are exactly 1.0 from the origin
        let found = tree.nearest(&space, &Vector2::new(0.0, 0.0)).unwrap();
        assert_eq!(found, root);
    }

    #[test]
    fn test_nearest_on_empty_tree() {
        let space = PlaneSpace::open();
        let tree: Tree<Vector2<f64>> = Tree::with_step(1.0);
        assert!(tree.nearest(&space, &Vector2::zeros()).is_none());
    }

    #[test]
    fn test_insert_root_twice_fails() {
        // nothing here pins the state type, so annotate it
        let mut tree: Tree<Vector2<f64>> = Tree::with_step(1.0);
        tree.insert_root(Vector2::zeros()).unwrap();
        assert!(tree.insert_root(Vector2::zeros()).is_err());

        tree.reset();
        assert!(tree.insert_root(Vector2::zeros()).is_ok());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut tree: Tree<Vector2<f64>> = Tree::with_step(1.0);
        tree.reset();
        tree.reset();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_leaf_flags_and_depth() {
        let mut tree = Tree::with_step(1.0);
        let root = tree.insert_root(Vector2::new(0.0, 0.0)).unwrap();
        let a = tree.insert_child(root, Vector2::new(1.0, 0.0));
        let b = tree.insert_child(a, Vector2::new(2.0, 0.0));

        assert!(!tree.node(root).is_leaf());
        assert!(!tree.node(a).is_leaf());
        assert!(tree.node(b).is_leaf());
        assert_eq!(tree.depth(root), 0);
        assert_eq!(tree.depth(b), 2);
        assert_eq!(tree.node(b).parent(), Some(a));
    }

    #[test]
    fn test_extend_caps_step_length() {
        let space = PlaneSpace::open();
        let mut tree = Tree::with_step(1.0);
        tree.insert_root(Vector2::new(0.0, 0.0)).unwrap();

        let id = tree.extend(&space, &Vector2::new(10.0, 0.0), None).unwrap();
        assert_eq!(*tree.node(id).state(), Vector2::new(1.0, 0.0));

        // within one step the target is adopted exactly
        let id = tree
            .extend(&space, &Vector2::new(1.5, 0.0), Some(id))
            .unwrap();
        assert_eq!(*tree.node(id).state(), Vector2::new(1.5, 0.0));
    }

    #[test]
    fn test_extend_rejects_blocked_direction() {
        // obstacle fully covering the straight path from (0,0) to (10,0)
        let space = PlaneSpace::with_circle(Vector2::new(5.0, 0.0), 2.0);
        let mut tree = Tree::with_step(1.0);
        tree.insert_root(Vector2::new(0.0, 0.0)).unwrap();

        assert!(tree.extend(&space, &Vector2::new(10.0, 0.0), None).is_none());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_connect_reaches_clear_target() {
        let space = PlaneSpace::open();
        let mut tree = Tree::with_step(1.0);
        tree.insert_root(Vector2::new(0.0, 0.0)).unwrap();

        let id = tree.connect(&space, &Vector2::new(10.0, 0.0)).unwrap();
        assert_eq!(*tree.node(id).state(), Vector2::new(10.0, 0.0));
    }

    #[test]
    fn test_connect_fails_through_obstacle() {
        let space = PlaneSpace::with_circle(Vector2::new(5.0, 0.0), 2.0);
        let mut tree = Tree::with_step(1.0);
        tree.insert_root(Vector2::new(0.0, 0.0)).unwrap();

        assert!(tree.connect(&space, &Vector2::new(10.0, 0.0)).is_none());
    }

    #[test]
    fn test_connect_respects_retry_bound() {
        // target is 100 steps away; 50 chained extends cannot reach it
        let space = PlaneSpace::open();
        let mut tree = Tree::with_step(1.0);
        tree.insert_root(Vector2::new(0.0, 0.0)).unwrap();

        assert!(tree.connect(&space, &Vector2::new(100.0, 0.0)).is_none());
        assert_eq!(tree.len(), 1 + MAX_CONNECT_ATTEMPTS);
    }

    #[test]
    fn test_states_to_root_orders() {
        let mut tree = Tree::with_step(1.0);
        let root = tree.insert_root(Vector2::new(0.0, 0.0)).unwrap();
        let a = tree.insert_child(root, Vector2::new(1.0, 0.0));
        let b = tree.insert_child(a, Vector2::new(2.0, 0.0));

        let forward = tree.states_to_root(b, false);
        assert_eq!(
            forward,
            vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(1.0, 0.0),
                Vector2::new(2.0, 0.0)
            ]
        );

        let backward = tree.states_to_root(b, true);
        assert_eq!(
            backward,
            vec![
                Vector2::new(2.0, 0.0),
                Vector2::new(1.0, 0.0),
                Vector2::new(0.0, 0.0)
            ]
        );
    }

    #[test]
    fn test_stepless_tree_grows_by_hand() {
        // no step needed when every state is inserted directly
        let mut tree: Tree<Vector2<f64>> = Tree::new();
        assert_eq!(tree.step(), 0.0);

        let root = tree.insert_root(Vector2::new(0.0, 0.0)).unwrap();
        let a = tree.insert_child(root, Vector2::new(0.3, 0.1));
        let b = tree.insert_child(a, Vector2::new(0.7, 0.4));

        assert_eq!(tree.depth(b), 2);
        assert_eq!(
            tree.states_to_root(b, false),
            vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(0.3, 0.1),
                Vector2::new(0.7, 0.4)
            ]
        );
    }

    #[test]
    fn test_edges_cover_all_links() {
        let mut tree = Tree::with_step(1.0);
        let root = tree.insert_root(Vector2::new(0.0, 0.0)).unwrap();
        let a = tree.insert_child(root, Vector2::new(1.0, 0.0));
        tree.insert_child(root, Vector2::new(0.0, 1.0));
        tree.insert_child(a, Vector2::new(2.0, 0.0));

        assert_eq!(tree.edges().count(), 3);
    }
}
