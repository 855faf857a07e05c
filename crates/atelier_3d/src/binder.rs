//! Model binder
//!
//! Maps configurable parts to nodes inside the loaded model and
//! applies the color configuration to them. Until the model arrives,
//! applied snapshots are recorded as pending; the first application
//! after load ("flush") replays the last pending snapshot exactly
//! once.

use crate::scene::{NodeId, SceneGraph};
use atelier_core::{Part, PartColors};
use smallvec::SmallVec;
use std::fmt;
use thiserror::Error;

/// Positional address of a node inside the model subtree
///
/// Each index selects a child by position at the next level, e.g.
/// `[0, 2]` is "child 0, then its child 2". The asset contract fixes
/// these chains, so they are established once and never change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodePath(SmallVec<[usize; 4]>);

impl NodePath {
    pub fn new(indices: &[usize]) -> Self {
        Self(SmallVec::from_slice(indices))
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

/// Fixed part→node-path map, established at binder construction
#[derive(Clone, Debug)]
pub struct PartMap([NodePath; Part::COUNT]);

impl PartMap {
    /// Build a map from `(part, path)` entries; parts listed last win
    pub fn new(entries: [(Part, NodePath); Part::COUNT]) -> Self {
        let mut paths: [NodePath; Part::COUNT] = std::array::from_fn(|_| NodePath::new(&[]));
        for (part, path) in entries {
            paths[part.index()] = path;
        }
        Self(paths)
    }

    /// The published sofa asset contract
    pub fn sofa() -> Self {
        Self::new([
            (Part::Base, NodePath::new(&[0, 0])),
            (Part::Wood, NodePath::new(&[0, 2])),
            (Part::Back, NodePath::new(&[0, 5])),
            (Part::Cushion, NodePath::new(&[0, 8])),
        ])
    }

    pub fn path(&self, part: Part) -> &NodePath {
        &self.0[part.index()]
    }
}

impl Default for PartMap {
    fn default() -> Self {
        Self::sofa()
    }
}

/// Per-part binding failure
///
/// Binding failures are isolated: one part failing to resolve never
/// blocks the remaining parts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The node path does not resolve in the loaded asset
    #[error("part {part} does not resolve at path {path} in the loaded model")]
    UnresolvedPath { part: Part, path: String },

    /// The resolved node carries no colorable surface
    #[error("part {part} resolved to a node without a surface at path {path}")]
    NoSurface { part: Part, path: String },
}

/// Binds the color configuration to the loaded model
pub struct ModelBinder {
    map: PartMap,
    pending: PartColors,
    flushed: bool,
}

impl ModelBinder {
    /// Create a binder over a fixed node map, with the given initial
    /// configuration as the pending snapshot
    pub fn new(map: PartMap, initial: PartColors) -> Self {
        Self {
            map,
            pending: initial,
            flushed: false,
        }
    }

    /// Last snapshot seen by the binder
    pub fn pending(&self) -> PartColors {
        self.pending
    }

    /// Whether the one-time post-load flush already happened
    pub fn flushed(&self) -> bool {
        self.flushed
    }

    /// Apply a configuration snapshot
    ///
    /// With no model loaded this records the snapshot and succeeds as
    /// a scene no-op. With a model, every part is applied
    /// independently; failures are logged, collected and returned,
    /// and do not affect the other parts. Re-applying an identical
    /// snapshot is an idempotent overwrite.
    pub fn apply(
        &mut self,
        snapshot: PartColors,
        model_root: Option<NodeId>,
        graph: &mut SceneGraph,
    ) -> Vec<BindError> {
        self.pending = snapshot;
        match model_root {
            Some(root) => self.apply_to_model(snapshot, root, graph),
            None => Vec::new(),
        }
    }

    /// One-time application of the pending snapshot after model load
    ///
    /// Subsequent calls are no-ops; later configuration changes flow
    /// through `apply` directly.
    pub fn flush(&mut self, model_root: NodeId, graph: &mut SceneGraph) -> Vec<BindError> {
        if self.flushed {
            return Vec::new();
        }
        self.flushed = true;
        tracing::debug!("flushing pending configuration to loaded model");
        self.apply_to_model(self.pending, model_root, graph)
    }

    fn apply_to_model(
        &self,
        snapshot: PartColors,
        root: NodeId,
        graph: &mut SceneGraph,
    ) -> Vec<BindError> {
        let mut errors = Vec::new();
        for (part, color) in snapshot.iter() {
            let path = self.map.path(part);
            let Some(id) = graph.descendant(root, path.indices()) else {
                let error = BindError::UnresolvedPath {
                    part,
                    path: path.to_string(),
                };
                tracing::warn!(%error, "skipping part");
                errors.push(error);
                continue;
            };
            // `descendant` only returns live ids.
            let Some(node) = graph.node_mut(id) else {
                continue;
            };
            match node.surface.as_mut() {
                Some(surface) => surface.color = color,
                None => {
                    let error = BindError::NoSurface {
                        part,
                        path: path.to_string(),
                    };
                    tracing::warn!(%error, "skipping part");
                    errors.push(error);
                }
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Geometry, Node, Surface};
    use atelier_core::Color;
    use glam::Vec3;
    use std::sync::Arc;

    fn quad() -> Arc<Geometry> {
        Arc::new(Geometry::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![Vec3::Z; 3],
            vec![0, 1, 2],
        ))
    }

    /// Graph shaped like the sofa asset: model root with one group
    /// whose children 0/2/5/8 carry surfaces.
    fn sofa_graph() -> (SceneGraph, NodeId) {
        let mut graph = SceneGraph::new();
        let model = graph.attach(graph.root(), Node::new("model")).unwrap();
        let group = graph.attach(model, Node::new("group")).unwrap();
        for i in 0..9 {
            let mut node = Node::new(format!("piece{i}"));
            if matches!(i, 0 | 2 | 5 | 8) {
                node = node.with_surface(Surface::new(quad(), Color::WHITE));
            }
            graph.attach(group, node).unwrap();
        }
        (graph, model)
    }

    fn surface_color(graph: &SceneGraph, model: NodeId, path: &[usize]) -> Color {
        let id = graph.descendant(model, path).unwrap();
        graph.node(id).unwrap().surface.as_ref().unwrap().color
    }

    #[test]
    fn apply_without_model_is_a_pending_no_op() {
        let mut graph = SceneGraph::new();
        let mut binder = ModelBinder::new(PartMap::sofa(), PartColors::default());

        let mut snapshot = PartColors::default();
        snapshot.set(Part::Base, Color::BLUE);
        let errors = binder.apply(snapshot, None, &mut graph);

        assert!(errors.is_empty());
        assert_eq!(binder.pending().get(Part::Base), Color::BLUE);
        assert!(!binder.flushed());
    }

    #[test]
    fn flush_applies_last_pending_snapshot_once() {
        let (mut graph, model) = sofa_graph();
        let mut binder = ModelBinder::new(PartMap::sofa(), PartColors::default());

        // Two changes before load: only the last one counts.
        let mut first = PartColors::default();
        first.set(Part::Base, Color::RED);
        binder.apply(first, None, &mut graph);
        let mut second = first;
        second.set(Part::Base, Color::BLUE);
        binder.apply(second, None, &mut graph);

        let errors = binder.flush(model, &mut graph);
        assert!(errors.is_empty());
        assert_eq!(surface_color(&graph, model, &[0, 0]), Color::BLUE);
        assert_eq!(surface_color(&graph, model, &[0, 2]), Color::WHITE);
        assert_eq!(surface_color(&graph, model, &[0, 5]), Color::WHITE);
        assert_eq!(surface_color(&graph, model, &[0, 8]), Color::WHITE);

        // Second flush is a no-op even if pending changed meanwhile.
        let mut third = second;
        third.set(Part::Wood, Color::GREEN);
        binder.pending = third;
        assert!(binder.flush(model, &mut graph).is_empty());
        assert_eq!(surface_color(&graph, model, &[0, 2]), Color::WHITE);
    }

    #[test]
    fn part_failures_do_not_block_other_parts() {
        let (mut graph, model) = sofa_graph();
        // A map whose wood path points past the children.
        let map = PartMap::new([
            (Part::Base, NodePath::new(&[0, 0])),
            (Part::Wood, NodePath::new(&[0, 42])),
            (Part::Back, NodePath::new(&[0, 5])),
            (Part::Cushion, NodePath::new(&[0, 1])), // no surface there
        ]);
        let mut binder = ModelBinder::new(map, PartColors::default());

        let snapshot = PartColors::uniform(Color::RED);
        let errors = binder.apply(snapshot, Some(model), &mut graph);

        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .any(|e| matches!(e, BindError::UnresolvedPath { part: Part::Wood, .. })));
        assert!(errors
            .iter()
            .any(|e| matches!(e, BindError::NoSurface { part: Part::Cushion, .. })));
        // The resolvable parts were still painted.
        assert_eq!(surface_color(&graph, model, &[0, 0]), Color::RED);
        assert_eq!(surface_color(&graph, model, &[0, 5]), Color::RED);
    }

    #[test]
    fn apply_is_idempotent() {
        let (mut graph, model) = sofa_graph();
        let mut binder = ModelBinder::new(PartMap::sofa(), PartColors::default());

        let snapshot = PartColors::uniform(Color::BLUE);
        assert!(binder.apply(snapshot, Some(model), &mut graph).is_empty());
        let painted: Vec<Color> = [[0, 0], [0, 2], [0, 5], [0, 8]]
            .iter()
            .map(|p| surface_color(&graph, model, p))
            .collect();

        assert!(binder.apply(snapshot, Some(model), &mut graph).is_empty());
        let repainted: Vec<Color> = [[0, 0], [0, 2], [0, 5], [0, 8]]
            .iter()
            .map(|p| surface_color(&graph, model, p))
            .collect();
        assert_eq!(painted, repainted);
    }

    #[test]
    fn part_independence_across_sets() {
        let (mut graph, model) = sofa_graph();
        let mut binder = ModelBinder::new(PartMap::sofa(), PartColors::default());

        let mut snapshot = PartColors::default();
        snapshot.set(Part::Cushion, Color::RED);
        binder.apply(snapshot, Some(model), &mut graph);
        snapshot.set(Part::Cushion, Color::GREEN);
        binder.apply(snapshot, Some(model), &mut graph);

        assert_eq!(surface_color(&graph, model, &[0, 8]), Color::GREEN);
        assert_eq!(surface_color(&graph, model, &[0, 0]), Color::WHITE);
        assert_eq!(surface_color(&graph, model, &[0, 2]), Color::WHITE);
        assert_eq!(surface_color(&graph, model, &[0, 5]), Color::WHITE);
    }
}
