//! Scene graph with ordered children
//!
//! Nodes are stored in a slotmap and linked by parent/child ids.
//! Child order is significant: the model binder addresses sub-meshes
//! by positional index chains, so the graph preserves the order in
//! which children were attached.

use crate::scene::Surface;
use atelier_core::Color;
use glam::{Mat4, Quat, Vec3};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to a scene graph node
    pub struct NodeId;
}

/// Local transform: position, rotation, scale
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    /// Local position relative to parent
    pub position: Vec3,
    /// Local rotation as quaternion
    pub rotation: Quat,
    /// Local scale
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Identity transform
    pub fn new() -> Self {
        Self::default()
    }

    /// Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set uniform scale
    pub fn with_uniform_scale(mut self, s: f32) -> Self {
        self.scale = Vec3::splat(s);
        self
    }

    /// Local transformation matrix
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// A node in the scene graph
#[derive(Clone, Debug)]
pub struct Node {
    /// Node name, for diagnostics
    pub name: String,
    /// Local transform relative to parent
    pub transform: Transform,
    /// Renderable surface, if this node carries a mesh
    pub surface: Option<Surface>,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
}

impl Node {
    /// Create an empty node
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            surface: None,
            parent: None,
            children: SmallVec::new(),
        }
    }

    /// Set the local transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Attach a surface
    pub fn with_surface(mut self, surface: Surface) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Parent node, `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ordered child ids
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Scene graph: node storage, a fixed root, and a background color
pub struct SceneGraph {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
    /// Clear color rendered behind the scene
    pub background: Color,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph containing only the root node
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new("root"));
        Self {
            nodes,
            root,
            background: Color::WHITE,
        }
    }

    /// Root node id
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Attach a node as the last child of `parent`
    ///
    /// Returns `None` when the parent id is stale.
    pub fn attach(&mut self, parent: NodeId, mut node: Node) -> Option<NodeId> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        node.parent = Some(parent);
        let id = self.nodes.insert(node);
        self.nodes[parent].children.push(id);
        Some(id)
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Look up a node mutably
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Follow a positional index chain from `from`
    ///
    /// `indices` selects a child by position at each level; `None`
    /// when any index is out of range.
    pub fn descendant(&self, from: NodeId, indices: &[usize]) -> Option<NodeId> {
        let mut current = from;
        for &index in indices {
            current = *self.nodes.get(current)?.children.get(index)?;
        }
        Some(current)
    }

    /// Depth-first traversal with accumulated world matrices
    pub fn traverse(&self, from: NodeId, visit: &mut impl FnMut(NodeId, &Node, Mat4)) {
        self.traverse_inner(from, Mat4::IDENTITY, visit);
    }

    fn traverse_inner(
        &self,
        id: NodeId,
        parent_world: Mat4,
        visit: &mut impl FnMut(NodeId, &Node, Mat4),
    ) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let world = parent_world * node.transform.matrix();
        visit(id, node, world);
        // Children may be attached during instantiation but never
        // while traversing; clone the small id list to satisfy the
        // borrow checker.
        let children: SmallVec<[NodeId; 4]> = node.children.clone();
        for child in children {
            self.traverse_inner(child, world, visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child(graph: &mut SceneGraph, parent: NodeId, name: &str) -> NodeId {
        graph.attach(parent, Node::new(name)).unwrap()
    }

    #[test]
    fn children_keep_attachment_order() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let a = child(&mut graph, root, "a");
        let b = child(&mut graph, root, "b");
        let c = child(&mut graph, root, "c");
        assert_eq!(graph.node(root).unwrap().children(), &[a, b, c]);
    }

    #[test]
    fn descendant_follows_positional_indices() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let top = child(&mut graph, root, "top");
        let _first = child(&mut graph, top, "first");
        let _second = child(&mut graph, top, "second");
        let third = child(&mut graph, top, "third");

        assert_eq!(graph.descendant(root, &[0, 2]), Some(third));
        assert_eq!(graph.descendant(root, &[]), Some(root));
        assert_eq!(graph.descendant(root, &[0, 3]), None);
        assert_eq!(graph.descendant(root, &[1]), None);
    }

    #[test]
    fn traverse_accumulates_world_transforms() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let parent = graph
            .attach(
                root,
                Node::new("parent")
                    .with_transform(Transform::new().with_position(Vec3::new(1.0, 0.0, 0.0))),
            )
            .unwrap();
        let _leaf = graph
            .attach(
                parent,
                Node::new("leaf")
                    .with_transform(Transform::new().with_position(Vec3::new(0.0, 2.0, 0.0))),
            )
            .unwrap();

        let mut positions = Vec::new();
        graph.traverse(root, &mut |_, node, world| {
            positions.push((node.name.clone(), world.transform_point3(Vec3::ZERO)));
        });

        assert_eq!(positions.len(), 3);
        assert_eq!(positions[2].0, "leaf");
        assert!((positions[2].1 - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-6);
    }
}
