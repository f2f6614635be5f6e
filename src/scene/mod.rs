//! Loaded scene hierarchy and static site layout.
//!
//! A [`SceneGraph`] is the handle the camera autofit consumes once a model
//! has finished loading: a tree of nodes with local transforms, some of
//! which carry mesh-local bounds. Geometry itself stays with the renderer.

/// Site layout files: model blocks, vehicles and markers.
pub mod layout;
mod transform;

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Mat4;
use serde::{Deserialize, Serialize};
pub use transform::Transform;

use crate::camera::bounds::Aabb;

static NEXT_SCENE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one loaded scene. A new id means a new load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneId(pub u64);

impl SceneId {
    /// Allocate a process-unique id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// One node of the loaded hierarchy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneNode {
    /// Node name, for logging.
    pub name: String,
    /// Transform relative to the parent node.
    pub transform: Transform,
    /// Mesh bounds in this node's local space, if the node draws anything.
    pub mesh: Option<Aabb>,
    /// Child nodes.
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// An empty group node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the local transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Attach mesh bounds in local space.
    #[must_use]
    pub fn with_mesh(mut self, bounds: Aabb) -> Self {
        self.mesh = Some(bounds);
        self
    }

    /// Append a child node.
    #[must_use]
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of mesh-carrying nodes in this subtree.
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        usize::from(self.mesh.is_some())
            + self.children.iter().map(SceneNode::mesh_count).sum::<usize>()
    }

    fn accumulate_bounds(&self, parent: &Mat4, out: &mut Aabb) {
        let world = *parent * self.transform.matrix();
        if let Some(mesh) = &self.mesh {
            *out = out.union(&mesh.transformed(&world));
        }
        for child in &self.children {
            child.accumulate_bounds(&world, out);
        }
    }
}

/// A fully loaded scene: the autofit input.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGraph {
    id: SceneId,
    root: SceneNode,
}

impl SceneGraph {
    /// Wrap a loaded hierarchy, giving it a fresh [`SceneId`].
    #[must_use]
    pub fn new(root: SceneNode) -> Self {
        Self {
            id: SceneId::next(),
            root,
        }
    }

    /// This load's identity.
    #[must_use]
    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Root node.
    #[must_use]
    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    /// World-space bounds of every mesh in the hierarchy. Empty when the
    /// scene draws nothing.
    #[must_use]
    pub fn world_bounds(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        self.root.accumulate_bounds(&Mat4::IDENTITY, &mut bounds);
        bounds
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn unit_box() -> Aabb {
        Aabb::from_corners(Vec3::splat(-0.5), Vec3::splat(0.5))
    }

    #[test]
    fn nested_transforms_accumulate() {
        let root = SceneNode::new("site")
            .with_transform(
                Transform::new().with_position(Vec3::new(100.0, 0.0, 0.0)),
            )
            .with_child(
                SceneNode::new("tower")
                    .with_transform(
                        Transform::new()
                            .with_position(Vec3::new(0.0, 10.0, 0.0))
                            .with_scale(Vec3::new(2.0, 20.0, 2.0)),
                    )
                    .with_mesh(unit_box()),
            );
        let scene = SceneGraph::new(root);
        let bounds = scene.world_bounds();
        assert_eq!(bounds.min, Vec3::new(99.0, 0.0, -1.0));
        assert_eq!(bounds.max, Vec3::new(101.0, 20.0, 1.0));
        assert_eq!(scene.root().mesh_count(), 1);
    }

    #[test]
    fn group_without_meshes_is_empty() {
        let scene = SceneGraph::new(
            SceneNode::new("empty").with_child(SceneNode::new("group")),
        );
        assert!(scene.world_bounds().is_empty());
    }

    #[test]
    fn every_load_gets_a_new_id() {
        let a = SceneGraph::new(SceneNode::new("a"));
        let b = SceneGraph::new(SceneNode::new("a"));
        assert_ne!(a.id(), b.id());
    }
}
