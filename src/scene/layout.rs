//! Static site composition loaded from TOML.
//!
//! A layout lists the blocks that make up the site model, the vehicles
//! driving around it and the information markers placed on it. The default
//! layout is the demo site.

use std::path::Path;

use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{SceneGraph, SceneNode};
use crate::camera::bounds::Aabb;
use crate::error::SitewalkError;
use crate::marker::MarkerSpec;
use crate::traffic::{Direction, Phase, VehicleSpec};

/// One box-shaped piece of the site model, in world space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModelBlock {
    /// Block name, used as the scene node name.
    pub name: String,
    /// Minimum corner.
    pub min: [f32; 3],
    /// Maximum corner.
    pub max: [f32; 3],
}

impl ModelBlock {
    fn new(name: &str, min: [f32; 3], max: [f32; 3]) -> Self {
        Self {
            name: name.to_owned(),
            min,
            max,
        }
    }
}

/// Model, vehicles and markers of one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SiteLayout {
    /// Site name, used as the root node name.
    pub name: String,
    /// Model geometry.
    pub model: Vec<ModelBlock>,
    /// Scripted vehicles.
    pub vehicles: Vec<VehicleSpec>,
    /// Information markers.
    pub markers: Vec<MarkerSpec>,
}

/// Marker anchors of the demo site, ids 1 through 13.
const DEMO_MARKERS: [[f32; 3]; 13] = [
    [50.0, 40.0, -200.0],
    [120.0, 40.0, -200.0],
    [140.0, 40.0, -200.0],
    [160.0, 40.0, -150.0],
    [160.0, 40.0, -150.0],
    [180.0, 40.0, -185.0],
    [150.0, 40.0, -95.0],
    [80.0, 40.0, -95.0],
    [80.0, 40.0, -145.0],
    [90.0, 10.0, -180.0],
    [230.0, 10.0, -200.0],
    [205.0, 10.0, -110.0],
    [260.0, 50.0, -200.0],
];

impl Default for SiteLayout {
    fn default() -> Self {
        let model = vec![
            ModelBlock::new("ground", [0.0, -1.0, -420.0], [320.0, 0.0, -60.0]),
            ModelBlock::new("tower", [40.0, 0.0, -215.0], [65.0, 35.0, -185.0]),
            ModelBlock::new("hall", [110.0, 0.0, -215.0], [190.0, 30.0, -135.0]),
            ModelBlock::new("annex", [70.0, 0.0, -155.0], [95.0, 30.0, -85.0]),
            ModelBlock::new("kiosk", [250.0, 0.0, -210.0], [270.0, 45.0, -190.0]),
        ];
        let vehicles = vec![VehicleSpec {
            path: "a".to_owned(),
            direction: Direction::Forward,
            initial_position: [260.0, 0.0, -200.0],
            initial_yaw_deg: None,
            start_phase: Phase::Approach,
        }];
        let markers = (1..)
            .zip(DEMO_MARKERS)
            .map(|(id, anchor)| MarkerSpec {
                id,
                anchor,
                image: None,
                // Street-level markers turn toward the viewer.
                face_camera: anchor[1] < 20.0,
            })
            .collect();
        Self {
            name: "demo-site".to_owned(),
            model,
            vehicles,
            markers,
        }
    }
}

impl SiteLayout {
    /// Load a layout from a TOML file. Missing sections use the demo
    /// defaults.
    pub fn load(path: &Path) -> Result<Self, SitewalkError> {
        let content = std::fs::read_to_string(path)?;
        let layout: Self = toml::from_str(&content)?;
        Ok(layout)
    }

    /// Save the layout to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), SitewalkError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SitewalkError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(SitewalkError::Io)
    }

    /// Build the loaded-model hierarchy for the autofit. Each call yields
    /// a fresh [`SceneId`](super::SceneId).
    #[must_use]
    pub fn to_scene_graph(&self) -> SceneGraph {
        let root = self.model.iter().fold(
            SceneNode::new(self.name.as_str()),
            |root, block| {
                root.with_child(SceneNode::new(block.name.as_str()).with_mesh(
                    Aabb::from_corners(
                        Vec3::from_array(block.min),
                        Vec3::from_array(block.max),
                    ),
                ))
            },
        );
        SceneGraph::new(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_site_matches_walkthrough() {
        let layout = SiteLayout::default();
        assert_eq!(layout.vehicles.len(), 1);
        assert_eq!(layout.vehicles[0].initial_position, [260.0, 0.0, -200.0]);
        assert_eq!(layout.markers.len(), 13);
        assert_eq!(layout.markers[0].id, 1);
        assert_eq!(layout.markers[12].id, 13);
        assert_eq!(
            layout.markers.iter().filter(|m| m.face_camera).count(),
            3
        );
    }

    #[test]
    fn scene_graph_covers_every_block() {
        let layout = SiteLayout::default();
        let scene = layout.to_scene_graph();
        assert_eq!(scene.root().mesh_count(), layout.model.len());
        let bounds = scene.world_bounds();
        assert_eq!(bounds.min, Vec3::new(0.0, -1.0, -420.0));
        assert_eq!(bounds.max, Vec3::new(320.0, 45.0, -60.0));
        assert_ne!(scene.id(), layout.to_scene_graph().id());
    }

    #[test]
    fn empty_model_gives_empty_bounds() {
        let layout = SiteLayout {
            model: Vec::new(),
            ..SiteLayout::default()
        };
        assert!(layout.to_scene_graph().world_bounds().is_empty());
    }

    #[test]
    fn partial_toml_keeps_demo_sections() {
        let toml_str = r#"
name = "depot"

[[vehicles]]
path = "b"
direction = "backward"
initial_position = [300.0, 0.0, -250.0]
start_phase = "lateral_alt"
"#;
        let layout: SiteLayout = toml::from_str(toml_str).unwrap();
        assert_eq!(layout.name, "depot");
        assert_eq!(layout.vehicles[0].direction, Direction::Backward);
        assert_eq!(layout.vehicles[0].start_phase, Phase::LateralAlt);
        assert_eq!(layout.markers.len(), 13);
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir()
            .join(format!("sitewalk-layout-{}", std::process::id()))
            .join("site.toml");
        let layout = SiteLayout::default();
        layout.save(&path).unwrap();
        assert_eq!(SiteLayout::load(&path).unwrap(), layout);
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }
}
