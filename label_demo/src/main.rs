//! Label demo application
//!
//! Loads the demo font and a couple of label files, orbits a camera around
//! a slowly spinning parent object and logs what the billboard solver makes
//! of each frame. Runs headless; pass a frame count as the first argument.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use msdf_text::config::{Config, ConfigError, LabelConfig};
use msdf_text::foundation::logging;
use msdf_text::foundation::math::{Point3, Quat, Transform, Vec3};
use msdf_text::render::primitives::Camera;
use msdf_text::render::systems::text::{
    FontAtlas, FontError, LabelKey, TextLabelError, TextLabelManager,
};

const VIEWPORT_WIDTH: f32 = 1280.0;
const VIEWPORT_HEIGHT: f32 = 720.0;
const DEFAULT_FRAMES: u32 = 12;
const ORBIT_RADIUS: f32 = 8.0;

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("font: {0}")]
    Font(#[from] FontError),

    #[error("label config: {0}")]
    Config(#[from] ConfigError),

    #[error("labels: {0}")]
    Labels(#[from] TextLabelError),

    #[error("invalid frame count {0:?}")]
    FrameCount(String),
}

struct LabelDemo {
    camera: Camera,
    labels: TextLabelManager,
    keys: Vec<LabelKey>,
    parent_spin: f32,
}

impl LabelDemo {
    fn new(resources: &Path) -> Result<Self, DemoError> {
        log::info!("Loading demo resources from {}", resources.display());
        let font = Arc::new(FontAtlas::from_file(resources.join("fonts/demo.json"))?);
        let mut labels = TextLabelManager::new(font);

        let mut keys = Vec::new();
        for file in ["labels/title.ron", "labels/tag.toml"] {
            let path = resources.join(file);
            let config = LabelConfig::load_from_file(&path.to_string_lossy())?;
            log::info!("Spawning label {:?} from {}", config.text, file);
            keys.push(labels.spawn(config, Transform::identity())?);
        }

        let mut camera = Camera::perspective(
            Vec3::new(0.0, 2.0, ORBIT_RADIUS),
            60.0,
            VIEWPORT_WIDTH / VIEWPORT_HEIGHT,
            0.1,
            100.0,
        );
        camera.look_at(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0));

        Ok(Self { camera, labels, keys, parent_spin: 0.0 })
    }

    fn run(&mut self, frames: u32) -> Result<(), DemoError> {
        for frame in 0..frames {
            let t = frame as f32 / frames.max(1) as f32;
            let angle = t * std::f32::consts::TAU;
            self.camera.set_position(Vec3::new(
                ORBIT_RADIUS * angle.sin(),
                2.0 + angle.cos(),
                ORBIT_RADIUS * angle.cos(),
            ));

            self.parent_spin += 0.3;
            let parent = Transform::from_position_rotation(
                Vec3::zeros(),
                Quat::from_axis_angle(&Vec3::y_axis(), self.parent_spin),
            );
            for &key in &self.keys {
                self.labels.set_parent(key, parent)?;
            }

            let view = self.camera.view(VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
            let solved = self.labels.update(&view)?;
            log::info!("Frame {frame}: camera at {:?}, {solved} labels solved", self.camera.position);

            for &key in &self.keys {
                self.log_label(key);
            }
        }
        Ok(())
    }

    fn log_label(&self, key: LabelKey) {
        let (Some(mesh), Some(state), Some(world), Some(pipeline)) = (
            self.labels.mesh(key),
            self.labels.state(key),
            self.labels.world_transform(key),
            self.labels.pipeline_state(key),
        ) else {
            log::warn!("Label {:?} has no solved state yet", key);
            return;
        };

        // What the vertex shader's push constant would hold for this label
        let mvp = self.camera.get_view_projection_matrix() * world.to_matrix();
        let origin = mvp.transform_point(&Point3::origin());

        log::info!(
            "  {:?}: {} glyphs + {} aux quads, depth {:.2}, scale {:.5}, ndc ({:.3}, {:.3}), clamp {:?}, depth test {}",
            self.labels.config(key).map(|c| c.text.as_str()).unwrap_or_default(),
            mesh.glyph_count,
            mesh.extra_quad_count,
            state.distance,
            state.scale,
            origin.x,
            origin.y,
            state.clamp.total(),
            pipeline.depth_test,
        );
    }
}

fn frame_count() -> Result<u32, DemoError> {
    match std::env::args().nth(1) {
        Some(arg) => arg.parse().map_err(|_| DemoError::FrameCount(arg)),
        None => Ok(DEFAULT_FRAMES),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_level("info");

    log::info!("Starting MSDF label demo");

    let resources = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources");
    let mut demo = LabelDemo::new(&resources)?;
    demo.run(frame_count()?)?;

    log::info!("Label demo finished");
    Ok(())
}
