//! World-space text labels
//!
//! [`TextLabelManager`] owns the font and every spawned label. Each label
//! keeps its configuration, its parent's world transform, a cached mesh and
//! the transform solved for the last frame.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use msdf_text::config::LabelConfig;
//! use msdf_text::foundation::math::{Transform, Vec3};
//! use msdf_text::render::primitives::Camera;
//! use msdf_text::render::systems::text::{FontAtlas, TextLabelManager};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let font = Arc::new(FontAtlas::from_file("resources/fonts/demo.json")?);
//! let mut labels = TextLabelManager::new(font);
//!
//! let key = labels.spawn(
//!     LabelConfig::with_text("Hello"),
//!     Transform::from_position(Vec3::new(0.0, 1.0, -5.0)),
//! )?;
//!
//! let camera = Camera::default();
//! labels.update(&camera.view(1280.0, 720.0))?;
//! let local = labels.transform(key);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use slotmap::SlotMap;

use crate::config::{ConfigError, LabelConfig};
use crate::foundation::math::Transform;
use crate::render::primitives::CameraView;
use crate::render::systems::billboard::{validate_view, BillboardError, BillboardSolver, BillboardState};

use super::{FontAtlas, TextMesh, TextMeshCache, TextPipelineState, TextUniforms};

slotmap::new_key_type! {
    /// Handle to a spawned label
    pub struct LabelKey;
}

/// Label manager errors
#[derive(Debug, thiserror::Error)]
pub enum TextLabelError {
    /// The key does not refer to a live label
    #[error("unknown text label {0:?}")]
    UnknownLabel(LabelKey),

    /// The label configuration was rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The frame could not be solved at all
    #[error(transparent)]
    Billboard(#[from] BillboardError),
}

/// Result type for label manager operations
pub type TextLabelResult<T> = Result<T, TextLabelError>;

/// One live label
struct TextLabel {
    config: LabelConfig,
    parent: Transform,
    solver: BillboardSolver,
    cache: TextMeshCache,
    uniforms: TextUniforms,
    state: Option<BillboardState>,
}

impl TextLabel {
    fn new(config: LabelConfig, parent: Transform) -> Self {
        Self {
            solver: BillboardSolver::new(config.billboard_config()),
            config,
            parent,
            cache: TextMeshCache::new(),
            uniforms: TextUniforms::default(),
            state: None,
        }
    }
}

/// Manager for camera-facing text labels
pub struct TextLabelManager {
    font: Arc<FontAtlas>,
    labels: SlotMap<LabelKey, TextLabel>,
}

impl TextLabelManager {
    /// Create a manager that lays every label out with `font`
    pub fn new(font: Arc<FontAtlas>) -> Self {
        log::info!(
            "Text label manager using font '{}' ({} px design size)",
            font.face(),
            font.design_size()
        );
        Self { font, labels: SlotMap::with_key() }
    }

    /// Font shared by all labels
    pub fn font(&self) -> &Arc<FontAtlas> {
        &self.font
    }

    /// Spawn a label under a parent with the given world transform
    ///
    /// The mesh and transform are produced on the next [`update`](Self::update).
    ///
    /// # Errors
    /// Returns [`TextLabelError::Config`] when the configuration fails validation.
    pub fn spawn(&mut self, config: LabelConfig, parent: Transform) -> TextLabelResult<LabelKey> {
        config.validate()?;
        log::debug!("Spawning text label {:?}", config.text);
        Ok(self.labels.insert(TextLabel::new(config, parent)))
    }

    /// Remove a label; returns false if it was already gone
    pub fn despawn(&mut self, key: LabelKey) -> bool {
        let removed = self.labels.remove(key).is_some();
        if removed {
            log::debug!("Despawned text label {:?}", key);
        }
        removed
    }

    /// Replace the text of a label
    ///
    /// # Errors
    /// Returns [`TextLabelError::UnknownLabel`] for a stale key.
    pub fn set_text(&mut self, key: LabelKey, text: impl Into<String>) -> TextLabelResult<()> {
        let label = self.labels.get_mut(key).ok_or(TextLabelError::UnknownLabel(key))?;
        label.config.text = text.into();
        Ok(())
    }

    /// Replace the whole configuration of a label
    ///
    /// # Errors
    /// Fails for a stale key or an invalid configuration.
    pub fn set_config(&mut self, key: LabelKey, config: LabelConfig) -> TextLabelResult<()> {
        config.validate()?;
        let label = self.labels.get_mut(key).ok_or(TextLabelError::UnknownLabel(key))?;
        label.solver.set_config(config.billboard_config());
        label.config = config;
        Ok(())
    }

    /// Update the parent's world transform (e.g. after it moved)
    ///
    /// # Errors
    /// Returns [`TextLabelError::UnknownLabel`] for a stale key.
    pub fn set_parent(&mut self, key: LabelKey, parent: Transform) -> TextLabelResult<()> {
        let label = self.labels.get_mut(key).ok_or(TextLabelError::UnknownLabel(key))?;
        label.parent = parent;
        Ok(())
    }

    /// Rebuild stale meshes and solve every label for this frame
    ///
    /// Meshes are rebuilt only when text, styling or the viewport-derived
    /// wrap width changed. A label whose parent sits on the camera plane keeps
    /// its previous transform. Returns the number of labels solved.
    ///
    /// # Errors
    /// Frame-wide preconditions (field of view, viewport, font size) abort
    /// the whole update.
    pub fn update(&mut self, view: &CameraView) -> TextLabelResult<usize> {
        let design_size = self.font.design_size();
        validate_view(view, design_size)?;

        let mut solved = 0;
        for (key, label) in &mut self.labels {
            let wrap_width = label.config.wrap_width(view.viewport_width, design_size);
            let request = label.config.layout_request(wrap_width);
            let params = label.config.mesh_params();
            let mesh = label.cache.get_or_build(&self.font, &request, &params);

            label.uniforms = label.config.style().uniforms(mesh.border.as_ref());

            match label.solver.solve(view, &label.parent, &mesh.bounds, &mesh.bounding_sphere, design_size) {
                Ok(state) => {
                    label.state = Some(state);
                    solved += 1;
                }
                Err(err) => log::warn!("Skipping text label {:?} this frame: {}", key, err),
            }
        }

        log::trace!("Solved {}/{} text labels", solved, self.labels.len());
        Ok(solved)
    }

    /// Current mesh of a label (after the first update)
    pub fn mesh(&self, key: LabelKey) -> Option<&TextMesh> {
        self.labels.get(key)?.cache.mesh()
    }

    /// Solved transform of a label, local to its parent
    pub fn transform(&self, key: LabelKey) -> Option<&Transform> {
        self.labels.get(key)?.state.as_ref().map(|state| &state.transform)
    }

    /// Solved transform of a label in world space
    pub fn world_transform(&self, key: LabelKey) -> Option<Transform> {
        let label = self.labels.get(key)?;
        label.state.as_ref().map(|state| label.parent.combine(&state.transform))
    }

    /// Everything solved for a label in the last frame
    pub fn state(&self, key: LabelKey) -> Option<&BillboardState> {
        self.labels.get(key)?.state.as_ref()
    }

    /// Fragment uniforms of a label
    pub fn uniforms(&self, key: LabelKey) -> Option<&TextUniforms> {
        self.labels.get(key).map(|label| &label.uniforms)
    }

    /// Pipeline state (depth test, blending) a renderer should draw a label with
    pub fn pipeline_state(&self, key: LabelKey) -> Option<TextPipelineState> {
        self.labels.get(key).map(|label| label.config.style().pipeline_state())
    }

    /// Configuration of a label
    pub fn config(&self, key: LabelKey) -> Option<&LabelConfig> {
        self.labels.get(key).map(|label| &label.config)
    }

    /// How many times a label's mesh has been built
    pub fn rebuild_count(&self, key: LabelKey) -> Option<u64> {
        self.labels.get(key).map(|label| label.cache.rebuild_count())
    }

    /// Keys of all live labels
    pub fn keys(&self) -> impl Iterator<Item = LabelKey> + '_ {
        self.labels.keys()
    }

    /// Number of live labels
    pub fn active_count(&self) -> usize {
        self.labels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Vec3};
    use crate::render::systems::billboard::upright_flip;
    use crate::render::systems::text::font_atlas::test_fonts;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn manager() -> TextLabelManager {
        TextLabelManager::new(Arc::new(test_fonts::monospace()))
    }

    fn view() -> CameraView {
        CameraView {
            position: Vec3::zeros(),
            orientation: Quat::identity(),
            fov: FRAC_PI_2,
            viewport_width: 1000.0,
            viewport_height: 1000.0,
        }
    }

    fn in_front() -> Transform {
        Transform::from_position(Vec3::new(0.0, 0.0, -10.0))
    }

    #[test]
    fn test_spawn_update_despawn() {
        let mut labels = manager();
        let key = labels.spawn(LabelConfig::with_text("Hello"), in_front()).unwrap();
        assert_eq!(labels.active_count(), 1);
        assert!(labels.mesh(key).is_none());

        assert_eq!(labels.update(&view()).unwrap(), 1);
        assert_eq!(labels.mesh(key).unwrap().glyph_count, 5);
        assert!(labels.transform(key).is_some());

        assert!(labels.despawn(key));
        assert!(!labels.despawn(key));
        assert_eq!(labels.active_count(), 0);
        assert!(labels.mesh(key).is_none());
    }

    #[test]
    fn test_mesh_rebuilds_only_on_change() {
        let mut labels = manager();
        let key = labels.spawn(LabelConfig::with_text("Static"), in_front()).unwrap();

        labels.update(&view()).unwrap();
        labels.set_parent(key, Transform::from_position(Vec3::new(1.0, 0.0, -12.0))).unwrap();
        labels.update(&view()).unwrap();
        assert_eq!(labels.rebuild_count(key), Some(1));

        labels.set_text(key, "Changed").unwrap();
        labels.update(&view()).unwrap();
        assert_eq!(labels.rebuild_count(key), Some(2));

        let mut wide = view();
        wide.viewport_width = 2000.0;
        labels.update(&wide).unwrap();
        assert_eq!(labels.rebuild_count(key), Some(3));
    }

    #[test]
    fn test_label_faces_camera_in_world_space() {
        let mut labels = manager();
        let parent = Transform::from_position_rotation(
            Vec3::new(2.0, 0.0, -10.0),
            Quat::from_axis_angle(&Vec3::y_axis(), 1.2),
        );
        let key = labels.spawn(LabelConfig::with_text("Face me"), parent).unwrap();

        labels.update(&view()).unwrap();
        let world = labels.world_transform(key).unwrap();
        assert_relative_eq!(world.rotation, view().orientation * upright_flip(), epsilon = 1e-5);
    }

    #[test]
    fn test_uniforms_follow_config() {
        let mut labels = manager();
        let config = LabelConfig {
            text: "Box".to_string(),
            background_alpha: 0.5,
            border_width: 2.0,
            border_radius: 4.0,
            border_buffer: 6.0,
            ..LabelConfig::default()
        };
        let key = labels.spawn(config, in_front()).unwrap();
        labels.update(&view()).unwrap();

        let mesh = labels.mesh(key).unwrap();
        assert_eq!(mesh.extra_quad_count, 9);

        let uniforms = labels.uniforms(key).unwrap();
        assert_relative_eq!(uniforms.border_width_pct, 0.5);
        assert_relative_eq!(uniforms.border_radius_pct, 1.0);
        assert_relative_eq!(uniforms.background_color[3], 0.5);
    }

    #[test]
    fn test_depth_test_follows_config() {
        let mut labels = manager();
        let overlay = labels
            .spawn(LabelConfig { depth_test: false, ..LabelConfig::with_text("Overlay") }, in_front())
            .unwrap();
        let scene = labels.spawn(LabelConfig::with_text("Scene"), in_front()).unwrap();

        assert!(!labels.pipeline_state(overlay).unwrap().depth_test);
        assert!(labels.pipeline_state(scene).unwrap().depth_test);

        labels.despawn(overlay);
        assert!(labels.pipeline_state(overlay).is_none());
    }

    #[test]
    fn test_label_on_camera_plane_is_skipped() {
        let mut labels = manager();
        let good = labels.spawn(LabelConfig::with_text("ok"), in_front()).unwrap();
        let bad = labels
            .spawn(LabelConfig::with_text("bad"), Transform::from_position(Vec3::new(1.0, 0.0, 0.0)))
            .unwrap();

        assert_eq!(labels.update(&view()).unwrap(), 1);
        assert!(labels.transform(good).is_some());
        assert!(labels.transform(bad).is_none());
    }

    #[test]
    fn test_invalid_frame_and_config_are_errors() {
        let mut labels = manager();
        let invalid = LabelConfig { font_size: -1.0, ..LabelConfig::with_text("x") };
        assert!(matches!(labels.spawn(invalid, in_front()), Err(TextLabelError::Config(_))));

        let mut broken = view();
        broken.fov = 0.0;
        assert!(matches!(labels.update(&broken), Err(TextLabelError::Billboard(_))));
    }

    #[test]
    fn test_stale_key() {
        let mut labels = manager();
        let key = labels.spawn(LabelConfig::default(), in_front()).unwrap();
        labels.despawn(key);
        assert!(matches!(labels.set_text(key, "gone"), Err(TextLabelError::UnknownLabel(_))));
    }
}
