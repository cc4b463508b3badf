//! Text label configuration
//!
//! Every user-facing knob of a label in one serde struct, loadable from
//! TOML or RON. Missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::render::systems::billboard::{AnchorHorizontal, AnchorVertical, BillboardConfig, ScreenPosition};
use crate::render::systems::text::{Color, LabelStyle, LayoutRequest, MeshParams, TextAlign, WrapMode};

/// Configuration for one text label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Text to display
    pub text: String,
    /// Wrap width as a percentage of the viewport width
    pub width: f32,
    /// Line alignment
    pub alignment: TextAlign,

    /// Glyph color
    pub text_color: Color,
    /// Glyph opacity
    pub text_alpha: f32,
    /// Background color
    pub background_color: Color,
    /// Background opacity; zero disables the background quad
    pub background_alpha: f32,
    /// Border color
    pub border_color: Color,
    /// Border opacity
    pub border_alpha: f32,

    /// Border thickness (design units)
    pub border_width: f32,
    /// Border edge smoothing (0..1)
    pub border_smoothing: f32,
    /// Corner radius (design units)
    pub border_radius: f32,
    /// Padding between text and border (design units)
    pub border_buffer: f32,

    /// Glyph size on screen, in pixels
    pub font_size: f32,
    /// Vertical anchor
    pub anchor_vert: AnchorVertical,
    /// Horizontal anchor
    pub anchor_horz: AnchorHorizontal,
    /// Vertical placement, percent from the top of the view
    pub position_vert: f32,
    /// Horizontal placement, percent from the left of the view
    pub position_horz: f32,
    /// Whether the renderer should depth test this label
    pub depth_test: bool,
    /// Keep the label inside the view
    pub clamp_to_viewport: bool,

    /// Baseline distance override (design units)
    pub line_height: Option<f32>,
    /// Extra advance per glyph (design units)
    pub letter_spacing: f32,
    /// Tab width in spaces
    pub tab_size: u32,
    /// Line breaking strategy
    pub wrap_mode: WrapMode,
    /// Flip atlas V coordinates
    pub flip_y: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            width: 100.0,
            alignment: TextAlign::Center,
            text_color: Color::Hex(0x00_0000),
            text_alpha: 1.0,
            background_color: Color::Hex(0x00_0000),
            background_alpha: 0.0,
            border_color: Color::Hex(0x00_0000),
            border_alpha: 0.0,
            border_width: 0.0,
            border_smoothing: 0.0,
            border_radius: 0.0,
            border_buffer: 0.0,
            font_size: 12.0,
            anchor_vert: AnchorVertical::Center,
            anchor_horz: AnchorHorizontal::Center,
            position_vert: 50.0,
            position_horz: 50.0,
            depth_test: true,
            clamp_to_viewport: true,
            line_height: None,
            letter_spacing: 0.0,
            tab_size: 4,
            wrap_mode: WrapMode::Normal,
            flip_y: true,
        }
    }
}

impl Config for LabelConfig {}

impl LabelConfig {
    /// Label with default styling and the given text
    pub fn with_text(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    /// Reject values the mesh builder and solver cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("border_width", self.border_width),
            ("border_radius", self.border_radius),
            ("border_buffer", self.border_buffer),
            ("width", self.width),
        ];
        if let Some((name, value)) = non_negative.iter().find(|(_, v)| !(*v >= 0.0)) {
            return Err(ConfigError::Invalid(format!("{name} must be >= 0, got {value}")));
        }
        if !(self.font_size > 0.0) {
            return Err(ConfigError::Invalid(format!("font_size must be > 0, got {}", self.font_size)));
        }
        if !(0.0..=1.0).contains(&self.border_smoothing) {
            return Err(ConfigError::Invalid(format!(
                "border_smoothing must be within 0..=1, got {}",
                self.border_smoothing
            )));
        }
        Ok(())
    }

    /// Background quad is emitted only when it is visible
    pub fn has_background(&self) -> bool {
        self.background_alpha > 0.0
    }

    /// Border quads are emitted when there is a radius or a width
    pub fn has_borders(&self) -> bool {
        self.border_radius > 0.0 || self.border_width > 0.0
    }

    /// Wrap width in design units for a viewport of the given pixel width
    ///
    /// The label may span `width` percent of the viewport; the border buffer
    /// on both sides comes out of that.
    pub fn wrap_width(&self, viewport_width: f32, design_size: f32) -> f32 {
        let text_width = viewport_width * design_size / self.font_size * self.width / 100.0;
        (text_width - self.border_buffer * 2.0).max(0.0)
    }

    /// Layout request for the given wrap width
    pub fn layout_request(&self, wrap_width: f32) -> LayoutRequest {
        LayoutRequest {
            text: self.text.clone(),
            width: Some(wrap_width),
            align: self.alignment,
            line_height: self.line_height,
            letter_spacing: self.letter_spacing,
            tab_size: self.tab_size,
            mode: self.wrap_mode,
            start: 0,
            end: None,
        }
    }

    /// Mesh builder options
    pub fn mesh_params(&self) -> MeshParams {
        MeshParams {
            has_background: self.has_background(),
            has_borders: self.has_borders(),
            border_radius: self.border_radius,
            border_width: self.border_width,
            border_buffer: self.border_buffer,
            flip_y: self.flip_y,
        }
    }

    /// Colors for the fragment stage
    pub fn style(&self) -> LabelStyle {
        LabelStyle {
            text: (self.text_color.clone(), self.text_alpha),
            background: (self.background_color.clone(), self.background_alpha),
            border: (self.border_color.clone(), self.border_alpha),
            border_smoothing: self.border_smoothing,
            depth_test: self.depth_test,
        }
    }

    /// Billboard solver options
    pub fn billboard_config(&self) -> BillboardConfig {
        BillboardConfig {
            font_size: self.font_size,
            anchor_horz: self.anchor_horz,
            anchor_vert: self.anchor_vert,
            position: ScreenPosition::new(self.position_horz, self.position_vert),
            clamp_to_viewport: self.clamp_to_viewport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flags_follow_alpha_and_border_sizes() {
        let mut config = LabelConfig::with_text("hi");
        assert!(!config.has_background());
        assert!(!config.has_borders());

        config.background_alpha = 0.4;
        config.border_radius = 2.0;
        assert!(config.has_background());
        assert!(config.has_borders());
        assert_eq!(config.mesh_params().extra_quad_count(), 9);
    }

    #[test]
    fn test_wrap_width_from_viewport() {
        let config = LabelConfig { font_size: 12.0, width: 50.0, border_buffer: 5.0, ..LabelConfig::default() };
        // 1200 px * 42 / 12 * 50% - 2 * 5
        assert_relative_eq!(config.wrap_width(1200.0, 42.0), 2090.0);
    }

    #[test]
    fn test_validate() {
        assert!(LabelConfig::default().validate().is_ok());

        let negative = LabelConfig { border_width: -1.0, ..LabelConfig::default() };
        assert!(matches!(negative.validate(), Err(ConfigError::Invalid(_))));

        let zero_font = LabelConfig { font_size: 0.0, ..LabelConfig::default() };
        assert!(zero_font.validate().is_err());

        let nan_radius = LabelConfig { border_radius: f32::NAN, ..LabelConfig::default() };
        assert!(nan_radius.validate().is_err());
    }

    #[test]
    fn test_load_partial_toml() {
        let toml = r##"
            text = "Hello"
            background_color = "#202020"
            background_alpha = 0.8
            border_radius = 6.0
            anchor_horz = "left"
            position_horz = 10.0
            alignment = "left"
        "##;
        let config = LabelConfig::load_from_str(toml, "label.toml").unwrap();

        assert_eq!(config.text, "Hello");
        assert_eq!(config.font_size, 12.0);
        assert_eq!(config.anchor_horz, AnchorHorizontal::Left);
        assert_eq!(config.alignment, TextAlign::Left);
        assert_eq!(config.background_color.to_hex(), Some(0x202020));

        let billboard = config.billboard_config();
        assert_eq!(billboard.position, ScreenPosition::new(10.0, 50.0));
    }

    #[test]
    fn test_depth_test_reaches_pipeline_state() {
        assert!(LabelConfig::default().style().pipeline_state().depth_test);

        let config = LabelConfig::load_from_str("depth_test = false", "label.toml").unwrap();
        assert!(!config.style().pipeline_state().depth_test);
    }

    #[test]
    fn test_load_ron() {
        let ron = r#"(text: "Ron label", text_color: 16711680, wrap_mode: nowrap, anchor_vert: top)"#;
        let config = LabelConfig::load_from_str(ron, "label.ron").unwrap();

        assert_eq!(config.text_color.to_hex(), Some(0xff0000));
        assert_eq!(config.wrap_mode, WrapMode::NoWrap);
        assert_eq!(config.anchor_vert, AnchorVertical::Top);
    }

    #[test]
    fn test_unknown_extension() {
        let result = LabelConfig::load_from_str("", "label.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
