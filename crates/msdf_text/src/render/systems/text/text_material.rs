//! Text material utilities
//!
//! Colors, the uniform block consumed by the MSDF fragment shader and the
//! GLSL sources themselves.
//!
//! Border width and radius are uploaded as fractions of the clamped corner
//! size rather than design units, because the corner quads are unit squares
//! in UV space.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::BorderMetrics;

/// Vertex stage for text meshes (GLSL 450)
pub const TEXT_VERTEX_SHADER: &str = include_str!("../../../../shaders/msdf_text.vert");

/// Fragment stage for text meshes (GLSL 450)
pub const TEXT_FRAGMENT_SHADER: &str = include_str!("../../../../shaders/msdf_text.frag");

const NAMED_COLORS: &[(&str, u32)] = &[
    ("black", 0x00_0000),
    ("white", 0xff_ffff),
    ("red", 0xff_0000),
    ("green", 0x00_8000),
    ("lime", 0x00_ff00),
    ("blue", 0x00_00ff),
    ("lightblue", 0xad_d8e6),
    ("yellow", 0xff_ff00),
    ("orange", 0xff_a500),
    ("gray", 0x80_8080),
    ("grey", 0x80_8080),
    ("cyan", 0x00_ffff),
    ("magenta", 0xff_00ff),
];

/// Color as written in label configs: `0xRRGGBB` or a CSS string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    /// Packed 24-bit RGB
    Hex(u32),
    /// `#rgb`, `#rrggbb` or a color name
    Css(String),
}

impl Default for Color {
    fn default() -> Self {
        Self::Hex(0x00_0000)
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::Hex(hex)
    }
}

impl From<&str> for Color {
    fn from(css: &str) -> Self {
        Self::Css(css.to_string())
    }
}

impl Color {
    /// Packed RGB value, if the color can be parsed
    pub fn to_hex(&self) -> Option<u32> {
        match self {
            Self::Hex(hex) => Some(hex & 0xff_ffff),
            Self::Css(css) => parse_css(css),
        }
    }

    /// Linear RGB components in `0..=1`
    pub fn to_rgb(&self) -> Option<[f32; 3]> {
        let hex = self.to_hex()?;
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Some([channel(16), channel(8), channel(0)])
    }

    /// RGBA with the given alpha
    ///
    /// Unparseable colors render black so a typo never hides the label.
    pub fn to_rgba(&self, alpha: f32) -> [f32; 4] {
        let [r, g, b] = self.to_rgb().unwrap_or_else(|| {
            log::warn!("Unrecognized color {:?}, using black", self);
            [0.0; 3]
        });
        [r, g, b, alpha.clamp(0.0, 1.0)]
    }
}

fn parse_css(css: &str) -> Option<u32> {
    let css = css.trim();
    if let Some(digits) = css.strip_prefix('#') {
        return match digits.len() {
            6 => u32::from_str_radix(digits, 16).ok(),
            3 => {
                let short = u32::from_str_radix(digits, 16).ok()?;
                let (r, g, b) = ((short >> 8) & 0xf, (short >> 4) & 0xf, short & 0xf);
                Some(((r * 0x11) << 16) | ((g * 0x11) << 8) | (b * 0x11))
            }
            _ => None,
        };
    }

    let lower = css.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|&(_, hex)| hex)
}

/// Uniform block for `msdf_text.frag` (binding 1)
///
/// Layout matches the std140 block: three vec4 colors followed by a vec4 of
/// border parameters.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct TextUniforms {
    /// Glyph fill color (RGBA)
    pub text_color: [f32; 4],
    /// Background fill color (RGBA)
    pub background_color: [f32; 4],
    /// Border color (RGBA)
    pub border_color: [f32; 4],
    /// Border thickness as a fraction of the corner size
    pub border_width_pct: f32,
    /// Corner radius as a fraction of the corner size
    pub border_radius_pct: f32,
    /// Smoothing band for the border edges, same units as the percentages
    pub border_smoothing: f32,
    /// Padding to 16 bytes
    pub _padding: f32,
}

impl Default for TextUniforms {
    fn default() -> Self {
        Self {
            text_color: [1.0, 1.0, 1.0, 1.0],
            background_color: [0.0; 4],
            border_color: [0.0; 4],
            border_width_pct: 0.0,
            border_radius_pct: 0.0,
            border_smoothing: 0.0,
            _padding: 0.0,
        }
    }
}

/// Colors and border options of one label, before mesh clamping
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    /// Glyph color and opacity
    pub text: (Color, f32),
    /// Background color and opacity
    pub background: (Color, f32),
    /// Border color and opacity
    pub border: (Color, f32),
    /// Border edge smoothing
    pub border_smoothing: f32,
    /// Depth test against the rest of the scene
    pub depth_test: bool,
}

/// Fixed-function state a renderer needs to draw a label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPipelineState {
    /// Enable depth testing
    pub depth_test: bool,
    /// Enable depth writing
    pub depth_write: bool,
    /// Enable alpha blending
    pub alpha_blending: bool,
    /// Draw both faces; the billboard flip shows the back face to the camera
    pub double_sided: bool,
}

impl Default for TextPipelineState {
    fn default() -> Self {
        Self {
            depth_test: true,
            depth_write: false,
            alpha_blending: true,
            double_sided: true,
        }
    }
}

impl LabelStyle {
    /// Pipeline state for this label. Labels are always blended and never
    /// write depth, so overlapping labels do not cut each other out.
    pub fn pipeline_state(&self) -> TextPipelineState {
        TextPipelineState {
            depth_test: self.depth_test,
            ..TextPipelineState::default()
        }
    }

    /// Uniforms for a mesh built with the given clamped border metrics
    pub fn uniforms(&self, border: Option<&BorderMetrics>) -> TextUniforms {
        let (text_color, text_alpha) = &self.text;
        let (background_color, background_alpha) = &self.background;
        let (border_color, border_alpha) = &self.border;

        TextUniforms {
            text_color: text_color.to_rgba(*text_alpha),
            background_color: background_color.to_rgba(*background_alpha),
            border_color: border_color.to_rgba(*border_alpha),
            border_width_pct: border.map_or(0.0, BorderMetrics::width_pct),
            border_radius_pct: border.map_or(0.0, BorderMetrics::radius_pct),
            border_smoothing: self.border_smoothing,
            _padding: 0.0,
        }
    }
}
