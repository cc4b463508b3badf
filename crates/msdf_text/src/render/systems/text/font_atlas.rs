//! Font atlas metadata for MSDF text rendering
//!
//! Fonts are authored offline (for example with `msdf-bmfont-xml`) into a
//! multi-channel distance field texture plus a BMFont JSON descriptor. This
//! module only deals with the descriptor: glyph rectangles, metrics and
//! kerning pairs. Texture loading belongs to the renderer.

use std::collections::HashMap;
use std::path::Path;
use serde::{Deserialize, Serialize};

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur during font operations
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// Failed to read the descriptor file
    #[error("Failed to read font descriptor: {0}")]
    Io(#[from] std::io::Error),

    /// The descriptor is not valid BMFont JSON
    #[error("Failed to parse font descriptor: {0}")]
    Parse(String),

    /// The descriptor declares no glyphs at all
    #[error("Font descriptor contains no glyphs")]
    NoGlyphs,

    /// Atlas or design metrics are unusable
    #[error("Invalid atlas metrics: {0}")]
    InvalidAtlas(String),
}

/// A single glyph entry from the BMFont `chars` table
///
/// Rectangles are in atlas pixels; offsets and advance are in font design
/// units, which for BMFont output are the same pixels the atlas was
/// rendered at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphInfo {
    /// Unicode code point
    pub id: u32,
    /// Left edge of the glyph in the atlas
    pub x: f32,
    /// Top edge of the glyph in the atlas
    pub y: f32,
    /// Bitmap width
    pub width: f32,
    /// Bitmap height
    pub height: f32,
    /// Horizontal offset from the pen position to the bitmap
    pub xoffset: f32,
    /// Vertical offset from the line top to the bitmap
    pub yoffset: f32,
    /// Pen advance after this glyph
    pub xadvance: f32,
    /// Atlas page holding the bitmap
    #[serde(default)]
    pub page: u32,
}

impl GlyphInfo {
    /// Copy of this glyph with no bitmap, used for whitespace fallbacks
    pub fn blank(id: u32, xadvance: f32) -> Self {
        Self {
            id,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            xoffset: 0.0,
            yoffset: 0.0,
            xadvance,
            page: 0,
        }
    }

    /// Bitmap area; zero for whitespace
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// `info` block of the descriptor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontInfo {
    /// Font family name
    #[serde(default)]
    pub face: String,
    /// Size the atlas was generated at ("em size"), in design units
    pub size: f32,
}

/// `common` block of the descriptor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontCommon {
    /// Distance between consecutive baselines
    pub line_height: f32,
    /// Distance from the line top to the baseline
    pub base: f32,
    /// Atlas width in pixels
    pub scale_w: u32,
    /// Atlas height in pixels
    pub scale_h: u32,
    /// Number of atlas pages
    #[serde(default = "default_pages")]
    pub pages: u32,
}

fn default_pages() -> u32 {
    1
}

/// One kerning pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KerningPair {
    /// Left code point
    pub first: u32,
    /// Right code point
    pub second: u32,
    /// Pen adjustment in design units
    pub amount: f32,
}

/// Distance field parameters emitted by msdf generators
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceField {
    /// "msdf", "sdf" or "psdf"
    pub field_type: String,
    /// Pixel range encoded by the field
    pub distance_range: f32,
}

/// Raw BMFont JSON document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontDescriptor {
    /// Texture file names, one per page
    #[serde(default)]
    pub pages: Vec<String>,
    /// Glyph table
    pub chars: Vec<GlyphInfo>,
    /// Font-wide info
    pub info: FontInfo,
    /// Common metrics
    pub common: FontCommon,
    /// Kerning pairs
    #[serde(default)]
    pub kernings: Vec<KerningPair>,
    /// Distance field parameters
    #[serde(default)]
    pub distance_field: Option<DistanceField>,
}

/// Font atlas metadata with indexed glyph and kerning lookup
#[derive(Debug, Clone)]
pub struct FontAtlas {
    descriptor: FontDescriptor,
    glyph_index: HashMap<u32, usize>,
    kerning: HashMap<(u32, u32), f32>,
}

impl FontAtlas {
    /// Build an atlas from an already parsed descriptor
    pub fn from_descriptor(descriptor: FontDescriptor) -> FontResult<Self> {
        if descriptor.chars.is_empty() {
            return Err(FontError::NoGlyphs);
        }
        if descriptor.common.scale_w == 0 || descriptor.common.scale_h == 0 {
            return Err(FontError::InvalidAtlas(format!(
                "atlas size {}x{}",
                descriptor.common.scale_w, descriptor.common.scale_h
            )));
        }
        if descriptor.info.size <= 0.0 {
            return Err(FontError::InvalidAtlas(format!(
                "design size {}",
                descriptor.info.size
            )));
        }

        let glyph_index = descriptor
            .chars
            .iter()
            .enumerate()
            .map(|(i, glyph)| (glyph.id, i))
            .collect();
        let kerning = descriptor
            .kernings
            .iter()
            .map(|pair| ((pair.first, pair.second), pair.amount))
            .collect();

        log::info!(
            "Loaded font '{}' at {} units: {} glyphs, {} kerning pairs, atlas {}x{}",
            descriptor.info.face,
            descriptor.info.size,
            descriptor.chars.len(),
            descriptor.kernings.len(),
            descriptor.common.scale_w,
            descriptor.common.scale_h,
        );

        Ok(Self {
            descriptor,
            glyph_index,
            kerning,
        })
    }

    /// Parse a BMFont JSON descriptor
    pub fn from_json_str(json: &str) -> FontResult<Self> {
        let descriptor: FontDescriptor =
            serde_json::from_str(json).map_err(|e| FontError::Parse(e.to_string()))?;
        Self::from_descriptor(descriptor)
    }

    /// Read and parse a BMFont JSON descriptor from disk
    pub fn from_file(path: impl AsRef<Path>) -> FontResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Look up a glyph by code point
    pub fn glyph(&self, id: u32) -> Option<&GlyphInfo> {
        self.glyph_index.get(&id).map(|&i| &self.descriptor.chars[i])
    }

    /// All glyphs in descriptor order
    pub fn glyphs(&self) -> &[GlyphInfo] {
        &self.descriptor.chars
    }

    /// Kerning adjustment between two code points (0 when unlisted)
    pub fn kerning(&self, first: u32, second: u32) -> f32 {
        self.kerning.get(&(first, second)).copied().unwrap_or(0.0)
    }

    /// Size the atlas was authored at
    pub fn design_size(&self) -> f32 {
        self.descriptor.info.size
    }

    /// Atlas texture dimensions in pixels
    pub fn atlas_dimensions(&self) -> (u32, u32) {
        (self.descriptor.common.scale_w, self.descriptor.common.scale_h)
    }

    /// Default distance between baselines
    pub fn line_height(&self) -> f32 {
        self.descriptor.common.line_height
    }

    /// Distance from the line top to the baseline
    pub fn base(&self) -> f32 {
        self.descriptor.common.base
    }

    /// Whether glyphs are spread over more than one texture page
    pub fn is_multipage(&self) -> bool {
        self.descriptor.common.pages > 1
    }

    /// Font family name
    pub fn face(&self) -> &str {
        &self.descriptor.info.face
    }

    /// The underlying descriptor
    pub fn descriptor(&self) -> &FontDescriptor {
        &self.descriptor
    }
}
