//! Text mesh builder
//!
//! Converts positioned glyphs into a flat quad mesh (positions, UVs, pages
//! and indices) and, when requested, prepends nine auxiliary quads that the
//! fragment shader turns into a rounded border and background.
//!
//! # Auxiliary quads
//!
//! The background and border quads always occupy the first
//! `extra_quad_count * 4` vertices, in [`AuxPart`] order. They carry no atlas
//! coordinates; instead both UV components are negative and encode which
//! region the quad is (see [`AuxPart::part_id`]). The shader branches on that
//! value, so this encoding is part of the vertex buffer format and must stay
//! in lockstep with `shaders/msdf_text.frag`.
//!
//! Corner quads are plain squares. The fragment stage carves the arc out of
//! them with a distance field, so they must not be tessellated here.

use super::{GlyphRect, TextBounds, BoundingSphere, visible_glyphs};
use bytemuck::{Pod, Zeroable};

/// Interleaved vertex for GPU upload
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct TextVertex {
    /// Position in font design units
    pub position: [f32; 2],
    /// Atlas UV, or a negative region sentinel for auxiliary quads
    pub uv: [f32; 2],
    /// Atlas page index
    pub page: f32,
}

/// Background/border options for the mesh builder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshParams {
    /// Emit the background quad
    pub has_background: bool,
    /// Emit the eight border quads
    pub has_borders: bool,
    /// Requested corner radius (design units)
    pub border_radius: f32,
    /// Requested border thickness (design units)
    pub border_width: f32,
    /// Padding between the glyph box and the outer border edge
    pub border_buffer: f32,
    /// Flip V so row 0 of the atlas is at the top
    pub flip_y: bool,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            has_background: false,
            has_borders: false,
            border_radius: 0.0,
            border_width: 0.0,
            border_buffer: 0.0,
            flip_y: true,
        }
    }
}

impl MeshParams {
    /// Number of auxiliary quads these options produce
    pub fn extra_quad_count(&self) -> usize {
        usize::from(self.has_background) + if self.has_borders { 8 } else { 0 }
    }
}

/// Border dimensions after clamping against the glyph box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderMetrics {
    /// Corner radius, at most the maximum border
    pub radius: f32,
    /// Border thickness, at most the maximum border
    pub width: f32,
    /// Edge length of the corner squares: `max(radius, width)`
    pub size: f32,
    /// Padding from the glyph box to the outer edge
    pub buffer: f32,
}

impl BorderMetrics {
    /// Clamp the requested radius/width so opposite borders never overlap
    pub fn clamped(glyph_bounds: &TextBounds, params: &MeshParams) -> Self {
        let max_border =
            glyph_bounds.width().min(glyph_bounds.height()) / 2.0 + params.border_buffer;
        let radius = params.border_radius.min(max_border);
        let width = params.border_width.min(max_border);

        Self {
            radius,
            width,
            size: radius.max(width),
            buffer: params.border_buffer,
        }
    }

    /// Distance from the glyph box to the background edge
    ///
    /// Negative when the border is thicker than the buffer, in which case the
    /// background sits inside the glyph box and the border covers the rest.
    pub fn offset(&self) -> f32 {
        self.buffer - self.size
    }

    /// Width as a fraction of the corner size (0 when there is no border)
    pub fn width_pct(&self) -> f32 {
        if self.size > 0.0 { self.width / self.size } else { 0.0 }
    }

    /// Radius as a fraction of the corner size (0 when there is no border)
    pub fn radius_pct(&self) -> f32 {
        if self.size > 0.0 { self.radius / self.size } else { 0.0 }
    }
}

/// Region an auxiliary quad belongs to, in buffer order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuxPart {
    /// Fill behind the text
    Background,
    /// Straight border above the text
    Top,
    /// Straight border left of the text
    Left,
    /// Straight border below the text
    Bottom,
    /// Straight border right of the text
    Right,
    /// Top-left corner arc
    TopLeft,
    /// Bottom-left corner arc
    LeftBottom,
    /// Bottom-right corner arc
    BottomRight,
    /// Top-right corner arc
    RightTop,
}

impl AuxPart {
    /// All regions in buffer order
    pub const ALL: [Self; 9] = [
        Self::Background,
        Self::Top,
        Self::Left,
        Self::Bottom,
        Self::Right,
        Self::TopLeft,
        Self::LeftBottom,
        Self::BottomRight,
        Self::RightTop,
    ];

    /// The eight border regions
    pub const BORDERS: [Self; 8] = [
        Self::Top,
        Self::Left,
        Self::Bottom,
        Self::Right,
        Self::TopLeft,
        Self::LeftBottom,
        Self::BottomRight,
        Self::RightTop,
    ];

    /// Position in [`AuxPart::ALL`]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Sentinel id: -1, -3, -5, ... by ordinal
    ///
    /// Ids do not shift when the background is absent, so border quads start
    /// at -3 in that case.
    pub fn part_id(self) -> f32 {
        self.ordinal() as f32 * -2.0 - 1.0
    }

    /// Lower edge of the UV cell this region occupies: `part_id - 1`
    pub fn region_base(self) -> f32 {
        self.part_id() - 1.0
    }

    /// UVs for the four quad corners (BL, TL, TR, BR)
    pub fn sentinel_uvs(self) -> [[f32; 2]; 4] {
        let id = self.part_id();
        [
            [id - 1.0, id],
            [id - 1.0, id - 1.0],
            [id, id - 1.0],
            [id, id],
        ]
    }

    /// Decode a (possibly interpolated) UV the way the fragment shader does
    ///
    /// Returns `None` for atlas coordinates.
    pub fn from_uv(uv: [f32; 2]) -> Option<Self> {
        const SIGMA: f32 = 0.5;
        if uv[0] >= 0.0 || uv[1] >= 0.0 {
            return None;
        }
        Self::ALL
            .iter()
            .copied()
            .find(|part| {
                let base = part.region_base();
                uv[0] >= base - SIGMA && uv[1] >= base - SIGMA
            })
            .or(Some(Self::RightTop))
    }

    /// Quad box for this region
    fn quad(self, border_box: &TextBounds, size: f32) -> TextBounds {
        let b = border_box;
        let (min_x, min_y, max_x, max_y) = match self {
            Self::Background => (b.min_x, b.min_y, b.max_x, b.max_y),
            Self::Top => (b.min_x, b.min_y - size, b.max_x, b.min_y),
            Self::Left => (b.min_x - size, b.min_y, b.min_x, b.max_y),
            Self::Bottom => (b.min_x, b.max_y, b.max_x, b.max_y + size),
            Self::Right => (b.max_x, b.min_y, b.max_x + size, b.max_y),
            Self::TopLeft => (b.min_x - size, b.min_y - size, b.min_x, b.min_y),
            Self::LeftBottom => (b.min_x - size, b.max_y, b.min_x, b.max_y + size),
            Self::BottomRight => (b.max_x, b.max_y, b.max_x + size, b.max_y + size),
            Self::RightTop => (b.max_x, b.min_y - size, b.max_x + size, b.min_y),
        };
        TextBounds { min_x, min_y, max_x, max_y }
    }
}

/// Output of the mesh builder
#[derive(Debug, Clone, PartialEq)]
pub struct TextMesh {
    /// Vertex positions, four per quad, auxiliary quads first
    pub positions: Vec<[f32; 2]>,
    /// Vertex UVs matching `positions`
    pub uvs: Vec<[f32; 2]>,
    /// Atlas page per vertex (auxiliary quads use page 0)
    pub pages: Vec<f32>,
    /// Triangle list, six indices per quad
    pub indices: Vec<u32>,
    /// Number of glyph quads
    pub glyph_count: usize,
    /// Number of auxiliary quads at the front of the buffers
    pub extra_quad_count: usize,
    /// Background quad present
    pub has_background: bool,
    /// Border quads present
    pub has_borders: bool,
    /// Clamped border dimensions when background or borders are present
    pub border: Option<BorderMetrics>,
    /// Box around the glyph quads only
    pub bounds: TextBounds,
    /// Circle around the glyph quads only
    pub bounding_sphere: BoundingSphere,
}

impl TextMesh {
    /// Total vertex count
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Positions of the glyph quads (after the auxiliary quads)
    pub fn glyph_positions(&self) -> &[[f32; 2]] {
        &self.positions[self.extra_quad_count * 4..]
    }

    /// Regions of the auxiliary quads, in buffer order
    pub fn aux_parts(&self) -> impl Iterator<Item = AuxPart> + '_ {
        let first = usize::from(!self.has_background);
        AuxPart::ALL[first..first + self.extra_quad_count].iter().copied()
    }

    /// Box of one auxiliary quad, if the mesh contains it
    pub fn aux_quad(&self, part: AuxPart) -> Option<TextBounds> {
        let slot = self.aux_parts().position(|p| p == part)?;
        Some(TextBounds::from_points(&self.positions[slot * 4..slot * 4 + 4]))
    }

    /// Triangles as index triplets
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Interleaved vertices ready for upload
    pub fn vertices(&self) -> Vec<TextVertex> {
        self.positions
            .iter()
            .zip(&self.uvs)
            .zip(&self.pages)
            .map(|((&position, &uv), &page)| TextVertex { position, uv, page })
            .collect()
    }

    /// Raw vertex bytes
    pub fn vertex_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.vertices()).to_vec()
    }
}

/// Builds [`TextMesh`]es from laid out glyphs
pub struct TextMeshBuilder;

impl TextMeshBuilder {
    /// Build the mesh for a set of glyphs
    ///
    /// Zero-area glyphs are dropped first. The result depends only on the
    /// arguments, so identical inputs give bit-identical buffers.
    ///
    /// # Arguments
    /// * `glyphs` - Layout output, in text order
    /// * `atlas_size` - Atlas texture width and height in pixels
    /// * `params` - Background/border options
    pub fn build(glyphs: &[GlyphRect], atlas_size: (u32, u32), params: &MeshParams) -> TextMesh {
        let glyphs = visible_glyphs(glyphs);
        let extra_quad_count = params.extra_quad_count();
        let quad_count = glyphs.len() + extra_quad_count;

        let glyph_positions = Self::glyph_positions(&glyphs);
        let bounds = TextBounds::from_points(&glyph_positions);
        let bounding_sphere = BoundingSphere::from_points(&glyph_positions);

        let mut positions = Vec::with_capacity(quad_count * 4);
        let mut uvs = Vec::with_capacity(quad_count * 4);
        let mut pages = Vec::with_capacity(quad_count * 4);
        let mut border = None;

        if extra_quad_count > 0 {
            // Empty text still gets a padded background around the origin
            let glyph_box = if bounds.is_empty() {
                log::debug!("No visible glyphs; auxiliary quads are centered on the origin");
                TextBounds { min_x: 0.0, min_y: 0.0, max_x: 0.0, max_y: 0.0 }
            } else {
                bounds
            };

            let metrics = BorderMetrics::clamped(&glyph_box, params);
            let border_box = glyph_box.expanded(metrics.offset());

            let parts = params
                .has_background
                .then_some(AuxPart::Background)
                .into_iter()
                .chain(params.has_borders.then_some(AuxPart::BORDERS).into_iter().flatten());
            for part in parts {
                positions.extend_from_slice(&part.quad(&border_box, metrics.size).quad_corners());
                uvs.extend_from_slice(&part.sentinel_uvs());
                pages.extend_from_slice(&[0.0; 4]);
            }
            border = Some(metrics);
        }

        positions.extend_from_slice(&glyph_positions);
        uvs.extend(Self::glyph_uvs(&glyphs, atlas_size, params.flip_y));
        pages.extend(glyphs.iter().flat_map(|rect| [rect.glyph.page as f32; 4]));

        let mesh = TextMesh {
            positions,
            uvs,
            pages,
            indices: quad_indices(quad_count),
            glyph_count: glyphs.len(),
            extra_quad_count,
            has_background: params.has_background,
            has_borders: params.has_borders,
            border,
            bounds,
            bounding_sphere,
        };

        log::debug!(
            "Built text mesh: {} glyph quads + {} auxiliary quads",
            mesh.glyph_count,
            mesh.extra_quad_count
        );
        mesh
    }

    /// Quad corners for each glyph (BL, TL, TR, BR)
    fn glyph_positions(glyphs: &[GlyphRect]) -> Vec<[f32; 2]> {
        glyphs
            .iter()
            .flat_map(|rect| {
                let x = rect.pen.x + rect.glyph.xoffset;
                let y = rect.pen.y + rect.glyph.yoffset;
                let w = rect.glyph.width;
                let h = rect.glyph.height;
                [[x, y], [x, y + h], [x + w, y + h], [x + w, y]]
            })
            .collect()
    }

    /// Atlas coordinates for each glyph (BL, TL, TR, BR)
    fn glyph_uvs(glyphs: &[GlyphRect], atlas_size: (u32, u32), flip_y: bool) -> Vec<[f32; 2]> {
        let tex_width = atlas_size.0 as f32;
        let tex_height = atlas_size.1 as f32;

        glyphs
            .iter()
            .flat_map(|rect| {
                let bitmap = &rect.glyph;
                let right = bitmap.x + bitmap.width;
                let bottom = bitmap.y + bitmap.height;

                let u0 = bitmap.x / tex_width;
                let u1 = right / tex_width;
                let (v0, v1) = if flip_y {
                    ((tex_height - bottom) / tex_height, (tex_height - bitmap.y) / tex_height)
                } else {
                    (bottom / tex_height, bitmap.y / tex_height)
                };

                [[u0, v1], [u0, v0], [u1, v0], [u1, v1]]
            })
            .collect()
    }
}

/// Two clockwise triangles per quad: (0, 1, 2) and (0, 2, 3)
pub fn quad_indices(quad_count: usize) -> Vec<u32> {
    (0..quad_count as u32)
        .flat_map(|quad| {
            let base = quad * 4;
            [base, base + 1, base + 2, base, base + 2, base + 3]
        })
        .collect()
}
