//! CPU evaluation of the text fragment stage
//!
//! Mirrors `shaders/msdf_text.frag` so region decoding, border falloff and
//! corner arcs can be checked (and previewed headlessly) without a GPU.

use crate::foundation::math::{Vec2, Vec4};

use super::{AuxPart, TextUniforms};

/// Median of three channels, the MSDF distance estimate
pub fn median(r: f32, g: f32, b: f32) -> f32 {
    r.min(g).max(r.max(g).min(b))
}

/// Glyph coverage from one MSDF sample
///
/// `fwidth` is the screen-space derivative of the signed distance; a
/// non-positive value degrades to a hard edge.
pub fn msdf_coverage(sample: [f32; 3], fwidth: f32) -> f32 {
    let sd = median(sample[0], sample[1], sample[2]) - 0.5;
    if fwidth <= 0.0 {
        return step(0.0, sd);
    }
    (sd / fwidth + 0.5).clamp(0.0, 1.0)
}

fn step(edge: f32, x: f32) -> f32 {
    if x < edge { 0.0 } else { 1.0 }
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn rgba(color: [f32; 4]) -> Vec4 {
    Vec4::from(color)
}

/// Border color at `dist` (0 = inner edge of the quad, 1 = outer edge)
///
/// Smoothing fades the existing border edges inward rather than widening
/// the border by the smoothing band.
pub fn border(dist: f32, uniforms: &TextUniforms) -> Vec4 {
    let width = uniforms.border_width_pct;
    let smoothing = uniforms.border_smoothing;

    let (inner, outer) = if smoothing > 0.0 {
        (
            smoothstep(1.0, 1.0 + smoothing, dist + width),
            smoothstep(0.0, smoothing, 1.0 - dist),
        )
    } else {
        (step(1.0, dist + width), step(0.0, 1.0 - dist))
    };

    let color = rgba(uniforms.background_color).lerp(&rgba(uniforms.border_color), inner);
    Vec4::new(color.x, color.y, color.z, color.w * outer)
}

/// Straight border segment; `edge` points from the text toward the outside
pub fn line(uv: Vec2, edge: Vec2, uniforms: &TextUniforms) -> Vec4 {
    let dist = if edge.x != 0.0 {
        if edge.x > 0.0 { uv.x } else { 1.0 - uv.x }
    } else if edge.y > 0.0 {
        uv.y
    } else {
        1.0 - uv.y
    };
    border(dist, uniforms)
}

/// Rounded corner; `inside_corner` is the UV corner touching the background
pub fn arc(uv: Vec2, inside_corner: Vec2, uniforms: &TextUniforms) -> Vec4 {
    let radius = uniforms.border_radius_pct;
    let center = (inside_corner - Vec2::repeat(1.0 - radius)).abs();
    let corner_center_diff = (inside_corner - center).abs();
    let corner_point_diff = (inside_corner - uv).abs();

    if corner_center_diff.x <= corner_point_diff.x && corner_center_diff.y <= corner_point_diff.y {
        border((uv - center).norm() + corner_center_diff.x, uniforms)
    } else {
        border(corner_point_diff.x.max(corner_point_diff.y), uniforms)
    }
}

/// Color of an auxiliary-quad fragment, or `None` for glyph UVs
pub fn shade_aux(uv: [f32; 2], uniforms: &TextUniforms) -> Option<Vec4> {
    let part = AuxPart::from_uv(uv)?;
    let base = part.region_base();
    let local = Vec2::new(uv[0] - base, uv[1] - base);

    let color = match part {
        AuxPart::Background => rgba(uniforms.background_color),
        AuxPart::Top => line(local, Vec2::new(0.0, 1.0), uniforms),
        AuxPart::Left => line(local, Vec2::new(-1.0, 0.0), uniforms),
        AuxPart::Bottom => line(local, Vec2::new(0.0, -1.0), uniforms),
        AuxPart::Right => line(local, Vec2::new(1.0, 0.0), uniforms),
        AuxPart::TopLeft => arc(local, Vec2::new(1.0, 0.0), uniforms),
        AuxPart::LeftBottom => arc(local, Vec2::new(1.0, 1.0), uniforms),
        AuxPart::BottomRight => arc(local, Vec2::new(0.0, 1.0), uniforms),
        AuxPart::RightTop => arc(local, Vec2::new(0.0, 0.0), uniforms),
    };
    Some(color)
}

/// Color of a glyph fragment
pub fn shade_glyph(sample: [f32; 3], fwidth: f32, uniforms: &TextUniforms) -> Vec4 {
    let text = rgba(uniforms.text_color);
    Vec4::new(text.x, text.y, text.z, text.w * msdf_coverage(sample, fwidth))
}
