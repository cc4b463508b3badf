//! End-to-end tests: font → layout → mesh → shading → billboard

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::config::LabelConfig;
    use crate::foundation::math::{Quat, Transform, Vec3};
    use crate::render::systems::text::font_atlas::test_fonts;
    use crate::render::systems::billboard::upright_flip;
    use crate::render::systems::text::shading;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;
    use std::sync::Arc;

    const FONT_JSON: &str = r#"{
        "pages": ["demo.png"],
        "chars": [
            {"id": 72, "x": 0, "y": 0, "width": 30, "height": 34, "xoffset": 2, "yoffset": 4, "xadvance": 32, "page": 0},
            {"id": 105, "x": 32, "y": 0, "width": 10, "height": 34, "xoffset": 2, "yoffset": 4, "xadvance": 14, "page": 0},
            {"id": 32, "x": 0, "y": 0, "width": 0, "height": 0, "xoffset": 0, "yoffset": 0, "xadvance": 12, "page": 0}
        ],
        "info": {"face": "Demo", "size": 42},
        "common": {"lineHeight": 50, "base": 40, "scaleW": 128, "scaleH": 64, "pages": 1},
        "kernings": [{"first": 72, "second": 105, "amount": -1}],
        "distanceField": {"fieldType": "msdf", "distanceRange": 4}
    }"#;

    #[test]
    fn test_json_font_to_bordered_mesh() {
        let font = FontAtlas::from_json_str(FONT_JSON).unwrap();
        let glyphs = BmFontLayout::new(&font).layout(&LayoutRequest::new("Hi Hi").with_width(400.0));
        let params = MeshParams {
            has_background: true,
            has_borders: true,
            border_radius: 6.0,
            border_width: 2.0,
            border_buffer: 4.0,
            flip_y: true,
        };

        let mesh = TextMeshBuilder::build(&glyphs, font.atlas_dimensions(), &params);

        assert_eq!(mesh.glyph_count, 4);
        assert_eq!(mesh.extra_quad_count, 9);
        assert_eq!(mesh.vertex_count(), (4 + 9) * 4);
        assert_eq!(mesh.indices.len(), (4 + 9) * 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));

        // Kerning pulls the "i" one unit closer to the "H"
        let h_left = mesh.glyph_positions()[0][0];
        let i_left = mesh.glyph_positions()[4][0];
        assert_relative_eq!(i_left - h_left, 31.0);
    }

    #[test]
    fn test_every_vertex_shades_by_region() {
        let font = test_fonts::monospace();
        let glyphs = BmFontLayout::new(&font).layout(&LayoutRequest::new("Region"));
        let params = MeshParams {
            has_background: true,
            has_borders: true,
            border_radius: 3.0,
            border_width: 3.0,
            border_buffer: 2.0,
            ..MeshParams::default()
        };
        let mesh = TextMeshBuilder::build(&glyphs, font.atlas_dimensions(), &params);
        let uniforms = TextUniforms {
            background_color: [0.0, 0.0, 1.0, 1.0],
            border_color: [1.0, 0.0, 0.0, 1.0],
            border_width_pct: mesh.border.unwrap().width_pct(),
            border_radius_pct: mesh.border.unwrap().radius_pct(),
            ..TextUniforms::default()
        };

        for (slot, part) in mesh.aux_parts().enumerate() {
            for uv in &mesh.uvs[slot * 4..slot * 4 + 4] {
                assert_eq!(AuxPart::from_uv(*uv), Some(part));
                assert!(shading::shade_aux(*uv, &uniforms).is_some());
            }
        }
        for uv in &mesh.uvs[mesh.extra_quad_count * 4..] {
            assert!(shading::shade_aux(*uv, &uniforms).is_none());
        }
    }

    #[test]
    fn test_labels_from_camera_orbit() {
        let mut labels = TextLabelManager::new(Arc::new(test_fonts::monospace()));
        let key = labels
            .spawn(
                LabelConfig::with_text("Orbit"),
                Transform::from_position_rotation(Vec3::zeros(), Quat::from_axis_angle(&Vec3::y_axis(), 0.4)),
            )
            .unwrap();

        let mut camera = Camera::perspective(Vec3::new(0.0, 0.0, 10.0), 90.0, 1.0, 0.1, 100.0);
        for step in 0..8 {
            let angle = step as f32 * FRAC_PI_2 / 2.0;
            camera.set_position(Vec3::new(10.0 * angle.sin(), 2.0, 10.0 * angle.cos()));
            let view = camera.view(1000.0, 1000.0);

            assert_eq!(labels.update(&view).unwrap(), 1);
            let world = labels.world_transform(key).unwrap();

            // Always faces the camera and is centered on screen at constant pixel size
            assert_relative_eq!(world.rotation, view.orientation * upright_flip(), epsilon = 1e-4);
            let state = labels.state(key).unwrap();
            let pixels = state.scale * 42.0 * view.viewport_width / state.view_width;
            assert_relative_eq!(pixels, 12.0, epsilon = 1e-3);
        }
    }
}
