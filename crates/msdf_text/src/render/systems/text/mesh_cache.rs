//! Text mesh cache
//!
//! Rebuilding a label's mesh means a full layout pass, so a label keeps its
//! last mesh and only rebuilds when the font, the layout request or the
//! border options change. Billboard updates never touch the mesh.

use std::sync::Arc;

use super::{BmFontLayout, FontAtlas, GlyphLayoutService, LayoutRequest, MeshParams, TextMesh, TextMeshBuilder};

struct CachedMesh {
    font: Arc<FontAtlas>,
    request: LayoutRequest,
    params: MeshParams,
    mesh: TextMesh,
}

impl CachedMesh {
    fn build(font: &Arc<FontAtlas>, request: &LayoutRequest, params: &MeshParams) -> Self {
        let glyphs = BmFontLayout::new(font).layout(request);
        let mesh = TextMeshBuilder::build(&glyphs, font.atlas_dimensions(), params);
        Self {
            font: Arc::clone(font),
            request: request.clone(),
            params: *params,
            mesh,
        }
    }

    fn matches(&self, font: &Arc<FontAtlas>, request: &LayoutRequest, params: &MeshParams) -> bool {
        Arc::ptr_eq(&self.font, font) && self.request == *request && self.params == *params
    }
}

/// Single-entry mesh cache for one label
#[derive(Default)]
pub struct TextMeshCache {
    entry: Option<CachedMesh>,
    rebuilds: u64,
}

impl TextMeshCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the mesh for these inputs, rebuilding only if they changed
    ///
    /// Fonts are compared by identity, not contents.
    pub fn get_or_build(
        &mut self,
        font: &Arc<FontAtlas>,
        request: &LayoutRequest,
        params: &MeshParams,
    ) -> &TextMesh {
        let cached = match self.entry.take() {
            Some(entry) if entry.matches(font, request, params) => entry,
            _ => {
                self.rebuilds += 1;
                log::trace!("Rebuilding text mesh for {:?}", request.text);
                CachedMesh::build(font, request, params)
            }
        };
        &self.entry.insert(cached).mesh
    }

    /// Last built mesh, if any
    pub fn mesh(&self) -> Option<&TextMesh> {
        self.entry.as_ref().map(|entry| &entry.mesh)
    }

    /// Drop the cached mesh so the next call rebuilds
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// How many times a mesh has been built
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}
