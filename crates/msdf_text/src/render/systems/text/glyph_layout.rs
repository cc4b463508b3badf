//! Glyph layout service
//!
//! Turns a string into positioned glyph rectangles: word wrapping, line
//! breaking, alignment, letter spacing, tabs and kerning. The mesh builder
//! only consumes the resulting [`GlyphRect`]s through the
//! [`GlyphLayoutService`] trait, so another layout engine can be swapped in.
//!
//! # Layout Coordinate System
//!
//! Font design units with +Y pointing down (BMFont row order). The first line
//! starts at `y = -(lineHeight * lines - descender)` so the last baseline
//! sits close to `y = 0`.

use serde::{Deserialize, Serialize};
use super::{FontAtlas, GlyphInfo};
use crate::foundation::math::Vec2;

const SPACE: u32 = ' ' as u32;
const TAB: u32 = '\t' as u32;

/// Horizontal alignment of lines inside the wrap width
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Lines start at x = 0
    #[default]
    Left,
    /// Lines are centered inside the widest line / wrap width
    Center,
    /// Lines end at the widest line / wrap width
    Right,
}

/// Line breaking strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapMode {
    /// Greedy word wrap at the wrap width, explicit newlines honoured
    #[default]
    Normal,
    /// Only explicit newlines break lines
    NoWrap,
    /// Preformatted: split on newlines, keep leading whitespace
    Pre,
}

/// Input to a layout call
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRequest {
    /// Text to lay out
    pub text: String,
    /// Wrap width in design units; `None` means unbounded
    pub width: Option<f32>,
    /// Line alignment
    pub align: TextAlign,
    /// Baseline distance; `None` uses the font's line height
    pub line_height: Option<f32>,
    /// Extra advance added after every glyph
    pub letter_spacing: f32,
    /// Tab width in multiples of the space advance
    pub tab_size: u32,
    /// Line breaking strategy
    pub mode: WrapMode,
    /// First character index (inclusive)
    pub start: usize,
    /// Last character index (exclusive); `None` means end of text
    pub end: Option<usize>,
}

impl LayoutRequest {
    /// Request with default options for the given text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            width: None,
            align: TextAlign::Left,
            line_height: None,
            letter_spacing: 0.0,
            tab_size: 4,
            mode: WrapMode::Normal,
            start: 0,
            end: None,
        }
    }

    /// Builder pattern: set the wrap width
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    /// Builder pattern: set the alignment
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Builder pattern: set the wrap mode
    pub fn with_mode(mut self, mode: WrapMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder pattern: set the letter spacing
    pub fn with_letter_spacing(mut self, spacing: f32) -> Self {
        self.letter_spacing = spacing;
        self
    }

    /// Builder pattern: set the line height
    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = Some(line_height);
        self
    }
}

/// One positioned glyph produced by a layout call
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRect {
    /// Atlas rectangle and metrics
    pub glyph: GlyphInfo,
    /// Pen position (line top-left corner for this glyph)
    pub pen: Vec2,
    /// Character index in the source text
    pub index: usize,
    /// Line number
    pub line: usize,
}

/// Anything that can lay text out into glyph rectangles
pub trait GlyphLayoutService {
    /// Lay out the requested text
    fn layout(&self, request: &LayoutRequest) -> Vec<GlyphRect>;
}

/// Drop glyphs with an empty bitmap (spaces, tabs, unknown characters)
pub fn visible_glyphs(glyphs: &[GlyphRect]) -> Vec<GlyphRect> {
    glyphs
        .iter()
        .filter(|rect| rect.glyph.area() > 0.0)
        .cloned()
        .collect()
}

/// Measured span of one line
#[derive(Debug, Clone, Copy, PartialEq)]
struct LineSpan {
    start: usize,
    end: usize,
    width: f32,
}

/// Layout engine for BMFont atlases
pub struct BmFontLayout<'a> {
    font: &'a FontAtlas,
}

/// Per-request state: whitespace fallbacks depend on the tab size
struct LayoutPass<'a> {
    font: &'a FontAtlas,
    chars: Vec<char>,
    letter_spacing: f32,
    space: GlyphInfo,
    tab: GlyphInfo,
}

impl<'a> BmFontLayout<'a> {
    /// Create a layout engine for a font
    pub fn new(font: &'a FontAtlas) -> Self {
        Self { font }
    }

    fn space_advance(&self) -> f32 {
        self.font
            .glyph(SPACE)
            .or_else(|| self.font.glyph(u32::from('m')))
            .or_else(|| self.font.glyph(u32::from('w')))
            .or_else(|| self.font.glyphs().first())
            .map_or(0.0, |glyph| glyph.xadvance)
    }
}

impl GlyphLayoutService for BmFontLayout<'_> {
    fn layout(&self, request: &LayoutRequest) -> Vec<GlyphRect> {
        let space_advance = self.space_advance();
        let pass = LayoutPass {
            font: self.font,
            chars: request.text.chars().collect(),
            letter_spacing: request.letter_spacing,
            space: GlyphInfo::blank(SPACE, space_advance),
            tab: GlyphInfo::blank(TAB, request.tab_size as f32 * space_advance),
        };

        let lines = pass.lines(request);
        let glyphs = pass.place(&lines, request);
        log::trace!(
            "Laid out {} chars into {} lines, {} glyphs",
            pass.chars.len(),
            lines.len(),
            glyphs.len()
        );
        glyphs
    }
}

impl LayoutPass<'_> {
    fn glyph(&self, ch: char) -> Option<&GlyphInfo> {
        let id = u32::from(ch);
        self.font.glyph(id).or(match id {
            TAB => Some(&self.tab),
            SPACE => Some(&self.space),
            _ => None,
        })
    }

    /// Longest prefix of `start..end` that fits inside `width`
    fn measure(&self, start: usize, end: usize, width: f32) -> LineSpan {
        let end = end.min(self.chars.len());
        let mut pen = 0.0f32;
        let mut line_width = 0.0f32;
        let mut count = 0;
        let mut last: Option<&GlyphInfo> = None;

        for i in start..end {
            if let Some(glyph) = self.glyph(self.chars[i]) {
                pen += last.map_or(0.0, |prev| self.font.kerning(prev.id, glyph.id));
                let next_pen = pen + glyph.xadvance + self.letter_spacing;
                let next_width = pen + glyph.width;
                if next_width >= width || next_pen >= width {
                    break;
                }
                pen = next_pen;
                line_width = next_width;
                last = Some(glyph);
            }
            count += 1;
        }

        if let Some(glyph) = last {
            line_width += glyph.xoffset;
        }

        LineSpan { start, end: start + count, width: line_width }
    }

    fn lines(&self, request: &LayoutRequest) -> Vec<LineSpan> {
        if request.width == Some(0.0) && request.mode != WrapMode::NoWrap {
            return Vec::new();
        }
        let width = request.width.unwrap_or(f32::MAX);
        let start = request.start;
        let end = request.end.unwrap_or(self.chars.len()).min(self.chars.len());

        match request.mode {
            WrapMode::Pre => self.preformatted(start, end, width),
            WrapMode::Normal => self.greedy(start, end, width),
            WrapMode::NoWrap => self.greedy(start, end, f32::MAX),
        }
    }

    fn preformatted(&self, start: usize, end: usize, width: f32) -> Vec<LineSpan> {
        let mut lines = Vec::new();
        let mut line_start = start;
        for i in start..end {
            let is_newline = self.chars[i] == '\n';
            if is_newline || i + 1 == end {
                let line_end = if is_newline { i } else { i + 1 };
                lines.push(self.measure(line_start, line_end, width));
                line_start = i + 1;
            }
        }
        lines
    }

    fn greedy(&self, mut start: usize, end: usize, width: f32) -> Vec<LineSpan> {
        let mut lines = Vec::new();

        while start < end {
            let newline = self.chars[start..end]
                .iter()
                .position(|&c| c == '\n')
                .map_or(end, |offset| start + offset);

            // Leading whitespace never starts a wrapped line
            while start < newline && self.chars[start].is_whitespace() {
                start += 1;
            }

            let measured = self.measure(start, newline, width);
            let mut line_end = start + (measured.end - measured.start);
            let mut next_start = line_end + 1;

            if line_end < newline {
                // Overflow: back up to the last whitespace
                while line_end > start && !self.chars[line_end].is_whitespace() {
                    line_end -= 1;
                }
                if line_end == start {
                    // Single word wider than the line, hard break it
                    if next_start > start + 1 {
                        next_start -= 1;
                    }
                    line_end = next_start;
                } else {
                    next_start = line_end;
                    while line_end > start && self.chars[line_end - 1].is_whitespace() {
                        line_end -= 1;
                    }
                }
            }

            if line_end >= start {
                lines.push(self.measure(start, line_end, width));
            }
            start = next_start;
        }

        lines
    }

    fn place(&self, lines: &[LineSpan], request: &LayoutRequest) -> Vec<GlyphRect> {
        let min_width = request.width.filter(|w| *w < f32::MAX).unwrap_or(0.0);
        let max_line_width = lines
            .iter()
            .fold(0.0f32, |acc, line| acc.max(line.width).max(min_width));

        let line_height = request.line_height.unwrap_or_else(|| self.font.line_height());
        let descender = line_height - self.font.base();
        let height = line_height * lines.len() as f32 - descender;

        let mut glyphs = Vec::new();
        let mut y = -height;

        for (line_index, line) in lines.iter().enumerate() {
            let shift = match request.align {
                TextAlign::Left => 0.0,
                TextAlign::Center => (max_line_width - line.width) / 2.0,
                TextAlign::Right => max_line_width - line.width,
            };

            let mut x = 0.0f32;
            let mut last: Option<&GlyphInfo> = None;
            for i in line.start..line.end {
                let Some(glyph) = self.glyph(self.chars[i]) else {
                    continue;
                };
                if let Some(prev) = last {
                    x += self.font.kerning(prev.id, glyph.id);
                }
                glyphs.push(GlyphRect {
                    glyph: glyph.clone(),
                    pen: Vec2::new(x + shift, y),
                    index: i,
                    line: line_index,
                });
                x += glyph.xadvance + self.letter_spacing;
                last = Some(glyph);
            }

            y += line_height;
        }

        glyphs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::systems::text::font_atlas::test_fonts;

    fn lines_of(glyphs: &[GlyphRect]) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        for rect in glyphs {
            if lines.len() <= rect.line {
                lines.resize(rect.line + 1, String::new());
            }
            if let Some(ch) = char::from_u32(rect.glyph.id) {
                lines[rect.line].push(ch);
            }
        }
        lines
    }

    #[test]
    fn test_single_line_positions() {
        let font = test_fonts::monospace();
        let layout = BmFontLayout::new(&font);
        let glyphs = layout.layout(&LayoutRequest::new("Hi").with_width(100.0));

        assert_eq!(glyphs.len(), 2);
        assert_eq!(glyphs[0].pen.x, 0.0);
        assert_eq!(glyphs[1].pen.x, 24.0);
        // One line: y = -(lineHeight - (lineHeight - base)) = -base
        assert_eq!(glyphs[0].pen.y, -40.0);
        assert_eq!(glyphs[1].line, 0);
    }

    #[test]
    fn test_word_wrap_breaks_at_whitespace() {
        let font = test_fonts::monospace();
        let layout = BmFontLayout::new(&font);
        // "abc" is 72 units wide, so two words never fit in 100
        let glyphs = layout.layout(&LayoutRequest::new("abc def").with_width(100.0));

        assert_eq!(lines_of(&glyphs), vec!["abc".to_string(), "def".to_string()]);
        assert_eq!(glyphs[3].pen.x, 0.0);
        assert_eq!(glyphs[3].pen.y - glyphs[0].pen.y, 50.0);
    }

    #[test]
    fn test_nowrap_ignores_width() {
        let font = test_fonts::monospace();
        let layout = BmFontLayout::new(&font);
        let request = LayoutRequest::new("abc def")
            .with_width(100.0)
            .with_mode(WrapMode::NoWrap);
        let glyphs = layout.layout(&request);

        assert_eq!(lines_of(&glyphs), vec!["abc def".to_string()]);
        assert!(glyphs.iter().all(|g| g.line == 0));
    }

    #[test]
    fn test_explicit_newlines_split_lines() {
        let font = test_fonts::monospace();
        let layout = BmFontLayout::new(&font);
        let glyphs = layout.layout(&LayoutRequest::new("ab\ncd"));

        assert_eq!(lines_of(&glyphs), vec!["ab".to_string(), "cd".to_string()]);
    }

    #[test]
    fn test_pre_keeps_leading_whitespace() {
        let font = test_fonts::monospace();
        let layout = BmFontLayout::new(&font);
        let request = LayoutRequest::new("  ab").with_mode(WrapMode::Pre);
        let visible = visible_glyphs(&layout.layout(&request));

        // Two spaces of 12 units before 'a'
        assert_eq!(visible[0].pen.x, 24.0);

        let normal = visible_glyphs(&layout.layout(&LayoutRequest::new("  ab")));
        assert_eq!(normal[0].pen.x, 0.0);
    }

    #[test]
    fn test_hard_break_of_overlong_word() {
        let font = test_fonts::monospace();
        let layout = BmFontLayout::new(&font);
        let glyphs = layout.layout(&LayoutRequest::new("abcdef").with_width(60.0));

        assert!(lines_of(&glyphs).len() > 1);
        assert_eq!(glyphs.len(), 6);
    }

    #[test]
    fn test_zero_width_yields_nothing() {
        let font = test_fonts::monospace();
        let layout = BmFontLayout::new(&font);
        assert!(layout.layout(&LayoutRequest::new("abc").with_width(0.0)).is_empty());
    }

    #[test]
    fn test_alignment_shifts_short_lines() {
        let font = test_fonts::monospace();
        let layout = BmFontLayout::new(&font);

        let right = layout.layout(&LayoutRequest::new("ab").with_width(200.0).with_align(TextAlign::Right));
        let center = layout.layout(&LayoutRequest::new("ab").with_width(200.0).with_align(TextAlign::Center));

        // Line width: pen 24 + glyph 20 + last xoffset 1 = 45
        assert_eq!(right[0].pen.x, 155.0);
        assert_eq!(center[0].pen.x, 77.5);
    }

    #[test]
    fn test_kerning_and_letter_spacing() {
        let font = test_fonts::monospace();
        let layout = BmFontLayout::new(&font);

        let kerned = layout.layout(&LayoutRequest::new("AV"));
        assert_eq!(kerned[1].pen.x, 21.0);

        let spaced = layout.layout(&LayoutRequest::new("ab").with_letter_spacing(4.0));
        assert_eq!(spaced[1].pen.x, 28.0);
    }

    #[test]
    fn test_tab_uses_tab_size() {
        let font = test_fonts::monospace();
        let layout = BmFontLayout::new(&font);
        let request = LayoutRequest::new("a\tb").with_mode(WrapMode::Pre);
        let visible = visible_glyphs(&layout.layout(&request));

        assert_eq!(visible[1].pen.x, 24.0 + 4.0 * 12.0);
    }

    #[test]
    fn test_start_end_window() {
        let font = test_fonts::monospace();
        let layout = BmFontLayout::new(&font);
        let mut request = LayoutRequest::new("abcdef");
        request.start = 2;
        request.end = Some(4);

        assert_eq!(lines_of(&layout.layout(&request)), vec!["cd".to_string()]);
    }
}
