use image::{imageops, Rgba, RgbaImage};
use log::debug;
use rusttype::{point, PositionedGlyph};

use crate::consts::{BAR_COLOR, CANVAS_H, REFERENCE_TAPE_MM};
use crate::font::LabelFont;

/// Pixel size of rendered text as used for canvas allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextExtent {
    pub width: u32,
    pub height: u32,
}

/// Line with the most characters; the first one wins on ties.
pub fn longest_line(text: &str) -> &str {
    text_lines(text)
        .fold("", |best, l| if l.chars().count() > best.chars().count() { l } else { best })
}

/// Measure `text` against `font`.
/// - width: ink right edge of the longest line (by char count, not pixels)
/// - height: ink bottom of the whole text plus the font descent
pub fn measure_text(font: &LabelFont, text: &str) -> TextExtent {
    let vm = font.v_metrics();

    let glyphs: Vec<_> = font
        .font()
        .layout(longest_line(text), font.scale(), point(0.0, vm.ascent))
        .collect();
    let width = ink_right(&glyphs).max(0) as u32;

    let advance = line_advance(font);
    let mut bottom = 0i32;
    for (i, line) in text_lines(text).enumerate() {
        let baseline = vm.ascent + i as f32 * advance;
        let glyphs: Vec<_> = font.font().layout(line, font.scale(), point(0.0, baseline)).collect();
        bottom = bottom.max(ink_bottom(&glyphs));
    }
    let height = (bottom as f32 - vm.descent).ceil().max(0.0) as u32;

    TextExtent { width, height }
}

/// Pre-padding canvas height for a tape of `tape_mm` millimeters.
pub fn canvas_height(tape_mm: u32) -> u32 {
    tape_mm * CANVAS_H / REFERENCE_TAPE_MM
}

/// Draw `text` onto a transparent `width x height` canvas.
/// Text is left-anchored and centered on the ascender/descender band;
/// bars are one-pixel red rows at the very top and bottom.
pub fn compose(
    font: &LabelFont,
    text: &str,
    color: Rgba<u8>,
    width: u32,
    height: u32,
    bars: bool,
) -> RgbaImage {
    let mut img = RgbaImage::new(width, height);

    let vm = font.v_metrics();
    let advance = line_advance(font);
    let lines: Vec<&str> = text_lines(text).collect();
    let block_h = (lines.len().saturating_sub(1)) as f32 * advance + (vm.ascent - vm.descent);
    let top = height as f32 / 2.0 - block_h / 2.0;

    for (i, line) in lines.iter().enumerate() {
        let baseline = top + vm.ascent + i as f32 * advance;
        for g in font.font().layout(line, font.scale(), point(0.0, baseline)) {
            draw_glyph(&mut img, &g, color);
        }
    }

    if bars && height > 0 {
        for x in 0..width {
            img.put_pixel(x, 0, BAR_COLOR);
            img.put_pixel(x, height - 1, BAR_COLOR);
        }
    }

    img
}

/// Center `img` vertically on a transparent canvas of the canonical height.
/// Any odd remainder goes to the bottom margin.
pub fn add_margins(img: &RgbaImage) -> RgbaImage {
    let mut out = RgbaImage::new(img.width(), CANVAS_H);
    let margin = CANVAS_H.saturating_sub(img.height()) / 2;
    imageops::replace(&mut out, img, 0, margin as i64);
    out
}

/// Full label: measure, compose at the tape height, pad to the canonical height.
pub fn render_label(font: &LabelFont, text: &str, color: Rgba<u8>, tape_mm: u32, bars: bool) -> RgbaImage {
    let extent = measure_text(font, text);
    let height = canvas_height(tape_mm);
    debug!(
        "text extent {}x{}, canvas {}x{} for {}mm tape",
        extent.width, extent.height, extent.width, height, tape_mm
    );

    let composed = compose(font, text, color, extent.width, height, bars);
    add_margins(&composed)
}

// Breaks on `\n`, `\r\n` and a lone `\r`.
fn text_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').flat_map(|l| l.strip_suffix('\r').unwrap_or(l).split('\r'))
}

fn line_advance(font: &LabelFont) -> f32 {
    let vm = font.v_metrics();
    vm.ascent - vm.descent + vm.line_gap
}

fn ink_right(glyphs: &[PositionedGlyph<'_>]) -> i32 {
    glyphs
        .iter()
        .filter_map(|g| g.pixel_bounding_box().map(|bb| bb.max.x))
        .max()
        .unwrap_or(0)
}

fn ink_bottom(glyphs: &[PositionedGlyph<'_>]) -> i32 {
    glyphs
        .iter()
        .filter_map(|g| g.pixel_bounding_box().map(|bb| bb.max.y))
        .max()
        .unwrap_or(0)
}

fn draw_glyph(img: &mut RgbaImage, g: &PositionedGlyph<'_>, color: Rgba<u8>) {
    let Some(bb) = g.pixel_bounding_box() else { return };
    let (w, h) = (img.width() as i32, img.height() as i32);
    g.draw(|x, y, v| {
        let px = x as i32 + bb.min.x;
        let py = y as i32 + bb.min.y;
        if px >= 0 && py >= 0 && px < w && py < h {
            blend(img.get_pixel_mut(px as u32, py as u32), color, v);
        }
    });
}

// Source-over with the glyph coverage scaling the source alpha.
fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>, coverage: f32) {
    let sa = src[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let oa = sa + da * (1.0 - sa);
    for c in 0..3 {
        let v = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / oa;
        dst[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (oa * 255.0).round().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::test_font_path;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn font() -> LabelFont {
        LabelFont::from_path("DejaVuSans", &test_font_path(), 40).unwrap()
    }

    #[test]
    fn canvas_height_scales_with_tape() {
        assert_eq!(canvas_height(24), 128);
        assert_eq!(canvas_height(16), 85);
        assert_eq!(canvas_height(12), 64);
    }

    #[test]
    fn longest_line_counts_chars_and_keeps_first_on_tie() {
        assert_eq!(longest_line("AB"), "AB");
        assert_eq!(longest_line("a\nbcd\nef"), "bcd");
        assert_eq!(longest_line("abc\nxyz"), "abc");
        assert_eq!(longest_line("ab\r\ncd\r\n"), "ab");
        // pixel width is not considered: three narrow glyphs beat two wide ones
        assert_eq!(longest_line("WW\niii"), "iii");
    }

    #[test]
    fn measure_is_positive_and_grows_with_text() {
        let f = font();
        let a = measure_text(&f, "A");
        let ab = measure_text(&f, "AB");
        assert!(a.width > 0);
        assert!(ab.width > a.width);
        assert!(ab.height > 0);
    }

    #[test]
    fn measure_uses_longest_line_by_chars() {
        let f = font();
        let multi = measure_text(&f, "WW\niii");
        let iii = measure_text(&f, "iii");
        assert_eq!(multi.width, iii.width);
        assert!(multi.height > iii.height);
    }

    #[test]
    fn bars_cover_top_and_bottom_rows() {
        let f = font();
        let ext = measure_text(&f, "AB");
        let img = compose(&f, "AB", BLACK, ext.width, canvas_height(16), true);
        assert_eq!(img.dimensions(), (ext.width, 85));
        for x in 0..img.width() {
            assert_eq!(*img.get_pixel(x, 0), BAR_COLOR);
            assert_eq!(*img.get_pixel(x, 84), BAR_COLOR);
        }
    }

    #[test]
    fn no_bars_means_no_red() {
        let f = font();
        let ext = measure_text(&f, "AB");
        let img = compose(&f, "AB", BLACK, ext.width, 128, false);
        assert!(img.pixels().all(|p| *p != BAR_COLOR));
        // text itself was drawn
        assert!(img.pixels().any(|p| p[3] > 0));
    }

    #[test]
    fn text_uses_requested_color() {
        let f = font();
        let blue = Rgba([0, 0, 255, 255]);
        let ext = measure_text(&f, "H");
        let img = compose(&f, "H", blue, ext.width, 128, false);
        let inked: Vec<_> = img.pixels().filter(|p| p[3] > 0).collect();
        assert!(!inked.is_empty());
        assert!(inked.iter().all(|p| p[0] == 0 && p[1] == 0 && p[2] == 255));
    }

    #[test]
    fn text_is_vertically_centered() {
        let f = font();
        let ext = measure_text(&f, "H");
        let img = compose(&f, "H", BLACK, ext.width, 128, false);
        let rows: Vec<u32> = (0..img.height())
            .filter(|&y| (0..img.width()).any(|x| img.get_pixel(x, y)[3] > 0))
            .collect();
        let (first, last) = (rows[0], *rows.last().unwrap());
        // ink stays well inside the canvas on both sides
        assert!(first > 20, "ink starts at row {}", first);
        assert!(last < 108, "ink ends at row {}", last);
    }

    #[test]
    fn margins_pad_to_canonical_height() {
        let mut small = RgbaImage::new(7, 85);
        for x in 0..7 {
            small.put_pixel(x, 0, BAR_COLOR);
            small.put_pixel(x, 84, BAR_COLOR);
        }
        let padded = add_margins(&small);
        assert_eq!(padded.dimensions(), (7, CANVAS_H));
        // (128 - 85) / 2 == 21: extra row goes below
        assert_eq!(padded.get_pixel(0, 20)[3], 0);
        assert_eq!(*padded.get_pixel(0, 21), BAR_COLOR);
        assert_eq!(*padded.get_pixel(0, 105), BAR_COLOR);
        assert_eq!(padded.get_pixel(0, 106)[3], 0);
    }

    #[test]
    fn rendered_label_is_always_canonical_height() {
        let f = font();
        let width = measure_text(&f, "AB").width;
        for tape in [12, 16, 24] {
            let img = render_label(&f, "AB", BLACK, tape, true);
            assert_eq!(img.dimensions(), (width, CANVAS_H));
        }
    }

    #[test]
    fn blend_onto_transparent_keeps_color() {
        let mut px = Rgba([0, 0, 0, 0]);
        blend(&mut px, Rgba([10, 20, 30, 255]), 0.5);
        assert_eq!(px, Rgba([10, 20, 30, 128]));

        let mut untouched = Rgba([0, 0, 0, 0]);
        blend(&mut untouched, Rgba([10, 20, 30, 255]), 0.0);
        assert_eq!(untouched, Rgba([0, 0, 0, 0]));
    }
}
