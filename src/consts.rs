use image::Rgba;

// Canvas and label defaults
pub const CANVAS_H: u32 = 128;          // every saved label is this tall
pub const REFERENCE_TAPE_MM: u32 = 24;  // tape width that fills CANVAS_H

pub const DEFAULT_FONT: &str = "Ubuntu-M";
pub const DEFAULT_FONT_PX: u32 = 40;
pub const DEFAULT_TEXT_COLOR: &str = "black";

pub const BAR_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

pub const OUTPUT_FILE: &str = "label.png";
pub const SAVE_PROMPT: &str = "save image?";
