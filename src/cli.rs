use std::fmt;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, ValueEnum};
use image::Rgba;

use crate::color::parse_color;
use crate::consts::{DEFAULT_FONT, DEFAULT_FONT_PX, DEFAULT_TEXT_COLOR};

/// Render a text label for a tape printer and save it as label.png
#[derive(Parser, Debug, Clone)]
#[command(name = "labelgen", version)]
pub struct Args {
    /// Label text (surrounding whitespace is trimmed)
    #[arg(short = 't', long = "text", value_parser = parse_text)]
    pub text: String,

    /// Font size in pixels
    #[arg(short = 's', long = "font-size", default_value_t = DEFAULT_FONT_PX)]
    pub font_size: u32,

    /// Text color: CSS name, #rrggbb[aa], #rgb[a] or rgb()/rgba()
    #[arg(short = 'c', long = "text-color", default_value = DEFAULT_TEXT_COLOR, value_parser = parse_color)]
    pub text_color: Rgba<u8>,

    /// Font name (looked up in the system font directories) or path
    #[arg(short = 'f', long = "font", default_value = DEFAULT_FONT)]
    pub font_name: String,

    /// Draw red guide bars at the top and bottom of the tape area
    #[arg(
        short = 'b',
        long = "bars",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub show_bars: bool,

    /// Tape width in mm
    #[arg(short = 'w', long = "tape-width", value_enum, default_value_t = TapeWidth::Mm24)]
    pub tape_width: TapeWidth,

    /// Don't open the image viewer before asking to save
    #[arg(long = "no-preview")]
    pub no_preview: bool,
}

/// Supported label tape widths.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapeWidth {
    #[value(name = "24")]
    Mm24,
    #[value(name = "16")]
    Mm16,
    #[value(name = "12")]
    Mm12,
}

impl TapeWidth {
    pub fn mm(self) -> u32 {
        match self {
            TapeWidth::Mm24 => 24,
            TapeWidth::Mm16 => 16,
            TapeWidth::Mm12 => 12,
        }
    }
}

impl fmt::Display for TapeWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mm", self.mm())
    }
}

fn parse_text(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("text must not be empty".into());
    }
    Ok(trimmed.to_string())
}
