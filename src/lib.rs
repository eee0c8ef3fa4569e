//! Label image generator for tape printers.
//! - Finds a font by name in the system font directories (or by path)
//! - Sizes the canvas to the ink width of the text and the tape height
//! - Optional red guide bars marking the printable band
//! - Pads every label to a 128 px tall canvas
//! - Previews, asks, then writes `label.png`

pub mod cli;
pub mod color;
pub mod consts;
pub mod error;
pub mod font;
pub mod graphics;
pub mod preview;

use std::path::{Path, PathBuf};

use log::{debug, info};

pub use crate::cli::{Args, TapeWidth};
pub use crate::error::{Error, Result};
pub use crate::font::{FontError, LabelFont};
pub use crate::preview::{Preview, TerminalPreview};

use crate::consts::{OUTPUT_FILE, SAVE_PROMPT};
use crate::graphics::render_label;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Saved(PathBuf),
    Aborted,
}

// ======== Pipeline ========

/// Load the font, render the label, preview it and save it to
/// `out_dir/label.png` if the user confirms.
pub fn run(args: &Args, preview: &mut dyn Preview, out_dir: &Path) -> Result<Outcome> {
    let font = LabelFont::load(&args.font_name, args.font_size).map_err(|source| Error::Font {
        name: args.font_name.clone(),
        source,
    })?;
    debug!("using {:?}", font);

    run_with_font(args, &font, preview, out_dir)
}

/// Same as [`run`] with an already opened font.
pub fn run_with_font(
    args: &Args,
    font: &LabelFont,
    preview: &mut dyn Preview,
    out_dir: &Path,
) -> Result<Outcome> {
    let img = render_label(
        font,
        &args.text,
        args.text_color,
        args.tape_width.mm(),
        args.show_bars,
    );
    if img.width() == 0 {
        return Err(Error::NoVisibleGlyphs);
    }

    preview.show(&img);

    if !preview.confirm(SAVE_PROMPT)? {
        info!("save declined, nothing written");
        return Ok(Outcome::Aborted);
    }

    let path = out_dir.join(OUTPUT_FILE);
    img.save(&path)?;
    info!("saved {}x{} label to {}", img.width(), img.height(), path.display());
    Ok(Outcome::Saved(path))
}
