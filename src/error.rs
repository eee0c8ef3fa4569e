use thiserror::Error;

use crate::font::FontError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot open font {name}: {source}")]
    Font {
        name: String,
        #[source]
        source: FontError,
    },

    #[error("label text has no visible glyphs")]
    NoVisibleGlyphs,

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
