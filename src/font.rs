//! Font lookup and loading.
//!
//! A font is requested either by path or by a bare name such as `Ubuntu-M`.
//! Bare names are looked up in the platform font directories, preferring
//! `.ttf` files when no extension was given.

use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;
use rusttype::{Font, Scale, VMetrics};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("font not found in {searched} font directories")]
    NotFound { searched: usize },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}: not a supported TrueType/OpenType font")]
    InvalidData(PathBuf),

    #[error("invalid font size {0}")]
    InvalidSize(u32),
}

/// An opened typeface at a fixed pixel size.
pub struct LabelFont {
    font: Font<'static>,
    scale: Scale,
    name: String,
    path: PathBuf,
}

impl LabelFont {
    /// Resolve `name` and open it at `size_px` pixels.
    pub fn load(name: &str, size_px: u32) -> Result<Self, FontError> {
        let dirs = font_dirs();
        let path = resolve_font_in(name, &dirs)?;
        Self::from_path(name, &path, size_px)
    }

    /// Open the font file at `path` without any directory lookup.
    pub fn from_path(name: &str, path: &Path, size_px: u32) -> Result<Self, FontError> {
        if size_px == 0 {
            return Err(FontError::InvalidSize(size_px));
        }
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let font = Font::try_from_vec(data).ok_or_else(|| FontError::InvalidData(path.to_path_buf()))?;
        debug!("loaded font '{}' from {} at {}px", name, path.display(), size_px);

        let px = size_px as f32;
        Ok(Self {
            font,
            scale: Scale { x: px, y: px },
            name: name.to_string(),
            path: path.to_path_buf(),
        })
    }

    pub fn font(&self) -> &Font<'static> {
        &self.font
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn v_metrics(&self) -> VMetrics {
        self.font.v_metrics(self.scale)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelFont")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("size", &self.scale.y)
            .finish()
    }
}

/// Platform directories searched for fonts requested by bare name.
pub fn font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if cfg!(target_os = "windows") {
        if let Some(windir) = std::env::var_os("WINDIR") {
            dirs.push(PathBuf::from(windir).join("Fonts"));
        }
    } else if cfg!(target_os = "macos") {
        dirs.push(PathBuf::from("/Library/Fonts"));
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        if let Some(home) = std::env::var_os("HOME") {
            dirs.push(PathBuf::from(home).join("Library/Fonts"));
        }
    } else {
        let data_home = std::env::var_os("XDG_DATA_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/share")));
        dirs.extend(data_home.map(|d| d.join("fonts")));

        let data_dirs = std::env::var("XDG_DATA_DIRS")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
        dirs.extend(
            data_dirs
                .split(':')
                .filter(|d| !d.is_empty())
                .map(|d| PathBuf::from(d).join("fonts")),
        );
    }

    dirs
}

/// Find the file for `name`, either as a direct path or inside `dirs`.
pub fn resolve_font_in(name: &str, dirs: &[PathBuf]) -> Result<PathBuf, FontError> {
    let direct = Path::new(name);
    if direct.is_file() {
        return Ok(direct.to_path_buf());
    }

    let Some(wanted) = direct.file_name().and_then(|f| f.to_str()) else {
        return Err(FontError::NotFound { searched: dirs.len() });
    };
    let has_ext = direct.extension().is_some();
    let mut other_ext: Option<PathBuf> = None;

    for dir in dirs {
        let entries = WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file());

        for entry in entries {
            let path = entry.path();
            if has_ext {
                if entry.file_name().to_str() == Some(wanted) {
                    debug!("resolved font '{}' to {}", name, path.display());
                    return Ok(path.to_path_buf());
                }
                continue;
            }
            if path.file_stem().and_then(|s| s.to_str()) != Some(wanted) {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) == Some("ttf") {
                debug!("resolved font '{}' to {}", name, path.display());
                return Ok(path.to_path_buf());
            }
            if other_ext.is_none() {
                other_ext = Some(path.to_path_buf());
            }
        }
    }

    other_ext.ok_or(FontError::NotFound { searched: dirs.len() })
}
