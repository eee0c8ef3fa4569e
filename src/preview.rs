//! Host interaction: showing the label and asking whether to keep it.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use image::RgbaImage;
use log::{debug, warn};

/// Shows a finished label and asks the user whether to save it.
pub trait Preview {
    /// Display the image. Failures are not reported back.
    fn show(&mut self, img: &RgbaImage);

    /// Ask a yes/no question; `false` unless the user agrees.
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

/// Opens the platform image viewer and prompts on the terminal.
pub struct TerminalPreview {
    open_viewer: bool,
}

impl TerminalPreview {
    pub fn new(open_viewer: bool) -> Self {
        Self { open_viewer }
    }
}

impl Preview for TerminalPreview {
    fn show(&mut self, img: &RgbaImage) {
        if !self.open_viewer {
            return;
        }
        let path = preview_path();
        if let Err(e) = img.save(&path) {
            warn!("cannot write preview {}: {}", path.display(), e);
            return;
        }
        // The viewer is left running; nothing waits on it.
        match viewer_command(&path).stdin(Stdio::null()).spawn() {
            Ok(child) => debug!("viewer started (pid {}) for {}", child.id(), path.display()),
            Err(e) => warn!("cannot start image viewer: {}", e),
        }
    }

    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        ask_yes_no(&mut stdin.lock(), &mut stdout.lock(), prompt)
    }
}

/// Prompt until the answer is yes, no, or empty (which means no).
/// End of input is treated as no.
pub fn ask_yes_no<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<bool> {
    loop {
        write!(output, "{} [y/N]: ", prompt)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(false);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "" | "n" | "no" => return Ok(false),
            _ => writeln!(output, "Error: invalid input")?,
        }
    }
}

fn preview_path() -> PathBuf {
    std::env::temp_dir().join(format!("labelgen-preview-{}.png", std::process::id()))
}

fn viewer_command(path: &Path) -> Command {
    if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg("start").arg("").arg(path);
        cmd
    } else if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}
