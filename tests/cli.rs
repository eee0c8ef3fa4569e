//! End-to-end runs of the labelgen binary.
//!
//! Each test runs in its own scratch directory with `--no-preview`, feeding
//! the save confirmation on stdin.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn font_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts/DejaVuSans.ttf")
}

fn scratch_dir(tag: &str) -> PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("labelgen_cli_{}_{}", tag, id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn labelgen(dir: &PathBuf, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_labelgen"))
        .current_dir(dir)
        .arg("--no-preview")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start labelgen");
    // usage and font errors can exit before reading stdin
    let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());
    child.wait_with_output().expect("Failed to wait for labelgen")
}

#[test]
fn test_confirmed_save_writes_label() {
    let dir = scratch_dir("save");
    let font = font_path();
    let output = labelgen(
        &dir,
        &["-t", "AB", "-s", "40", "-w", "24", "-b", "true", "-f", font.to_str().unwrap()],
        "y\n",
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("save image? [y/N]"));

    let img = image::open(dir.join("label.png")).unwrap().to_rgba8();
    assert_eq!(img.height(), 128);
    assert!(img.width() > 0);
    // bars at the top and bottom of the full-height tape band
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(0, 127).0, [255, 0, 0, 255]);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_same_width_for_every_tape() {
    let dir = scratch_dir("tapes");
    let font = font_path();
    let mut widths = Vec::new();
    for tape in ["12", "16", "24"] {
        let output = labelgen(&dir, &["-t", "Label", "-w", tape, "-f", font.to_str().unwrap()], "yes\n");
        assert!(output.status.success());
        let img = image::open(dir.join("label.png")).unwrap().to_rgba8();
        assert_eq!(img.height(), 128, "tape {}", tape);
        widths.push(img.width());
    }
    assert!(widths.windows(2).all(|w| w[0] == w[1]));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_declined_save_writes_nothing() {
    let dir = scratch_dir("decline");
    let font = font_path();
    let output = labelgen(&dir, &["-t", "AB", "-f", font.to_str().unwrap()], "n\n");

    assert!(output.status.success());
    assert!(!dir.join("label.png").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_closed_stdin_declines() {
    let dir = scratch_dir("eof");
    let font = font_path();
    let output = labelgen(&dir, &["-t", "AB", "-f", font.to_str().unwrap()], "");

    assert!(output.status.success());
    assert!(!dir.join("label.png").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_unknown_font_fails() {
    let dir = scratch_dir("nofont");
    let output = labelgen(&dir, &["-t", "AB", "-f", "No-Such-Font-XYZ"], "y\n");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot open font No-Such-Font-XYZ"), "stderr: {}", stderr);
    assert!(!dir.join("label.png").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_usage_errors() {
    let dir = scratch_dir("usage");

    let missing_text = labelgen(&dir, &[], "");
    assert_eq!(missing_text.status.code(), Some(2));

    let bad_tape = labelgen(&dir, &["-t", "AB", "-w", "18"], "");
    assert_eq!(bad_tape.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&bad_tape.stderr).contains("18"));

    assert!(!dir.join("label.png").exists());
    fs::remove_dir_all(&dir).unwrap();
}
