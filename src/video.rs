use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use crate::error::{AppError, Result};

pub fn tools_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn run_tool(command: &mut Command, program: &str) -> Result<()> {
    debug!("running {command:?}");
    let output = command.output().map_err(|source| AppError::CommandSpawn {
        program: program.to_string(),
        source,
    })?;

    if output.status.success() {
        return Ok(());
    }

    Err(AppError::CommandFailed {
        program: program.to_string(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// Decodes every frame of `input` into numbered PNGs under `output_dir`,
/// returned in playback order.
pub fn extract_frames(input: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    run_tool(
        Command::new("ffmpeg")
            .args(["-y", "-v", "error", "-i"])
            .arg(input)
            .args(["-vsync", "0"])
            .arg(output_dir.join("frame_%08d.png")),
        "ffmpeg",
    )?;

    let mut files: Vec<PathBuf> = fs::read_dir(output_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension() == Some(OsStr::new("png")))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(AppError::NoFramesExtracted);
    }

    debug!("extracted {} frames into {}", files.len(), output_dir.display());
    Ok(files)
}

pub fn create_test_video(
    output: &Path,
    width: u32,
    height: u32,
    fps: u32,
    duration_seconds: f32,
) -> Result<()> {
    run_tool(
        Command::new("ffmpeg")
            .args(["-y", "-v", "error", "-f", "lavfi", "-i"])
            .arg(format!(
                "testsrc=size={width}x{height}:rate={fps}:duration={duration_seconds}"
            ))
            .arg(output),
        "ffmpeg",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_a_spawn_error() {
        let err = run_tool(
            &mut Command::new("definitely-not-a-real-program-xyz"),
            "definitely-not-a-real-program-xyz",
        )
        .unwrap_err();
        assert!(matches!(err, AppError::CommandSpawn { .. }));
    }
}
