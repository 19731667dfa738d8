use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use tempfile::TempDir;

use crate::ascii::{AsciiOptions, AsciiVideo, convert_frame_to_ascii};
use crate::error::{AppError, Result};
use crate::glyphs;
use crate::player::{self, Interrupt, PlaybackOptions};
use crate::script::{InstallConfig, build_install_script};
use crate::template::render_player;
use crate::video;

#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub ascii: AsciiOptions,
}

#[derive(Debug, Clone)]
pub struct PlayConfig {
    pub input: PathBuf,
    pub ascii: AsciiOptions,
    pub playback: PlaybackOptions,
}

#[derive(Debug, Clone)]
pub struct PackageConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub ascii: AsciiOptions,
    /// Delays and interrupt policy baked into the generated player.
    pub playback: PlaybackOptions,
    pub install: InstallConfig,
}

#[derive(Debug, Clone)]
pub struct PaletteConfig {
    pub sheet: Option<PathBuf>,
    pub columns: u32,
    pub rows: u32,
    pub first_code: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct PipelineStats {
    pub frames_processed: usize,
    pub bytes_written: usize,
}

pub fn convert_video(input: &Path, options: &AsciiOptions) -> Result<AsciiVideo> {
    if !input.exists() {
        return Err(AppError::InputNotFound(input.to_path_buf()));
    }

    if !video::tools_available() {
        return Err(AppError::MissingFfmpeg);
    }

    let temp_dir = TempDir::new()?;
    let frame_paths = video::extract_frames(input, &temp_dir.path().join("extracted"))?;
    info!("extracted {} frames from {}", frame_paths.len(), input.display());

    let mut frames = Vec::with_capacity(frame_paths.len());
    for path in &frame_paths {
        let image = image::open(path)?;
        frames.push(convert_frame_to_ascii(&image, options));
    }

    Ok(AsciiVideo { frames })
}

fn is_frame_file(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("txt"))
}

/// Reads a frame file written by `convert`, or converts a video. Frame files
/// are used as stored; `options` only applies to videos.
pub fn load_video(input: &Path, options: &AsciiOptions) -> Result<AsciiVideo> {
    if is_frame_file(input) {
        if !input.exists() {
            return Err(AppError::InputNotFound(input.to_path_buf()));
        }
        let defaults = AsciiOptions::default();
        if options.width != defaults.width
            || options.height != defaults.height
            || options.palette != defaults.palette
        {
            warn!(
                "{} is already converted, ignoring --width/--height/--charset",
                input.display()
            );
        }
        let video = AsciiVideo::parse(&fs::read_to_string(input)?)?;
        info!("loaded {} frames from {}", video.len(), input.display());
        return Ok(video);
    }

    convert_video(input, options)
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

pub fn run_convert(config: &ConvertConfig) -> Result<PipelineStats> {
    let video = convert_video(&config.input, &config.ascii)?;
    let text = video.to_text();
    write_output(&config.output, &text)?;
    info!("wrote {} frames to {}", video.len(), config.output.display());

    Ok(PipelineStats {
        frames_processed: video.len(),
        bytes_written: text.len(),
    })
}

pub fn run_play(config: &PlayConfig, interrupt: &Interrupt) -> Result<PipelineStats> {
    let video = load_video(&config.input, &config.ascii)?;
    let mut stdout = io::stdout().lock();
    player::play(&video.frames, &mut stdout, &config.playback, interrupt)?;

    Ok(PipelineStats {
        frames_processed: video.len(),
        bytes_written: 0,
    })
}

pub fn package_video(video: &AsciiVideo, config: &PackageConfig) -> Result<String> {
    let payload = render_player(video, &config.playback);
    build_install_script(&payload, &config.install)
}

pub fn run_package(config: &PackageConfig) -> Result<PipelineStats> {
    let video = load_video(&config.input, &config.ascii)?;
    let script = package_video(&video, config)?;
    write_output(&config.output, &script)?;
    info!(
        "wrote install script for {} frames to {} ({} bytes)",
        video.len(),
        config.output.display(),
        script.len()
    );

    Ok(PipelineStats {
        frames_processed: video.len(),
        bytes_written: script.len(),
    })
}

pub fn run_palette(config: &PaletteConfig) -> Result<String> {
    match &config.sheet {
        Some(path) => {
            if !path.exists() {
                return Err(AppError::InputNotFound(path.clone()));
            }
            let sheet = image::open(path)?.to_luma8();
            glyphs::rank_sheet(&sheet, config.columns, config.rows, config.first_code)
        }
        None => Ok(glyphs::rank_builtin()),
    }
}
