use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("input file does not exist: {0}")]
    InputNotFound(PathBuf),

    #[error("ffmpeg must be installed and available on PATH")]
    MissingFfmpeg,

    #[error("failed to run command `{program}`: {source}")]
    CommandSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command `{program}` failed (exit code {code:?}): {stderr}")]
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("no frames were extracted from the input video")]
    NoFramesExtracted,

    #[error("invalid glyph palette: {0}")]
    InvalidPalette(String),

    #[error("invalid glyph sheet: {0}")]
    InvalidGlyphSheet(String),

    #[error("invalid frame file: {0}")]
    InvalidFrameFile(String),

    #[error("max command length {max_length} is too small, need more than {minimum}")]
    MaxLengthTooSmall { max_length: usize, minimum: usize },

    #[error("playback interrupted")]
    Interrupted,

    #[error("failed to install Ctrl-C handler: {0}")]
    CtrlC(#[from] ctrlc::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}
