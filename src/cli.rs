use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::ascii::{AsciiOptions, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::Result;
use crate::glyphs::{DEFAULT_RAMP, FIRST_PRINTABLE, PRINTABLE_COUNT};
use crate::packager::DEFAULT_MAX_LENGTH;
use crate::pipeline::{ConvertConfig, PackageConfig, PaletteConfig, PlayConfig};
use crate::player::PlaybackOptions;
use crate::script::{DEFAULT_SCRIPT_NAME, InstallConfig};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Turn a video into ASCII frames, play them, or ship them as a prank install script"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert a video into a frame file
    Convert(ConvertArgs),
    /// Play a video or frame file in the terminal
    Play(PlayArgs),
    /// Generate the self-installing shell script
    Package(PackageArgs),
    /// Print glyphs ranked from least to most ink
    Palette(PaletteArgs),
}

// Only applied to video input; a `.txt` frame file is played as stored.
#[derive(Debug, Args)]
pub struct FrameArgs {
    /// Frame width in characters (video input only)
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Frame height in lines (video input only)
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Characters from dark to light (video input only)
    #[arg(long, default_value = DEFAULT_RAMP)]
    pub charset: String,
}

impl FrameArgs {
    pub fn ascii_options(&self) -> Result<AsciiOptions> {
        AsciiOptions::new(self.width, self.height, &self.charset)
    }
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Input video path
    pub input: PathBuf,

    /// Frame file path (defaults to <input-stem>_ascii.txt)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub frame: FrameArgs,
}

#[derive(Debug, Args)]
pub struct PlayArgs {
    /// Input video or .txt frame file
    pub input: PathBuf,

    /// Keep playing when Ctrl-C is pressed
    #[arg(long)]
    pub suppress_interrupt: bool,

    /// Seconds to hold the first frame
    #[arg(long, default_value_t = 2.5)]
    pub first_delay: f64,

    /// Playback rate after the first frame
    #[arg(long, default_value_t = 40.0)]
    pub fps: f64,

    #[command(flatten)]
    pub frame: FrameArgs,
}

#[derive(Debug, Args)]
pub struct PackageArgs {
    /// Input video or .txt frame file
    pub input: PathBuf,

    /// Install script path
    #[arg(short, long, default_value = DEFAULT_SCRIPT_NAME)]
    pub output: PathBuf,

    /// Shell profile to hook
    #[arg(long, default_value = "~/.zshrc")]
    pub profile: String,

    /// Where the player is rebuilt on the target machine
    #[arg(long, default_value = "~/.osx.sh")]
    pub target: String,

    /// Command to alias
    #[arg(long, default_value = "clear")]
    pub alias: String,

    /// Shell that runs the rebuilt player
    #[arg(long, default_value = "sh")]
    pub interpreter: String,

    /// Longest allowed echo command in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,

    /// Let Ctrl-C stop the generated player
    #[arg(long)]
    pub allow_interrupt: bool,

    #[command(flatten)]
    pub frame: FrameArgs,
}

#[derive(Debug, Args)]
pub struct PaletteArgs {
    /// Light-on-dark glyph sheet image; the built-in font is used without one
    #[arg(long)]
    pub sheet: Option<PathBuf>,

    #[arg(long, default_value_t = 2)]
    pub columns: u32,

    #[arg(long, default_value_t = PRINTABLE_COUNT / 2)]
    pub rows: u32,

    /// Character code of the first cell
    #[arg(long, default_value_t = FIRST_PRINTABLE)]
    pub first: u32,
}

impl ConvertArgs {
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => default_output_path(&self.input),
        }
    }

    pub fn config(&self) -> Result<ConvertConfig> {
        Ok(ConvertConfig {
            input: self.input.clone(),
            output: self.output_path(),
            ascii: self.frame.ascii_options()?,
        })
    }
}

fn playback_options(first_delay: f64, fps: f64, suppress_interrupt: bool) -> PlaybackOptions {
    let defaults = PlaybackOptions::default();
    PlaybackOptions {
        first_delay: Duration::try_from_secs_f64(first_delay).unwrap_or(defaults.first_delay),
        frame_delay: Duration::try_from_secs_f64(1.0 / fps).unwrap_or(defaults.frame_delay),
        suppress_interrupt,
    }
}

impl PlayArgs {
    pub fn config(&self) -> Result<PlayConfig> {
        Ok(PlayConfig {
            input: self.input.clone(),
            ascii: self.frame.ascii_options()?,
            playback: playback_options(self.first_delay, self.fps, self.suppress_interrupt),
        })
    }
}

impl PackageArgs {
    pub fn config(&self) -> Result<PackageConfig> {
        Ok(PackageConfig {
            input: self.input.clone(),
            output: self.output.clone(),
            ascii: self.frame.ascii_options()?,
            playback: PlaybackOptions {
                suppress_interrupt: !self.allow_interrupt,
                ..PlaybackOptions::default()
            },
            install: InstallConfig {
                profile: self.profile.clone(),
                target: self.target.clone(),
                alias: self.alias.clone(),
                interpreter: self.interpreter.clone(),
                max_length: self.max_length,
                ..InstallConfig::default()
            },
        })
    }
}

impl PaletteArgs {
    pub fn config(&self) -> PaletteConfig {
        PaletteConfig {
            sheet: self.sheet.clone(),
            columns: self.columns,
            rows: self.rows,
            first_code: self.first,
        }
    }
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    input
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!("{stem}_ascii.txt"))
}
