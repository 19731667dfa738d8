use std::fmt;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};

use crate::error::{AppError, Result};
use crate::glyphs::Palette;

pub const DEFAULT_WIDTH: u32 = 80;
pub const DEFAULT_HEIGHT: u32 = 24;

#[derive(Debug, Clone)]
pub struct AsciiOptions {
    pub width: u32,
    pub height: u32,
    pub palette: Palette,
}

impl AsciiOptions {
    pub fn new(width: u32, height: u32, charset: &str) -> Result<Self> {
        Ok(Self {
            width: width.max(1),
            height: height.max(1),
            palette: Palette::new(charset)?,
        })
    }
}

impl Default for AsciiOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            palette: Palette::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiFrame {
    text: String,
}

impl AsciiFrame {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    // (width of first line, line count)
    fn shape(&self) -> (usize, usize) {
        let width = self.lines().next().map_or(0, |line| line.chars().count());
        (width, self.lines().count())
    }
}

impl fmt::Display for AsciiFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Grays and resizes a decoded image to the sample grid the quantizer expects.
pub fn prepare_frame(image: &DynamicImage, width: u32, height: u32) -> GrayImage {
    let gray = image.to_luma8();
    if gray.width() == width && gray.height() == height {
        return gray;
    }
    imageops::resize(&gray, width, height, FilterType::Triangle)
}

pub fn quantize(frame: &GrayImage, palette: &Palette) -> AsciiFrame {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let mut text = String::with_capacity((width + 1) * height);

    for (y, row) in frame.rows().enumerate() {
        if y > 0 {
            text.push('\n');
        }
        text.extend(row.map(|pixel| palette.glyph(pixel[0])));
    }

    AsciiFrame { text }
}

pub fn convert_frame_to_ascii(image: &DynamicImage, options: &AsciiOptions) -> AsciiFrame {
    let samples = prepare_frame(image, options.width, options.height);
    quantize(&samples, &options.palette)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsciiVideo {
    pub frames: Vec<AsciiFrame>,
}

impl AsciiVideo {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames separated by one empty line, terminated by a newline.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (index, frame) in self.frames.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(frame.as_str());
            out.push('\n');
        }
        out
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut frames = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in text.lines() {
            if line.is_empty() {
                if !current.is_empty() {
                    frames.push(AsciiFrame {
                        text: current.join("\n"),
                    });
                    current.clear();
                }
            } else {
                current.push(line);
            }
        }
        if !current.is_empty() {
            frames.push(AsciiFrame {
                text: current.join("\n"),
            });
        }

        let Some(first) = frames.first() else {
            return Err(AppError::InvalidFrameFile("no frames found".to_string()));
        };
        let shape = first.shape();
        for (index, frame) in frames.iter().enumerate() {
            if frame.shape() != shape {
                return Err(AppError::InvalidFrameFile(format!(
                    "frame {index} is {:?}, expected {shape:?} (width, height)",
                    frame.shape()
                )));
            }
            if frame.lines().any(|line| line.chars().count() != shape.0) {
                return Err(AppError::InvalidFrameFile(format!(
                    "frame {index} has ragged lines"
                )));
            }
        }

        Ok(Self { frames })
    }
}

impl FromIterator<AsciiFrame> for AsciiVideo {
    fn from_iter<I: IntoIterator<Item = AsciiFrame>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}
