use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use log::{debug, info};

use crate::ascii::AsciiFrame;
use crate::error::{AppError, Result};

pub const CLEAR_SCREEN: &str = "\x1b[2J";
pub const CURSOR_HOME: &str = "\x1b[H";
pub const HIDE_CURSOR: &str = "\x1b[?25l";
pub const SHOW_CURSOR: &str = "\x1b[?25h";

pub const FIRST_FRAME_DELAY: Duration = Duration::from_millis(2500);
pub const FRAME_DELAY: Duration = Duration::from_millis(25);

#[derive(Debug, Clone, Copy)]
pub struct PlaybackOptions {
    pub first_delay: Duration,
    pub frame_delay: Duration,
    pub suppress_interrupt: bool,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            first_delay: FIRST_FRAME_DELAY,
            frame_delay: FRAME_DELAY,
            suppress_interrupt: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes Ctrl-C into this flag. Can only be done once per process.
    pub fn install() -> Result<Self> {
        let interrupt = Self::new();
        let flag = Arc::clone(&interrupt.flag);
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
        })?;
        Ok(interrupt)
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::SeqCst)
    }
}

/// Hides the cursor while alive; clears the screen and shows the cursor
/// again on drop, however playback ends.
struct CursorGuard<'a, W: Write> {
    out: &'a mut W,
}

impl<'a, W: Write> CursorGuard<'a, W> {
    fn enter(out: &'a mut W) -> io::Result<Self> {
        out.write_all(HIDE_CURSOR.as_bytes())?;
        out.flush()?;
        Ok(Self { out })
    }
}

impl<W: Write> Drop for CursorGuard<'_, W> {
    fn drop(&mut self) {
        // Best-effort, errors during drop are ignored.
        let _ = write!(self.out, "{CLEAR_SCREEN}{CURSOR_HOME}{SHOW_CURSOR}");
        let _ = self.out.flush();
    }
}

pub fn play<W: Write>(
    frames: &[AsciiFrame],
    out: &mut W,
    options: &PlaybackOptions,
    interrupt: &Interrupt,
) -> Result<()> {
    play_with(frames, out, options, interrupt, thread::sleep)
}

pub fn play_with<W, S>(
    frames: &[AsciiFrame],
    out: &mut W,
    options: &PlaybackOptions,
    interrupt: &Interrupt,
    mut sleep: S,
) -> Result<()>
where
    W: Write,
    S: FnMut(Duration),
{
    let guard = CursorGuard::enter(out)?;
    debug!("playing {} frames", frames.len());

    for (index, frame) in frames.iter().enumerate() {
        writeln!(guard.out, "{CLEAR_SCREEN}{CURSOR_HOME}{frame}")?;
        guard.out.flush()?;

        sleep(if index == 0 {
            options.first_delay
        } else {
            options.frame_delay
        });

        if interrupt.take() {
            if options.suppress_interrupt {
                debug!("ignoring interrupt at frame {index}");
                continue;
            }
            info!("playback interrupted at frame {index}");
            return Err(AppError::Interrupted);
        }
    }

    Ok(())
}
