//! The standalone player written to the target machine: a POSIX `sh`
//! program with the frames inlined as quoted arguments.

use std::time::Duration;

use crate::ascii::{AsciiFrame, AsciiVideo};
use crate::player::PlaybackOptions;

const PLAYER_TEMPLATE: &str = r#"#!/bin/sh
first_delay=@FIRST_DELAY@
frame_delay=@FRAME_DELAY@

cleanup() {
    printf '\033[2J\033[H\033[?25h'
}

frame() {
    printf '\033[2J\033[H'
    printf '%s\n' "$@"
}

trap cleanup EXIT
@INTERRUPT_TRAP@
printf '\033[?25l'

@FRAMES@
"#;

const SUPPRESS_TRAP: &str = "trap '' INT";
const EXIT_TRAP: &str = "trap 'exit 130' INT";

/// Wraps `text` in single quotes, closing and reopening around embedded quotes.
pub fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

fn seconds(delay: Duration) -> String {
    delay.as_secs_f64().to_string()
}

fn frame_call(frame: &AsciiFrame, delay_var: &str) -> String {
    let args: Vec<String> = frame.lines().map(shell_quote).collect();
    format!("frame \\\n{}\nsleep \"${delay_var}\"\n", args.join(" \\\n"))
}

pub fn render_player(video: &AsciiVideo, options: &PlaybackOptions) -> String {
    let frames: String = video
        .frames
        .iter()
        .enumerate()
        .map(|(index, frame)| {
            let delay_var = if index == 0 { "first_delay" } else { "frame_delay" };
            frame_call(frame, delay_var)
        })
        .collect();

    let trap = if options.suppress_interrupt {
        SUPPRESS_TRAP
    } else {
        EXIT_TRAP
    };

    PLAYER_TEMPLATE
        .replace("@FIRST_DELAY@", &seconds(options.first_delay))
        .replace("@FRAME_DELAY@", &seconds(options.frame_delay))
        .replace("@INTERRUPT_TRAP@", trap)
        .replace("@FRAMES@", frames.trim_end())
}
