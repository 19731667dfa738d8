//! Splits a payload into `echo -n '...' >> target` commands that rebuild it
//! on the machine running the script.
//!
//! Only backslash, single quote, line feed and carriage return are escaped.
//! NUL and the other control characters pass through untouched; the receiving
//! shell's handling of those was never checked, so they are not supported.

use std::str::Chars;

use crate::error::{AppError, Result};

pub const DEFAULT_MAX_LENGTH: usize = 4096;
pub const COMMAND_PREFIX: &str = "echo -n '";

/// Byte length of the widest escape (`'"'"'`).
pub const LONGEST_ESCAPE: usize = 5;

fn escape(ch: char) -> Option<&'static str> {
    match ch {
        '\\' => Some("\\\\"),
        '\'' => Some("'\"'\"'"),
        '\n' => Some("\\n"),
        '\r' => Some("\\r"),
        _ => None,
    }
}

fn push_escaped(buffer: &mut String, ch: char) {
    match escape(ch) {
        Some(escaped) => buffer.push_str(escaped),
        None => buffer.push(ch),
    }
}

fn escaped_len(ch: char) -> usize {
    escape(ch).map_or_else(|| ch.len_utf8(), str::len)
}

#[derive(Debug, Clone)]
pub struct Packager {
    prefix: &'static str,
    suffix: String,
    max_length: usize,
}

impl Packager {
    pub fn new(target: Option<&str>, max_length: usize) -> Result<Self> {
        let suffix = match target {
            Some(target) => format!("' >> {target}"),
            None => "'".to_string(),
        };

        let minimum = COMMAND_PREFIX.len() + suffix.len() + LONGEST_ESCAPE;
        if max_length <= minimum {
            return Err(AppError::MaxLengthTooSmall {
                max_length,
                minimum,
            });
        }

        Ok(Self {
            prefix: COMMAND_PREFIX,
            suffix,
            max_length,
        })
    }

    pub fn prefix(&self) -> &str {
        self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn commands<'a>(&'a self, payload: &'a str) -> EchoCommands<'a> {
        EchoCommands {
            packager: self,
            chars: payload.chars(),
            line: String::new(),
            finished: false,
        }
    }

    fn wrap(&self, body: &str) -> String {
        let mut command = String::with_capacity(self.prefix.len() + body.len() + self.suffix.len());
        command.push_str(self.prefix);
        command.push_str(body);
        command.push_str(&self.suffix);
        command
    }

    fn fits(&self, body_len: usize) -> bool {
        self.prefix.len() + body_len + self.suffix.len() < self.max_length
    }
}

/// Yields commands in order. The trailing buffer is always flushed, so an
/// empty payload gives exactly one command with an empty body.
pub struct EchoCommands<'a> {
    packager: &'a Packager,
    chars: Chars<'a>,
    line: String,
    finished: bool,
}

impl Iterator for EchoCommands<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.finished {
            return None;
        }

        for ch in self.chars.by_ref() {
            if self.packager.fits(self.line.len() + escaped_len(ch)) {
                push_escaped(&mut self.line, ch);
                continue;
            }

            let command = self.packager.wrap(&self.line);
            self.line.clear();
            push_escaped(&mut self.line, ch);
            return Some(command);
        }

        self.finished = true;
        Some(self.packager.wrap(&self.line))
    }
}
