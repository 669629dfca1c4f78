// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Simple UEFI backend for the [`log`] crate.
//!
//! Records go to the UEFI standard error console, so that they do not get mixed into output that a shell
//! script may want to parse.

use core::fmt::Write;

use log::{LevelFilter, Metadata, Record, SetLoggerError};
use uefi::system::with_stderr;

/// A simple logging backend for UEFI.
#[derive(Default)]
pub struct UefiLogger {
    /// Whether the source file and line are printed with each record.
    location: bool,
}

impl UefiLogger {
    /// Constructs a new [`UefiLogger`].
    #[must_use = "Has no effect if the result is unused"]
    pub const fn new() -> Self {
        Self { location: false }
    }

    /// Constructs a new [`UefiLogger`] that also prints where each record came from.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn with_location() -> Self {
        Self { location: true }
    }

    /// Installs the logger and sets the maximum log level.
    ///
    /// # Errors
    ///
    /// May return an `Error` if a logger was already installed.
    pub fn install(&'static self, level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_logger(self).map(|()| log::set_max_level(level))
    }
}

impl log::Log for UefiLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level = record.level();
        let args = record.args();
        with_stderr(|stderr| {
            let _ = if self.location {
                let file = record.file().unwrap_or_default();
                let line = record.line().unwrap_or_default();
                stderr.write_fmt(format_args!("[{level} {file}:{line}] {args}\n"))
            } else {
                stderr.write_fmt(format_args!("[{level}] {args}\n"))
            };
        });
    }

    fn flush(&self) {}
}
