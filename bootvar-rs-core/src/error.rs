// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`BootError`], which encapsulates other errors

use alloc::string::String;
use thiserror::Error;
use uefi::Status;

use crate::boot::{id::BootId, load_option::LoadOptionError};

/// An `Error` resulting from the program.
#[derive(Error, Debug)]
pub enum BootError {
    /// An error with UEFI, or a service from the [`uefi`] crate.
    #[error("UEFI Error: {0}")]
    Uefi(#[from] uefi::Error),

    /// A `String` could not be converted into a `CString16`.
    #[error("String Conversion Error")]
    StrError(#[from] crate::system::helper::StrError),

    /// An error occurred while reading the configuration file.
    #[error("Filesystem Error: {0}")]
    FsError(#[from] uefi::fs::Error),

    /// A UEFI variable could not be read or written.
    #[error("Variable Error: {0}")]
    VarError(#[from] crate::system::variable::VarError),

    /// A textual boot id was empty, was not hexadecimal, or was larger than `FFFF`.
    #[error("Invalid boot id: \"{0}\"")]
    InvalidId(String),

    /// An operation that needs at least one boot id was given none.
    #[error("No boot ids were given")]
    EmptyInput,

    /// The named variable does not exist.
    #[error("{0} does not exist")]
    NotFound(String),

    /// The boot id is not present in `BootOrder`.
    #[error("Boot{0} is not in BootOrder")]
    NotInOrder(BootId),

    /// The load option stored for a boot id could not be decoded.
    #[error("Boot{id} is malformed: {source}")]
    Decode {
        /// The boot id of the malformed entry.
        id: BootId,

        /// Why decoding failed.
        source: LoadOptionError,
    },

    /// A load option could not be encoded before writing it.
    #[error("Boot{id} could not be encoded: {source}")]
    Encode {
        /// The boot id the entry was going to be written to.
        id: BootId,

        /// Why encoding failed.
        source: LoadOptionError,
    },
}

impl BootError {
    /// Maps the error into the [`Status`] an application should exit with.
    ///
    /// Bad arguments, missing entries, and malformed entries all map to distinct statuses so that a calling
    /// shell script can tell them apart. A failed variable access keeps the status the firmware returned.
    #[must_use = "Has no effect if the result is unused"]
    pub fn status(&self) -> Status {
        match self {
            Self::InvalidId(_) | Self::EmptyInput | Self::StrError(_) => Status::INVALID_PARAMETER,
            Self::NotFound(_) | Self::NotInOrder(_) => Status::NOT_FOUND,
            Self::Decode { .. } => Status::COMPROMISED_DATA,
            Self::Encode {
                source: LoadOptionError::InteriorNul(_),
                ..
            } => Status::INVALID_PARAMETER,
            Self::Encode { .. } => Status::BAD_BUFFER_SIZE,
            Self::VarError(e) => e.status().unwrap_or(Status::DEVICE_ERROR),
            Self::FsError(_) => Status::DEVICE_ERROR,
            Self::Uefi(e) => e.status(),
        }
    }
}
