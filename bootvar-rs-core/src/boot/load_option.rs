// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! A codec for `EFI_LOAD_OPTION`, the contents of every `Boot####` variable.
//!
//! The layout is as follows, with every integer in little endian:
//!
//! ```text
//! offset  size                 field
//! 0       4                    Attributes
//! 4       2                    FilePathListLength
//! 6       2 * (n + 1)          Description (UCS-2, nul terminated)
//! ..      FilePathListLength   FilePathList (device path)
//! ..      rest                 OptionalData
//! ```
//!
//! The device path and the optional data are never interpreted. They are carried as opaque bytes so that
//! writing an entry back leaves them exactly as the firmware stored them.

use alloc::{string::String, vec::Vec};
use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};
use thiserror::Error;

use crate::system::helper::utf16_to_string;

/// The size of the fixed header in front of the description.
pub const HEADER_SIZE: usize = size_of::<LoadOptionHeader>();

/// An `Error` that may result from decoding or encoding a [`LoadOption`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LoadOptionError {
    /// The buffer cannot even hold the fixed header.
    #[error("Load option is {len} bytes, shorter than the 6 byte header")]
    TooShort {
        /// The length of the buffer.
        len: usize,
    },

    /// The declared device path runs past the end of the buffer.
    #[error("Device path needs {needed} bytes but only {available} remain")]
    Truncated {
        /// The device path length declared in the header.
        needed: usize,

        /// The bytes left after the description.
        available: usize,
    },

    /// The device path is too long for its 16 bit length field.
    #[error("Device path is {0} bytes, which does not fit in a load option")]
    DevicePathTooLong(usize),

    /// The description contains a nul character, which would end it early.
    #[error("Description contains a nul character at position {0}")]
    InteriorNul(usize),
}

bitflags! {
    /// The attributes of a load option.
    ///
    /// Bits that are not named here are reserved, but are kept as they were when an option is rewritten.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LoadOptionAttributes: u32 {
        /// The firmware will consider this option when booting.
        const ACTIVE = 1 << 0;

        /// All drivers are reconnected after this option is loaded.
        const FORCE_RECONNECT = 1 << 1;

        /// The option is not shown in the firmware's boot menu.
        const HIDDEN = 1 << 3;

        /// The option is an application rather than a boot target.
        const CATEGORY_APP = 1 << 8;

        const _ = !0;
    }
}

/// The fixed part of a load option, exactly as it sits in the variable.
#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C)]
struct LoadOptionHeader {
    /// Little endian `Attributes`.
    attributes: [u8; 4],

    /// Little endian `FilePathListLength`.
    file_path_list_length: [u8; 2],
}

/// A decoded `Boot####` entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadOption {
    /// The attributes of the option.
    pub attributes: LoadOptionAttributes,

    /// The human readable label shown in boot menus.
    pub description: String,

    /// The raw device path of the boot target.
    pub device_path: Vec<u8>,

    /// Any bytes stored after the device path.
    pub optional_data: Vec<u8>,
}

impl LoadOption {
    /// Decodes a load option from the raw contents of a `Boot####` variable.
    ///
    /// The description ends at the first nul code unit. If there is none, it runs to the end of the buffer,
    /// which leaves nothing for the device path.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the buffer is shorter than the header, or if the device path length in the
    /// header is larger than what remains of the buffer.
    pub fn decode(bytes: &[u8]) -> Result<Self, LoadOptionError> {
        let header = bytes
            .get(..HEADER_SIZE)
            .map(bytemuck::pod_read_unaligned::<LoadOptionHeader>)
            .ok_or(LoadOptionError::TooShort { len: bytes.len() })?;
        let attributes =
            LoadOptionAttributes::from_bits_retain(u32::from_le_bytes(header.attributes));
        let device_path_len = usize::from(u16::from_le_bytes(header.file_path_list_length));

        let (units, mut cursor) = read_description(bytes, HEADER_SIZE);
        cursor += cursor & 1; // device paths start on a 2 byte boundary

        let available = bytes.len().saturating_sub(cursor);
        let device_path = bytes
            .get(cursor..cursor + device_path_len)
            .ok_or(LoadOptionError::Truncated {
                needed: device_path_len,
                available,
            })?;
        let optional_data = &bytes[cursor + device_path_len..];

        Ok(Self {
            attributes,
            description: utf16_to_string(&units),
            device_path: device_path.to_vec(),
            optional_data: optional_data.to_vec(),
        })
    }

    /// Encodes the load option into the raw contents of a `Boot####` variable.
    ///
    /// The device path length in the header is always taken from [`LoadOption::device_path`].
    ///
    /// # Errors
    ///
    /// May return an `Error` if the description contains a nul character, or if the device path is longer
    /// than 65535 bytes.
    pub fn encode(&self) -> Result<Vec<u8>, LoadOptionError> {
        if let Some(pos) = self.description.find('\0') {
            return Err(LoadOptionError::InteriorNul(pos));
        }
        let device_path_len = u16::try_from(self.device_path.len())
            .map_err(|_| LoadOptionError::DevicePathTooLong(self.device_path.len()))?;
        let header = LoadOptionHeader {
            attributes: self.attributes.bits().to_le_bytes(),
            file_path_list_length: device_path_len.to_le_bytes(),
        };

        let mut out = Vec::with_capacity(
            HEADER_SIZE
                + (self.description.len() + 1) * 2
                + self.device_path.len()
                + self.optional_data.len(),
        );
        out.extend_from_slice(bytemuck::bytes_of(&header));
        for unit in self.description.encode_utf16().chain([0]) {
            out.extend_from_slice(&unit.to_le_bytes());
        }
        out.extend_from_slice(&self.device_path);
        out.extend_from_slice(&self.optional_data);
        Ok(out)
    }

    /// Returns true if the [`LoadOptionAttributes::ACTIVE`] bit is set.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn is_active(&self) -> bool {
        self.attributes.contains(LoadOptionAttributes::ACTIVE)
    }

    /// Sets or clears the [`LoadOptionAttributes::ACTIVE`] bit, leaving every other bit alone.
    pub fn set_active(&mut self, active: bool) {
        self.attributes.set(LoadOptionAttributes::ACTIVE, active);
    }
}

/// Reads nul terminated UTF-16LE code units starting at `start`.
///
/// Returns the code units without the terminator, and the offset right after the terminator.
fn read_description(bytes: &[u8], start: usize) -> (Vec<u16>, usize) {
    let mut units = Vec::new();
    let mut cursor = start;
    while let Some(&[lo, hi]) = bytes.get(cursor..cursor + 2) {
        cursor += 2;
        let unit = u16::from_le_bytes([lo, hi]);
        if unit == 0 {
            break;
        }
        units.push(unit);
    }
    (units, cursor)
}
