// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Human readable views of the boot configuration.
//!
//! These only format, they never fail and never touch any variables. They are meant to be used with
//! `println!` or anything else that takes a [`fmt::Display`].

use core::fmt;

use crate::boot::{
    BootList, BootListEntry, Dump, DumpEntry,
    id::BootId,
    load_option::{LoadOption, LoadOptionAttributes},
};

/// The most bytes of a device path that [`HexPreview`] shows.
pub const PREVIEW_LEN: usize = 64;

/// Shows the first [`PREVIEW_LEN`] bytes of a buffer as space separated hex.
pub struct HexPreview<'a>(pub &'a [u8]);

impl fmt::Display for HexPreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().take(PREVIEW_LEN).enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// A yes or no answer for an attribute.
const fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Shows a decoded load option, along with its position in `BootOrder`.
pub struct EntryView<'a> {
    /// The 1-based position in `BootOrder`.
    pub index: usize,

    /// How many entries `BootOrder` has.
    pub total: usize,

    /// The boot id of the entry.
    pub id: BootId,

    /// The decoded entry.
    pub option: &'a LoadOption,
}

impl fmt::Display for EntryView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            index,
            total,
            id,
            option,
        } = self;
        let attrs = option.attributes;
        let description = if option.description.is_empty() {
            "(none)"
        } else {
            option.description.as_str()
        };

        writeln!(f, "[{index}/{total}] Boot{id}")?;
        writeln!(f, "    Attributes: {:#x}", attrs.bits())?;
        writeln!(
            f,
            "      - Active: {}",
            yes_no(attrs.contains(LoadOptionAttributes::ACTIVE))
        )?;
        writeln!(
            f,
            "      - ForceReconnect: {}",
            yes_no(attrs.contains(LoadOptionAttributes::FORCE_RECONNECT))
        )?;
        writeln!(
            f,
            "      - Hidden: {}",
            yes_no(attrs.contains(LoadOptionAttributes::HIDDEN))
        )?;
        writeln!(f, "    Description: {description}")?;
        writeln!(f, "    DevicePath bytes: {}", option.device_path.len())?;
        writeln!(
            f,
            "    DevicePath hex preview: {}",
            HexPreview(&option.device_path)
        )?;
        write!(f, "    OptionalData bytes: {}", option.optional_data.len())
    }
}

/// Shows every entry of a [`BootList`], including the ones that could not be read.
pub struct ListView<'a>(pub &'a BootList);

impl fmt::Display for ListView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = self.0;
        if let Some(current) = list.current {
            writeln!(f, "BootCurrent: Boot{current}")?;
        }
        if let Some(next) = list.next {
            writeln!(f, "BootNext: Boot{next}")?;
        }

        let total = list.entries.len();
        for (i, BootListEntry { id, option }) in list.entries.iter().enumerate() {
            let index = i + 1;
            writeln!(f)?;
            match option {
                Ok(option) => writeln!(
                    f,
                    "{}",
                    EntryView {
                        index,
                        total,
                        id: *id,
                        option,
                    }
                )?,
                Err(e) => writeln!(f, "[{index}/{total}] Boot{id}: (unreadable: {e})")?,
            }
        }
        Ok(())
    }
}

/// Shows `BootOrder` on a single line.
pub struct OrderView<'a>(pub &'a [BootId]);

impl fmt::Display for OrderView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BootOrder ({}):", self.0.len())?;
        for id in self.0 {
            write!(f, " Boot{id}")?;
        }
        Ok(())
    }
}

/// Shows the raw sizes and attributes from a [`Dump`].
pub struct DumpView<'a>(pub &'a Dump);

impl fmt::Display for DumpView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dump = self.0;
        write!(f, "BootOrder bytes: {}", dump.order_size)?;
        for (i, DumpEntry { id, info }) in dump.entries.iter().enumerate() {
            let index = i + 1;
            match info {
                Ok(info) => write!(
                    f,
                    "\n[{index}] Boot{id} size={} attrs={:#x}",
                    info.size,
                    info.attributes.bits()
                )?,
                Err(e) => write!(f, "\n[{index}] Boot{id} size=0 (unreadable: {e})")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use uefi::runtime::VariableAttributes;

    use super::*;
    use crate::{boot::RawInfo, error::BootError};

    fn option() -> LoadOption {
        LoadOption {
            attributes: LoadOptionAttributes::from_bits_retain(0x9),
            description: "Windows Boot Manager".to_owned(),
            device_path: vec![0x7f, 0xff, 0x04, 0x00],
            optional_data: vec![0; 10],
        }
    }

    #[test]
    fn test_hex_preview_bounded() {
        assert_eq!(HexPreview(&[]).to_string(), "");
        assert_eq!(HexPreview(&[0x0a, 0xff]).to_string(), "0a ff");
        let long = [0xab; 200];
        let preview = HexPreview(&long).to_string();
        assert_eq!(preview.split(' ').count(), PREVIEW_LEN);
        assert_eq!(long.len(), 200); // the data itself is untouched
    }

    #[test]
    fn test_entry_view() {
        let option = option();
        let text = EntryView {
            index: 1,
            total: 2,
            id: BootId(3),
            option: &option,
        }
        .to_string();
        let expected = "\
[1/2] Boot0003
    Attributes: 0x9
      - Active: yes
      - ForceReconnect: no
      - Hidden: yes
    Description: Windows Boot Manager
    DevicePath bytes: 4
    DevicePath hex preview: 7f ff 04 00
    OptionalData bytes: 10";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_entry_view_empty_description() {
        let option = LoadOption::default();
        let text = EntryView {
            index: 1,
            total: 1,
            id: BootId(0),
            option: &option,
        }
        .to_string();
        assert!(text.contains("Description: (none)"));
    }

    #[test]
    fn test_list_view() {
        let list = BootList {
            current: Some(BootId(1)),
            next: None,
            entries: vec![
                BootListEntry {
                    id: BootId(1),
                    option: Ok(option()),
                },
                BootListEntry {
                    id: BootId(2),
                    option: Err(BootError::NotFound("Boot0002".into())),
                },
            ],
        };
        let text = ListView(&list).to_string();
        assert!(text.starts_with("BootCurrent: Boot0001\n"));
        assert!(!text.contains("BootNext"));
        assert!(text.contains("[1/2] Boot0001\n"));
        assert!(text.contains("[2/2] Boot0002: (unreadable: Boot0002 does not exist)"));
    }

    #[test]
    fn test_order_view() {
        let order = [BootId(4), BootId(0x1f)];
        assert_eq!(
            OrderView(&order).to_string(),
            "BootOrder (2): Boot0004 Boot001F"
        );
    }

    #[test]
    fn test_dump_view() {
        let dump = Dump {
            order_size: 4,
            entries: vec![
                DumpEntry {
                    id: BootId(1),
                    info: Ok(RawInfo {
                        size: 120,
                        attributes: VariableAttributes::from_bits_retain(7),
                    }),
                },
                DumpEntry {
                    id: BootId(2),
                    info: Err(BootError::NotFound("Boot0002".into())),
                },
            ],
        };
        assert_eq!(
            DumpView(&dump).to_string(),
            "BootOrder bytes: 4\n[1] Boot0001 size=120 attrs=0x7\n\
             [2] Boot0002 size=0 (unreadable: Boot0002 does not exist)"
        );
    }
}
