// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`BootId`], the number behind every `Boot####` variable.
//!
//! A [`BootId`] is displayed as four uppercase hexadecimal digits, and can be parsed either from bare hex
//! digits (`3`, `0003`) or from a variable name (`Boot0003`, `boot0003`).

use core::{fmt, str::FromStr};

use alloc::{format, string::ToString};
use uefi::CString16;

use crate::{
    BootResult,
    error::BootError,
    system::helper::{str_to_cstr, strip_prefix_ignore_case},
};

/// The prefix of every load option variable, which is also accepted in front of a textual id.
pub const BOOT_PREFIX: &str = "Boot";

/// The identifier of a `Boot####` load option.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BootId(pub u16);

impl BootId {
    /// Gets the name of the variable that stores this load option, such as `Boot0003`.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the name could not be converted into a [`CString16`], which does not happen
    /// in practice as the name is always ASCII.
    pub fn var_name(self) -> BootResult<CString16> {
        Ok(str_to_cstr(&format!("{BOOT_PREFIX}{self}"))?)
    }

    /// Returns the id as little endian bytes, the way it is stored in `BootOrder` and `BootNext`.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn to_le_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }

    /// Reads an id from little endian bytes.
    ///
    /// Returns `None` if there are fewer than two bytes. Any bytes past the second are ignored.
    #[must_use = "Has no effect if the result is unused"]
    pub fn from_le_slice(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [lo, hi, ..] => Some(Self(u16::from_le_bytes([*lo, *hi]))),
            _ => None,
        }
    }
}

/// Splits a comma separated list of boot ids into its tokens.
///
/// A single trailing comma is allowed. Any other empty token is kept, so that parsing it fails instead of it
/// being skipped silently. An empty list has no tokens.
pub fn split_id_list(list: &str) -> impl Iterator<Item = &str> {
    let list = list.strip_suffix(',').unwrap_or(list);
    (!list.is_empty())
        .then(|| list.split(','))
        .into_iter()
        .flatten()
}

impl From<u16> for BootId {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl fmt::Display for BootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

impl FromStr for BootId {
    type Err = BootError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let digits = strip_prefix_ignore_case(token, BOOT_PREFIX);

        // from_str_radix allows a leading +, which is not a hex digit
        if digits.is_empty() || !digits.chars().all(|x| x.is_ascii_hexdigit()) {
            return Err(BootError::InvalidId(token.to_string()));
        }

        u16::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|_| BootError::InvalidId(token.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(BootId(0x1).to_string(), "0001");
        assert_eq!(BootId(0xABCD).to_string(), "ABCD");
        assert_eq!(BootId(0xFFFF).to_string(), "FFFF");
    }

    #[test]
    fn test_var_name() -> BootResult<()> {
        assert_eq!(String::from(&BootId(0x2a).var_name()?), "Boot002A");
        Ok(())
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!("0003".parse::<BootId>().ok(), Some(BootId(3)));
        assert_eq!("3".parse::<BootId>().ok(), Some(BootId(3)));
        assert_eq!("Boot000A".parse::<BootId>().ok(), Some(BootId(0xA)));
        assert_eq!("BOOTffff".parse::<BootId>().ok(), Some(BootId(0xFFFF)));
        assert_eq!(" boot0002 ".parse::<BootId>().ok(), Some(BootId(2)));
    }

    #[test]
    fn test_parse_invalid() {
        for token in ["", "Boot", "10000", "xyz", "+1", "0x01", "Boot 1"] {
            assert!(
                matches!(token.parse::<BootId>(), Err(BootError::InvalidId(_))),
                "{token} should not parse"
            );
        }
    }

    #[test]
    fn test_le_bytes() {
        assert_eq!(BootId(0x0102).to_le_bytes(), [0x02, 0x01]);
        assert_eq!(BootId::from_le_slice(&[0x02, 0x01, 0xFF]), Some(BootId(0x0102)));
        assert_eq!(BootId::from_le_slice(&[0x02]), None);
    }

    #[test]
    fn test_split_id_list() {
        let tokens: Vec<_> = split_id_list("0004,Boot0001,3").collect();
        assert_eq!(tokens, ["0004", "Boot0001", "3"]);
        let tokens: Vec<_> = split_id_list("4,2,").collect();
        assert_eq!(tokens, ["4", "2"]);
        let tokens: Vec<_> = split_id_list("4,,2").collect();
        assert_eq!(tokens, ["4", "", "2"]);
        assert_eq!(split_id_list("").count(), 0);
    }

    proptest! {
        #[test]
        fn parses_own_display(x in any::<u16>()) {
            prop_assert_eq!(BootId(x).to_string().parse::<BootId>().ok(), Some(BootId(x)));
            prop_assert_eq!(format!("Boot{}", BootId(x)).parse::<BootId>().ok(), Some(BootId(x)));
        }

        #[test]
        fn parse_doesnt_panic(x in any::<String>()) {
            let _ = x.parse::<BootId>();
        }
    }
}
