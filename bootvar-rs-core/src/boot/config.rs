// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`BootVarConfig`], the configuration file for the application.
//!
//! This parses space separated key value pairs from `\loader\bootvar-rs.conf` on the same volume the
//! application was loaded from. The file is optional.
//!
//! Example configuration:
//!
//! ```text
//! # How much the application logs (off, error, warn, info, debug, trace)
//! log_level info
//!
//! # The attributes boot variables are written with. Either names (nv, bs, rt) or a hex value
//! write_attributes nv,bs,rt
//! ```

use log::{LevelFilter, warn};
use uefi::{
    CStr16, boot, cstr16,
    fs::{FileSystem, Path},
    runtime::VariableAttributes,
};

use crate::{BootResult, boot::registry::DEFAULT_WRITE_ATTRIBUTES};

/// The hardcoded configuration path for the [`BootVarConfig`].
const CONFIG_PATH: &CStr16 = cstr16!("\\loader\\bootvar-rs.conf");

/// The configuration file for the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BootVarConfig {
    /// The most verbose log level that is shown.
    pub log_level: LevelFilter,

    /// The attributes every boot variable is written with.
    pub write_attributes: VariableAttributes,
}

impl BootVarConfig {
    /// Creates a new [`BootVarConfig`] from the configuration file, if there is one.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the image handle from which this program was loaded from
    /// does not support [`uefi::proto::media::fs::SimpleFileSystem`], or the file exists but could not be read.
    /// Otherwise, it will return a default [`BootVarConfig`].
    pub fn new() -> BootResult<Self> {
        let mut fs = FileSystem::new(boot::get_image_file_system(boot::image_handle())?);
        let path = Path::new(CONFIG_PATH);

        if !fs.try_exists(path)? {
            return Ok(Self::default());
        }

        let content = fs.read(path)?;
        Ok(Self::get_config(&content))
    }

    /// Parses the contents of a [`BootVarConfig`] format string.
    ///
    /// Unknown keys and values that do not parse are skipped with a warning.
    #[must_use = "Has no effect if the result is unused"]
    pub fn get_config(content: &[u8]) -> Self {
        let mut config = Self::default();

        let Ok(content) = str::from_utf8(content) else {
            warn!("{CONFIG_PATH} is not valid UTF-8, using defaults");
            return config;
        };

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once(char::is_whitespace) else {
                warn!("Ignoring line without a value: {line}");
                continue;
            };
            let value = value.trim();
            match &*key.to_ascii_lowercase() {
                "log_level" => match value.parse() {
                    Ok(level) => config.log_level = level,
                    Err(_) => warn!("Ignoring unknown log_level {value}"),
                },
                "write_attributes" => match parse_attributes(value) {
                    Some(attributes) => config.write_attributes = attributes,
                    None => warn!("Ignoring invalid write_attributes {value}"),
                },
                _ => warn!("Ignoring unknown key {key}"),
            }
        }

        config
    }
}

impl Default for BootVarConfig {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Warn,
            write_attributes: DEFAULT_WRITE_ATTRIBUTES,
        }
    }
}

/// Parses variable attributes, given either as comma separated names or as a hex number.
///
/// Only the non-volatile, boot service and runtime bits are kept. An empty set is rejected, as writing a
/// variable with no attributes deletes it.
fn parse_attributes(value: &str) -> Option<VariableAttributes> {
    let hex = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    let attributes = if let Ok(bits) = u32::from_str_radix(hex, 16) {
        let attributes = VariableAttributes::from_bits_retain(bits);
        let unsupported = attributes.difference(DEFAULT_WRITE_ATTRIBUTES);
        if !unsupported.is_empty() {
            warn!(
                "Ignoring unsupported write_attributes bits {:#x}",
                unsupported.bits()
            );
        }
        attributes.intersection(DEFAULT_WRITE_ATTRIBUTES)
    } else {
        value
            .split(',')
            .map(|name| match &*name.trim().to_ascii_lowercase() {
                "nv" | "non_volatile" => Some(VariableAttributes::NON_VOLATILE),
                "bs" | "bootservice_access" => Some(VariableAttributes::BOOTSERVICE_ACCESS),
                "rt" | "runtime_access" => Some(VariableAttributes::RUNTIME_ACCESS),
                _ => None,
            })
            .try_fold(VariableAttributes::empty(), |acc, x| Some(acc | x?))?
    };

    (!attributes.is_empty()).then_some(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let config = r"
            # comment
            log_level debug
            write_attributes nv, bs
        "
        .as_bytes();

        let config = BootVarConfig::get_config(config);
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(
            config.write_attributes,
            VariableAttributes::NON_VOLATILE | VariableAttributes::BOOTSERVICE_ACCESS
        );
    }

    #[test]
    fn test_empty_config() {
        assert_eq!(BootVarConfig::get_config(b""), BootVarConfig::default());
        assert_eq!(
            BootVarConfig::get_config(&[0xff, 0xfe]),
            BootVarConfig::default()
        );
    }

    #[test]
    fn test_invalid_values_ignored() {
        let config = b"log_level loud\nwrite_attributes nv,xx\nunknown 1\nlonely";
        assert_eq!(BootVarConfig::get_config(config), BootVarConfig::default());
    }

    #[test]
    fn test_parse_attributes() {
        assert_eq!(
            parse_attributes("0x7"),
            Some(DEFAULT_WRITE_ATTRIBUTES)
        );
        assert_eq!(parse_attributes("7"), Some(DEFAULT_WRITE_ATTRIBUTES));
        assert_eq!(
            parse_attributes("RT,bs,non_volatile"),
            Some(DEFAULT_WRITE_ATTRIBUTES)
        );
        assert_eq!(parse_attributes("0"), None);
        assert_eq!(parse_attributes(""), None);
    }

    #[test]
    fn test_parse_attributes_masks_other_bits() {
        // 0x40 is append write, 0x20 is time based authenticated write
        assert_eq!(parse_attributes("0x47"), Some(DEFAULT_WRITE_ATTRIBUTES));
        assert_eq!(
            parse_attributes("0x23"),
            Some(VariableAttributes::NON_VOLATILE | VariableAttributes::BOOTSERVICE_ACCESS)
        );
        assert_eq!(parse_attributes("0x40"), None);
    }
}
