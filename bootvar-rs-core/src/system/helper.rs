// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Various helper functions for other modules.

use alloc::string::String;
use thiserror::Error;
use uefi::CString16;

/// An `Error` that may result from converting a [`String`] to another format.
#[derive(Error, Debug)]
pub enum StrError {
    /// A [`String`] could not be converted into a [`CString16`]
    #[error("Could not convert String to CString16")]
    CstrFromStr(#[from] uefi::data_types::FromStrError),
}

/// Gets a [`CString16`] from an [`&str`].
///
/// # Errors
///
/// May return an `Error` if the string could not be converted into a [`CString16`], either due to unsupported
/// characters or an invalid nul character.
pub fn str_to_cstr(str: &str) -> Result<CString16, StrError> {
    Ok(CString16::try_from(str)?)
}

/// Decodes UTF-16 code units into a [`String`].
///
/// Unpaired surrogates are replaced with `U+FFFD`, everything else converts losslessly.
#[must_use = "Has no effect if the result is unused"]
pub(crate) fn utf16_to_string(units: &[u16]) -> String {
    char::decode_utf16(units.iter().copied())
        .map(|x| x.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Strips `prefix` from the start of `str` if it is present, ignoring ASCII case.
#[must_use = "Has no effect if the result is unused"]
pub(crate) fn strip_prefix_ignore_case<'a>(str: &'a str, prefix: &str) -> &'a str {
    match str.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => &str[prefix.len()..],
        _ => str,
    }
}

/// Joins the words of a label that was split apart by the shell, and strips the quotes around it.
///
/// The UEFI shell passes quotes through as part of the words, so `"Ubuntu NVMe"` arrives as `"Ubuntu` and
/// `NVMe"`.
#[must_use = "Has no effect if the result is unused"]
pub fn join_label(words: &[&str]) -> String {
    words.join(" ").trim_matches('"').into()
}
