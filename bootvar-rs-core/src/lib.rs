// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The `bootvar-rs` library crate.
//!
//! This crate reads and edits the firmware's boot configuration through UEFI runtime variables. It decodes and
//! encodes `Boot####` load options, reads and writes `BootOrder`, `BootNext` and `BootCurrent`, and builds the
//! usual boot manager edits (reorder, select a default, one-time boot, enable/disable, rename) on top of that.
//!
//! Access to the variables themselves goes through the [`system::variable::VariableStorage`] trait, so every
//! operation can be exercised on the host against an in-memory store.
//!
//! A command line frontend to this crate can be found in `bootvar-rs-cli`.
//!
//! ## MSRV
//!
//! The minimum supported rust version is 1.88.0.

#![cfg_attr(not(any(fuzzing, test, doctest)), no_std)]

/// The primary result type that wraps around [`crate::error::BootError`].
pub type BootResult<T> = Result<T, crate::error::BootError>;

pub mod boot;
pub mod error;
pub mod system;

extern crate alloc;
