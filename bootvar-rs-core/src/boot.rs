// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`BootManager`], a struct which performs edits on the firmware's boot configuration.
//!
//! Every edit is a single read, modify and write sequence. Nothing is cached between calls, and nothing is
//! rolled back if a write fails. If another program edits the same variables at the same time, the last write
//! wins.

use alloc::{string::ToString, vec::Vec};
use log::info;
use uefi::runtime::VariableAttributes;

use crate::{
    BootResult,
    boot::{
        config::BootVarConfig,
        id::BootId,
        load_option::LoadOption,
        registry::{BOOT_ORDER, BootRegistry},
    },
    error::BootError,
    system::variable::{RuntimeStorage, VariableStorage},
};

pub mod config;
pub mod display;
pub mod id;
pub mod load_option;
pub mod registry;

/// One entry of `BootOrder`, which may or may not have been readable.
pub struct BootListEntry {
    /// The boot id of the entry.
    pub id: BootId,

    /// The decoded load option, or why it could not be read.
    pub option: BootResult<LoadOption>,
}

/// Everything needed to show the boot configuration.
pub struct BootList {
    /// The option the firmware booted from, if it reported one.
    pub current: Option<BootId>,

    /// The pending one-time boot, if there is one.
    pub next: Option<BootId>,

    /// Every entry in `BootOrder`, in order.
    pub entries: Vec<BootListEntry>,
}

/// The raw size and attributes of one `Boot####` variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawInfo {
    /// The size of the variable in bytes, or 0 if it does not exist.
    pub size: usize,

    /// The attributes of the variable, or empty if it does not exist.
    pub attributes: VariableAttributes,
}

/// One entry of a [`Dump`], which may or may not have been readable.
pub struct DumpEntry {
    /// The boot id of the entry.
    pub id: BootId,

    /// The size and attributes of the variable, or why it could not be read.
    pub info: BootResult<RawInfo>,
}

/// A raw view of the boot variables, for diagnosing firmware problems.
pub struct Dump {
    /// The size of `BootOrder` in bytes.
    pub order_size: usize,

    /// Every entry in `BootOrder`, in order.
    pub entries: Vec<DumpEntry>,
}

/// Performs boot configuration edits through a [`BootRegistry`].
pub struct BootManager<S> {
    /// The registry the edits go through.
    registry: BootRegistry<S>,
}

impl BootManager<RuntimeStorage> {
    /// Creates a new [`BootManager`] that uses runtime services.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn new(config: &BootVarConfig) -> Self {
        Self::with_storage(RuntimeStorage, config.write_attributes)
    }
}

impl<S: VariableStorage> BootManager<S> {
    /// Creates a new [`BootManager`] on top of any [`VariableStorage`].
    #[must_use = "Has no effect if the result is unused"]
    pub const fn with_storage(storage: S, attributes: VariableAttributes) -> Self {
        Self {
            registry: BootRegistry::new(storage, attributes),
        }
    }

    /// Returns a reference to the inner [`BootRegistry`].
    #[must_use = "Has no effect if the result is unused"]
    pub const fn registry(&self) -> &BootRegistry<S> {
        &self.registry
    }

    /// Returns a mutable reference to the inner [`BootRegistry`].
    pub const fn registry_mut(&mut self) -> &mut BootRegistry<S> {
        &mut self.registry
    }

    /// Reads `BootOrder`, `BootCurrent`, `BootNext`, and every entry in `BootOrder`.
    ///
    /// An entry that cannot be read does not stop the rest from being read. Its error is kept in its
    /// [`BootListEntry`] instead.
    ///
    /// # Errors
    ///
    /// May return an `Error` if `BootOrder`, `BootCurrent`, or `BootNext` could not be read.
    pub fn list(&self) -> BootResult<BootList> {
        let entries = self
            .registry
            .boot_order()?
            .into_iter()
            .map(|id| BootListEntry {
                id,
                option: self.registry.read_entry(id),
            })
            .collect();

        Ok(BootList {
            current: self.registry.boot_current()?,
            next: self.registry.boot_next()?,
            entries,
        })
    }

    /// Reads `BootOrder`.
    ///
    /// # Errors
    ///
    /// May return an `Error` if `BootOrder` could not be read.
    pub fn order(&self) -> BootResult<Vec<BootId>> {
        self.registry.boot_order()
    }

    /// Replaces `BootOrder` with a list of textual boot ids.
    ///
    /// The ids are written exactly as given, so duplicates are kept and nothing is sorted. If any id is
    /// invalid, nothing is written.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the list is empty, any id is invalid, or the write failed.
    pub fn reorder<I, T>(&mut self, tokens: I) -> BootResult<Vec<BootId>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let order = tokens
            .into_iter()
            .map(|x| x.as_ref().parse())
            .collect::<BootResult<Vec<BootId>>>()?;
        if order.is_empty() {
            return Err(BootError::EmptyInput);
        }

        self.registry.set_boot_order(&order)?;
        info!("{BOOT_ORDER} set to {} entries", order.len());
        Ok(order)
    }

    /// Moves a boot id to the front of `BootOrder`, making it the default.
    ///
    /// Every other id keeps its relative position. Returns the new order.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the id is not in `BootOrder` (in which case nothing is written), or the write
    /// failed.
    pub fn select_default(&mut self, id: BootId) -> BootResult<Vec<BootId>> {
        let mut order = self.registry.boot_order()?;
        let pos = order
            .iter()
            .position(|&x| x == id)
            .ok_or(BootError::NotInOrder(id))?;
        order[..=pos].rotate_right(1);

        self.registry.set_boot_order(&order)?;
        info!("Boot{id} is now the default");
        Ok(order)
    }

    /// Sets `BootNext`, so that the next boot (and only the next boot) uses `id`.
    ///
    /// The id is not checked against the existing entries, the firmware decides what to do with it.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the write failed.
    pub fn set_one_time_next(&mut self, id: BootId) -> BootResult<()> {
        self.registry.set_boot_next(id)?;
        info!("Boot{id} will be booted once on the next boot");
        Ok(())
    }

    /// Sets or clears the active bit of an entry, leaving every other attribute as it was.
    ///
    /// Returns the entry as it was written.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the entry does not exist, is malformed, or the write failed.
    pub fn set_active(&mut self, id: BootId, enabled: bool) -> BootResult<LoadOption> {
        let mut option = self.registry.read_entry(id)?;
        option.set_active(enabled);
        self.registry.write_entry(id, &option)?;
        info!(
            "Boot{id} {}",
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(option)
    }

    /// Replaces the description of an entry, leaving the attributes, device path, and optional data as they were.
    ///
    /// Returns the entry as it was written.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the entry does not exist, is malformed, or the write failed.
    pub fn rename(&mut self, id: BootId, label: &str) -> BootResult<LoadOption> {
        let mut option = self.registry.read_entry(id)?;
        option.description = label.into();
        self.registry.write_entry(id, &option)?;
        info!("Boot{id} renamed to {label}");
        Ok(option)
    }

    /// Reads the raw sizes and attributes of `BootOrder` and its entries.
    ///
    /// An entry that cannot be read does not stop the rest from being read. Its error is kept in its
    /// [`DumpEntry`] instead.
    ///
    /// # Errors
    ///
    /// May return an `Error` if `BootOrder` does not exist or could not be read.
    pub fn dump(&self) -> BootResult<Dump> {
        let (order_bytes, _) = self
            .registry
            .read_raw(BOOT_ORDER)?
            .ok_or_else(|| BootError::NotFound(BOOT_ORDER.to_string()))?;

        let entries = self
            .registry
            .boot_order()?
            .into_iter()
            .map(|id| DumpEntry {
                id,
                info: self.registry.read_entry_raw(id).map(|raw| {
                    raw.map_or(
                        RawInfo {
                            size: 0,
                            attributes: VariableAttributes::empty(),
                        },
                        |(bytes, attributes)| RawInfo {
                            size: bytes.len(),
                            attributes,
                        },
                    )
                }),
            })
            .collect();

        Ok(Dump {
            order_size: order_bytes.len(),
            entries,
        })
    }
}
