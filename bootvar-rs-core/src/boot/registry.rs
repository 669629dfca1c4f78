// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`BootRegistry`], which maps boot ids and the well known boot variables onto a
//! [`VariableStorage`].
//!
//! All of these variables live in the EFI global variable namespace. Every write uses the same attributes,
//! which are given to the registry when it is created.

use alloc::{string::ToString, vec::Vec};
use log::{debug, warn};
use uefi::{
    CStr16, cstr16,
    runtime::{VariableAttributes, VariableVendor},
};

use crate::{
    BootResult,
    boot::{id::BootId, load_option::LoadOption},
    error::BootError,
    system::variable::{RawVariable, VariableStorage},
};

/// The variable holding the boot priority list.
pub const BOOT_ORDER: &CStr16 = cstr16!("BootOrder");

/// The variable holding the one-time boot override.
pub const BOOT_NEXT: &CStr16 = cstr16!("BootNext");

/// The variable the firmware sets to the option it booted from.
pub const BOOT_CURRENT: &CStr16 = cstr16!("BootCurrent");

/// The namespace of every variable the registry touches.
const VENDOR: VariableVendor = VariableVendor::GLOBAL_VARIABLE;

/// The attributes boot variables are normally written with.
pub const DEFAULT_WRITE_ATTRIBUTES: VariableAttributes = VariableAttributes::NON_VOLATILE
    .union(VariableAttributes::BOOTSERVICE_ACCESS)
    .union(VariableAttributes::RUNTIME_ACCESS);

/// Reads and writes boot variables through a [`VariableStorage`].
pub struct BootRegistry<S> {
    /// Where the variables are stored.
    storage: S,

    /// The attributes used for every write.
    attributes: VariableAttributes,
}

impl<S: VariableStorage> BootRegistry<S> {
    /// Creates a new [`BootRegistry`] that writes variables with the given attributes.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn new(storage: S, attributes: VariableAttributes) -> Self {
        Self {
            storage,
            attributes,
        }
    }

    /// Returns the attributes used for every write.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn attributes(&self) -> VariableAttributes {
        self.attributes
    }

    /// Returns a reference to the inner storage.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a mutable reference to the inner storage.
    pub const fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Reads a variable in the global namespace as raw bytes, along with its attributes.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the storage failed to read the variable.
    pub fn read_raw(&self, name: &CStr16) -> BootResult<Option<RawVariable>> {
        Ok(self.storage.get(name, &VENDOR)?)
    }

    /// Reads the raw contents of a `Boot####` variable.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the storage failed to read the variable.
    pub fn read_entry_raw(&self, id: BootId) -> BootResult<Option<RawVariable>> {
        self.read_raw(&id.var_name()?)
    }

    /// Reads and decodes the load option for a boot id.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the variable does not exist, could not be read, or does not hold a valid load
    /// option.
    pub fn read_entry(&self, id: BootId) -> BootResult<LoadOption> {
        let name = id.var_name()?;
        let Some((bytes, _)) = self.read_raw(&name)? else {
            return Err(BootError::NotFound(name.to_string()));
        };
        LoadOption::decode(&bytes).map_err(|source| BootError::Decode { id, source })
    }

    /// Encodes and writes the load option for a boot id.
    ///
    /// The write is not verified by reading it back.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the option could not be encoded, or the storage refused the write.
    pub fn write_entry(&mut self, id: BootId, option: &LoadOption) -> BootResult<()> {
        let bytes = option
            .encode()
            .map_err(|source| BootError::Encode { id, source })?;
        self.write(&id.var_name()?, &bytes)
    }

    /// Reads `BootOrder`.
    ///
    /// A missing `BootOrder`, or one with an odd number of bytes, reads as an empty list.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the storage failed to read the variable.
    pub fn boot_order(&self) -> BootResult<Vec<BootId>> {
        let Some((bytes, _)) = self.read_raw(BOOT_ORDER)? else {
            return Ok(Vec::new());
        };
        if bytes.len() % 2 != 0 {
            warn!("{BOOT_ORDER} has an odd length of {} bytes, ignoring it", bytes.len());
            return Ok(Vec::new());
        }
        Ok(bytes.chunks_exact(2).filter_map(BootId::from_le_slice).collect())
    }

    /// Replaces `BootOrder` with the given ids, in the given order.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the storage refused the write.
    pub fn set_boot_order(&mut self, order: &[BootId]) -> BootResult<()> {
        let bytes: Vec<_> = order.iter().flat_map(|x| x.to_le_bytes()).collect();
        self.write(BOOT_ORDER, &bytes)
    }

    /// Reads `BootNext`, which is `None` when no one-time boot is pending.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the storage failed to read the variable.
    pub fn boot_next(&self) -> BootResult<Option<BootId>> {
        self.read_id(BOOT_NEXT)
    }

    /// Sets `BootNext`, so that the firmware boots from `id` once.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the storage refused the write.
    pub fn set_boot_next(&mut self, id: BootId) -> BootResult<()> {
        self.write(BOOT_NEXT, &id.to_le_bytes())
    }

    /// Reads `BootCurrent`, the option the firmware booted from.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the storage failed to read the variable.
    pub fn boot_current(&self) -> BootResult<Option<BootId>> {
        self.read_id(BOOT_CURRENT)
    }

    /// Reads a variable holding a single boot id.
    fn read_id(&self, name: &CStr16) -> BootResult<Option<BootId>> {
        Ok(self
            .read_raw(name)?
            .and_then(|(bytes, _)| BootId::from_le_slice(&bytes)))
    }

    /// Writes a variable in the global namespace with the registry's attributes.
    fn write(&mut self, name: &CStr16, bytes: &[u8]) -> BootResult<()> {
        debug!("Setting {name} ({} bytes)", bytes.len());
        Ok(self.storage.set(name, &VENDOR, self.attributes, bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use uefi::Status;

    use super::*;
    use crate::{
        boot::load_option::{LoadOptionAttributes, LoadOptionError},
        system::variable::{VarError, memory::MemoryStorage},
    };

    fn registry() -> BootRegistry<MemoryStorage> {
        BootRegistry::new(MemoryStorage::default(), DEFAULT_WRITE_ATTRIBUTES)
    }

    fn option() -> LoadOption {
        LoadOption {
            attributes: LoadOptionAttributes::ACTIVE,
            description: "Windows Boot Manager".to_owned(),
            device_path: vec![0x7f, 0xff, 0x04, 0x00],
            optional_data: b"WINDOWS".to_vec(),
        }
    }

    #[test]
    fn test_entry_roundtrip() -> BootResult<()> {
        let mut registry = registry();
        registry.write_entry(BootId(0x1a), &option())?;
        assert_eq!(registry.storage().writes, ["Boot001A"]);
        assert_eq!(
            registry.storage().vars["Boot001A"].1,
            DEFAULT_WRITE_ATTRIBUTES
        );
        assert_eq!(registry.read_entry(BootId(0x1a))?, option());
        Ok(())
    }

    #[test]
    fn test_entry_not_found() {
        let registry = registry();
        assert!(matches!(
            registry.read_entry(BootId(7)),
            Err(BootError::NotFound(name)) if name == "Boot0007"
        ));
    }

    #[test]
    fn test_entry_malformed() {
        let mut registry = registry();
        registry
            .storage_mut()
            .insert("Boot0003", &[1, 0, 0], DEFAULT_WRITE_ATTRIBUTES);
        assert!(matches!(
            registry.read_entry(BootId(3)),
            Err(BootError::Decode {
                id: BootId(3),
                source: LoadOptionError::TooShort { len: 3 }
            })
        ));
    }

    #[test]
    fn test_custom_attributes() -> BootResult<()> {
        let attrs = VariableAttributes::NON_VOLATILE | VariableAttributes::BOOTSERVICE_ACCESS;
        let mut registry = BootRegistry::new(MemoryStorage::default(), attrs);
        registry.set_boot_next(BootId(2))?;
        assert_eq!(registry.storage().vars["BootNext"].1, attrs);
        Ok(())
    }

    #[test]
    fn test_boot_order() -> BootResult<()> {
        let mut registry = registry();
        assert!(registry.boot_order()?.is_empty());
        let order = [BootId(4), BootId(1), BootId(4), BootId(0x100)];
        registry.set_boot_order(&order)?;
        assert_eq!(
            registry.storage().bytes("BootOrder"),
            Some(&[4, 0, 1, 0, 4, 0, 0, 1][..])
        );
        assert_eq!(registry.boot_order()?, order);
        Ok(())
    }

    #[test]
    fn test_boot_order_odd_length() -> BootResult<()> {
        let mut registry = registry();
        registry
            .storage_mut()
            .insert("BootOrder", &[1, 0, 2], DEFAULT_WRITE_ATTRIBUTES);
        assert!(registry.boot_order()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_boot_next_and_current() -> BootResult<()> {
        let mut registry = registry();
        assert_eq!(registry.boot_next()?, None);
        assert_eq!(registry.boot_current()?, None);
        registry.set_boot_next(BootId(0xbeef))?;
        registry
            .storage_mut()
            .insert("BootCurrent", &[3, 0], VariableAttributes::RUNTIME_ACCESS);
        assert_eq!(registry.boot_next()?, Some(BootId(0xbeef)));
        assert_eq!(registry.boot_current()?, Some(BootId(3)));
        Ok(())
    }

    #[test]
    fn test_write_failure() {
        let mut registry = registry();
        registry.storage_mut().fail_writes = Some(Status::WRITE_PROTECTED);
        assert!(matches!(
            registry.set_boot_order(&[BootId(1)]),
            Err(BootError::VarError(VarError::Set { name, status }))
                if name == "BootOrder" && status == Status::WRITE_PROTECTED
        ));
    }
}
