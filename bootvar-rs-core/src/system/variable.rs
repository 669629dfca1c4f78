// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! UEFI variable storage.
//!
//! Everything that touches firmware variables goes through [`VariableStorage`]. On firmware this is
//! [`RuntimeStorage`], which uses runtime services. The rest of the crate never learns how big a buffer has to
//! be, or that the firmware had to be asked twice.

use alloc::{
    string::{String, ToString},
    vec,
    vec::Vec,
};
use log::debug;
use thiserror::Error;
use uefi::{
    CStr16, Status,
    runtime::{self, VariableAttributes, VariableVendor},
};

/// How many times a variable is re-read if it grows between the size probe and the actual read.
const MAX_READ_ATTEMPTS: usize = 3;

/// An `Error` that may result from accessing a UEFI variable.
#[derive(Error, Debug)]
pub enum VarError {
    /// The variable could not be read.
    #[error("Failed to read {name}: {status}")]
    Get {
        /// The name of the variable.
        name: String,

        /// The status the firmware returned.
        status: Status,
    },

    /// The variable could not be written.
    #[error("Failed to write {name}: {status}")]
    Set {
        /// The name of the variable.
        name: String,

        /// The status the firmware returned.
        status: Status,
    },

    /// The variable kept growing while it was being read.
    #[error("Failed to read {name}: size kept changing")]
    Unstable {
        /// The name of the variable.
        name: String,
    },
}

impl VarError {
    /// Returns the firmware status behind the error, if there was one.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn status(&self) -> Option<Status> {
        match self {
            Self::Get { status, .. } | Self::Set { status, .. } => Some(*status),
            Self::Unstable { .. } => None,
        }
    }
}

/// The raw contents of a variable along with its attributes.
pub type RawVariable = (Vec<u8>, VariableAttributes);

/// A trait for implementations of UEFI variable storage.
///
/// Usually this will use runtime services.
pub trait VariableStorage {
    /// Get the full contents and attributes of a variable given its name and vendor.
    ///
    /// Returns `None` if the variable does not exist.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the underlying variable storage failed to get the variable.
    fn get(&self, name: &CStr16, vendor: &VariableVendor) -> Result<Option<RawVariable>, VarError>;

    /// Replace the contents of a variable.
    ///
    /// Setting a variable to an empty slice deletes it.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the underlying variable storage failed to set the variable.
    fn set(
        &mut self,
        name: &CStr16,
        vendor: &VariableVendor,
        attributes: VariableAttributes,
        data: &[u8],
    ) -> Result<(), VarError>;
}

/// UEFI variable storage implementation with runtime services.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuntimeStorage;

impl RuntimeStorage {
    /// Asks the firmware how large a variable is without reading it.
    ///
    /// A variable that exists but reports a size of zero is treated as though it does not exist.
    fn probe_size(name: &CStr16, vendor: &VariableVendor) -> Result<Option<usize>, VarError> {
        match runtime::get_variable(name, vendor, &mut []) {
            Ok(_) => Ok(None),
            Err(e) if e.status() == Status::NOT_FOUND => Ok(None),
            Err(e) if e.status() == Status::BUFFER_TOO_SMALL => match *e.data() {
                Some(0) => Ok(None),
                Some(size) => Ok(Some(size)),
                None => Err(VarError::Get {
                    name: name.to_string(),
                    status: e.status(),
                }),
            },
            Err(e) => Err(VarError::Get {
                name: name.to_string(),
                status: e.status(),
            }),
        }
    }
}

impl VariableStorage for RuntimeStorage {
    fn get(&self, name: &CStr16, vendor: &VariableVendor) -> Result<Option<RawVariable>, VarError> {
        let Some(mut size) = Self::probe_size(name, vendor)? else {
            debug!("{name} does not exist");
            return Ok(None);
        };

        for _ in 0..MAX_READ_ATTEMPTS {
            let mut buf = vec![0; size];
            let read = runtime::get_variable(name, vendor, &mut buf)
                .map(|(data, attributes)| (data.len(), attributes));
            match read {
                Ok((len, attributes)) => {
                    buf.truncate(len);
                    debug!("Read {len} bytes from {name}");
                    return Ok(Some((buf, attributes)));
                }
                Err(e) if e.status() == Status::BUFFER_TOO_SMALL => {
                    // the variable grew after it was probed
                    size = (*e.data()).unwrap_or(size * 2);
                }
                Err(e) if e.status() == Status::NOT_FOUND => return Ok(None),
                Err(e) => {
                    return Err(VarError::Get {
                        name: name.to_string(),
                        status: e.status(),
                    });
                }
            }
        }

        Err(VarError::Unstable {
            name: name.to_string(),
        })
    }

    fn set(
        &mut self,
        name: &CStr16,
        vendor: &VariableVendor,
        attributes: VariableAttributes,
        data: &[u8],
    ) -> Result<(), VarError> {
        debug!("Writing {} bytes to {name}", data.len());
        runtime::set_variable(name, vendor, attributes, data).map_err(|e| VarError::Set {
            name: name.to_string(),
            status: e.status(),
        })
    }
}

#[cfg(test)]
pub(crate) mod memory {
    //! An in-memory [`VariableStorage`] for unit tests.

    use std::collections::BTreeMap;

    use super::*;

    /// Variables kept in a map, plus a log of every write.
    #[derive(Default)]
    pub(crate) struct MemoryStorage {
        /// The stored variables, keyed by name.
        pub(crate) vars: BTreeMap<String, RawVariable>,

        /// The names of every variable that was written, in order.
        pub(crate) writes: Vec<String>,

        /// When set, every write fails with this status.
        pub(crate) fail_writes: Option<Status>,

        /// Reads of these variables fail with the given status.
        pub(crate) fail_reads: BTreeMap<String, Status>,
    }

    impl MemoryStorage {
        /// Inserts a variable directly, without recording a write.
        pub(crate) fn insert(&mut self, name: &str, data: &[u8], attributes: VariableAttributes) {
            self.vars.insert(name.to_owned(), (data.to_vec(), attributes));
        }

        /// Returns the bytes of a variable, if it exists.
        pub(crate) fn bytes(&self, name: &str) -> Option<&[u8]> {
            self.vars.get(name).map(|(data, _)| data.as_slice())
        }
    }

    impl VariableStorage for MemoryStorage {
        fn get(
            &self,
            name: &CStr16,
            vendor: &VariableVendor,
        ) -> Result<Option<RawVariable>, VarError> {
            assert_eq!(*vendor, VariableVendor::GLOBAL_VARIABLE);
            let name = name.to_string();
            if let Some(&status) = self.fail_reads.get(&name) {
                return Err(VarError::Get { name, status });
            }
            Ok(self
                .vars
                .get(&name)
                .filter(|(data, _)| !data.is_empty())
                .cloned())
        }

        fn set(
            &mut self,
            name: &CStr16,
            vendor: &VariableVendor,
            attributes: VariableAttributes,
            data: &[u8],
        ) -> Result<(), VarError> {
            assert_eq!(*vendor, VariableVendor::GLOBAL_VARIABLE);
            let name = name.to_string();
            if let Some(status) = self.fail_writes {
                return Err(VarError::Set { name, status });
            }
            self.writes.push(name.clone());
            if data.is_empty() {
                self.vars.remove(&name);
            } else {
                self.vars.insert(name, (data.to_vec(), attributes));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use uefi::cstr16;

    use super::{memory::MemoryStorage, *};

    #[test]
    fn test_memory_storage_delete() -> Result<(), VarError> {
        let mut storage = MemoryStorage::default();
        let vendor = VariableVendor::GLOBAL_VARIABLE;
        let attrs = VariableAttributes::NON_VOLATILE;
        storage.set(cstr16!("BootNext"), &vendor, attrs, &[1, 0])?;
        assert_eq!(
            storage.get(cstr16!("BootNext"), &vendor)?,
            Some((vec![1, 0], attrs))
        );
        storage.set(cstr16!("BootNext"), &vendor, attrs, &[])?;
        assert_eq!(storage.get(cstr16!("BootNext"), &vendor)?, None);
        assert_eq!(storage.writes, ["BootNext", "BootNext"]);
        Ok(())
    }

    #[test]
    fn test_var_error_status() {
        let e = VarError::Set {
            name: "BootOrder".into(),
            status: Status::WRITE_PROTECTED,
        };
        assert_eq!(e.status(), Some(Status::WRITE_PROTECTED));
        assert!(e.to_string().starts_with("Failed to write BootOrder: "));
        let e = VarError::Unstable {
            name: "Boot0001".into(),
        };
        assert_eq!(e.status(), None);
    }
}
