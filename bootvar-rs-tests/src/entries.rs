use alloc::{borrow::ToOwned, vec};

use anyhow::ensure;
use bootvar_rs_core::{
    boot::{
        BootManager,
        config::BootVarConfig,
        id::BootId,
        load_option::{LoadOption, LoadOptionAttributes},
    },
    system::variable::VariableStorage,
};
use uefi::{println, runtime::VariableVendor};

/// An id that firmware is very unlikely to be using. It is never added to `BootOrder`.
const SCRATCH_ID: BootId = BootId(0xBEEF);

pub fn test_entries() -> anyhow::Result<()> {
    let mut boot_mgr = BootManager::new(&BootVarConfig::default());

    let option = LoadOption {
        attributes: LoadOptionAttributes::ACTIVE | LoadOptionAttributes::HIDDEN,
        description: "bootvar-rs scratch entry".to_owned(),
        device_path: vec![0x7f, 0xff, 0x04, 0x00], // end of device path
        optional_data: vec![0xde, 0xad, 0xbe, 0xef],
    };
    boot_mgr.registry_mut().write_entry(SCRATCH_ID, &option)?;
    ensure!(
        boot_mgr.registry().read_entry(SCRATCH_ID)? == option,
        "entry did not read back the same"
    );
    println!("Wrote and read back Boot{SCRATCH_ID}");

    let disabled = boot_mgr.set_active(SCRATCH_ID, false)?;
    ensure!(disabled.attributes == LoadOptionAttributes::HIDDEN, "disable touched other bits");
    let enabled = boot_mgr.set_active(SCRATCH_ID, true)?;
    ensure!(enabled.attributes == option.attributes, "enable did not restore the attributes");
    println!("Toggled Boot{SCRATCH_ID}");

    boot_mgr.rename(SCRATCH_ID, "renamed scratch entry")?;
    let renamed = boot_mgr.registry().read_entry(SCRATCH_ID)?;
    ensure!(renamed.description == "renamed scratch entry", "rename was not stored");
    ensure!(
        renamed.device_path == option.device_path
            && renamed.optional_data == option.optional_data
            && renamed.attributes == option.attributes,
        "rename touched other fields"
    );
    println!("Renamed Boot{SCRATCH_ID}");

    let name = SCRATCH_ID.var_name()?;
    let attributes = boot_mgr.registry().attributes();
    boot_mgr.registry_mut().storage_mut().set(
        &name,
        &VariableVendor::GLOBAL_VARIABLE,
        attributes,
        &[],
    )?;
    ensure!(
        boot_mgr.registry().read_entry_raw(SCRATCH_ID)?.is_none(),
        "scratch entry was not deleted"
    );
    println!("Load option test passed");
    Ok(())
}
