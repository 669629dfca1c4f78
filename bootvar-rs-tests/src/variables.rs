use anyhow::ensure;
use bootvar_rs_core::{
    boot::registry::DEFAULT_WRITE_ATTRIBUTES,
    system::variable::{RuntimeStorage, VariableStorage},
};
use uefi::{CStr16, Guid, cstr16, guid, println, runtime::VariableVendor};

const VARIABLE_NAME: &CStr16 = cstr16!("BootVarRsTest");
const VARIABLE_CONTENT: &[u8] = b"bootvar-rs runtime storage test";

// edk2 rejects unknown names under the global vendor
const TEST_GUID: Guid = guid!("b1c3f7e2-5d8a-4e0f-9a61-7c2d4e8b3f10");

pub fn test_variables() -> anyhow::Result<()> {
    let mut storage = RuntimeStorage;
    let vendor = VariableVendor(TEST_GUID);

    storage.set(VARIABLE_NAME, &vendor, DEFAULT_WRITE_ATTRIBUTES, VARIABLE_CONTENT)?;
    println!("Set {VARIABLE_NAME}");

    let (data, attrs) = storage
        .get(VARIABLE_NAME, &vendor)?
        .expect("variable that was just written should exist");
    ensure!(data == VARIABLE_CONTENT, "contents differ after the size probe");
    ensure!(
        attrs.contains(DEFAULT_WRITE_ATTRIBUTES),
        "attributes were not kept"
    );
    println!("Read {VARIABLE_NAME} back ({} bytes)", data.len());

    storage.set(VARIABLE_NAME, &vendor, DEFAULT_WRITE_ATTRIBUTES, &[])?;
    ensure!(
        storage.get(VARIABLE_NAME, &vendor)?.is_none(),
        "variable still exists after deleting it"
    );
    println!("Deleted {VARIABLE_NAME}");

    ensure!(
        storage.get(cstr16!("BootVarRsMissing"), &vendor)?.is_none(),
        "a missing variable should read as None"
    );
    println!("Variable storage test passed");
    Ok(())
}
