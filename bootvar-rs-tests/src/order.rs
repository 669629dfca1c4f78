use alloc::{string::ToString, vec::Vec};

use anyhow::ensure;
use bootvar_rs_core::boot::{BootManager, config::BootVarConfig, display::OrderView};
use uefi::println;

pub fn test_order() -> anyhow::Result<()> {
    let mut boot_mgr = BootManager::new(&BootVarConfig::default());

    let original = boot_mgr.order()?;
    println!("{}", OrderView(&original));
    let Some(&first) = original.first() else {
        println!("BootOrder is empty, skipping boot order test");
        return Ok(());
    };

    if let Some(&last) = original.last() {
        let selected = boot_mgr.select_default(last)?;
        ensure!(selected.first() == Some(&last), "selected id is not first");
        ensure!(boot_mgr.order()? == selected, "BootOrder was not written");
        println!("Selected Boot{last} as the default");
    }

    let tokens: Vec<_> = original.iter().map(ToString::to_string).collect();
    boot_mgr.reorder(&tokens)?;
    ensure!(boot_mgr.order()? == original, "BootOrder was not restored");
    ensure!(boot_mgr.order()?.first() == Some(&first), "default was not restored");
    println!("Restored {}", OrderView(&original));

    let next = boot_mgr.registry().boot_next()?;
    let current = boot_mgr.registry().boot_current()?;
    println!("BootNext: {next:?}, BootCurrent: {current:?}");
    println!("Boot order test passed");
    Ok(())
}
