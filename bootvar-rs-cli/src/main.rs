// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! A command line interface to `bootvar-rs`, meant to be run from the UEFI shell.
//!
//! The exit status tells a shell script what went wrong: `INVALID_PARAMETER` for bad arguments, `NOT_FOUND` for
//! missing entries, `COMPROMISED_DATA` for malformed entries, and the firmware's own status when it refused to
//! read or write a variable.

#![no_main]
#![no_std]

extern crate alloc;

use alloc::{string::ToString, vec::Vec};

use bootvar_rs_core::{
    BootResult,
    boot::{
        BootManager,
        config::BootVarConfig,
        display::{DumpView, EntryView, ListView, OrderView},
        id::{BootId, split_id_list},
        registry::BOOT_ORDER,
    },
    error::BootError,
    system::{helper::join_label, log_backend::UefiLogger, variable::RuntimeStorage},
};
use getargs::{Arg, Options};
use log::{LevelFilter, warn};
use uefi::{Status, boot, cstr16, entry, println, proto::loaded_image::LoadedImage};

/// The global logging instance.
static LOGGER: UefiLogger = UefiLogger::new();

/// The actual main function of the program.
///
/// Problems with the arguments themselves are reported here and turned into a [`Status`], so that only errors
/// from the boot manager itself are returned as an `Error`.
///
/// # Errors
///
/// May return an `Error` if the program could not obtain the `LoadedImage` protocol, or the command failed.
fn main_func() -> BootResult<Status> {
    uefi::helpers::init()?; // initialize helpers (for print)

    let load_options = {
        let handle = boot::image_handle();
        let loaded_image = boot::open_protocol_exclusive::<LoadedImage>(handle)?;
        loaded_image
            .load_options_as_cstr16()
            .unwrap_or(cstr16!("bootvar-rs-cli.efi")) // there is at least one argument, which is the filename
            .to_string()
    }; // loaded_image dropped here

    let mut options = load_options.split_whitespace();

    let Some(app_filename) = options.next() else {
        println!("Error: No load options were passed to the program");
        return Ok(Status::INVALID_PARAMETER);
    };

    let config = BootVarConfig::new().unwrap_or_else(|e| {
        println!("Warning: Could not read the configuration file, using defaults ({e})");
        BootVarConfig::default()
    });
    let mut level = config.log_level;

    let mut positionals = Vec::new();
    let mut opts = Options::new(options);
    while let Ok(Some(arg)) = opts.next_arg() {
        match arg {
            Arg::Short('v') | Arg::Long("verbose") => level = LevelFilter::Debug,
            Arg::Short('h') | Arg::Long("help") => {
                print_help(app_filename);
                return Ok(Status::SUCCESS);
            }
            Arg::Short(invalid) => {
                println!("Error: Unknown short argument: -{invalid}");
                return Ok(Status::INVALID_PARAMETER);
            }
            Arg::Long(invalid) => {
                println!("Error: Unknown long argument: --{invalid}");
                return Ok(Status::INVALID_PARAMETER);
            }
            Arg::Positional(arg) => positionals.push(arg),
        }
    }

    if let Err(e) = LOGGER.install(level) {
        println!("Warning: Could not install the logger, logging is disabled ({e})");
    }

    let Some((command, args)) = positionals.split_first() else {
        print_help(app_filename);
        return Ok(Status::SUCCESS);
    };

    let mut boot_mgr = BootManager::new(&config);
    let status = run_command(&mut boot_mgr, &command.to_ascii_lowercase(), args)?;
    if status == Status::INVALID_PARAMETER {
        print_help(app_filename);
    }
    Ok(status)
}

/// Runs a single command against the boot manager.
///
/// # Errors
///
/// May return an `Error` if the command failed.
fn run_command(
    boot_mgr: &mut BootManager<RuntimeStorage>,
    command: &str,
    args: &[&str],
) -> BootResult<Status> {
    match (command, args) {
        ("list", []) => {
            let list = boot_mgr.list()?;
            if list.entries.is_empty() {
                return Err(BootError::NotFound(BOOT_ORDER.to_string()));
            }
            println!("{}", ListView(&list));
        }
        ("order", []) => {
            let order = boot_mgr.order()?;
            if order.is_empty() {
                return Err(BootError::NotFound(BOOT_ORDER.to_string()));
            }
            println!("{}", OrderView(&order));
        }
        ("order", ["set", csv]) => {
            let order = boot_mgr.reorder(split_id_list(csv))?;
            println!("BootOrder updated.");
            println!("{}", OrderView(&order));
        }
        ("select", [id]) => {
            let id: BootId = id.parse()?;
            boot_mgr.select_default(id)?;
            println!("Default boot set to Boot{id}.");
        }
        ("next", [id]) => {
            let id: BootId = id.parse()?;
            boot_mgr.set_one_time_next(id)?;
            println!("BootNext set to Boot{id} (one-time).");
        }
        ("enable" | "disable", [id]) => {
            let id: BootId = id.parse()?;
            let enable = command == "enable";
            let option = boot_mgr.set_active(id, enable)?;
            println!(
                "{} Boot{id}.",
                if enable { "Enabled" } else { "Disabled" }
            );
            println!(
                "{}",
                EntryView {
                    index: 1,
                    total: 1,
                    id,
                    option: &option,
                }
            );
        }
        ("rename", [id, label @ ..]) if !label.is_empty() => {
            let id: BootId = id.parse()?;
            let label = join_label(label);
            boot_mgr.rename(id, &label)?;
            println!("Renamed Boot{id} to '{label}'.");
        }
        ("dump", []) => {
            println!("{}", DumpView(&boot_mgr.dump()?));
        }
        ("order", ["set"]) => return Err(BootError::EmptyInput),
        _ => {
            warn!("Unknown command or wrong number of arguments: {command}");
            println!("Error: Unknown command or wrong number of arguments: {command}");
            return Ok(Status::INVALID_PARAMETER);
        }
    }
    Ok(Status::SUCCESS)
}

/// Prints the usage of the program.
fn print_help(app_filename: &str) {
    println!(
        r#"Usage: {app_filename} [OPTIONS] <COMMAND> [ARGS]...

Commands:
  list                          List Boot#### entries in BootOrder
  order                         Show BootOrder
  order set <id[,id,...]>       Set BootOrder (hex ids or Boot####)
  select <id>                   Move an id to the front of BootOrder (default)
  next <id>                     Set BootNext, a one-time boot target
  enable <id> / disable <id>    Set or clear the active attribute
  rename <id> <label...>        Rename an entry's description
  dump                          Show raw variable sizes and attributes

Options:
  -h, --help                    display this help and exit
  -v, --verbose                 log every variable read and write

Examples:
  {app_filename} select 0003
  {app_filename} order set 0004,0001,0003,0002
  {app_filename} rename 0002 "Ubuntu NVMe"
"#
    );
}

/// The main function of the program.
///
/// This will not panic on a fatal error, rather, it will return control to the UEFI shell with a status that
/// describes the failure.
#[entry]
fn main() -> Status {
    main_func().unwrap_or_else(|e| {
        println!("Error: {e}");
        e.status()
    })
}
