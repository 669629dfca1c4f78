#![no_main]
#![no_std]

// Integration tests for bootvar-rs, run on real (or virtual) firmware.

// DISCLAIMER: This code extensively uses unwrap and expect, as any errors in testing should be treated as fatal.

extern crate alloc;

use bootvar_rs_core::system::log_backend::UefiLogger;
use log::LevelFilter;
use uefi::{
    prelude::*,
    println,
    proto::console::text::{Input, Key},
};

use crate::{
    entries::test_entries,
    order::test_order,
    variables::test_variables,
};

mod entries;
mod order;
mod variables;

static LOGGER: UefiLogger = UefiLogger::with_location();

fn main_func() -> anyhow::Result<()> {
    uefi::helpers::init().expect("Failed to initialize helpers");
    LOGGER
        .install(LevelFilter::Debug)
        .expect("Failed to set logger"); // set up logger so that errors produced by the library will get caught as well

    println!("Select the test you would like to do:");
    println!("1. Variable storage test");
    println!("2. Load option test");
    println!("3. Boot order test");
    println!("4. All of the above");
    println!("Every test restores what it changed, but it is still best to run these in a VM.");
    loop {
        if let Key::Printable(char) = read_key() {
            let char = char::from(char);
            return match char {
                '1' => test_variables(),
                '2' => test_entries(),
                '3' => test_order(),
                '4' => test_variables()
                    .and_then(|()| test_entries())
                    .and_then(|()| test_order()),
                _ => Ok(()),
            };
        }
    }
}

#[entry]
fn main() -> Status {
    main_func().unwrap_or_else(|e| panic!("Failed to run test: {e}"));
    println!("All selected tests passed");
    Status::SUCCESS
}

fn read_key() -> Key {
    let handle = boot::get_handle_for_protocol::<Input>().unwrap();
    let mut input = boot::open_protocol_exclusive::<Input>(handle).unwrap();
    let mut events = [input.wait_for_key_event().unwrap()];
    boot::wait_for_event(&mut events).unwrap();
    input.read_key().unwrap().unwrap()
}
