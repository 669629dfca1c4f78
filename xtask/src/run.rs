use duct::cmd;

pub fn run_cli(ovmf_code: Option<&str>, release: bool) -> anyhow::Result<()> {
    let mut run_args = vec!["-d"];
    let mut build_args = vec![
        "build",
        "--bin",
        "bootvar-rs-cli",
        "--target",
        "x86_64-unknown-uefi",
    ];

    if let Some(ovmf_code) = ovmf_code {
        run_args.extend(["-b", ovmf_code]);
    }

    if release {
        build_args.extend(["--profile", "release-lto"]);
        run_args.push("target/x86_64-unknown-uefi/release-lto/bootvar-rs-cli.efi");
    } else {
        run_args.push("target/x86_64-unknown-uefi/debug/bootvar-rs-cli.efi");
    }

    run_in_vm(&build_args, &run_args)
}

/// Builds with `build_args`, then boots the result with `uefi-run`.
pub fn run_in_vm(build_args: &[&str], run_args: &[&str]) -> anyhow::Result<()> {
    cmd!("cargo", "install", "uefi-run").run()?; // will not install if its already installed
    cmd("cargo", build_args).run()?;
    if let Err(e) = cmd("uefi-run", run_args).run() {
        println!(
            "hint: if the error was that the PC BIOS could not be loaded, you may have to specify ovmf-code"
        );
        return Err(e.into());
    }
    Ok(())
}
