use duct::cmd;

pub fn fuzz_decoder() -> anyhow::Result<()> {
    cmd!("cargo", "install", "cargo-fuzz").run()?; // will not install if its already installed
    cmd!("cargo", "fuzz", "run", "load_option").run()?;
    Ok(())
}
