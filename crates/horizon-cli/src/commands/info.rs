use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use horizon_core::io::exr_io::read_exr_info;

#[derive(Args)]
pub struct InfoArgs {
    /// Input EXR file
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let info = read_exr_info(&args.file)?;

    println!("File:        {}", args.file.display());
    println!("Dimensions:  {}x{}", info.width, info.height);
    println!("Channels:    {}", info.channels.join(", "));

    let entries = info.header.entries();
    if !entries.is_empty() {
        println!("Attributes:");
        for (key, value) in entries {
            println!("  {key} = {value}");
        }
    }

    Ok(())
}
