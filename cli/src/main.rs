use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use exodus_core::{FilesystemFormatter, FormatOptions};
use exodus_filesystems::Ext2Formatter;

#[derive(Parser)]
#[command(name = "mkext2")]
#[command(about = "Create an ext2 filesystem on a device or image file", long_about = None)]
struct Cli {
    /// Block size in bytes (1024, 2048, or 4096)
    #[arg(short = 'b', long, default_value_t = 1024)]
    block_size: u32,

    /// Blocks per block group
    #[arg(short = 'g', long, default_value_t = 8192)]
    blocks_per_group: u32,

    /// Volume label, truncated to 16 bytes
    #[arg(short = 'L', long)]
    label: Option<String>,

    /// Target device or image file
    device: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if !matches!(cli.block_size, 1024 | 2048 | 4096) {
        anyhow::bail!("Invalid block size. Must be 1024, 2048, or 4096 bytes.");
    }

    let options = FormatOptions {
        block_size: cli.block_size,
        blocks_per_group: cli.blocks_per_group,
        label: cli.label,
    };

    let formatter = Ext2Formatter;
    formatter.validate_options(&options).await?;

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(&cli.device)
        .with_context(|| format!("Failed to open device {}", cli.device.display()))?;

    formatter
        .format(&mut file, &options)
        .await
        .context("Failed to format device")?;

    println!("Filesystem created successfully");
    Ok(())
}
