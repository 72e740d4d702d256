use std::num::ParseIntError;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use i2c_host::{linux, BusId, DiscoveryConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Read and write chip I2C buses via i2c-dev")]
struct Cli {
    /// sysfs mount point used for bus discovery
    #[arg(long, default_value = "/sys")]
    sysfs_root: PathBuf,

    /// Directory holding the i2c-dev device nodes
    #[arg(long, default_value = "/dev")]
    dev_root: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Copy)]
struct Target {
    /// Chip id (decimal or 0x-prefixed hex)
    #[arg(value_parser = parse_u32)]
    chip: u32,
    /// I2C engine on the chip
    #[arg(value_parser = parse_u8)]
    engine: u8,
    /// Port on the engine
    #[arg(value_parser = parse_u8)]
    port: u8,
    /// Device address on the bus
    #[arg(value_parser = parse_u16)]
    address: u16,
    /// Number of offset bytes sent before the data (0-4)
    #[arg(long, default_value_t = 0)]
    offset_width: u32,
    /// Offset sent before the data
    #[arg(long, default_value = "0", value_parser = parse_u32)]
    offset: u32,
}

impl Target {
    fn bus(&self) -> BusId {
        BusId::new(self.chip, self.engine, self.port)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List discovered chip buses
    List,
    /// Read bytes from a device
    Read {
        #[command(flatten)]
        target: Target,
        /// Number of bytes to read
        #[arg(value_parser = parse_usize)]
        length: usize,
    },
    /// Write bytes to a device
    Write {
        #[command(flatten)]
        target: Target,
        /// Bytes to write
        #[arg(value_parser = parse_u8, required = true)]
        data: Vec<u8>,
    },
}

fn parse_u32(s: &str) -> Result<u32, ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    }
}

fn parse_u16(s: &str) -> Result<u16, String> {
    let value = parse_u32(s).map_err(|e| e.to_string())?;
    u16::try_from(value).map_err(|e| e.to_string())
}

fn parse_u8(s: &str) -> Result<u8, String> {
    let value = parse_u32(s).map_err(|e| e.to_string())?;
    u8::try_from(value).map_err(|e| e.to_string())
}

fn parse_usize(s: &str) -> Result<usize, ParseIntError> {
    parse_u32(s).map(|value| value as usize)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config =
        DiscoveryConfig { sysfs_root: cli.sysfs_root, dev_root: cli.dev_root };
    let mut registry = linux::open_system(&config)
        .context("failed to discover I2C buses")?;

    match &cli.command {
        Commands::List => {
            for bus in registry.iter() {
                println!("{}  {}", bus.id(), bus.device_path().display());
            }
        }
        Commands::Read { target, length } => {
            let data = registry
                .read(
                    target.bus(),
                    target.address,
                    target.offset_width,
                    target.offset,
                    *length,
                )
                .with_context(|| format!("read from {} failed", target.bus()))?;
            let hex: Vec<String> =
                data.iter().map(|byte| format!("{byte:02x}")).collect();
            println!("{}", hex.join(" "));
        }
        Commands::Write { target, data } => {
            registry
                .write(
                    target.bus(),
                    target.address,
                    target.offset_width,
                    target.offset,
                    data,
                )
                .with_context(|| format!("write to {} failed", target.bus()))?;
            println!("Wrote {} bytes", data.len());
        }
    }

    Ok(())
}
