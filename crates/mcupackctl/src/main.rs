use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mcupackctl::cmd_devices;
use mcupackctl::cmd_fuses;
use mcupackctl::cmd_memory;
use mcupackctl::cmd_pins;
use mcupackctl::cmd_show;

#[derive(Parser, Debug)]
#[command(name = "mcupackctl", version, about = "Microcontroller device-pack inspector")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Output JSON where applicable
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List devices declared by a package manifest
    Devices {
        #[arg(long)]
        manifest: PathBuf,
    },
    /// Summarise one device from its per-device document
    Show {
        #[arg(long)]
        doc: PathBuf,
        /// Start from the manifest skeleton of the device
        #[arg(long)]
        manifest: Option<PathBuf>,
        #[arg(long)]
        device: Option<String>,
    },
    /// Fuse and lockbit tables with unprogrammed defaults
    Fuses {
        #[arg(long)]
        doc: PathBuf,
        #[arg(long)]
        device: Option<String>,
    },
    /// Reconciled memory segment list
    Memory {
        #[arg(long)]
        doc: PathBuf,
        #[arg(long)]
        device: Option<String>,
    },
    /// Pin table of one package pinout
    Pins {
        #[arg(long)]
        doc: PathBuf,
        #[arg(long)]
        device: Option<String>,
        #[arg(long)]
        pinout: Option<String>,
    },
}

fn main() -> Result<()> {
    let Cli { verbose, json, cmd } = Cli::parse();

    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.into()),
        ))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cmd {
        Cmd::Devices { manifest } => cmd_devices::run(&manifest, json)?,
        Cmd::Show {
            doc,
            manifest,
            device,
        } => cmd_show::run(&doc, manifest.as_deref(), device.as_deref(), json)?,
        Cmd::Fuses { doc, device } => cmd_fuses::run(&doc, device.as_deref(), json)?,
        Cmd::Memory { doc, device } => cmd_memory::run(&doc, device.as_deref(), json)?,
        Cmd::Pins {
            doc,
            device,
            pinout,
        } => cmd_pins::run(&doc, device.as_deref(), pinout.as_deref(), json)?,
    };

    Ok(())
}
