use std::path::Path;

use anyhow::Result;
use mcupack_core::{Device, DeviceFamily};
use serde::Serialize;
use tracing::info;

use crate::common;

#[derive(Serialize)]
struct DeviceEntry<'a> {
    name: &'a str,
    family: DeviceFamily,
    family_name: &'a str,
    architecture: &'a str,
    flash: Option<u64>,
    ram: Option<u64>,
    eeprom: Option<u64>,
    document: Option<&'a str>,
}

impl<'a> From<&'a Device> for DeviceEntry<'a> {
    fn from(dev: &'a Device) -> Self {
        DeviceEntry {
            name: &dev.name,
            family: dev.family,
            family_name: &dev.family_name,
            architecture: &dev.architecture,
            flash: dev.memory.flash.map(|r| r.size),
            ram: dev.memory.ram.map(|r| r.size),
            eeprom: dev.memory.eeprom.map(|r| r.size),
            document: dev.document.as_deref(),
        }
    }
}

fn family_label(family: DeviceFamily) -> &'static str {
    match family {
        DeviceFamily::RegisterFamily => "register",
        DeviceFamily::LegacyFamily => "legacy",
        DeviceFamily::Unsupported => "-",
    }
}

fn size_cell(size: Option<u64>) -> String {
    size.map(common::format_size).unwrap_or_else(|| "-".into())
}

pub fn run(manifest: &Path, json: bool) -> Result<()> {
    let package = common::load_package(manifest)?;
    info!(count = package.devices.len(), "declared devices");

    if json {
        let entries: Vec<DeviceEntry<'_>> = package.devices.iter().map(DeviceEntry::from).collect();
        common::print_json(&entries)?;
        return Ok(());
    }

    if package.devices.is_empty() {
        println!("No devices declared.");
        return Ok(());
    }

    println!(
        "{} {} ({})",
        package.vendor,
        package.name,
        package.version.as_deref().unwrap_or("unversioned")
    );
    println!(
        "{:<16} {:<9} {:<12} {:<8} {:>7} {:>7} {:>7} {}",
        "NAME", "FAMILY", "GROUP", "ARCH", "FLASH", "RAM", "EEPROM", "DOCUMENT"
    );
    for dev in &package.devices {
        println!(
            "{:<16} {:<9} {:<12} {:<8} {:>7} {:>7} {:>7} {}",
            dev.name,
            family_label(dev.family),
            if dev.family_name.is_empty() { "-" } else { dev.family_name.as_str() },
            if dev.architecture.is_empty() { "-" } else { dev.architecture.as_str() },
            size_cell(dev.memory.flash.map(|r| r.size)),
            size_cell(dev.memory.ram.map(|r| r.size)),
            size_cell(dev.memory.eeprom.map(|r| r.size)),
            dev.document.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}
