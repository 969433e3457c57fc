use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use mcupack_core::{parse_device_document, parse_manifest, Device, Package};
use serde::Serialize;
use tracing::{debug, info};

/// Read a pack file as text, dropping a UTF-8 byte-order mark.
pub fn read_file(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

pub fn load_package(path: &Path) -> Result<Package> {
    let xml = read_file(path)?;
    let package =
        parse_manifest(&xml).with_context(|| format!("parse manifest {}", path.display()))?;
    info!(
        package = %package.name,
        devices = package.devices.len(),
        "loaded manifest"
    );
    Ok(package)
}

/// Device name implied by a document path (`atdf/ATmega328P.atdf` -> `ATmega328P`).
pub fn device_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

/// Load a device from its per-device document, starting from the manifest
/// skeleton when a manifest is given.
pub fn load_device(doc: &Path, manifest: Option<&Path>, name: Option<&str>) -> Result<Device> {
    let name = name
        .map(str::to_string)
        .or_else(|| device_name_from_path(doc))
        .unwrap_or_default();
    let mut device = match manifest {
        Some(path) => {
            let package = load_package(path)?;
            package
                .device(&name)
                .cloned()
                .ok_or_else(|| anyhow!("device {name} not declared in {}", path.display()))?
        }
        None => Device::new(name),
    };
    let xml = read_file(doc)?;
    let dialect = parse_device_document(&xml, &mut device)
        .with_context(|| format!("parse device document {}", doc.display()))?;
    if dialect.is_none() {
        bail!("{} is not a register-family or legacy-family document", doc.display());
    }
    debug!(device = %device.name, ?dialect, "device loaded");
    Ok(device)
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialise JSON output")?;
    println!("{text}");
    Ok(())
}

/// Byte count with a binary unit suffix when it divides evenly.
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1024 && bytes % 1024 == 0 {
        format!("{}K", bytes / 1024)
    } else {
        bytes.to_string()
    }
}

pub fn hex(value: u64, width: usize) -> String {
    format!("0x{value:0width$X}")
}

pub fn print_diagnostics(device: &Device) {
    if device.diagnostics.is_empty() {
        return;
    }
    println!();
    println!("Diagnostics:");
    for diag in &device.diagnostics {
        println!("  [{}] {}", diag.section, diag.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_use_kibibytes_when_exact() {
        assert_eq!(format_size(0x8000), "32K");
        assert_eq!(format_size(2048), "2K");
        assert_eq!(format_size(1000), "1000");
        assert_eq!(format_size(0), "0");
    }

    #[test]
    fn hex_is_zero_padded() {
        assert_eq!(hex(0x62, 2), "0x62");
        assert_eq!(hex(0xF, 4), "0x000F");
    }

    #[test]
    fn device_name_from_document_path() {
        assert_eq!(
            device_name_from_path(Path::new("pack/atdf/ATmega328P.atdf")).as_deref(),
            Some("ATmega328P")
        );
        assert_eq!(
            device_name_from_path(Path::new("edc/PIC16F877A.PIC")).as_deref(),
            Some("PIC16F877A")
        );
    }
}
