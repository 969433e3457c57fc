use std::env;
use std::fs;

use mcupack_core::{parse_device_document, Device};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: memory_map <device document> [device name] [--json]");
        return Ok(());
    };
    let rest: Vec<String> = args.collect();
    let json = rest.iter().any(|a| a == "--json");
    let name = rest
        .iter()
        .find(|a| !a.starts_with("--"))
        .cloned()
        .unwrap_or_default();

    let xml = fs::read_to_string(&path)?;
    let mut device = Device::new(name);
    parse_device_document(&xml, &mut device)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&device.memory)?);
        return Ok(());
    }
    for seg in &device.memory.segments {
        let indent = if seg.parent.is_some() { "  " } else { "" };
        println!(
            "{indent}{:<18} 0x{:06X}..0x{:06X} {:<8} {}",
            seg.name,
            seg.start,
            seg.end(),
            seg.kind,
            seg.access.render()
        );
    }
    for diag in &device.diagnostics {
        eprintln!("warning [{}]: {}", diag.section, diag.message);
    }
    Ok(())
}
