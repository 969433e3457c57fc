use std::path::Path;

use anyhow::Result;

use crate::common;

pub fn run(doc: &Path, device: Option<&str>, json: bool) -> Result<()> {
    let device = common::load_device(doc, None, device)?;

    if json {
        common::print_json(&device.memory)?;
        return Ok(());
    }

    println!("{} memory map", device.name);
    println!(
        "{:<20} {:>10} {:>10} {:>8} {:<10} {:<4} {}",
        "SEGMENT", "START", "END", "SIZE", "TYPE", "RWX", "SPACE"
    );
    for seg in &device.memory.segments {
        let name = if seg.is_address_space {
            seg.name.clone()
        } else if seg.parent.is_some() {
            format!("  {}", seg.name)
        } else {
            seg.name.clone()
        };
        println!(
            "{:<20} {:>10} {:>10} {:>8} {:<10} {:<4} {}",
            name,
            common::hex(seg.start, 4),
            common::hex(seg.end(), 4),
            common::format_size(seg.size),
            if seg.kind.is_empty() { "-" } else { seg.kind.as_str() },
            seg.access.render(),
            seg.parent.as_deref().unwrap_or("-"),
        );
    }
    common::print_diagnostics(&device);

    Ok(())
}
