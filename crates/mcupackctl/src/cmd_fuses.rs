use std::path::Path;

use anyhow::Result;
use mcupack_core::ConfigRegister;
use serde::Serialize;

use crate::common;

#[derive(Serialize)]
struct ConfigTables<'a> {
    device: &'a str,
    fuses: &'a [ConfigRegister],
    lockbits: &'a [ConfigRegister],
}

/// `[n]` for single bits, `[msb:lsb]` otherwise.
fn bit_label(offset: u32, width: u32) -> String {
    if width <= 1 {
        format!("[{offset}]")
    } else {
        let msb = u64::from(offset) + u64::from(width) - 1;
        format!("[{msb}:{offset}]")
    }
}

fn print_table(title: &str, registers: &[ConfigRegister]) {
    if registers.is_empty() {
        return;
    }
    println!("{title}:");
    for reg in registers {
        let width = (reg.size as usize * 2).clamp(2, 16);
        println!(
            "  {:<12} offset {}  default {}{}",
            reg.name,
            common::hex(reg.offset, 2),
            common::hex(reg.default, width),
            reg.mask
                .map(|m| format!("  mask {}", common::hex(m, width)))
                .unwrap_or_default(),
        );
        for field in &reg.bitfields {
            let bits = bit_label(field.offset, field.width);
            let value = reg.field_default(field);
            let label = field
                .values
                .iter()
                .find(|v| v.value == value)
                .map(|v| v.name.as_str())
                .unwrap_or("");
            println!(
                "    {:<12} {:<8} = {:<6} {:<20} {}",
                field.name,
                bits,
                common::hex(value, 1),
                label,
                field.caption
            );
        }
    }
}

pub fn run(doc: &Path, device: Option<&str>, json: bool) -> Result<()> {
    let device = common::load_device(doc, None, device)?;

    if json {
        common::print_json(&ConfigTables {
            device: &device.name,
            fuses: &device.fuses,
            lockbits: &device.lockbits,
        })?;
        return Ok(());
    }

    if device.fuses.is_empty() && device.lockbits.is_empty() {
        println!("{} declares no configuration registers.", device.name);
        return Ok(());
    }
    print_table("Fuses", &device.fuses);
    print_table("Lockbits", &device.lockbits);
    common::print_diagnostics(&device);

    Ok(())
}
