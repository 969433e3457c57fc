use std::path::Path;

use anyhow::Result;
use mcupack_core::{Device, DeviceFamily, MemoryRegion, TimerKind};

use crate::common;

fn region(label: &str, region: Option<MemoryRegion>) {
    if let Some(r) = region {
        println!(
            "  {label:<8} {} @ {}",
            common::format_size(r.size),
            common::hex(r.start, 4)
        );
    }
}

fn join_divisors(values: &[u32], fallback: bool) -> String {
    let list: Vec<String> = values.iter().map(u32::to_string).collect();
    if fallback {
        format!("{} (default)", list.join(", "))
    } else {
        list.join(", ")
    }
}

fn print_summary(device: &Device) {
    let family = match device.family {
        DeviceFamily::RegisterFamily => "register family",
        DeviceFamily::LegacyFamily => "legacy family",
        DeviceFamily::Unsupported => "unsupported",
    };
    println!("{} ({family}, {})", device.name, device.architecture);
    if !device.family_name.is_empty() {
        println!("Group: {}", device.family_name);
    }
    if let Some(doc) = &device.document {
        println!("Document: {doc}");
    }

    println!("Memory:");
    region("flash", device.memory.flash);
    region("ram", device.memory.ram);
    region("eeprom", device.memory.eeprom);
    region("fuses", device.memory.fuses);

    if !device.signatures.is_empty() {
        let sigs: Vec<String> = device
            .signatures
            .iter()
            .map(|s| format!("{}={}", s.name, common::hex(s.value, 2)))
            .collect();
        println!("Signatures: {}", sigs.join(" "));
    }

    println!(
        "Fuses: {}  Lockbits: {}  Peripherals: {}  Modules: {}  Interrupts: {}  Pinouts: {}",
        device.fuses.len(),
        device.lockbits.len(),
        device.peripherals.len(),
        device.modules.len(),
        device.interrupts.len(),
        device.pinouts.len()
    );

    if !device.timers.is_empty() {
        println!("Timers:");
        for timer in &device.timers {
            let kind = match timer.kind {
                TimerKind::Bits8 => "8-bit",
                TimerKind::Bits16 => "16-bit",
                TimerKind::Async8 => "8-bit async",
            };
            let modes: Vec<&str> = timer.modes.iter().map(|m| m.name.as_str()).collect();
            let divisors: Vec<u32> = timer.prescalers.iter().map(|p| p.divisor).collect();
            println!(
                "  {:<8} {:<12} modes: {}{}  prescalers: {}",
                timer.instance,
                kind,
                modes.join(", "),
                if timer.modes_fallback { " (default)" } else { "" },
                join_divisors(&divisors, timer.prescalers_fallback)
            );
        }
    }

    if let Some(clock) = &device.clock {
        println!("Clock:");
        for source in &clock.sources {
            println!(
                "  source {} {}",
                common::hex(source.value, 2),
                if source.caption.is_empty() { source.name.as_str() } else { source.caption.as_str() }
            );
        }
        println!(
            "  system prescalers: {}",
            join_divisors(&clock.system_prescalers, clock.system_fallback)
        );
        println!(
            "  adc prescalers: {}",
            join_divisors(&clock.adc_prescalers, clock.adc_fallback)
        );
        println!(
            "  timer prescalers: {}",
            join_divisors(&clock.timer_prescalers, clock.timer_fallback)
        );
    }

    if let Some(el) = &device.electrical {
        let range = |min: Option<f64>, max: Option<f64>| match (min, max) {
            (Some(a), Some(b)) => format!("{a}..{b}"),
            (Some(a), None) => format!("{a}.."),
            (None, Some(b)) => format!("..{b}"),
            (None, None) => "-".to_string(),
        };
        println!(
            "Electrical: VCC {} V, T {} C, max {} Hz",
            range(el.vcc_min, el.vcc_max),
            range(el.temp_min, el.temp_max),
            el.max_speed_hz
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".into())
        );
    }

    if !device.variants.is_empty() {
        println!("Variants:");
        for variant in &device.variants {
            println!(
                "  {:<20} {:<10} {}",
                variant.order_code,
                variant.package,
                variant.voltage.raw
            );
        }
    }

    if !device.interfaces.is_empty() {
        let names: Vec<&str> = device.interfaces.iter().map(|i| i.name.as_str()).collect();
        println!("Interfaces: {}", names.join(", "));
    }

    let docs = &device.documentation;
    if let Some(link) = &docs.datasheet {
        println!("Datasheet: {} <{}>", link.title, link.url);
    }
    if let Some(link) = &docs.device_page {
        println!("Device page: {} <{}>", link.title, link.url);
    }
    for link in docs.application_notes.iter().chain(docs.other.iter()) {
        println!("Document: {} <{}>", link.title, link.url);
    }

    common::print_diagnostics(device);
}

pub fn run(doc: &Path, manifest: Option<&Path>, device: Option<&str>, json: bool) -> Result<()> {
    let device = common::load_device(doc, manifest, device)?;
    if json {
        common::print_json(&device)?;
    } else {
        print_summary(&device);
    }
    Ok(())
}
