//! Name/caption heuristics used to classify vendor data.
//!
//! Every predicate has an explicit fallback branch and is tested on its own so
//! extractors stay free of scattered string checks.

use crate::model::{DeviceFamily, TimerKind};

/// Category of a documentation book, decided from its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookKind {
    Datasheet,
    DevicePage,
    ApplicationNote,
    Other,
}

pub fn classify_book(title: &str) -> BookKind {
    let lower = title.to_ascii_lowercase();
    if lower.contains("datasheet") || lower.contains("data sheet") {
        BookKind::Datasheet
    } else if lower.contains("device page") || lower.contains("product page") {
        BookKind::DevicePage
    } else if lower.contains("application note") || lower.contains("app note") {
        BookKind::ApplicationNote
    } else {
        BookKind::Other
    }
}

/// Device family implied by an architecture string such as `AVR8` or `16xxxx`.
pub fn classify_architecture(arch: &str) -> DeviceFamily {
    let upper = arch.trim().to_ascii_uppercase();
    if upper.contains("AVR") {
        DeviceFamily::RegisterFamily
    } else if upper.starts_with("PIC")
        || upper.starts_with("DSPIC")
        || is_pic_core_pattern(&upper)
    {
        DeviceFamily::LegacyFamily
    } else {
        DeviceFamily::Unsupported
    }
}

/// `16XXXX`, `18XXXX`, `24XXXX` style core names.
fn is_pic_core_pattern(upper: &str) -> bool {
    let digits = upper.chars().take_while(|c| c.is_ascii_digit()).count();
    digits >= 2 && upper[digits..].chars().all(|c| c == 'X') && upper.len() > digits
}

/// Device family implied by a per-device document path.
pub fn classify_document(path: &str) -> Option<DeviceFamily> {
    let lower = path.to_ascii_lowercase();
    if lower.ends_with(".atdf") {
        Some(DeviceFamily::RegisterFamily)
    } else if lower.ends_with(".pic") || lower.ends_with(".edc") {
        Some(DeviceFamily::LegacyFamily)
    } else {
        None
    }
}

/// Module holding the fuse registers (exact name match).
pub fn is_fuse_module(name: &str) -> bool {
    name.eq_ignore_ascii_case("FUSE")
}

/// Module holding the lockbits. The name varies across device generations
/// (`LOCKBIT`, `LOCKBITS`, `LOCK`), so any name containing "lock" matches,
/// except clock-control modules.
pub fn is_lockbit_module(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    if lower.contains("clock") {
        false
    } else {
        lower.contains("lock")
    }
}

/// Role a memory segment type tag plays in the coarse memory map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryRole {
    Flash,
    Ram,
    Eeprom,
    Fuses,
}

pub fn memory_role(kind: &str) -> Option<MemoryRole> {
    match kind.to_ascii_lowercase().as_str() {
        "flash" | "code" | "program" => Some(MemoryRole::Flash),
        "ram" | "sram" | "iram" => Some(MemoryRole::Ram),
        "eeprom" => Some(MemoryRole::Eeprom),
        "fuses" | "fuse" | "config" => Some(MemoryRole::Fuses),
        _ => None,
    }
}

/// Device-side module that is a timer/counter.
pub fn is_timer_module(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    upper.starts_with("TC") || upper.starts_with("TMR") || upper.starts_with("TIMER")
}

/// Timer width from its module name, falling back to the instance name.
pub fn timer_kind(module: &str, instance: &str) -> TimerKind {
    let module = module.to_ascii_uppercase();
    let instance = instance.to_ascii_uppercase();
    if module.contains("ASYNC") || instance.contains("ASYNC") {
        TimerKind::Async8
    } else if module.contains("16") || instance.contains("16") {
        TimerKind::Bits16
    } else if module.contains('8') {
        TimerKind::Bits8
    } else {
        // Classic AVR numbering: TC1/TC3/TC4/TC5 are 16-bit, TC2 is asynchronous.
        match instance.as_str() {
            "TC1" | "TC3" | "TC4" | "TC5" => TimerKind::Bits16,
            "TC2" => TimerKind::Async8,
            _ => TimerKind::Bits8,
        }
    }
}

/// Control register of a timer (`TCCRnA`, `CTRLA`, ...).
pub fn is_control_register(name: &str, caption: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    upper.starts_with("TCCR")
        || upper.starts_with("CTRL")
        || caption.to_ascii_lowercase().contains("control register")
}

/// Waveform generation mode bitfield.
pub fn is_waveform_field(name: &str, caption: &str) -> bool {
    name.to_ascii_uppercase().starts_with("WGM")
        || caption.to_ascii_lowercase().contains("waveform")
}

/// Clock-select bitfield of a timer.
pub fn is_clock_select_field(name: &str, caption: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    let lower = caption.to_ascii_lowercase();
    (upper.starts_with("CS") && upper[2..].chars().all(|c| c.is_ascii_digit()))
        || upper == "CLKSEL"
        || lower.contains("clock select")
}

/// Fuse or configuration field selecting the clock source.
pub fn is_clock_source_field(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    upper.contains("CKSEL") || upper.contains("CLKSEL") || upper == "FOSC" || upper == "OSC"
}

/// Value-group listing the system clock prescaler settings.
pub fn is_system_prescaler_group(name: &str, caption: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    let lower = caption.to_ascii_lowercase();
    (upper.contains("CLKPS") || upper.contains("CLK_PRESC") || lower.contains("clock prescal"))
        && !is_adc_prescaler_group(name, caption)
}

/// Value-group listing the ADC clock prescaler settings.
pub fn is_adc_prescaler_group(name: &str, caption: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    let lower = caption.to_ascii_lowercase();
    upper.contains("ADPS") || upper.contains("ADC_PRESC") || lower.contains("adc prescal")
}

/// Clock divisor described by a value caption (`Running, CLK/64` -> 64).
///
/// Stopped and external clock entries have no divisor.
pub fn parse_divisor(text: &str) -> Option<u32> {
    let lower = text.to_ascii_lowercase();
    if lower.contains("stop") || lower.contains("no clock") || lower.contains("external") {
        return None;
    }
    if lower.contains("no prescal") || lower.contains("no division") {
        return Some(1);
    }
    if let Some((_, after)) = text.rsplit_once('/') {
        let digits: String = after
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        return digits.parse().ok().filter(|d| *d > 0);
    }
    if lower.contains("0x") {
        return None;
    }
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|token| !token.is_empty())
        .last()
        .and_then(|token| token.parse().ok())
        .filter(|d| *d > 0)
}
