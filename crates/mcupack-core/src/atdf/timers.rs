use tracing::debug;

use crate::classify;
use crate::model::{Bitfield, Module, Peripheral, Prescaler, Register, Timer, WaveformMode};

/// Divisors assumed when a timer declares no clock-select enumeration.
pub(crate) const FALLBACK_DIVISORS: [u32; 5] = [1, 8, 64, 256, 1024];

fn fallback_modes() -> Vec<WaveformMode> {
    ["Normal", "CTC", "PWM"]
        .into_iter()
        .map(|name| WaveformMode {
            value: None,
            name: name.to_string(),
            caption: name.to_string(),
        })
        .collect()
}

fn fallback_prescalers() -> Vec<Prescaler> {
    FALLBACK_DIVISORS
        .into_iter()
        .map(|divisor| Prescaler {
            value: None,
            divisor,
            caption: format!("CLK/{divisor}"),
        })
        .collect()
}

/// Registers of the groups an instance maps, control registers first choice.
fn candidate_registers<'a>(
    peripheral: &'a Peripheral,
    mapped: &[String],
) -> Vec<&'a Register> {
    let groups: Vec<_> = peripheral
        .register_groups
        .iter()
        .filter(|g| mapped.is_empty() || mapped.iter().any(|m| *m == g.name))
        .collect();
    let all: Vec<&Register> = groups.iter().flat_map(|g| g.registers.iter()).collect();
    let control: Vec<&Register> = all
        .iter()
        .copied()
        .filter(|r| classify::is_control_register(&r.name, &r.caption))
        .collect();
    if control.is_empty() {
        all
    } else {
        control
    }
}

/// Waveform modes from a single enumerated WGM field. Modes split over
/// several plain fields cannot be named and yield nothing.
fn waveform_modes(peripheral: &Peripheral, fields: &[&Bitfield]) -> Vec<WaveformMode> {
    let mut modes: Vec<WaveformMode> = Vec::new();
    for field in fields {
        let Some(group) = peripheral.resolve(field) else {
            continue;
        };
        for value in &group.values {
            if modes.iter().all(|m| m.value != Some(value.value)) {
                modes.push(WaveformMode {
                    value: Some(value.value),
                    name: value.name.clone(),
                    caption: value.caption.clone(),
                });
            }
        }
    }
    modes
}

fn prescalers(peripheral: &Peripheral, fields: &[&Bitfield]) -> Vec<Prescaler> {
    let mut out: Vec<Prescaler> = Vec::new();
    for field in fields {
        let Some(group) = peripheral.resolve(field) else {
            continue;
        };
        for value in &group.values {
            let text = if value.caption.is_empty() {
                &value.name
            } else {
                &value.caption
            };
            let Some(divisor) = classify::parse_divisor(text) else {
                continue;
            };
            if out.iter().all(|p| p.divisor != divisor) {
                out.push(Prescaler {
                    value: Some(value.value),
                    divisor,
                    caption: value.caption.clone(),
                });
            }
        }
    }
    out
}

/// Timer descriptors for every timer module instance.
pub(crate) fn timers(modules: &[Module], peripherals: &[Peripheral]) -> Vec<Timer> {
    let mut out = Vec::new();
    for module in modules.iter().filter(|m| classify::is_timer_module(&m.name)) {
        let peripheral = peripherals
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(&module.name));
        for instance in &module.instances {
            let (mut modes, mut scalers) = (Vec::new(), Vec::new());
            if let Some(peripheral) = peripheral {
                let mapped: Vec<String> = instance
                    .register_groups
                    .iter()
                    .map(|g| g.name_in_module.clone())
                    .collect();
                let registers = candidate_registers(peripheral, &mapped);
                let fields: Vec<&Bitfield> =
                    registers.iter().flat_map(|r| r.bitfields.iter()).collect();
                let wgm: Vec<&Bitfield> = fields
                    .iter()
                    .copied()
                    .filter(|f| classify::is_waveform_field(&f.name, &f.caption))
                    .collect();
                let cs: Vec<&Bitfield> = fields
                    .iter()
                    .copied()
                    .filter(|f| classify::is_clock_select_field(&f.name, &f.caption))
                    .collect();
                modes = waveform_modes(peripheral, &wgm);
                scalers = prescalers(peripheral, &cs);
            }
            let modes_fallback = modes.is_empty();
            let prescalers_fallback = scalers.is_empty();
            debug!(
                instance = %instance.name,
                modes = modes.len(),
                prescalers = scalers.len(),
                modes_fallback,
                prescalers_fallback,
                "timer"
            );
            out.push(Timer {
                instance: instance.name.clone(),
                module: module.name.clone(),
                kind: classify::timer_kind(&module.name, &instance.name),
                modes: if modes_fallback { fallback_modes() } else { modes },
                prescalers: if prescalers_fallback {
                    fallback_prescalers()
                } else {
                    scalers
                },
                modes_fallback,
                prescalers_fallback,
            });
        }
    }
    out
}
