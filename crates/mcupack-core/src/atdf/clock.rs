use tracing::debug;

use super::timers::FALLBACK_DIVISORS;
use crate::classify;
use crate::model::{ClockInfo, ClockSource, ConfigRegister, EnumValue, Peripheral, Timer};

const FALLBACK_SYSTEM: [u32; 9] = [1, 2, 4, 8, 16, 32, 64, 128, 256];
const FALLBACK_ADC: [u32; 7] = [2, 4, 8, 16, 32, 64, 128];

/// Clock-source options enumerated by clock-select configuration fields.
pub(crate) fn clock_sources(registers: &[ConfigRegister]) -> Vec<ClockSource> {
    let mut sources: Vec<ClockSource> = Vec::new();
    let fields = registers
        .iter()
        .flat_map(|r| r.bitfields.iter())
        .filter(|f| classify::is_clock_source_field(&f.name));
    for field in fields {
        for value in &field.values {
            if !sources
                .iter()
                .any(|s| s.value == value.value && s.name == value.name)
            {
                sources.push(ClockSource {
                    value: value.value,
                    name: value.name.clone(),
                    caption: value.caption.clone(),
                });
            }
        }
    }
    sources
}

fn divisors<'a, I>(values: I) -> Vec<u32>
where
    I: IntoIterator<Item = &'a EnumValue>,
{
    let mut out: Vec<u32> = values
        .into_iter()
        .filter_map(|v| {
            if v.caption.is_empty() {
                classify::parse_divisor(&v.name)
            } else {
                classify::parse_divisor(&v.caption)
            }
        })
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}

fn with_fallback(found: Vec<u32>, fallback: &[u32]) -> (Vec<u32>, bool) {
    if found.is_empty() {
        (fallback.to_vec(), true)
    } else {
        (found, false)
    }
}

/// Clock summary: sources from configuration fields, prescaler tables from
/// peripheral value-groups and timers, with built-in defaults when absent.
pub(crate) fn clock_info(
    config: &[ConfigRegister],
    peripherals: &[Peripheral],
    timers: &[Timer],
) -> ClockInfo {
    let groups = || peripherals.iter().flat_map(|p| p.value_groups.iter());
    let system = divisors(
        groups()
            .filter(|g| classify::is_system_prescaler_group(&g.name, &g.caption))
            .flat_map(|g| g.values.iter()),
    );
    let adc = divisors(
        groups()
            .filter(|g| classify::is_adc_prescaler_group(&g.name, &g.caption))
            .flat_map(|g| g.values.iter()),
    );
    let mut timer: Vec<u32> = timers
        .iter()
        .filter(|t| !t.prescalers_fallback)
        .flat_map(|t| t.prescalers.iter().map(|p| p.divisor))
        .collect();
    timer.sort_unstable();
    timer.dedup();

    let (system_prescalers, system_fallback) = with_fallback(system, &FALLBACK_SYSTEM);
    let (adc_prescalers, adc_fallback) = with_fallback(adc, &FALLBACK_ADC);
    let (timer_prescalers, timer_fallback) = with_fallback(timer, &FALLBACK_DIVISORS);
    let info = ClockInfo {
        sources: clock_sources(config),
        system_prescalers,
        adc_prescalers,
        timer_prescalers,
        system_fallback,
        adc_fallback,
        timer_fallback,
    };
    debug!(
        sources = info.sources.len(),
        system_fallback, adc_fallback, timer_fallback, "clock summary"
    );
    info
}
