use std::collections::HashMap;

use mcupack_xml::Element;
use tracing::trace;

use crate::model::{Module, Pin, PinFunction, Pinout};

/// Pad name (upper-cased) to every signal routed to it.
fn pad_functions(modules: &[Module]) -> HashMap<String, Vec<PinFunction>> {
    let mut map: HashMap<String, Vec<PinFunction>> = HashMap::new();
    for module in modules {
        for instance in &module.instances {
            for signal in &instance.signals {
                if signal.pad.is_empty() {
                    continue;
                }
                map.entry(signal.pad.to_ascii_uppercase())
                    .or_default()
                    .push(PinFunction {
                        module: instance.name.clone(),
                        function: signal.group.clone(),
                        index: signal.index,
                    });
            }
        }
    }
    map
}

/// Package pinouts with pads annotated by the signals routed to them.
pub(crate) fn pinouts(pinouts: &Element, modules: &[Module]) -> Vec<Pinout> {
    let functions = pad_functions(modules);
    pinouts
        .children_named("pinout")
        .map(|pinout| Pinout {
            name: pinout.attr_string("name", ""),
            caption: pinout.attr_string("caption", ""),
            pins: pinout
                .children_named("pin")
                .enumerate()
                .map(|(idx, pin)| {
                    let pad = pin.attr_string("pad", "");
                    let position = pin
                        .attr_num("position")
                        .and_then(|p| u32::try_from(p).ok())
                        .unwrap_or_else(|| u32::try_from(idx + 1).unwrap_or(u32::MAX));
                    let functions = functions
                        .get(&pad.to_ascii_uppercase())
                        .cloned()
                        .unwrap_or_default();
                    trace!(%pad, position, functions = functions.len(), "pin");
                    Pin {
                        position,
                        pad,
                        functions,
                    }
                })
                .collect(),
        })
        .collect()
}
