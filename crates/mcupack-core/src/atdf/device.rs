use std::cmp::Ordering;

use mcupack_xml::Element;

use crate::model::{
    ElectricalParameters, InstanceRegisterGroup, Interface, Interrupt, Module, ModuleInstance,
    Property, Signal, Signature,
};

fn property_group<'a>(device: &'a Element, name: &str) -> Option<&'a Element> {
    device
        .child("property-groups")?
        .children_named("property-group")
        .find(|g| g.attr("name").is_some_and(|n| n.eq_ignore_ascii_case(name)))
}

/// `SIGNATURE<n>` names carry their byte address in the suffix.
fn signature_address(name: &str) -> Option<u64> {
    let upper = name.to_ascii_uppercase();
    let digits = upper.strip_prefix("SIGNATURE")?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Addressed entries first in address order, then the rest by name.
fn signature_order(a: &Signature, b: &Signature) -> Ordering {
    match (a.address, b.address) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.name.cmp(&b.name)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.name.cmp(&b.name),
    }
}

pub(crate) fn signatures(device: &Element) -> Option<Vec<Signature>> {
    let group = property_group(device, "SIGNATURES")?;
    let mut list: Vec<Signature> = group
        .children_named("property")
        .map(|p| {
            let name = p.attr_string("name", "");
            Signature {
                address: signature_address(&name),
                value: p.attr_num("value").unwrap_or(0),
                name,
            }
        })
        .collect();
    list.sort_by(signature_order);
    Some(list)
}

fn instance(el: &Element) -> ModuleInstance {
    ModuleInstance {
        name: el.attr_string("name", ""),
        caption: el.attr_string("caption", ""),
        register_groups: el
            .children_named("register-group")
            .map(|rg| InstanceRegisterGroup {
                name: rg.attr_string("name", ""),
                name_in_module: rg.attr_string("name-in-module", rg.attr_or("name", "")),
                offset: rg.attr_num("offset").unwrap_or(0),
                address_space: rg.attr("address-space").map(str::to_string),
            })
            .collect(),
        signals: el
            .child("signals")
            .map(|signals| {
                signals
                    .children_named("signal")
                    .map(|s| Signal {
                        group: s.attr_string("group", ""),
                        function: s.attr("function").map(str::to_string),
                        pad: s.attr_string("pad", ""),
                        index: s.attr_num("index").and_then(|i| u32::try_from(i).ok()),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// Device-side module instances with their placements and signals.
pub(crate) fn modules(device: &Element) -> Option<Vec<Module>> {
    let peripherals = device.child("peripherals")?;
    Some(
        peripherals
            .children_named("module")
            .map(|m| Module {
                name: m.attr_string("name", ""),
                caption: m.attr_string("caption", ""),
                instances: m.children_named("instance").map(instance).collect(),
            })
            .collect(),
    )
}

pub(crate) fn interrupts(device: &Element) -> Option<Vec<Interrupt>> {
    let interrupts = device.child("interrupts")?;
    Some(
        interrupts
            .descendants("interrupt")
            .map(|i| Interrupt {
                index: i
                    .attr_num("index")
                    .and_then(|v| u32::try_from(v).ok())
                    .unwrap_or(0),
                name: i.attr_string("name", ""),
                caption: i.attr_string("caption", ""),
                module_instance: i.attr("module-instance").map(str::to_string),
            })
            .collect(),
    )
}

pub(crate) fn interfaces(device: &Element) -> Option<Vec<Interface>> {
    let interfaces = device.child("interfaces")?;
    Some(
        interfaces
            .children_named("interface")
            .map(|i| Interface {
                name: i.attr_string("name", ""),
                kind: i.attr_string("type", ""),
            })
            .collect(),
    )
}

fn fold_min(acc: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (acc, value) {
        (Some(a), Some(v)) => Some(a.min(v)),
        (a, v) => a.or(v),
    }
}

fn fold_max(acc: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (acc, value) {
        (Some(a), Some(v)) => Some(a.max(v)),
        (a, v) => a.or(v),
    }
}

/// Operating envelope from the document's `<variants>` plus the
/// `ELECTRICAL_CHARACTERISTICS` property group.
pub(crate) fn electrical(root: &Element, device: &Element) -> Option<ElectricalParameters> {
    let mut params = ElectricalParameters::default();
    let mut seen = false;
    if let Some(variants) = root.child("variants") {
        for variant in variants.children_named("variant") {
            seen = true;
            params.vcc_min = fold_min(params.vcc_min, variant.attr_f64("vccmin"));
            params.vcc_max = fold_max(params.vcc_max, variant.attr_f64("vccmax"));
            params.temp_min = fold_min(params.temp_min, variant.attr_f64("tempmin"));
            params.temp_max = fold_max(params.temp_max, variant.attr_f64("tempmax"));
            if let Some(speed) = variant.attr_num("speedmax") {
                params.max_speed_hz = Some(params.max_speed_hz.map_or(speed, |s| s.max(speed)));
            }
        }
    }
    if let Some(group) = property_group(device, "ELECTRICAL_CHARACTERISTICS") {
        seen = true;
        params.properties = group
            .children_named("property")
            .map(|p| Property {
                name: p.attr_string("name", ""),
                value: p.attr_string("value", ""),
            })
            .collect();
    }
    seen.then_some(params)
}
