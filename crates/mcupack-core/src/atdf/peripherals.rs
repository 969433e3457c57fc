use mcupack_xml::Element;
use tracing::{debug, warn};

use crate::bitops::{bit_range_from_mask, field_overflows};
use crate::model::{
    Bitfield, Diagnostic, EnumValue, Peripheral, Register, RegisterGroup, ValueGroup,
};

pub(crate) fn value_groups(module: &Element) -> Vec<ValueGroup> {
    module
        .children_named("value-group")
        .map(|group| ValueGroup {
            name: group.attr_string("name", ""),
            caption: group.attr_string("caption", ""),
            values: group
                .children_named("value")
                .map(|value| EnumValue {
                    value: value.attr_num("value").unwrap_or(0),
                    name: value.attr_string("name", ""),
                    caption: value.attr_string("caption", ""),
                })
                .collect(),
        })
        .collect()
}

pub(crate) fn bitfield(el: &Element) -> Bitfield {
    let mask = el.attr_num("mask").unwrap_or(0);
    let (offset, width) = bit_range_from_mask(mask);
    Bitfield {
        name: el.attr_string("name", ""),
        caption: el.attr_string("caption", ""),
        mask,
        offset,
        width,
        value_group: el.attr("values").map(str::to_string),
        values: Vec::new(),
    }
}

/// Report fields reaching past the register width.
pub(crate) fn check_overflow(
    section: &str,
    register: &str,
    size: u32,
    fields: &[Bitfield],
    diagnostics: &mut Vec<Diagnostic>,
) {
    for field in fields {
        if field_overflows(field.offset, field.width, size) {
            warn!(
                register,
                field = %field.name,
                offset = field.offset,
                width = field.width,
                size,
                "bitfield exceeds register width"
            );
            diagnostics.push(Diagnostic::new(
                section,
                format!(
                    "{register}.{} spans bits {}..{} of a {size}-byte register",
                    field.name,
                    field.offset,
                    field.offset + field.width
                ),
            ));
        }
    }
}

fn register(el: &Element, diagnostics: &mut Vec<Diagnostic>) -> Register {
    let name = el.attr_string("name", "");
    let size = el
        .attr_num("size")
        .and_then(|s| u32::try_from(s).ok())
        .unwrap_or(1);
    let bitfields: Vec<Bitfield> = el.children_named("bitfield").map(bitfield).collect();
    check_overflow("peripherals", &name, size, &bitfields, diagnostics);
    Register {
        caption: el.attr_string("caption", ""),
        offset: el.attr_num("offset").unwrap_or(0),
        size,
        init_value: el.attr_num("initval"),
        access: el.attr("rw").map(str::to_string),
        mask: el.attr_num("mask"),
        bitfields,
        name,
    }
}

pub(crate) fn peripheral(module: &Element, diagnostics: &mut Vec<Diagnostic>) -> Peripheral {
    Peripheral {
        name: module.attr_string("name", ""),
        caption: module.attr_string("caption", ""),
        register_groups: module
            .children_named("register-group")
            .map(|group| RegisterGroup {
                name: group.attr_string("name", ""),
                caption: group.attr_string("caption", ""),
                registers: group
                    .children_named("register")
                    .map(|reg| register(reg, diagnostics))
                    .collect(),
            })
            .collect(),
        value_groups: value_groups(module),
    }
}

/// Register catalogue of every `<module>` under the top-level `<modules>`.
pub(crate) fn peripherals(modules: &Element, diagnostics: &mut Vec<Diagnostic>) -> Vec<Peripheral> {
    let list: Vec<Peripheral> = modules
        .children_named("module")
        .map(|module| peripheral(module, diagnostics))
        .collect();
    debug!(count = list.len(), "peripherals extracted");
    list
}
