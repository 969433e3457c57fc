use mcupack_xml::Element;
use tracing::debug;

use super::peripherals::{bitfield, check_overflow, value_groups};
use crate::bitops::{combined_mask, default_register_value};
use crate::model::{Bitfield, ConfigRegister, Diagnostic};

/// Fuse or lockbit registers of `module` with resolved value enumerations.
pub(crate) fn config_registers(
    module: &Element,
    section: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<ConfigRegister> {
    let groups = value_groups(module);
    let mut registers = Vec::new();
    for reg in module
        .children_named("register-group")
        .flat_map(|g| g.children_named("register"))
    {
        let name = reg.attr_string("name", "");
        let size = reg
            .attr_num("size")
            .and_then(|s| u32::try_from(s).ok())
            .unwrap_or(1);
        let bitfields: Vec<Bitfield> = reg
            .children_named("bitfield")
            .map(|el| {
                let mut field = bitfield(el);
                if let Some(group) = field
                    .value_group
                    .as_deref()
                    .and_then(|wanted| groups.iter().find(|g| g.name == wanted))
                {
                    field.values = group.values.clone();
                }
                field
            })
            .collect();
        check_overflow(section, &name, size, &bitfields, diagnostics);
        let combined = combined_mask(bitfields.iter().map(|f| f.mask));
        let default = default_register_value(reg.attr_num("initval"), combined, size);
        debug!(
            section,
            register = %name,
            default = format_args!("{default:#x}"),
            "configuration register"
        );
        registers.push(ConfigRegister {
            name,
            caption: reg.attr_string("caption", ""),
            offset: reg.attr_num("offset").unwrap_or(0),
            size,
            mask: reg.attr_num("mask"),
            default,
            bitfields,
        });
    }
    registers
}
