use mcupack_xml::Element;
use tracing::trace;

use crate::classify::{memory_role, MemoryRole};
use crate::model::{Diagnostic, MemoryMap, MemoryRegion, SegmentAccess};
use crate::reconcile::{reconcile, AddressSpace, SegmentDecl};

/// Type tag of an address space emitted without children.
fn space_kind(id: &str) -> String {
    match id.to_ascii_lowercase().as_str() {
        "prog" | "progmem" | "flash" => "flash".to_string(),
        "data" => "ram".to_string(),
        other => other.to_string(),
    }
}

/// Address spaces declared by a register-family `<device>` element.
pub fn address_spaces(device: &Element) -> Option<Vec<AddressSpace>> {
    let spaces = device.child("address-spaces")?;
    Some(
        spaces
            .children_named("address-space")
            .map(|space| {
                let id = space.attr_string("id", space.attr_or("name", ""));
                AddressSpace {
                    name: space.attr_string("name", &id),
                    start: space.attr_num("start").unwrap_or(0),
                    size: space.attr_num("size").unwrap_or(0),
                    kind: space_kind(&id),
                    segments: space
                        .children_named("memory-segment")
                        .map(|seg| SegmentDecl {
                            name: seg.attr_string("name", ""),
                            start: seg.attr_num("start").unwrap_or(0),
                            size: seg.attr_num("size").unwrap_or(0),
                            page_size: seg.attr_num("pagesize"),
                            kind: seg.attr_string("type", ""),
                            access: SegmentAccess::parse(seg.attr("rw"), seg.attr("exec")),
                        })
                        .collect(),
                    id,
                }
            })
            .collect(),
    )
}

pub(crate) fn memory_map(device: &Element, diagnostics: &mut Vec<Diagnostic>) -> Option<MemoryMap> {
    let spaces = address_spaces(device)?;
    let reconciled = reconcile(&spaces);
    diagnostics.extend(
        reconciled
            .violations
            .iter()
            .map(|v| Diagnostic::new("memory", v.to_string())),
    );

    let mut map = MemoryMap::default();
    for segment in reconciled.segments.iter().filter(|s| !s.is_address_space) {
        let slot = match memory_role(&segment.kind) {
            Some(MemoryRole::Flash) => &mut map.flash,
            Some(MemoryRole::Ram) => &mut map.ram,
            Some(MemoryRole::Eeprom) => &mut map.eeprom,
            Some(MemoryRole::Fuses) => &mut map.fuses,
            None => continue,
        };
        if slot.is_none() {
            trace!(segment = %segment.name, kind = %segment.kind, "memory role assigned");
            *slot = Some(MemoryRegion {
                start: segment.start,
                size: segment.size,
            });
        }
    }
    map.segments = reconciled.segments;
    Some(map)
}
