//! Legacy-family (EDC `.PIC`) per-device document extraction.
//!
//! Configuration words in this dialect do not carry field positions. Fields
//! are laid out by a running bit cursor: each `DCRFieldDef` occupies the next
//! `width` bits and each `AdjustPoint` moves the cursor by a signed offset.

use mcupack_xml::{parse_number, Document, Element};
use tracing::{debug, trace, warn};

use crate::atdf::clock::{clock_info, clock_sources};
use crate::bitops::{
    bit_range_from_mask, combined_mask, default_register_value, field_overflows, mask_from_range,
};
use crate::classify::{memory_role, MemoryRole};
use crate::model::{
    Bitfield, ClockInfo, ConfigRegister, Device, DeviceFamily, Diagnostic, EnumValue, MemoryMap,
    MemoryRegion, Pin, PinFunction, Pinout, Signature,
};
use crate::reconcile::{reconcile, AddressSpace, SegmentDecl};
use crate::PackError;

/// Root element local name of legacy-family documents.
pub const ROOT_ELEMENT: &str = "PIC";

/// Everything extracted from one legacy-family document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegacyFamilyData {
    pub device_name: String,
    pub architecture: Option<String>,
    pub signatures: Option<Vec<Signature>>,
    pub memory: Option<MemoryMap>,
    pub config_words: Option<Vec<ConfigRegister>>,
    pub pinouts: Option<Vec<Pinout>>,
    pub clock: Option<ClockInfo>,
    pub diagnostics: Vec<Diagnostic>,
}

impl LegacyFamilyData {
    /// Merge into `device`. Identity fields set by the manifest are kept.
    pub fn apply(self, device: &mut Device) {
        if device.name.is_empty() {
            device.name = self.device_name;
        }
        if device.architecture.is_empty() {
            if let Some(arch) = self.architecture {
                device.architecture = arch;
            }
        }
        if device.family == DeviceFamily::Unsupported {
            device.family = DeviceFamily::LegacyFamily;
        }
        if let Some(memory) = self.memory {
            device.memory.segments = memory.segments;
            device.memory.flash = memory.flash.or(device.memory.flash);
            device.memory.ram = memory.ram.or(device.memory.ram);
            device.memory.eeprom = memory.eeprom.or(device.memory.eeprom);
            device.memory.fuses = memory.fuses.or(device.memory.fuses);
        }
        if let Some(signatures) = self.signatures {
            device.signatures = signatures;
        }
        if let Some(words) = self.config_words {
            device.fuses = words;
        }
        if let Some(pinouts) = self.pinouts {
            device.pinouts = pinouts;
        }
        if self.clock.is_some() {
            device.clock = self.clock;
        }
        device.diagnostics.extend(self.diagnostics);
    }
}

/// Parse a legacy-family document and enrich `device` in place.
pub fn parse_legacy_family(xml: &str, device: &mut Device) -> Result<(), PackError> {
    let doc = Document::parse(xml)?;
    extract_legacy_family(&doc).apply(device);
    Ok(())
}

pub fn extract_legacy_family(doc: &Document) -> LegacyFamilyData {
    let root = doc.root();
    let mut diagnostics = Vec::new();
    let program = root.child("ProgramSpace");
    let config_words = program.map(|p| config_words(p, &mut diagnostics));
    let sources = config_words
        .as_deref()
        .map(clock_sources)
        .unwrap_or_default();
    let clock = if sources.is_empty() {
        None
    } else {
        let config = config_words.as_deref().unwrap_or_default();
        Some(clock_info(config, &[], &[]))
    };

    let data = LegacyFamilyData {
        device_name: root.attr_string("name", ""),
        architecture: root.attr("arch").map(str::to_string),
        signatures: program.and_then(signatures),
        memory: memory_map(root, &mut diagnostics),
        pinouts: root
            .child("PinList")
            .map(|list| vec![pinout(root.attr_or("name", ""), list)]),
        config_words,
        clock,
        diagnostics,
    };
    debug!(
        device = %data.device_name,
        words = data.config_words.as_ref().map_or(0, Vec::len),
        diagnostics = data.diagnostics.len(),
        "extracted legacy-family document"
    );
    data
}

fn signatures(program: &Element) -> Option<Vec<Signature>> {
    let sector = program.child("DeviceIDSector")?;
    let raw = sector.attr_num("value")?;
    let value = sector.attr_num("mask").map_or(raw, |mask| raw & mask);
    Some(vec![Signature {
        name: "DEVID".to_string(),
        address: sector.attr_num("beginaddr"),
        value,
    }])
}

/// Type tag of a program- or data-space sector.
fn sector_kind(tag: &str) -> String {
    match tag {
        "CodeSector" => "flash".to_string(),
        "EEDataSector" => "eeprom".to_string(),
        "ConfigFuseSector" => "fuses".to_string(),
        "DeviceIDSector" | "UserIDSector" => "signatures".to_string(),
        "GPRDataSector" => "ram".to_string(),
        "SFRDataSector" | "NMMRPlace" => "io".to_string(),
        other => other
            .strip_suffix("Sector")
            .unwrap_or(other)
            .to_ascii_lowercase(),
    }
}

fn sector(el: &Element) -> SegmentDecl {
    let start = el.attr_num("beginaddr").unwrap_or(0);
    let end = el.attr_num("endaddr").unwrap_or(start);
    SegmentDecl {
        name: el.attr_string("regionid", el.local_name()),
        start,
        size: end.saturating_sub(start),
        page_size: None,
        kind: sector_kind(el.local_name()),
        access: Default::default(),
    }
}

fn space(id: &str, kind: &str, segments: Vec<SegmentDecl>) -> AddressSpace {
    let start = segments.iter().map(|s| s.start).min().unwrap_or(0);
    let end = segments
        .iter()
        .map(|s| s.start.saturating_add(s.size))
        .max()
        .unwrap_or(start);
    AddressSpace {
        id: id.to_string(),
        name: id.to_string(),
        start,
        size: end.saturating_sub(start),
        kind: kind.to_string(),
        segments,
    }
}

/// Data-space sectors valid in every mode; extended-mode-only layouts are skipped.
fn data_sectors(data: &Element) -> Vec<SegmentDecl> {
    let mut out = Vec::new();
    for child in data.elements() {
        match child.local_name() {
            "ExtendedModeOnly" => continue,
            "RegardlessOfMode" | "NonExtendedModeOnly" => {
                out.extend(child.elements().map(sector));
            }
            _ => out.push(sector(child)),
        }
    }
    out
}

fn memory_map(root: &Element, diagnostics: &mut Vec<Diagnostic>) -> Option<MemoryMap> {
    let mut spaces = Vec::new();
    if let Some(program) = root.child("ProgramSpace") {
        spaces.push(space("program", "flash", program.elements().map(sector).collect()));
    }
    if let Some(data) = root.child("DataSpace") {
        spaces.push(space("data", "ram", data_sectors(data)));
    }
    if spaces.is_empty() {
        return None;
    }
    let reconciled = reconcile(&spaces);
    diagnostics.extend(
        reconciled
            .violations
            .iter()
            .map(|v| Diagnostic::new("memory", v.to_string())),
    );

    // Legacy parts split roles over many sectors (banks): lowest start, summed size.
    let mut map = MemoryMap::default();
    for segment in reconciled.segments.iter().filter(|s| !s.is_address_space) {
        let slot = match memory_role(&segment.kind) {
            Some(MemoryRole::Flash) => &mut map.flash,
            Some(MemoryRole::Ram) => &mut map.ram,
            Some(MemoryRole::Eeprom) => &mut map.eeprom,
            Some(MemoryRole::Fuses) => &mut map.fuses,
            None => continue,
        };
        *slot = Some(match *slot {
            Some(region) => MemoryRegion {
                start: region.start.min(segment.start),
                size: region.size.saturating_add(segment.size),
            },
            None => MemoryRegion {
                start: segment.start,
                size: segment.size,
            },
        });
    }
    map.segments = reconciled.segments;
    Some(map)
}

/// One layout record of a configuration word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Field { width: u32 },
    Adjust(i64),
}

/// Run the bit cursor over `steps`, returning the offset of every field.
///
/// The cursor starts at 0, never goes below 0 and saturates at the top.
/// A field whose offset does not fit in `u32` gets `None`.
pub(crate) fn place_fields(steps: &[Step]) -> Vec<Option<u32>> {
    let mut cursor: i64 = 0;
    let mut offsets = Vec::new();
    for step in steps {
        match *step {
            Step::Adjust(delta) => cursor = cursor.saturating_add(delta).max(0),
            Step::Field { width } => {
                offsets.push(u32::try_from(cursor).ok());
                cursor = cursor.saturating_add(i64::from(width));
            }
        }
    }
    offsets
}

fn field_width(el: &Element) -> u32 {
    el.attr_num("nzwidth")
        .filter(|&width| width > 0)
        .and_then(|width| u32::try_from(width).ok())
        .unwrap_or_else(|| bit_range_from_mask(el.attr_num("mask").unwrap_or(0)).1)
}

/// Value of a `(field & mask) == literal` / `field == literal` condition.
pub(crate) fn when_value(condition: &str) -> Option<u64> {
    let (lhs, rhs) = condition.split_once("==")?;
    if !lhs.contains("field") {
        return None;
    }
    let literal = rhs.trim().trim_end_matches(')').trim();
    parse_number(literal)
}

fn field_values(field: &Element) -> Vec<EnumValue> {
    field
        .children_named("DCRFieldSemantic")
        .filter_map(|semantic| {
            let when = semantic.attr_or("when", "");
            let Some(value) = when_value(when) else {
                trace!(%when, "unparseable field condition skipped");
                return None;
            };
            Some(EnumValue {
                value,
                name: semantic.attr_string("cname", ""),
                caption: semantic.attr_string("desc", ""),
            })
        })
        .collect()
}

/// Layout records: children of the first `DCRMode`, else of the `DCRDef`.
fn layout_records(def: &Element) -> Vec<&Element> {
    let holder = def.child("DCRMode").unwrap_or(def);
    holder
        .elements()
        .filter(|el| el.is("DCRFieldDef") || el.is("AdjustPoint"))
        .collect()
}

fn config_word(
    def: &Element,
    sector_len: u64,
    diagnostics: &mut Vec<Diagnostic>,
) -> ConfigRegister {
    let name = def.attr_string("cname", "");
    let records = layout_records(def);
    let steps: Vec<Step> = records
        .iter()
        .map(|el| {
            if el.is("AdjustPoint") {
                Step::Adjust(el.attr_signed("offset").unwrap_or(0))
            } else {
                Step::Field {
                    width: field_width(el),
                }
            }
        })
        .collect();
    let offsets = place_fields(&steps);
    let fields = records.iter().filter(|el| el.is("DCRFieldDef"));
    let bitfields: Vec<Bitfield> = fields
        .zip(offsets)
        .filter_map(|(el, offset)| {
            let field = el.attr_or("cname", "");
            let Some(offset) = offset else {
                warn!(word = %name, %field, "field position out of range, dropped");
                diagnostics.push(Diagnostic::new(
                    "config",
                    format!("{name}.{field} starts beyond addressable bits, dropped"),
                ));
                return None;
            };
            let width = field_width(el);
            Some(Bitfield {
                name: el.attr_string("cname", ""),
                caption: el.attr_string("desc", ""),
                mask: mask_from_range(offset, width),
                offset,
                width,
                value_group: None,
                values: field_values(el),
            })
        })
        .collect();

    let size = def
        .attr_num("nzwidth")
        .filter(|&bits| bits > 0)
        .map(|bits| bits.div_ceil(8))
        .or(Some(sector_len).filter(|&len| len > 0))
        .and_then(|bytes| u32::try_from(bytes).ok())
        .unwrap_or(1);
    for field in &bitfields {
        if field_overflows(field.offset, field.width, size) {
            let end = u64::from(field.offset) + u64::from(field.width);
            warn!(word = %name, field = %field.name, "field exceeds configuration word");
            diagnostics.push(Diagnostic::new(
                "config",
                format!(
                    "{name}.{} spans bits {}..{end} of a {size}-byte word",
                    field.name, field.offset
                ),
            ));
        }
    }
    let combined = combined_mask(bitfields.iter().map(|f| f.mask));
    ConfigRegister {
        caption: def.attr_string("desc", ""),
        offset: def
            .attr_num("_addr")
            .or_else(|| def.attr_num("addr"))
            .unwrap_or(0),
        size,
        mask: def.attr_num("impl"),
        default: default_register_value(def.attr_num("default"), combined, size),
        bitfields,
        name,
    }
}

fn config_words(program: &Element, diagnostics: &mut Vec<Diagnostic>) -> Vec<ConfigRegister> {
    let Some(sector) = program.child("ConfigFuseSector") else {
        return Vec::new();
    };
    let begin = sector.attr_num("beginaddr").unwrap_or(0);
    let len = sector.attr_num("endaddr").unwrap_or(begin).saturating_sub(begin);
    sector
        .descendants("DCRDef")
        .map(|def| config_word(def, len, diagnostics))
        .collect()
}

/// `AN12` -> (`AN`, Some(12)); names without trailing digits keep no index.
fn split_index(name: &str) -> (&str, Option<u32>) {
    let stem = name.trim_end_matches(|c: char| c.is_ascii_digit());
    if stem.len() == name.len() || stem.is_empty() {
        return (name, None);
    }
    (stem, name[stem.len()..].parse().ok())
}

fn pinout(device: &str, list: &Element) -> Pinout {
    Pinout {
        name: device.to_string(),
        caption: String::new(),
        pins: list
            .children_named("Pin")
            .enumerate()
            .map(|(idx, pin)| {
                let names: Vec<&str> = pin
                    .children_named("VirtualPin")
                    .filter_map(|v| v.attr("name"))
                    .collect();
                Pin {
                    position: u32::try_from(idx + 1).unwrap_or(u32::MAX),
                    pad: names.first().map(|n| n.to_string()).unwrap_or_default(),
                    functions: names
                        .iter()
                        .map(|n| {
                            let (stem, index) = split_index(n);
                            PinFunction {
                                module: stem.to_string(),
                                function: n.to_string(),
                                index,
                            }
                        })
                        .collect(),
                }
            })
            .collect(),
    }
}
