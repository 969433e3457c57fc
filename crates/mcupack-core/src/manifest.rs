//! Package manifest (`.pdsc`) extraction: package metadata and device skeletons.

use mcupack_xml::{Document, Element};
use tracing::{debug, warn};

use crate::classify::{self, BookKind};
use crate::model::{
    Device, DeviceFamily, DocLink, Documentation, Interface, MemoryMap, MemoryRegion,
    PackagePinout, Package, ValueRange, Variant,
};
use crate::PackError;

/// Per-device document extensions recognised in archive entry names.
const DOCUMENT_EXTENSIONS: &[&str] = &["atdf", "pic", "edc"];

/// Parse a manifest document into package metadata and one skeleton per device.
pub fn parse_manifest(xml: &str) -> Result<Package, PackError> {
    let doc = Document::parse(xml)?;
    Ok(extract_manifest(&doc))
}

/// Extract from an already parsed manifest document.
pub fn extract_manifest(doc: &Document) -> Package {
    let root = doc.root();
    let pinouts: Vec<PackagePinout> = root
        .child("pinouts")
        .map(|table| table.children_named("pinout").map(package_pinout).collect())
        .unwrap_or_default();

    let mut package = Package {
        name: root.child_text("name").unwrap_or_default().to_string(),
        vendor: root.child_text("vendor").unwrap_or_default().to_string(),
        description: root.child_text("description").unwrap_or_default().to_string(),
        version: root
            .child("releases")
            .and_then(|r| r.child("release"))
            .and_then(|r| r.attr("version"))
            .map(str::to_string),
        url: root.child_text("url").map(str::to_string),
        pinouts,
        devices: Vec::new(),
    };

    if let Some(devices) = root.child("devices") {
        for family in devices.children_named("family") {
            let family_name = family
                .attr("Dfamily")
                .or_else(|| family.attr("name"))
                .unwrap_or_default();
            collect_group(family, family_name, &[], &package.pinouts, &mut package.devices);
        }
    }

    debug!(
        package = %package.name,
        devices = package.devices.len(),
        pinouts = package.pinouts.len(),
        "parsed manifest"
    );
    package
}

/// Walk a family or sub-family group, inheriting its books and processor.
fn collect_group<'a>(
    group: &'a Element,
    family_name: &str,
    inherited_books: &[&'a Element],
    pinouts: &[PackagePinout],
    out: &mut Vec<Device>,
) {
    let mut books: Vec<&Element> = group.children_named("book").collect();
    books.extend_from_slice(inherited_books);
    for element in group.elements() {
        if element.is("device") {
            out.push(device_skeleton(element, group, family_name, &books, pinouts));
        } else if element.is("subFamily") {
            collect_group(element, family_name, &books, pinouts, out);
        }
    }
}

fn device_skeleton(
    element: &Element,
    group: &Element,
    family_name: &str,
    group_books: &[&Element],
    pinouts: &[PackagePinout],
) -> Device {
    let name = element
        .attr("Dname")
        .or_else(|| element.attr("name"))
        .unwrap_or_default()
        .to_string();
    let architecture = element
        .child("processor")
        .and_then(|p| p.attr("Dcore"))
        .or_else(|| element.attr("Dcore"))
        .or_else(|| group.child("processor").and_then(|p| p.attr("Dcore")))
        .or_else(|| group.attr("Dcore"))
        .unwrap_or_default()
        .to_string();

    let extension = element
        .children_named("environment")
        .find_map(|env| env.child("extension"));
    let document = extension.and_then(|ext| {
        ext.child("atdf")
            .or_else(|| ext.child("edc"))
            .or_else(|| ext.child("pic"))
            .and_then(|d| d.attr("name"))
            .map(str::to_string)
    });

    let family = document
        .as_deref()
        .and_then(classify::classify_document)
        .unwrap_or_else(|| classify::classify_architecture(&architecture));

    let mut books: Vec<&Element> = element.children_named("book").collect();
    books.extend_from_slice(group_books);

    let (variants, interfaces) = match extension {
        Some(ext) => (
            ext.children_named("variant")
                .map(|v| variant(v, pinouts))
                .collect(),
            ext.children_named("interface").map(interface).collect(),
        ),
        None => (Vec::new(), Vec::new()),
    };

    if family == DeviceFamily::Unsupported {
        warn!(device = %name, arch = %architecture, "unsupported device family");
    }

    Device {
        name,
        family,
        family_name: family_name.to_string(),
        architecture,
        memory: memory_skeleton(element),
        variants,
        documentation: documentation(&books),
        interfaces,
        document,
        ..Device::default()
    }
}

/// Memory element as written in the manifest.
struct MemoryDecl<'a> {
    name: &'a str,
    kind: &'a str,
    region: MemoryRegion,
}

struct RoleMatcher {
    kind: &'static str,
    name: &'static str,
    fallback_names: &'static [&'static str],
}

const FLASH: RoleMatcher = RoleMatcher {
    kind: "flash",
    name: "PROGMEM",
    fallback_names: &["FLASH", "IROM1", "IROM"],
};

const RAM: RoleMatcher = RoleMatcher {
    kind: "ram",
    name: "IRAM",
    fallback_names: &["IRAM1", "IRAM", "RAM", "SRAM"],
};

const EEPROM: RoleMatcher = RoleMatcher {
    kind: "eeprom",
    name: "EEPROM",
    fallback_names: &["EEPROM", "EEPROM1"],
};

impl RoleMatcher {
    /// (type, name) match, then type only, then the fallback names.
    fn find(&self, decls: &[MemoryDecl<'_>]) -> Option<MemoryRegion> {
        let kind_matches = |d: &&MemoryDecl<'_>| d.kind.eq_ignore_ascii_case(self.kind);
        decls
            .iter()
            .find(|d| kind_matches(d) && d.name.eq_ignore_ascii_case(self.name))
            .or_else(|| decls.iter().find(kind_matches))
            .or_else(|| {
                self.fallback_names.iter().find_map(|wanted| {
                    decls.iter().find(|d| d.name.eq_ignore_ascii_case(wanted))
                })
            })
            .map(|d| d.region)
    }
}

fn memory_skeleton(device: &Element) -> MemoryMap {
    let decls: Vec<MemoryDecl<'_>> = device
        .children_named("memory")
        .map(|m| MemoryDecl {
            name: m.attr("name").or_else(|| m.attr("id")).unwrap_or_default(),
            kind: m.attr("type").unwrap_or_default(),
            region: MemoryRegion {
                start: m.attr_num("start").unwrap_or(0),
                size: m.attr_num("size").unwrap_or(0),
            },
        })
        .collect();
    MemoryMap {
        flash: FLASH.find(&decls),
        ram: RAM.find(&decls),
        eeprom: EEPROM.find(&decls),
        ..MemoryMap::default()
    }
}

fn package_pinout(element: &Element) -> PackagePinout {
    PackagePinout {
        name: element.attr_string("name", ""),
        caption: element.attr_string("caption", ""),
        pins: element
            .attr_num("pins")
            .and_then(|p| u32::try_from(p).ok()),
    }
}

fn variant(element: &Element, pinouts: &[PackagePinout]) -> Variant {
    let pinout = element.attr("pinout").and_then(|name| {
        let found = pinouts
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .cloned();
        if found.is_none() {
            debug!(pinout = %name, "variant pinout not in package table");
        }
        found
    });
    Variant {
        order_code: element
            .attr("ordercode")
            .or_else(|| element.attr("Pname"))
            .unwrap_or_default()
            .to_string(),
        package: element.attr_string("package", ""),
        pinout,
        temperature: parse_range(element.attr("temprange").unwrap_or_default()),
        voltage: parse_range(element.attr("vccrange").unwrap_or_default()),
        speed_max_hz: element.attr_num("speedmax"),
    }
}

fn interface(element: &Element) -> Interface {
    Interface {
        name: element.attr_string("name", ""),
        kind: element.attr_string("type", ""),
    }
}

/// Parse `-40 - 85`, `1.8-5.5`, `[0, 70]` style ranges, keeping the raw text.
///
/// A `-` is a sign only at the start or after a non-numeric character.
pub fn parse_range(raw: &str) -> ValueRange {
    let mut numbers = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;
    for ch in raw.chars() {
        let starts_negative = ch == '-'
            && current.is_empty()
            && !prev.is_some_and(|p| p.is_ascii_digit() || p == '.');
        if ch.is_ascii_digit() || (ch == '.' && !current.is_empty()) || starts_negative {
            current.push(ch);
        } else if !current.is_empty() {
            numbers.push(std::mem::take(&mut current));
        }
        prev = Some(ch);
    }
    if !current.is_empty() {
        numbers.push(current);
    }
    let mut values = numbers.iter().filter_map(|n| n.parse::<f64>().ok());
    let min = values.next();
    let max = values.next().or(min);
    ValueRange {
        raw: raw.to_string(),
        min,
        max,
    }
}

fn documentation(books: &[&Element]) -> Documentation {
    let mut docs = Documentation::default();
    for book in books {
        let title = book.attr("title").unwrap_or_default();
        let link = DocLink {
            title: title.to_string(),
            url: book.attr_string("name", ""),
        };
        match classify::classify_book(title) {
            BookKind::Datasheet if docs.datasheet.is_none() => docs.datasheet = Some(link),
            BookKind::DevicePage if docs.device_page.is_none() => docs.device_page = Some(link),
            BookKind::ApplicationNote => docs.application_notes.push(link),
            BookKind::Datasheet | BookKind::DevicePage | BookKind::Other => docs.other.push(link),
        }
    }
    docs
}

/// Pick the per-device sub-document for `device` among archive entry names.
///
/// The manifest-declared path wins; otherwise the first entry whose file stem
/// equals the device name (case-insensitively) with a known extension.
pub fn select_document<'a, I>(entries: I, device: &Device) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let entries: Vec<&str> = entries.into_iter().collect();
    if let Some(declared) = device.document.as_deref() {
        let declared = declared.replace('\\', "/");
        if let Some(found) = entries
            .iter()
            .find(|e| e.replace('\\', "/").eq_ignore_ascii_case(&declared))
        {
            return Some(*found);
        }
    }
    entries.into_iter().find(|entry| {
        let file = entry.rsplit(['/', '\\']).next().unwrap_or(*entry);
        match file.rsplit_once('.') {
            Some((stem, ext)) => {
                stem.eq_ignore_ascii_case(&device.name)
                    && DOCUMENT_EXTENSIONS
                        .iter()
                        .any(|known| ext.eq_ignore_ascii_case(known))
            }
            None => false,
        }
    })
}
