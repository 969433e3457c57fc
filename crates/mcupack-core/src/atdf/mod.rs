//! Register-family (`.atdf`) per-device document extraction.
//!
//! Every section is extracted independently into an immutable
//! [`RegisterFamilyData`] record, which is merged into the device skeleton in
//! one step by [`RegisterFamilyData::apply`]. A section missing from the
//! document stays `None` and leaves the device untouched.

pub(crate) mod clock;
mod config;
mod device;
mod memory;
mod peripherals;
mod pinout;
mod timers;

use mcupack_xml::{Document, Element};
use tracing::{debug, warn};

use crate::classify;
use crate::model::{
    ClockInfo, ConfigRegister, Device, DeviceFamily, Diagnostic, ElectricalParameters, Interface,
    Interrupt, MemoryMap, Module, Peripheral, Pinout, Signature, Timer,
};
use crate::PackError;

pub use memory::address_spaces;

/// Root element name of register-family documents.
pub const ROOT_ELEMENT: &str = "avr-tools-device-file";

/// Everything extracted from one register-family document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegisterFamilyData {
    pub device_name: String,
    pub architecture: Option<String>,
    pub signatures: Option<Vec<Signature>>,
    pub memory: Option<MemoryMap>,
    pub fuses: Option<Vec<ConfigRegister>>,
    pub lockbits: Option<Vec<ConfigRegister>>,
    pub modules: Option<Vec<Module>>,
    pub interrupts: Option<Vec<Interrupt>>,
    pub interfaces: Option<Vec<Interface>>,
    pub peripherals: Option<Vec<Peripheral>>,
    pub pinouts: Option<Vec<Pinout>>,
    pub timers: Option<Vec<Timer>>,
    pub clock: Option<ClockInfo>,
    pub electrical: Option<ElectricalParameters>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RegisterFamilyData {
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
            device.family = DeviceFamily::RegisterFamily;
        }
        if let Some(memory) = self.memory {
            device.memory.segments = memory.segments;
            device.memory.flash = memory.flash.or(device.memory.flash);
            device.memory.ram = memory.ram.or(device.memory.ram);
            device.memory.eeprom = memory.eeprom.or(device.memory.eeprom);
            device.memory.fuses = memory.fuses.or(device.memory.fuses);
        }
        replace(&mut device.signatures, self.signatures);
        replace(&mut device.fuses, self.fuses);
        replace(&mut device.lockbits, self.lockbits);
        replace(&mut device.modules, self.modules);
        replace(&mut device.interrupts, self.interrupts);
        replace(&mut device.interfaces, self.interfaces);
        replace(&mut device.peripherals, self.peripherals);
        replace(&mut device.pinouts, self.pinouts);
        replace(&mut device.timers, self.timers);
        if self.clock.is_some() {
            device.clock = self.clock;
        }
        if self.electrical.is_some() {
            device.electrical = self.electrical;
        }
        device.diagnostics.extend(self.diagnostics);
    }
}

fn replace<T>(target: &mut Vec<T>, source: Option<Vec<T>>) {
    if let Some(items) = source {
        *target = items;
    }
}

/// Parse a register-family document and enrich `device` in place.
pub fn parse_register_family(xml: &str, device: &mut Device) -> Result<(), PackError> {
    let doc = Document::parse(xml)?;
    extract_register_family(&doc, &device.name).apply(device);
    Ok(())
}

/// Select the `<device>` element for `name` (case-insensitive), else the first.
fn select_device<'a>(root: &'a Element, name: &str) -> Option<&'a Element> {
    let devices = root.child("devices")?;
    devices
        .children_named("device")
        .find(|d| d.attr("name").is_some_and(|n| n.eq_ignore_ascii_case(name)))
        .or_else(|| {
            let first = devices.child("device");
            if let Some(first) = first {
                if !name.is_empty() {
                    warn!(
                        wanted = %name,
                        found = first.attr_or("name", ""),
                        "device not declared in document, using first entry"
                    );
                }
            }
            first
        })
}

/// Extract every section of a register-family document.
pub fn extract_register_family(doc: &Document, device_name: &str) -> RegisterFamilyData {
    let root = doc.root();
    let mut diagnostics = Vec::new();
    let Some(device_el) = select_device(root, device_name) else {
        warn!(device = %device_name, "document declares no device");
        return RegisterFamilyData {
            device_name: device_name.to_string(),
            ..RegisterFamilyData::default()
        };
    };

    let modules_el = root.child("modules");
    let peripherals = modules_el.map(|m| peripherals::peripherals(m, &mut diagnostics));
    let fuses = modules_el
        .and_then(|m| {
            m.children_named("module")
                .find(|module| classify::is_fuse_module(module.attr_or("name", "")))
        })
        .map(|module| config::config_registers(module, "fuses", &mut diagnostics));
    let lockbits = modules_el
        .and_then(|m| {
            m.children_named("module")
                .find(|module| classify::is_lockbit_module(module.attr_or("name", "")))
        })
        .map(|module| config::config_registers(module, "lockbits", &mut diagnostics));

    let modules = device::modules(device_el);
    let pinouts = root
        .child("pinouts")
        .map(|p| pinout::pinouts(p, modules.as_deref().unwrap_or_default()));
    let timers = modules
        .as_deref()
        .map(|m| timers::timers(m, peripherals.as_deref().unwrap_or_default()));
    let clock = Some(clock::clock_info(
        fuses.as_deref().unwrap_or_default(),
        peripherals.as_deref().unwrap_or_default(),
        timers.as_deref().unwrap_or_default(),
    ));

    let data = RegisterFamilyData {
        device_name: device_el.attr_string("name", device_name),
        architecture: device_el.attr("architecture").map(str::to_string),
        signatures: device::signatures(device_el),
        memory: memory::memory_map(device_el, &mut diagnostics),
        fuses,
        lockbits,
        modules,
        interrupts: device::interrupts(device_el),
        interfaces: device::interfaces(device_el),
        peripherals,
        pinouts,
        timers,
        clock,
        electrical: device::electrical(root, device_el),
        diagnostics,
    };
    debug!(
        device = %data.device_name,
        fuses = data.fuses.as_ref().map_or(0, Vec::len),
        peripherals = data.peripherals.as_ref().map_or(0, Vec::len),
        diagnostics = data.diagnostics.len(),
        "extracted register-family document"
    );
    data
}
