//! Unified device model populated by the manifest and per-device extractors.

use bitflags::bitflags;
#[cfg(feature = "serde")]
use serde::Serialize;

/// Which per-device dialect describes a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum DeviceFamily {
    /// Register/peripheral description documents (`.atdf`).
    RegisterFamily,
    /// Legacy EDC documents (`.PIC`).
    LegacyFamily,
    #[default]
    Unsupported,
}

/// One microcontroller, created from a manifest declaration and enriched by
/// exactly one per-device extractor.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Device {
    pub name: String,
    pub family: DeviceFamily,
    /// Name of the enclosing manifest family group, e.g. `megaAVR`.
    pub family_name: String,
    pub architecture: String,
    pub memory: MemoryMap,
    pub signatures: Vec<Signature>,
    pub fuses: Vec<ConfigRegister>,
    pub lockbits: Vec<ConfigRegister>,
    pub modules: Vec<Module>,
    pub interrupts: Vec<Interrupt>,
    pub peripherals: Vec<Peripheral>,
    pub pinouts: Vec<Pinout>,
    pub timers: Vec<Timer>,
    pub clock: Option<ClockInfo>,
    pub electrical: Option<ElectricalParameters>,
    pub variants: Vec<Variant>,
    pub documentation: Documentation,
    /// Programming/debug interfaces.
    pub interfaces: Vec<Interface>,
    /// Path of the per-device document inside the package.
    pub document: Option<String>,
    /// Source-data inconsistencies found while extracting; never corrected.
    pub diagnostics: Vec<Diagnostic>,
}

impl Device {
    pub fn new(name: impl Into<String>) -> Self {
        Device {
            name: name.into(),
            ..Device::default()
        }
    }

    pub fn peripheral(&self, module: &str) -> Option<&Peripheral> {
        self.peripherals
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(module))
    }

    pub fn pinout(&self, name: &str) -> Option<&Pinout> {
        self.pinouts
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn fuse(&self, name: &str) -> Option<&ConfigRegister> {
        self.fuses.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }
}

/// Inconsistency found in vendor data, reported instead of silently fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Diagnostic {
    pub section: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(section: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            section: section.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MemoryRegion {
    pub start: u64,
    pub size: u64,
}

/// Coarse role regions plus the display-ready segment list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MemoryMap {
    pub flash: Option<MemoryRegion>,
    pub ram: Option<MemoryRegion>,
    pub eeprom: Option<MemoryRegion>,
    pub fuses: Option<MemoryRegion>,
    pub segments: Vec<MemorySegment>,
}

bitflags! {
    /// Access rights declared on a memory segment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SegmentAccess: u8 {
        const READ = 0b001;
        const WRITE = 0b010;
        const EXEC = 0b100;
    }
}

impl Default for SegmentAccess {
    fn default() -> Self {
        SegmentAccess::empty()
    }
}

impl SegmentAccess {
    /// Parse an `rw="RW"` style flag string plus an optional exec marker.
    pub fn parse(rw: Option<&str>, exec: Option<&str>) -> Self {
        let mut access = SegmentAccess::empty();
        if let Some(rw) = rw {
            for ch in rw.chars() {
                match ch.to_ascii_uppercase() {
                    'R' => access |= SegmentAccess::READ,
                    'W' => access |= SegmentAccess::WRITE,
                    'X' => access |= SegmentAccess::EXEC,
                    _ => {}
                }
            }
        }
        if matches!(exec.map(str::trim), Some("1") | Some("true")) {
            access |= SegmentAccess::EXEC;
        }
        access
    }

    /// Render as `rwx` with dashes for missing rights.
    pub fn render(self) -> String {
        let mut out = String::with_capacity(3);
        out.push(if self.contains(SegmentAccess::READ) { 'r' } else { '-' });
        out.push(if self.contains(SegmentAccess::WRITE) { 'w' } else { '-' });
        out.push(if self.contains(SegmentAccess::EXEC) { 'x' } else { '-' });
        out
    }
}

#[cfg(feature = "serde")]
impl Serialize for SegmentAccess {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MemorySegment {
    pub name: String,
    pub start: u64,
    pub size: u64,
    pub page_size: Option<u64>,
    /// Type tag such as `flash`, `ram`, `eeprom`, `fuses`.
    pub kind: String,
    pub access: SegmentAccess,
    /// Id of the enclosing address space.
    pub parent: Option<String>,
    /// Aggregate row standing for a whole address space.
    pub is_address_space: bool,
}

impl MemorySegment {
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Signature {
    pub name: String,
    pub address: Option<u64>,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EnumValue {
    pub value: u64,
    pub name: String,
    pub caption: String,
}

/// Named enumeration shared by many bitfields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ValueGroup {
    pub name: String,
    pub caption: String,
    pub values: Vec<EnumValue>,
}

impl ValueGroup {
    pub fn lookup(&self, value: u64) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.value == value)
    }
}

/// Contiguous bit range inside a register.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Bitfield {
    pub name: String,
    pub caption: String,
    pub mask: u64,
    pub offset: u32,
    pub width: u32,
    /// Name of the value-group describing legal values.
    pub value_group: Option<String>,
    /// Resolved enumeration (fuses, lockbits and legacy configuration words).
    pub values: Vec<EnumValue>,
}

/// Fuse, lockbit or legacy configuration word.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ConfigRegister {
    pub name: String,
    pub caption: String,
    pub offset: u64,
    /// Size in bytes.
    pub size: u32,
    /// Implemented-bits mask.
    pub mask: Option<u64>,
    /// Derived (or explicitly declared) unprogrammed value.
    pub default: u64,
    pub bitfields: Vec<Bitfield>,
}

impl ConfigRegister {
    /// Value of `field` within the default register value.
    pub fn field_default(&self, field: &Bitfield) -> u64 {
        crate::bitops::extract(self.default, field.offset, field.width)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Module {
    pub name: String,
    pub caption: String,
    pub instances: Vec<ModuleInstance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ModuleInstance {
    pub name: String,
    pub caption: String,
    pub register_groups: Vec<InstanceRegisterGroup>,
    pub signals: Vec<Signal>,
}

/// Placement of a module register-group for one instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct InstanceRegisterGroup {
    pub name: String,
    pub name_in_module: String,
    pub offset: u64,
    pub address_space: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Signal {
    pub group: String,
    pub function: Option<String>,
    pub pad: String,
    pub index: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Interrupt {
    pub index: u32,
    pub name: String,
    pub caption: String,
    pub module_instance: Option<String>,
}

/// Register catalogue of one module.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Peripheral {
    pub name: String,
    pub caption: String,
    pub register_groups: Vec<RegisterGroup>,
    pub value_groups: Vec<ValueGroup>,
}

impl Peripheral {
    pub fn value_group(&self, name: &str) -> Option<&ValueGroup> {
        self.value_groups.iter().find(|g| g.name == name)
    }

    /// Resolve the value-group a bitfield refers to.
    pub fn resolve(&self, field: &Bitfield) -> Option<&ValueGroup> {
        field
            .value_group
            .as_deref()
            .and_then(|name| self.value_group(name))
    }

    pub fn register_group(&self, name: &str) -> Option<&RegisterGroup> {
        self.register_groups.iter().find(|g| g.name == name)
    }

    pub fn registers(&self) -> impl Iterator<Item = &Register> {
        self.register_groups.iter().flat_map(|g| g.registers.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RegisterGroup {
    pub name: String,
    pub caption: String,
    pub registers: Vec<Register>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Register {
    pub name: String,
    pub caption: String,
    pub offset: u64,
    pub size: u32,
    pub init_value: Option<u64>,
    pub access: Option<String>,
    pub mask: Option<u64>,
    pub bitfields: Vec<Bitfield>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Pinout {
    pub name: String,
    pub caption: String,
    pub pins: Vec<Pin>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Pin {
    /// 1-based package position.
    pub position: u32,
    pub pad: String,
    pub functions: Vec<PinFunction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PinFunction {
    pub module: String,
    pub function: String,
    pub index: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum TimerKind {
    Bits8,
    Bits16,
    /// 8-bit timer clocked asynchronously (external crystal).
    Async8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct WaveformMode {
    pub value: Option<u64>,
    pub name: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Prescaler {
    /// Clock-select field value, if known.
    pub value: Option<u64>,
    pub divisor: u32,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Timer {
    pub instance: String,
    pub module: String,
    pub kind: TimerKind,
    pub modes: Vec<WaveformMode>,
    pub prescalers: Vec<Prescaler>,
    /// `modes` came from the built-in table.
    pub modes_fallback: bool,
    /// `prescalers` came from the built-in table.
    pub prescalers_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ClockSource {
    pub value: u64,
    pub name: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ClockInfo {
    pub sources: Vec<ClockSource>,
    pub system_prescalers: Vec<u32>,
    pub adc_prescalers: Vec<u32>,
    pub timer_prescalers: Vec<u32>,
    pub system_fallback: bool,
    pub adc_fallback: bool,
    pub timer_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Property {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ElectricalParameters {
    pub vcc_min: Option<f64>,
    pub vcc_max: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub max_speed_hz: Option<u64>,
    pub properties: Vec<Property>,
}

/// Range text kept as entered, with the parsed bounds alongside.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ValueRange {
    pub raw: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Package-level pinout table entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PackagePinout {
    pub name: String,
    pub caption: String,
    pub pins: Option<u32>,
}

/// Orderable variant of a device.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Variant {
    pub order_code: String,
    pub package: String,
    pub pinout: Option<PackagePinout>,
    pub temperature: ValueRange,
    pub voltage: ValueRange,
    pub speed_max_hz: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DocLink {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Documentation {
    pub datasheet: Option<DocLink>,
    pub device_page: Option<DocLink>,
    pub application_notes: Vec<DocLink>,
    /// Books whose title matched no known category.
    pub other: Vec<DocLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Interface {
    pub name: String,
    pub kind: String,
}

/// Package metadata plus one skeleton per declared device.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Package {
    pub name: String,
    pub vendor: String,
    pub description: String,
    pub version: Option<String>,
    pub url: Option<String>,
    pub pinouts: Vec<PackagePinout>,
    pub devices: Vec<Device>,
}

impl Package {
    /// Case-insensitive device lookup.
    pub fn device(&self, name: &str) -> Option<&Device> {
        self.devices
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }

    pub fn pinout(&self, name: &str) -> Option<&PackagePinout> {
        self.pinouts
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}
