//! Microcontroller device-pack normalization.
//!
//! A package manifest yields one [`Device`] skeleton per declared part; the
//! part's per-device document (register-family `.atdf` or legacy-family
//! `.PIC`) then enriches that skeleton with memory, configuration, peripheral,
//! pin, timer and clock data.

pub mod atdf;
pub mod bitops;
pub mod classify;
pub mod edc;
pub mod manifest;
pub mod model;
pub mod reconcile;

#[cfg(test)]
mod fixtures;

use mcupack_xml::{Document, Element};
use thiserror::Error;
use tracing::{debug, warn};

pub use atdf::{extract_register_family, parse_register_family, RegisterFamilyData};
pub use edc::{extract_legacy_family, parse_legacy_family, LegacyFamilyData};
pub use manifest::{extract_manifest, parse_manifest, select_document};
pub use mcupack_xml::XmlError;
pub use model::*;

/// Error type produced by pack parsing.
#[derive(Debug, Error)]
pub enum PackError {
    /// The document is not well-formed XML.
    #[error(transparent)]
    Xml(#[from] XmlError),
    /// The manifest declares no device with the requested name.
    #[error("device not found in manifest: {0}")]
    DeviceNotFound(String),
}

/// Per-device document dialect, decided by the root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    RegisterFamily,
    LegacyFamily,
}

impl Dialect {
    pub fn detect(root: &Element) -> Option<Dialect> {
        match root.local_name() {
            atdf::ROOT_ELEMENT => Some(Dialect::RegisterFamily),
            edc::ROOT_ELEMENT => Some(Dialect::LegacyFamily),
            _ => None,
        }
    }

    pub fn family(self) -> DeviceFamily {
        match self {
            Dialect::RegisterFamily => DeviceFamily::RegisterFamily,
            Dialect::LegacyFamily => DeviceFamily::LegacyFamily,
        }
    }
}

/// Enrich `device` from a per-device document of either dialect.
///
/// Returns the detected dialect, or `None` when the root element is not
/// recognised; in that case the device is left untouched.
pub fn parse_device_document(xml: &str, device: &mut Device) -> Result<Option<Dialect>, PackError> {
    let doc = Document::parse(xml)?;
    let dialect = Dialect::detect(doc.root());
    match dialect {
        Some(Dialect::RegisterFamily) => extract_register_family(&doc, &device.name).apply(device),
        Some(Dialect::LegacyFamily) => extract_legacy_family(&doc).apply(device),
        None => {
            warn!(
                device = %device.name,
                root = doc.root().name(),
                "unrecognised per-device document, device left untouched"
            );
        }
    }
    debug!(device = %device.name, ?dialect, "per-device document processed");
    Ok(dialect)
}

/// Build one fully enriched device from a manifest and its per-device document.
pub fn load_device(
    manifest_xml: &str,
    device_name: &str,
    document_xml: &str,
) -> Result<Device, PackError> {
    let package = parse_manifest(manifest_xml)?;
    let mut device = package
        .device(device_name)
        .cloned()
        .ok_or_else(|| PackError::DeviceNotFound(device_name.to_string()))?;
    parse_device_document(document_xml, &mut device)?;
    Ok(device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{ATDF, EDC, MANIFEST};

    #[test]
    fn enrichment_preserves_manifest_identity() {
        let package = parse_manifest(MANIFEST).expect("manifest");
        let skeleton = package.device("ATmega328P").expect("declared").clone();
        let mut device = skeleton.clone();
        let dialect = parse_device_document(ATDF, &mut device).expect("atdf");
        assert_eq!(dialect, Some(Dialect::RegisterFamily));
        assert_eq!(device.family, skeleton.family);
        assert_eq!(device.architecture, skeleton.architecture);
        assert_eq!(device.family_name, "megaAVR");
        assert_eq!(device.variants, skeleton.variants);
        assert_eq!(device.documentation, skeleton.documentation);
        assert_eq!(device.document, skeleton.document);
        assert!(skeleton.fuses.is_empty());
        assert_eq!(device.fuses.len(), 3);
        assert!(!device.memory.segments.is_empty());
    }

    #[test]
    fn legacy_document_dispatch() {
        let device = load_device(MANIFEST, "pic16f877a", EDC).expect("load");
        assert_eq!(device.name, "PIC16F877A");
        assert_eq!(device.family, DeviceFamily::LegacyFamily);
        assert_eq!(device.architecture, "16xxxx");
        assert_eq!(device.fuses[0].name, "CONFIG");
    }

    #[test]
    fn register_document_pins_carry_signals() {
        let device = load_device(MANIFEST, "ATmega328P", ATDF).expect("load");
        let pinout = device.pinout("PDIP28").expect("pinout");
        let pd1 = pinout.pins.iter().find(|p| p.pad == "PD1").expect("PD1");
        assert_eq!(pd1.position, 3);
        assert_eq!(pd1.functions[0].function, "TXD");
        let pb0 = pinout.pins.iter().find(|p| p.pad == "PB0").expect("PB0");
        assert_eq!(pb0.functions.len(), 2);
    }

    #[test]
    fn unknown_root_leaves_device_untouched() {
        let mut device = Device::new("Mystery1");
        device.architecture = "Cortex-M0+".into();
        let before = device.clone();
        let dialect =
            parse_device_document("<svd><name>Mystery1</name></svd>", &mut device).expect("xml");
        assert_eq!(dialect, None);
        assert_eq!(device, before);
    }

    #[test]
    fn malformed_document_is_an_error() {
        let mut device = Device::new("ATmega328P");
        let err = parse_device_document("<avr-tools-device-file><devices>", &mut device)
            .expect_err("unclosed");
        assert!(matches!(err, PackError::Xml(_)));
        assert!(device.fuses.is_empty());
    }

    #[test]
    fn missing_device_is_reported() {
        let err = load_device(MANIFEST, "ATmega4809", ATDF).expect_err("not declared");
        assert!(matches!(err, PackError::DeviceNotFound(name) if name == "ATmega4809"));
    }

    #[test]
    fn dialect_detection_ignores_prefix() {
        let doc = Document::parse(r#"<edc:PIC xmlns:edc="urn:x"/>"#).expect("parse");
        assert_eq!(Dialect::detect(doc.root()), Some(Dialect::LegacyFamily));
        assert_eq!(
            Dialect::detect(doc.root()).map(Dialect::family),
            Some(DeviceFamily::LegacyFamily)
        );
    }
}
