use std::env;
use std::fs;

use mcupack_core::{parse_manifest, DeviceFamily};
use tracing::info;

const SAMPLE: &str = r#"<package>
  <vendor>Microchip</vendor>
  <name>Sample_DFP</name>
  <devices>
    <family Dfamily="megaAVR">
      <device Dname="ATmega328P">
        <processor Dcore="AVR8"/>
        <memory id="IROM1" start="0x0000" size="0x8000"/>
        <memory id="IRAM1" start="0x0100" size="0x0800"/>
        <environment name="atmel"><at:extension xmlns:at="urn:at"><at:atdf name="atdf/ATmega328P.atdf"/></at:extension></environment>
      </device>
    </family>
    <family Dfamily="PIC16">
      <device Dname="PIC16F877A">
        <processor Dcore="16xxxx"/>
      </device>
    </family>
  </devices>
</package>"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let xml = match env::args().nth(1) {
        Some(path) => fs::read_to_string(&path)?,
        None => SAMPLE.to_string(),
    };
    let package = parse_manifest(&xml)?;
    info!(package = %package.name, devices = package.devices.len(), "manifest parsed");

    println!("{:<16} {:<10} {:<8} {:>8} {}", "NAME", "FAMILY", "ARCH", "FLASH", "DOCUMENT");
    for dev in &package.devices {
        let family = match dev.family {
            DeviceFamily::RegisterFamily => "register",
            DeviceFamily::LegacyFamily => "legacy",
            DeviceFamily::Unsupported => "-",
        };
        println!(
            "{:<16} {:<10} {:<8} {:>8} {}",
            dev.name,
            family,
            dev.architecture,
            dev.memory
                .flash
                .map(|r| r.size.to_string())
                .unwrap_or_else(|| "-".into()),
            dev.document.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}
