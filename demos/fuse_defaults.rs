use std::env;
use std::fs;

use mcupack_core::{parse_device_document, Device};

const SAMPLE: &str = r#"<avr-tools-device-file>
  <devices><device name="ATtiny85" architecture="AVR8"/></devices>
  <modules>
    <module name="FUSE">
      <register-group name="FUSE">
        <register name="LOW" offset="0x00" size="1" initval="0x62">
          <bitfield name="CKDIV8" mask="0x80"/>
          <bitfield name="CKOUT" mask="0x40"/>
          <bitfield name="SUT_CKSEL" mask="0x3F" values="ENUM_SUT_CKSEL"/>
        </register>
        <register name="EXTENDED" offset="0x02" size="1">
          <bitfield name="SELFPRGEN" mask="0x01"/>
        </register>
      </register-group>
      <value-group name="ENUM_SUT_CKSEL">
        <value name="INTRCOSC_8MHZ_6CK_14CK_64MS" caption="Int. RC Osc. 8 MHz" value="0x22"/>
      </value-group>
    </module>
  </modules>
</avr-tools-device-file>"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let mut args = env::args().skip(1);
    let (xml, name) = match args.next() {
        Some(path) => (fs::read_to_string(&path)?, args.next().unwrap_or_default()),
        None => (SAMPLE.to_string(), "ATtiny85".to_string()),
    };
    let mut device = Device::new(name);
    if parse_device_document(&xml, &mut device)?.is_none() {
        return Err("not a per-device document".into());
    }

    for reg in device.fuses.iter().chain(device.lockbits.iter()) {
        println!("{:<10} default 0x{:02X}", reg.name, reg.default);
        for field in &reg.bitfields {
            let value = reg.field_default(field);
            let label = field
                .values
                .iter()
                .find(|v| v.value == value)
                .map(|v| v.caption.as_str())
                .unwrap_or("");
            println!("  {:<10} = 0x{value:X} {label}", field.name);
        }
    }
    Ok(())
}
