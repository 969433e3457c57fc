use std::path::Path;

use anyhow::{anyhow, Result};
use mcupack_core::PinFunction;

use crate::common;

fn function_label(function: &PinFunction) -> String {
    match function.index {
        Some(index) if !function.function.ends_with(|c: char| c.is_ascii_digit()) => {
            format!("{}:{}{index}", function.module, function.function)
        }
        _ => format!("{}:{}", function.module, function.function),
    }
}

pub fn run(doc: &Path, device: Option<&str>, pinout: Option<&str>, json: bool) -> Result<()> {
    let device = common::load_device(doc, None, device)?;
    let selected = match pinout {
        Some(name) => device
            .pinout(name)
            .ok_or_else(|| anyhow!("pinout {name} not found for {}", device.name))?,
        None => device
            .pinouts
            .first()
            .ok_or_else(|| anyhow!("{} declares no pinouts", device.name))?,
    };

    if json {
        common::print_json(selected)?;
        return Ok(());
    }

    println!(
        "{} {} ({} pins)",
        device.name,
        selected.name,
        selected.pins.len()
    );
    println!("{:>4} {:<10} {}", "PIN", "PAD", "FUNCTIONS");
    for pin in &selected.pins {
        let functions: Vec<String> = pin.functions.iter().map(function_label).collect();
        println!("{:>4} {:<10} {}", pin.position, pin.pad, functions.join(", "));
    }
    let others: Vec<&str> = device
        .pinouts
        .iter()
        .filter(|p| p.name != selected.name)
        .map(|p| p.name.as_str())
        .collect();
    if !others.is_empty() {
        println!();
        println!("Other pinouts: {}", others.join(", "));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_append_index_once() {
        let f = |module: &str, function: &str, index| PinFunction {
            module: module.into(),
            function: function.into(),
            index,
        };
        assert_eq!(function_label(&f("USART0", "TXD", None)), "USART0:TXD");
        assert_eq!(function_label(&f("PORTB", "P", Some(3))), "PORTB:P3");
        assert_eq!(function_label(&f("AN", "AN0", Some(0))), "AN:AN0");
    }
}
