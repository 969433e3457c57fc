//! Aggregator re-exporting the device-pack crates for the demos.

pub use mcupack_core;
pub use mcupack_xml;
