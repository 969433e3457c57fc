pub mod cmd_devices;
pub mod cmd_fuses;
pub mod cmd_memory;
pub mod cmd_pins;
pub mod cmd_show;
pub mod common;
