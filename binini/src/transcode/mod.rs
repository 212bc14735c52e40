//! Output encoders for parsed INI sections.

pub mod cbor;
pub mod toml;
pub mod yaml;
