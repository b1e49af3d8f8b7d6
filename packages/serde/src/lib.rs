//! Serde integration for zettings.
//!
//! - [`TomlCodec`]: the default on-disk format for settings files
//! - [`to_value`] / [`from_value`]: typed access to settings through serde
//! - [`parse_literal`]: turn command-line text into a `Value`

mod codec;
mod convert;

pub use codec::TomlCodec;
pub use convert::{
    from_value, json_to_value, parse_literal, to_value, toml_to_value, value_to_json,
    value_to_toml,
};
