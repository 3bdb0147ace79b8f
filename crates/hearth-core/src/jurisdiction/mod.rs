pub mod config;
pub mod presets;

pub use config::{HelpText, JurisdictionConfig, ModelingOptions, Region, Terminology};
