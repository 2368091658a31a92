//! Client for the BiGG Models database.
//!
//! [`BiggClient`] wraps the BiGG v2 web API and maps its payloads into the
//! COBRA-style objects in [`domain::model`].

pub mod adapters;
#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command, OutputFormat};

pub use adapters::LocalStorage;
pub use config::TomlConfig;
pub use crate::core::client::BiggClient;
pub use crate::core::identifiers::{split_compartment, MetaboliteRef};
pub use domain::model::{
    EntityRegistry, Gene, Metabolite, Model, ModelFormat, ModelListing, ModelSummary, ModelTable,
    Reaction, Version,
};
pub use utils::error::{BiggError, Result};
