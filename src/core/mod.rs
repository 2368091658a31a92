pub mod client;
pub mod endpoint;
pub mod identifiers;
pub mod mapper;
pub mod responses;

pub use crate::domain::model::{EntityRegistry, Gene, Metabolite, Model, Reaction};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
