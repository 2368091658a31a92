pub mod error;
pub mod logger;
pub mod tabular;
pub mod validation;
