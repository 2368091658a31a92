use crate::utils::error::Result;
use std::path::PathBuf;
use std::time::Duration;

/// Destination for downloaded model files.
pub trait Storage: Send + Sync {
    /// Writes `data` under `path` and returns the location it ended up at.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<PathBuf>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_url(&self) -> &str;
    fn static_url(&self) -> &str;
    fn timeout(&self) -> Duration;
    fn user_agent(&self) -> &str;
    fn output_path(&self) -> &str;
}
