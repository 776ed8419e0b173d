//! Object-storage collaborator. Upload handling and virus scanning live
//! upstream; this core only fetches bytes by opaque reference.

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Fetch the binary behind `file_ref`. Callers apply the configured
    /// storage timeout; a timeout is a retryable dependency failure.
    async fn fetch_file(&self, file_ref: &str) -> Result<Vec<u8>>;
}
