//! Browser connector traits

use async_trait::async_trait;
use backsearch_core::*;

/// Issues navigation commands to the browser host
#[async_trait]
pub trait TabController: Send + Sync {
    /// Point a tab at a new url
    async fn navigate_tab(&self, request: &NavigateRequest) -> Result<()>;
}
