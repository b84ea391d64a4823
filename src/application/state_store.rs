// Key-value store trait for persisted dashboard state
use async_trait::async_trait;

/// Input form submitted on the input page
pub const INPUTS_KEY: &str = "desalterInputs";
/// User-reordered optimization priorities
pub const PRIORITY_ORDER_KEY: &str = "priorityOrder";

/// String-valued key-value storage, the server-side stand-in for the
/// browser's local storage.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    async fn set(&self, key: &str, value: String) -> anyhow::Result<()>;

    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}
