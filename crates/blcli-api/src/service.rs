//! The remote operations the CLI is allowed to perform.

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::{
    Account, AccountHistory, AccountUsage, CreateOptions, CreateServerOptions,
    CreateTransactionOptions, NewSshKey, Port, RebuildOptions, Server, SshKey, Transaction,
};

/// Facade over the provisioning API.
///
/// Each method performs exactly one request. Implementations never retry.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Fetch the account profile.
    async fn show_account(&self) -> ApiResult<Account>;

    /// Fetch usage for a billing period (`YYYY-MM` or `latest`).
    async fn account_usage(&self, period: &str) -> ApiResult<AccountUsage>;

    /// Fetch one page of account history.
    async fn account_history(&self, page: i64, items: i64) -> ApiResult<AccountHistory>;

    /// List all servers.
    async fn list_servers(&self) -> ApiResult<Vec<Server>>;

    /// Fetch a single server.
    async fn show_server(&self, id: &str) -> ApiResult<Server>;

    /// Create a server.
    async fn create_server(&self, options: &CreateServerOptions) -> ApiResult<Server>;

    /// Permanently delete a server.
    async fn destroy_server(&self, id: &str) -> ApiResult<()>;

    /// Reinstall a server from an image.
    async fn rebuild_server(&self, id: &str, options: &RebuildOptions) -> ApiResult<()>;

    /// Move a server to another plan.
    async fn resize_server(&self, id: &str, size_id: &str) -> ApiResult<()>;

    /// Restart a server.
    async fn restart_server(&self, id: &str) -> ApiResult<()>;

    /// Toggle DDoS protection.
    async fn set_protection(&self, id: &str, enabled: bool) -> ApiResult<Server>;

    /// Replace the open ports of a protected server.
    async fn set_ports(&self, id: &str, ports: &[Port]) -> ApiResult<Server>;

    /// List SSH keys.
    async fn list_ssh_keys(&self) -> ApiResult<Vec<SshKey>>;

    /// Upload an SSH key.
    async fn create_ssh_key(&self, key: &NewSshKey) -> ApiResult<SshKey>;

    /// Delete an SSH key.
    async fn delete_ssh_key(&self, id: &str) -> ApiResult<()>;

    /// Start a payment.
    async fn create_transaction(
        &self,
        options: &CreateTransactionOptions,
    ) -> ApiResult<Transaction>;

    /// Fetch a single payment.
    async fn show_transaction(&self, id: &str) -> ApiResult<Transaction>;

    /// Fetch one page of payments.
    async fn list_transactions(&self, page: i64, items: i64) -> ApiResult<Vec<Transaction>>;

    /// Fetch the images, regions and plans available on a host.
    async fn create_options(&self, host_id: i64) -> ApiResult<CreateOptions>;
}
