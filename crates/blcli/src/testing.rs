//! In-memory doubles for dispatch tests.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use blcli_api::models::{
    Account, AccountHistory, AccountUsage, CreateOptions, CreateServerOptions,
    CreateTransactionOptions, NewSshKey, Port, RebuildOptions, Server, SshKey, Transaction,
};
use blcli_api::{ApiError, ApiResult, RemoteService};

use crate::context::AppContext;
use crate::error::CliResult;
use crate::output::OutputFormat;
use crate::payment::QrRenderer;

/// One recorded remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    ShowAccount,
    AccountUsage(String),
    AccountHistory(i64, i64),
    ListServers,
    ShowServer(String),
    CreateServer(CreateServerOptions),
    DestroyServer(String),
    RebuildServer(String, RebuildOptions),
    ResizeServer(String, String),
    RestartServer(String),
    SetProtection(String, bool),
    SetPorts(String, Vec<Port>),
    ListSshKeys,
    CreateSshKey(NewSshKey),
    DeleteSshKey(String),
    CreateTransaction(CreateTransactionOptions),
    ShowTransaction(String),
    ListTransactions(i64, i64),
    CreateOptions(i64),
}

pub(crate) fn sample_server() -> Server {
    Server {
        id: "srv-1".into(),
        name: "web-1".into(),
        host_id: 0,
        ipv4: "203.0.113.10".into(),
        region: "lon1".into(),
        status: "ok".into(),
        ..Server::default()
    }
}

pub(crate) fn sample_transaction(address: &str, amount_crypto: &str) -> Transaction {
    Transaction {
        id: "tx-1".into(),
        address: address.into(),
        crypto_symbol: "BTC".into(),
        amount_usd: 20,
        amount_crypto: amount_crypto.into(),
        status: "pending".into(),
        ..Transaction::default()
    }
}

#[derive(Debug, Default)]
struct Shared {
    calls: Mutex<Vec<Call>>,
    failure: Mutex<Option<ApiError>>,
    rendered: Mutex<Vec<String>>,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct FakeService {
    shared: Arc<Shared>,
    transaction: Transaction,
}

impl FakeService {
    fn record(&self, call: Call) -> ApiResult<()> {
        lock(&self.shared.calls).push(call);
        lock(&self.shared.failure).take().map_or(Ok(()), Err)
    }
}

#[async_trait]
impl RemoteService for FakeService {
    async fn show_account(&self) -> ApiResult<Account> {
        self.record(Call::ShowAccount)?;
        Ok(Account {
            id: "acct-1".into(),
            email: "ops@example.com".into(),
            ..Account::default()
        })
    }

    async fn account_usage(&self, period: &str) -> ApiResult<AccountUsage> {
        self.record(Call::AccountUsage(period.into()))?;
        Ok(AccountUsage::default())
    }

    async fn account_history(&self, page: i64, items: i64) -> ApiResult<AccountHistory> {
        self.record(Call::AccountHistory(page, items))?;
        Ok(AccountHistory::default())
    }

    async fn list_servers(&self) -> ApiResult<Vec<Server>> {
        self.record(Call::ListServers)?;
        Ok(vec![sample_server()])
    }

    async fn show_server(&self, id: &str) -> ApiResult<Server> {
        self.record(Call::ShowServer(id.into()))?;
        Ok(sample_server())
    }

    async fn create_server(&self, options: &CreateServerOptions) -> ApiResult<Server> {
        self.record(Call::CreateServer(options.clone()))?;
        Ok(sample_server())
    }

    async fn destroy_server(&self, id: &str) -> ApiResult<()> {
        self.record(Call::DestroyServer(id.into()))
    }

    async fn rebuild_server(&self, id: &str, options: &RebuildOptions) -> ApiResult<()> {
        self.record(Call::RebuildServer(id.into(), options.clone()))
    }

    async fn resize_server(&self, id: &str, size_id: &str) -> ApiResult<()> {
        self.record(Call::ResizeServer(id.into(), size_id.into()))
    }

    async fn restart_server(&self, id: &str) -> ApiResult<()> {
        self.record(Call::RestartServer(id.into()))
    }

    async fn set_protection(&self, id: &str, enabled: bool) -> ApiResult<Server> {
        self.record(Call::SetProtection(id.into(), enabled))?;
        Ok(Server {
            protected: enabled,
            ..sample_server()
        })
    }

    async fn set_ports(&self, id: &str, ports: &[Port]) -> ApiResult<Server> {
        self.record(Call::SetPorts(id.into(), ports.to_vec()))?;
        Ok(Server {
            ports: ports.to_vec(),
            ..sample_server()
        })
    }

    async fn list_ssh_keys(&self) -> ApiResult<Vec<SshKey>> {
        self.record(Call::ListSshKeys)?;
        Ok(Vec::new())
    }

    async fn create_ssh_key(&self, key: &NewSshKey) -> ApiResult<SshKey> {
        self.record(Call::CreateSshKey(key.clone()))?;
        Ok(SshKey {
            id: "key-1".into(),
            name: key.name.clone(),
            content: key.content.clone(),
            ..SshKey::default()
        })
    }

    async fn delete_ssh_key(&self, id: &str) -> ApiResult<()> {
        self.record(Call::DeleteSshKey(id.into()))
    }

    async fn create_transaction(
        &self,
        options: &CreateTransactionOptions,
    ) -> ApiResult<Transaction> {
        self.record(Call::CreateTransaction(options.clone()))?;
        Ok(self.transaction.clone())
    }

    async fn show_transaction(&self, id: &str) -> ApiResult<Transaction> {
        self.record(Call::ShowTransaction(id.into()))?;
        Ok(self.transaction.clone())
    }

    async fn list_transactions(&self, page: i64, items: i64) -> ApiResult<Vec<Transaction>> {
        self.record(Call::ListTransactions(page, items))?;
        Ok(vec![self.transaction.clone()])
    }

    async fn create_options(&self, host_id: i64) -> ApiResult<CreateOptions> {
        self.record(Call::CreateOptions(host_id))?;
        Ok(CreateOptions {
            host_id,
            ..CreateOptions::default()
        })
    }
}

struct RecordingQr {
    shared: Arc<Shared>,
}

impl QrRenderer for RecordingQr {
    fn render(&self, payload: &str) -> CliResult<String> {
        lock(&self.shared.rendered).push(payload.to_string());
        Ok(format!("[qr {payload}]"))
    }
}

/// Builds contexts backed by the fakes and exposes what they recorded.
pub(crate) struct Harness {
    shared: Arc<Shared>,
    transaction: Transaction,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            transaction: sample_transaction("bc1qdefault", "0.0005"),
        }
    }

    /// Transaction returned by every transaction call.
    pub(crate) fn with_transaction(mut self, transaction: Transaction) -> Self {
        self.transaction = transaction;
        self
    }

    /// Fail the next remote call with `error`.
    pub(crate) fn failing(self, error: ApiError) -> Self {
        *lock(&self.shared.failure) = Some(error);
        self
    }

    pub(crate) fn context(&self) -> AppContext {
        AppContext {
            service: Box::new(FakeService {
                shared: Arc::clone(&self.shared),
                transaction: self.transaction.clone(),
            }),
            output: OutputFormat::Json,
            qr: Box::new(RecordingQr {
                shared: Arc::clone(&self.shared),
            }),
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        lock(&self.shared.calls).clone()
    }

    pub(crate) fn rendered_payloads(&self) -> Vec<String> {
        lock(&self.shared.rendered).clone()
    }
}
