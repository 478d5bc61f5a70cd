//! Request and response DTOs for the BitLaunch API.
//!
//! Field order follows the API documents so rendered output reads the same way
//! the service returns it. Response fields that are missing or `null` decode
//! as their empty value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Account profile returned by `GET user`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
    /// Account identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Login email.
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    /// Whether the email address has been confirmed.
    #[serde(deserialize_with = "null_as_default")]
    pub email_confirmed: bool,
    /// Account creation time.
    pub created: Option<DateTime<Utc>>,
    /// Number of servers in use.
    #[serde(deserialize_with = "null_as_default")]
    pub used: i64,
    /// Maximum number of servers allowed.
    #[serde(deserialize_with = "null_as_default")]
    pub limit: i64,
    /// Whether two-factor authentication is enabled.
    #[serde(deserialize_with = "null_as_default")]
    pub two_fa: bool,
    /// Balance in thousandths of a USD.
    #[serde(deserialize_with = "null_as_default")]
    pub balance: i64,
    /// Running cost per hour in thousandths of a USD.
    #[serde(deserialize_with = "null_as_default")]
    pub cost_per_hr: i64,
    /// Balance threshold that triggers a billing alert.
    #[serde(deserialize_with = "null_as_default")]
    pub billing_alert: i64,
    /// How far the balance may go negative before servers are suspended.
    #[serde(deserialize_with = "null_as_default")]
    pub negative_allowance: i64,
}

/// Usage summary returned by `GET user/usage`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountUsage {
    /// Billing period (`YYYY-MM`).
    #[serde(deserialize_with = "null_as_default")]
    pub period: String,
    /// Previous period available for paging, if any.
    pub prev_period: Option<String>,
    /// Next period available for paging, if any.
    pub next_period: Option<String>,
    /// Total spend for the period in thousandths of a USD.
    #[serde(deserialize_with = "null_as_default")]
    pub total_usd_milli: i64,
    /// Per-server usage lines.
    #[serde(deserialize_with = "null_as_default")]
    pub server_usage: Vec<ServerUsage>,
}

/// A single server's usage within a billing period.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerUsage {
    /// Server name.
    #[serde(deserialize_with = "null_as_default")]
    pub server_name: String,
    /// Hours billed.
    #[serde(deserialize_with = "null_as_default")]
    pub hours: i64,
    /// Cost in thousandths of a USD.
    #[serde(deserialize_with = "null_as_default")]
    pub cost_usd_milli: i64,
}

/// Paged account history returned by `GET user/history`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountHistory {
    /// History entries for the requested page.
    #[serde(deserialize_with = "null_as_default")]
    pub history: Vec<HistoryEntry>,
    /// Total number of entries across all pages.
    #[serde(deserialize_with = "null_as_default")]
    pub total: i64,
}

/// One account event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryEntry {
    /// Entry identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// When the event happened.
    pub time: Option<DateTime<Utc>>,
    /// Human-readable description.
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

/// Firewall port rule attached to a protected server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Port {
    /// Port number.
    #[serde(deserialize_with = "null_as_default")]
    pub port_number: i64,
    /// Protocol name (e.g. `tcp`, `udp`).
    #[serde(deserialize_with = "null_as_default")]
    pub protocol: String,
}

/// Server returned by the `servers` endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Server {
    /// Server identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Display name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Provider identifier the server runs on.
    #[serde(rename = "host", deserialize_with = "null_as_default")]
    pub host_id: i64,
    /// Public IPv4 address.
    #[serde(deserialize_with = "null_as_default")]
    pub ipv4: String,
    /// Region identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub region: String,
    /// Plan/size identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub size: String,
    /// Plan/size description.
    #[serde(deserialize_with = "null_as_default")]
    pub size_desc: String,
    /// Image identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub image: String,
    /// Image description.
    #[serde(deserialize_with = "null_as_default")]
    pub image_desc: String,
    /// Creation time.
    pub created: Option<DateTime<Utc>>,
    /// Initial root password when the API returns one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rootpassword: Option<String>,
    /// Lifecycle status.
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    /// Provider error detail when provisioning failed.
    #[serde(deserialize_with = "null_as_default")]
    pub error_text: String,
    /// Whether backups are enabled.
    #[serde(deserialize_with = "null_as_default")]
    pub backups_enabled: bool,
    /// Server version tag.
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    /// Whether the server is flagged for abuse.
    #[serde(deserialize_with = "null_as_default")]
    pub abuse: bool,
    /// Disk size in GB.
    #[serde(rename = "diskGB", deserialize_with = "null_as_default")]
    pub disk_gb: i64,
    /// Whether DDoS protection is enabled.
    #[serde(deserialize_with = "null_as_default")]
    pub protected: bool,
    /// Open ports on a protected server.
    #[serde(deserialize_with = "null_as_default")]
    pub ports: Vec<Port>,
}

/// Payload for `POST servers`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateServerOptions {
    /// Display name.
    pub name: String,
    /// Provider identifier.
    #[serde(rename = "hostID")]
    pub host_id: i64,
    /// Image/app identifier.
    #[serde(rename = "hostImageID")]
    pub host_image_id: String,
    /// Plan/size identifier.
    #[serde(rename = "sizeID")]
    pub size_id: String,
    /// Region identifier.
    #[serde(rename = "regionID")]
    pub region_id: String,
    /// SSH key identifiers to install.
    #[serde(rename = "sshKeys")]
    pub ssh_keys: Vec<String>,
    /// Root password.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    /// Cloud-init script.
    #[serde(rename = "initscript", skip_serializing_if = "String::is_empty")]
    pub init_script: String,
}

/// Payload for `POST servers/{id}/rebuild`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RebuildOptions {
    /// Image/app identifier.
    #[serde(rename = "hostImageID")]
    pub image_id: String,
    /// Image/app description.
    #[serde(rename = "imageDescription")]
    pub description: String,
}

/// SSH key stored on the account.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SshKey {
    /// Key identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Display name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Key fingerprint.
    #[serde(deserialize_with = "null_as_default")]
    pub fingerprint: String,
    /// Public key content.
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    /// Creation time.
    pub created: Option<DateTime<Utc>>,
}

/// Payload for `POST ssh-keys`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewSshKey {
    /// Display name.
    pub name: String,
    /// Public key content.
    pub content: String,
}

/// Payment transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Transaction {
    /// Transaction identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Creation time.
    pub date: Option<DateTime<Utc>>,
    /// Deposit address; empty for payment methods without one.
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    /// Cryptocurrency symbol.
    #[serde(deserialize_with = "null_as_default")]
    pub crypto_symbol: String,
    /// Amount in USD.
    #[serde(deserialize_with = "null_as_default")]
    pub amount_usd: i64,
    /// Amount denominated in the selected cryptocurrency.
    #[serde(deserialize_with = "null_as_default")]
    pub amount_crypto: String,
    /// Payment status.
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    /// Payment processor status page.
    #[serde(deserialize_with = "null_as_default")]
    pub status_url: String,
    /// Whether the payment uses the lightning network.
    #[serde(deserialize_with = "null_as_default")]
    pub lightning_network: bool,
}

/// Payload for `POST transactions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionOptions {
    /// Amount in USD.
    pub amount_usd: i64,
    /// Cryptocurrency symbol.
    pub crypto_symbol: String,
    /// Pay over the lightning network.
    pub lightning_network: bool,
}

/// Images, regions and plans available when creating a server on a host.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateOptions {
    /// Provider identifier the options apply to.
    #[serde(rename = "hostID", deserialize_with = "null_as_default")]
    pub host_id: i64,
    /// Bandwidth cost per GB in thousandths of a USD.
    #[serde(deserialize_with = "null_as_default")]
    pub bandwidth_cost: i64,
    /// Installable images.
    #[serde(deserialize_with = "null_as_default")]
    pub image: Vec<ImageOption>,
    /// Available regions.
    #[serde(deserialize_with = "null_as_default")]
    pub region: Vec<RegionOption>,
    /// Available plans.
    #[serde(deserialize_with = "null_as_default")]
    pub size: Vec<SizeOption>,
}

/// Installable image family and its versions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageOption {
    /// Image family identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Display name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Installable versions.
    #[serde(deserialize_with = "null_as_default")]
    pub versions: Vec<ImageVersion>,
}

/// A concrete installable image.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageVersion {
    /// Image identifier passed as `--image`.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Version description.
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

/// Region a server can be placed in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RegionOption {
    /// Region identifier passed as `--region`.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Display name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

/// Plan a server can be sized to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SizeOption {
    /// Plan identifier passed as `--size`.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Display name.
    #[serde(deserialize_with = "null_as_default")]
    pub slug: String,
    /// Memory in MB.
    #[serde(deserialize_with = "null_as_default")]
    pub memory_mb: i64,
    /// Virtual CPU count.
    #[serde(deserialize_with = "null_as_default")]
    pub cpu_count: i64,
    /// Disk size in GB.
    #[serde(deserialize_with = "null_as_default")]
    pub disk_gb: i64,
    /// Monthly transfer in GB.
    #[serde(deserialize_with = "null_as_default")]
    pub bandwidth_gb: i64,
    /// Hourly cost in thousandths of a USD.
    #[serde(deserialize_with = "null_as_default")]
    pub cost_per_hr: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transaction_deserializes_with_missing_fields() {
        let transaction: Transaction = serde_json::from_value(json!({
            "id": "tx-1",
            "cryptoSymbol": "PAYPAL",
            "amountUsd": 20
        }))
        .expect("transaction decodes");
        assert_eq!(transaction.id, "tx-1");
        assert!(transaction.address.is_empty());
        assert!(transaction.amount_crypto.is_empty());
        assert_eq!(transaction.amount_usd, 20);
    }

    #[test]
    fn null_fields_decode_as_empty() {
        let transaction: Transaction = serde_json::from_str(
            r#"{"id":"tx","address":null,"amountCrypto":null,"amountUsd":null,"date":null}"#,
        )
        .expect("transaction decodes");
        assert_eq!(transaction.id, "tx");
        assert!(transaction.address.is_empty());
        assert!(transaction.amount_crypto.is_empty());
        assert_eq!(transaction.amount_usd, 0);

        let server: Server = serde_json::from_value(json!({
            "id": "srv-1",
            "ipv4": null,
            "ports": null,
            "protected": null
        }))
        .expect("server decodes");
        assert!(server.ipv4.is_empty());
        assert!(server.ports.is_empty());
        assert!(!server.protected);
    }

    #[test]
    fn create_server_options_use_api_field_names() {
        let options = CreateServerOptions {
            name: "foo".into(),
            host_id: 0,
            host_image_id: "x".into(),
            size_id: "y".into(),
            region_id: "z".into(),
            ssh_keys: vec!["k1".into()],
            password: String::new(),
            init_script: String::new(),
        };
        let value = serde_json::to_value(&options).expect("serialize");
        assert_eq!(
            value,
            json!({
                "name": "foo",
                "hostID": 0,
                "hostImageID": "x",
                "sizeID": "y",
                "regionID": "z",
                "sshKeys": ["k1"]
            })
        );
    }

    #[test]
    fn server_reads_host_and_disk_fields() {
        let server: Server = serde_json::from_value(json!({
            "id": "srv-1",
            "name": "web",
            "host": 1,
            "diskGB": 25,
            "ports": [{ "portNumber": 22, "protocol": "tcp" }]
        }))
        .expect("server decodes");
        assert_eq!(server.host_id, 1);
        assert_eq!(server.disk_gb, 25);
        assert_eq!(
            server.ports,
            vec![Port {
                port_number: 22,
                protocol: "tcp".into()
            }]
        );
    }
}
