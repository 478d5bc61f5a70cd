//! Payment URIs for crypto transactions and their terminal QR rendering.

use blcli_api::models::Transaction;
use qrcode::render::unicode::Dense1x2;
use qrcode::{EcLevel, QrCode};

use crate::error::{CliError, CliResult};

/// URI scheme used for every payment URI.
///
/// This is `bitcoin` for every currency, including altcoins; wallets for other
/// chains may not accept it.
pub(crate) const PAYMENT_URI_SCHEME: &str = "bitcoin";

const NO_QR_MESSAGE: &str = "Unable to generate a QR Code for this type of transaction.";

/// `bitcoin:<address>?amount=<amount>` for a transaction with a deposit address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PaymentUri(String);

impl PaymentUri {
    pub(crate) fn build(transaction: &Transaction) -> CliResult<Self> {
        if transaction.address.is_empty() || transaction.amount_crypto.is_empty() {
            return Err(CliError::render(NO_QR_MESSAGE));
        }
        Ok(Self(format!(
            "{PAYMENT_URI_SCHEME}:{}?amount={}",
            transaction.address, transaction.amount_crypto
        )))
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

/// Turns a payload into printable QR art.
pub(crate) trait QrRenderer: Send + Sync {
    fn render(&self, payload: &str) -> CliResult<String>;
}

/// Renders QR codes with Unicode half blocks for terminals.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TerminalQr;

impl QrRenderer for TerminalQr {
    fn render(&self, payload: &str) -> CliResult<String> {
        let code = QrCode::with_error_correction_level(payload, EcLevel::L)
            .map_err(|err| CliError::render(format!("failed to encode QR code: {err}")))?;
        Ok(code
            .render::<Dense1x2>()
            .dark_color(Dense1x2::Light)
            .light_color(Dense1x2::Dark)
            .quiet_zone(true)
            .build())
    }
}
