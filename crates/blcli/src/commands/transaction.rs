use blcli_api::models::{CreateTransactionOptions, Transaction};

use crate::context::AppContext;
use crate::error::{CliError, CliResult};
use crate::payment::PaymentUri;
use crate::tree::{CommandNode, ContractError, FlagSpec, PositionalContract};
use crate::validate::{DomainRule, Invocation, check_lightning, parse_usd_amount};

use super::{Operation, Outcome};

const TRANSACTION_ID: PositionalContract = PositionalContract::exactly(1, "<transaction-id>");

pub(super) fn command() -> Result<CommandNode, ContractError> {
    let create = CommandNode::builder("create")
        .about("Create a new transaction")
        .long_about(
            "Create a new transaction: create <amount-usd> <BTC, LTC, ETH, BCH, NANO, TRX, SRN, TEL>",
        )
        .aliases(&["c"])
        .positionals(PositionalContract::exactly(2, "<amount-usd> <symbol>"))
        .flag(
            FlagSpec::boolean("lightning")
                .short('l')
                .help("use the lightning network, valid for BTC and LTC up to 0.042 BTC or equivalent"),
        )
        .flag(FlagSpec::boolean("qr").help("output transaction as qr code to terminal"))
        .rule(DomainRule::UsdAmount)
        .rule(DomainRule::LightningSymbol)
        .operation(Operation::TransactionCreate)
        .build()?;

    let get = CommandNode::builder("get")
        .about("Get information for a single transaction")
        .aliases(&["g", "show"])
        .positionals(TRANSACTION_ID)
        .flag(FlagSpec::boolean("qr").help("output transaction as qr code to terminal"))
        .operation(Operation::TransactionGet)
        .build()?;

    let list = CommandNode::builder("list")
        .about("List transactions on your account")
        .aliases(&["l"])
        .flag(FlagSpec::integer("page").short('p').default_int(1).help("page number"))
        .flag(
            FlagSpec::integer("items")
                .short('i')
                .default_int(25)
                .help("number of items per page"),
        )
        .operation(Operation::TransactionList)
        .build()?;

    let qr = CommandNode::builder("qr")
        .about("Generate a QR code for a transaction")
        .positionals(TRANSACTION_ID)
        .operation(Operation::TransactionQr)
        .build()?;

    CommandNode::builder("transaction")
        .about("Manage transactions")
        .long_about("Use the subcommands to create, get, or list transactions.")
        .aliases(&["t"])
        .child(create)
        .child(get)
        .child(list)
        .child(qr)
        .build()
}

/// Structured transaction, or its payment QR code when `--qr` was given.
fn transaction_outcome(transaction: &Transaction, qr: bool) -> CliResult<Outcome> {
    if qr {
        return PaymentUri::build(transaction).map(Outcome::PaymentQr);
    }
    Outcome::structured(transaction)
}

pub(super) async fn handle_create(ctx: &AppContext, invocation: &Invocation) -> CliResult<Outcome> {
    let amount_usd = parse_usd_amount(invocation.positional(0))?;
    let crypto_symbol = invocation.positional(1);
    let lightning_network = invocation.boolean("lightning");
    check_lightning(lightning_network, crypto_symbol)?;

    let options = CreateTransactionOptions {
        amount_usd,
        crypto_symbol: crypto_symbol.to_string(),
        lightning_network,
    };
    let transaction = ctx
        .service
        .create_transaction(&options)
        .await
        .map_err(CliError::remote("creating a new transaction"))?;
    transaction_outcome(&transaction, invocation.boolean("qr"))
}

pub(super) async fn handle_get(ctx: &AppContext, invocation: &Invocation) -> CliResult<Outcome> {
    let transaction = ctx
        .service
        .show_transaction(invocation.positional(0))
        .await
        .map_err(CliError::remote("getting transaction"))?;
    transaction_outcome(&transaction, invocation.boolean("qr"))
}

pub(super) async fn handle_list(ctx: &AppContext, invocation: &Invocation) -> CliResult<Outcome> {
    let transactions = ctx
        .service
        .list_transactions(invocation.integer("page"), invocation.integer("items"))
        .await
        .map_err(CliError::remote("listing transactions"))?;
    Outcome::structured(&transactions)
}

pub(super) async fn handle_qr(ctx: &AppContext, invocation: &Invocation) -> CliResult<Outcome> {
    let transaction = ctx
        .service
        .show_transaction(invocation.positional(0))
        .await
        .map_err(CliError::remote("getting transaction"))?;
    transaction_outcome(&transaction, true)
}
