#![forbid(unsafe_code)]
#![deny(unused_must_use, rustdoc::broken_intra_doc_links, rustdoc::bare_urls)]
#![warn(
    unused,
    unreachable_pub,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::redundant_pub_crate)]

//! Command-line client for BitLaunch.io.
//!
//! Layout:
//! - `cli.rs`: global options, startup, and dispatch
//! - `tree/`: the declarative command hierarchy and its contracts
//! - `validate.rs`: flag parsing, arity checks, and domain rules
//! - `commands/`: command declarations and handlers grouped by resource
//! - `context.rs`: dependencies handed to handlers
//! - `settings.rs`: config file and option precedence
//! - `output.rs`: structured rendering
//! - `payment.rs`: payment URIs and QR rendering
//! - `error.rs`: error taxonomy and reporting
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod commands;
pub(crate) mod context;
pub(crate) mod error;
pub(crate) mod output;
pub(crate) mod payment;
pub(crate) mod settings;
#[cfg(test)]
pub(crate) mod testing;
pub(crate) mod tree;
pub(crate) mod validate;

pub use cli::run;
