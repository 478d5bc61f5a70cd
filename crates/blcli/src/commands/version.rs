use crate::tree::{CommandNode, ContractError};

use super::Operation;

/// Line printed by `blcli version`.
pub(super) const VERSION_LINE: &str = concat!("blcli ", env!("CARGO_PKG_VERSION"));

pub(super) fn command() -> Result<CommandNode, ContractError> {
    CommandNode::builder("version")
        .about("Print the version number of blcli")
        .operation(Operation::Version)
        .build()
}
