//! Chain icons for account rows.

use tk_api_types::AddressFormat;

pub fn address_icon(format: AddressFormat) -> Option<&'static str> {
    match format {
        AddressFormat::Ethereum => Some("/assets/images/eth-icon.svg"),
        AddressFormat::Solana => Some("/assets/images/sol-icon.svg"),
        AddressFormat::Other => None,
    }
}

pub fn chain_label(format: AddressFormat) -> &'static str {
    match format {
        AddressFormat::Ethereum => "Ethereum",
        AddressFormat::Solana => "Solana",
        AddressFormat::Other => "",
    }
}
