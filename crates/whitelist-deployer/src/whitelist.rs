use {
    alloy::{dyn_abi::DynSolValue, primitives::Address},
    thiserror::Error,
};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid whitelist entry {entry:?}: {reason}")]
pub struct InvalidEntry {
    pub entry: String,
    pub reason: &'static str,
}

/// Accounts the contract whitelists at construction time.
///
/// Order and duplicates are kept as given, deciding what to do with them is
/// up to the contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhitelistInitArgs(Vec<Address>);

impl WhitelistInitArgs {
    #[cfg(test)]
    pub fn new(accounts: Vec<Address>) -> Self {
        Self(accounts)
    }

    /// Parses whitelist entries as supplied by an operator.
    ///
    /// Blank entries are skipped so an empty value yields an empty whitelist.
    /// Entries in mixed case have to carry a valid EIP-55 checksum.
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Result<Self, InvalidEntry> {
        entries
            .iter()
            .map(|entry| entry.as_ref().trim())
            .filter(|entry| !entry.is_empty())
            .map(parse_address)
            .collect::<Result<_, _>>()
            .map(Self)
    }

    pub fn accounts(&self) -> &[Address] {
        &self.0
    }

    /// The constructor takes the whitelist as its only `address[]` argument.
    pub fn to_constructor_args(&self) -> Vec<DynSolValue> {
        let accounts = self.0.iter().copied().map(DynSolValue::Address).collect();
        vec![DynSolValue::Array(accounts)]
    }
}

fn parse_address(entry: &str) -> Result<Address, InvalidEntry> {
    let invalid = |reason| InvalidEntry {
        entry: entry.to_string(),
        reason,
    };

    let digits = entry
        .strip_prefix("0x")
        .or_else(|| entry.strip_prefix("0X"))
        .unwrap_or(entry);
    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid("expected 40 hex digits"));
    }

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Address::parse_checksummed(format!("0x{digits}"), None)
            .map_err(|_| invalid("bad EIP-55 checksum"));
    }

    digits
        .parse()
        .map_err(|_| invalid("expected 40 hex digits"))
}
