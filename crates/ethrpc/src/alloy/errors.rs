use alloy::transports::{RpcError, TransportError};

pub trait NodeErrorExt {
    /// Returns whether the node answered with revert data, i.e. the
    /// transaction failed while executing against the current state.
    fn has_revert_data(&self) -> bool;

    /// Returns whether the node rejected the transaction because the sender
    /// cannot pay for gas and value.
    fn is_insufficient_funds(&self) -> bool;
}

impl NodeErrorExt for TransportError {
    fn has_revert_data(&self) -> bool {
        match self {
            RpcError::ErrorResp(err) => err.as_revert_data().is_some(),
            _ => false,
        }
    }

    fn is_insufficient_funds(&self) -> bool {
        match self {
            // geth, reth and anvil all phrase it as "insufficient funds for
            // gas * price + value", hardhat as "sender doesn't have enough funds"
            RpcError::ErrorResp(err) => {
                let message = err.message.to_lowercase();
                message.contains("insufficient funds") || message.contains("enough funds")
            }
            _ => false,
        }
    }
}
