use {
    crate::deployment::{ContractDeploying, Receipt},
    alloy::{
        network::{ReceiptResponse, TransactionBuilder},
        primitives::{Address, Bytes, TxHash},
        providers::{PendingTransactionBuilder, Provider},
        rpc::types::TransactionRequest,
    },
    anyhow::{Context, Result},
    ethrpc::{AlloyProvider, alloy::errors::NodeErrorExt},
};

/// Deploys contracts through an Ethereum node, signing with the provider's
/// wallet.
pub struct NodeDeployer {
    provider: AlloyProvider,
    from: Address,
}

impl NodeDeployer {
    pub fn new(provider: AlloyProvider, from: Address) -> Self {
        Self { provider, from }
    }
}

#[async_trait::async_trait]
impl ContractDeploying for NodeDeployer {
    async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .context("could not fetch current chain id")
    }

    async fn submit(&self, creation_code: Bytes) -> Result<TxHash> {
        let tx = TransactionRequest::default()
            .from(self.from)
            .with_deploy_code(creation_code);

        match self.provider.send_transaction(tx).await {
            Ok(pending) => Ok(*pending.tx_hash()),
            Err(err) if err.is_insufficient_funds() => Err(err).with_context(|| {
                format!("deployer account {} cannot pay for the deployment", self.from)
            }),
            Err(err) if err.has_revert_data() => {
                Err(err).context("contract constructor reverts during gas estimation")
            }
            Err(err) => Err(err).context("node rejected the deployment transaction"),
        }
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash, confirmations: u64) -> Result<Receipt> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .with_required_confirmations(confirmations)
            .with_timeout(None)
            .get_receipt()
            .await
            .context("failed to get deployment receipt")?;

        Ok(to_receipt(&receipt))
    }

    async fn code_at(&self, address: Address) -> Result<Bytes> {
        self.provider
            .get_code_at(address)
            .await
            .with_context(|| format!("could not fetch code at {address}"))
    }
}

fn to_receipt(receipt: &impl ReceiptResponse) -> Receipt {
    Receipt {
        block_number: receipt.block_number(),
        success: receipt.status(),
        contract_address: receipt.contract_address(),
    }
}
