//! Deploys the whitelist contract: submit the creation transaction, wait for
//! its confirmation and report the address of the new contract.
//!
//! A deployment moves from unsubmitted to [`PendingDeployment`] to
//! [`ConfirmedDeployment`]. Any failure on the way ends it with a
//! [`DeploymentError`]. Nothing is retried, the operator is expected to fix
//! the cause and run the deployment again.

use {
    crate::whitelist::{InvalidEntry, WhitelistInitArgs},
    alloy::primitives::{Address, Bytes, TxHash},
    anyhow::Result,
    contracts::{Artifact, ArtifactError, DYNAMIC_WHITELIST},
    std::io::Write,
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error(transparent)]
    InvalidWhitelist(#[from] InvalidEntry),
    #[error("failed to prepare the contract creation code")]
    Artifact(#[from] ArtifactError),
    #[error("failed to query the node")]
    Node(#[source] anyhow::Error),
    #[error("connected to chain {actual} but expected chain {expected}")]
    ChainMismatch { expected: u64, actual: u64 },
    #[error("failed to submit the deployment transaction")]
    Submission(#[source] anyhow::Error),
    #[error("failed to confirm deployment transaction {tx_hash}")]
    Confirmation {
        tx_hash: TxHash,
        #[source]
        source: anyhow::Error,
    },
    #[error("deployment transaction {tx_hash} reverted in block {block_number:?}")]
    Reverted {
        tx_hash: TxHash,
        block_number: Option<u64>,
    },
    #[error("receipt of deployment transaction {tx_hash} has no contract address")]
    MissingContractAddress { tx_hash: TxHash },
    #[error("no code at {address} after deployment transaction {tx_hash}")]
    NoCode { address: Address, tx_hash: TxHash },
    #[error("failed to report the contract address")]
    Report(#[source] std::io::Error),
}

/// The parts of a transaction receipt a deployment cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub block_number: Option<u64>,
    pub success: bool,
    pub contract_address: Option<Address>,
}

/// Node operations needed to deploy a contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ContractDeploying: Send + Sync {
    /// Returns the chain id of the connected network.
    async fn chain_id(&self) -> Result<u64>;

    /// Broadcasts a contract creation transaction carrying `creation_code`.
    ///
    /// Returns as soon as the node accepted the transaction, it is not
    /// necessarily included in a block yet.
    async fn submit(&self, creation_code: Bytes) -> Result<TxHash>;

    /// Waits until the transaction has `confirmations` confirmations and
    /// returns its receipt. There is no timeout.
    async fn wait_for_confirmation(&self, tx_hash: TxHash, confirmations: u64) -> Result<Receipt>;

    /// Returns the code deployed at `address`.
    async fn code_at(&self, address: Address) -> Result<Bytes>;
}

/// A submitted deployment that is not confirmed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDeployment {
    pub tx_hash: TxHash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmedDeployment {
    pub address: Address,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}

pub struct Deployer<D> {
    node: D,
    confirmations: u64,
    expected_chain_id: Option<u64>,
}

impl<D: ContractDeploying> Deployer<D> {
    pub fn new(node: D, confirmations: u64, expected_chain_id: Option<u64>) -> Self {
        Self {
            node,
            confirmations,
            expected_chain_id,
        }
    }

    /// Deploys a new instance of the contract in `artifact`, initialized with
    /// `whitelist`. Every call creates a new contract.
    pub async fn deploy(
        &self,
        artifact: &Artifact,
        whitelist: &WhitelistInitArgs,
    ) -> Result<ConfirmedDeployment, DeploymentError> {
        let creation_code = artifact.creation_code(&whitelist.to_constructor_args())?;
        self.check_chain_id().await?;
        let pending = self.submit(creation_code).await?;
        self.confirm(pending).await
    }

    async fn check_chain_id(&self) -> Result<(), DeploymentError> {
        let Some(expected) = self.expected_chain_id else {
            return Ok(());
        };
        let actual = self.node.chain_id().await.map_err(DeploymentError::Node)?;
        if actual != expected {
            return Err(DeploymentError::ChainMismatch { expected, actual });
        }
        tracing::debug!(chain_id = actual, "connected to expected chain");
        Ok(())
    }

    pub async fn submit(&self, creation_code: Bytes) -> Result<PendingDeployment, DeploymentError> {
        let tx_hash = self
            .node
            .submit(creation_code)
            .await
            .map_err(DeploymentError::Submission)?;
        tracing::info!(?tx_hash, "submitted deployment transaction");
        Ok(PendingDeployment { tx_hash })
    }

    pub async fn confirm(
        &self,
        pending: PendingDeployment,
    ) -> Result<ConfirmedDeployment, DeploymentError> {
        let PendingDeployment { tx_hash } = pending;
        tracing::debug!(
            ?tx_hash,
            confirmations = self.confirmations,
            "waiting for deployment transaction"
        );
        let receipt = self
            .node
            .wait_for_confirmation(tx_hash, self.confirmations)
            .await
            .map_err(|source| DeploymentError::Confirmation { tx_hash, source })?;

        if !receipt.success {
            return Err(DeploymentError::Reverted {
                tx_hash,
                block_number: receipt.block_number,
            });
        }
        let address = receipt
            .contract_address
            .ok_or(DeploymentError::MissingContractAddress { tx_hash })?;

        // A successful receipt alone doesn't prove the constructor left code
        // behind, e.g. when it returns early with empty runtime code.
        let code = self
            .node
            .code_at(address)
            .await
            .map_err(DeploymentError::Node)?;
        if code.is_empty() {
            return Err(DeploymentError::NoCode { address, tx_hash });
        }

        tracing::info!(
            ?address,
            ?tx_hash,
            block_number = ?receipt.block_number,
            "deployment confirmed"
        );
        Ok(ConfirmedDeployment {
            address,
            tx_hash,
            block_number: receipt.block_number,
        })
    }
}

/// Deploys the contract and writes a single line with its address to `out`.
/// Nothing is written if the deployment fails.
pub async fn deploy_and_report<D: ContractDeploying>(
    deployer: &Deployer<D>,
    artifact: &Artifact,
    whitelist: &WhitelistInitArgs,
    out: &mut impl Write,
) -> Result<Address, DeploymentError> {
    let deployment = deployer.deploy(artifact, whitelist).await?;
    writeln!(out, "{DYNAMIC_WHITELIST} deployed to: {}", deployment.address)
        .map_err(DeploymentError::Report)?;
    Ok(deployment.address)
}
