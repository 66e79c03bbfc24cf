pub mod arguments;
pub mod deployment;
pub mod node;
pub mod whitelist;

use {
    alloy::primitives::Address,
    arguments::Arguments,
    contracts::{Artifact, DYNAMIC_WHITELIST},
    deployment::{Deployer, DeploymentError, deploy_and_report},
    node::NodeDeployer,
    whitelist::WhitelistInitArgs,
};

/// Deploys the `DynamicWhitelist` contract as configured by `args` and
/// reports its address on stdout.
pub async fn run(args: Arguments) -> Result<Address, DeploymentError> {
    let whitelist = WhitelistInitArgs::parse(&args.initial_whitelist)?;
    let artifact = Artifact::find_and_load(&args.artifacts_dir, DYNAMIC_WHITELIST)?;

    let from = args.private_key.address();
    let provider = ethrpc::alloy::provider_with_signer(&args.node_url, args.private_key);
    let deployer = Deployer::new(
        NodeDeployer::new(provider, from),
        args.confirmations,
        args.chain_id,
    );

    tracing::info!(
        %from,
        whitelist = ?whitelist.accounts(),
        "deploying {DYNAMIC_WHITELIST}"
    );
    deploy_and_report(&deployer, &artifact, &whitelist, &mut std::io::stdout()).await
}
