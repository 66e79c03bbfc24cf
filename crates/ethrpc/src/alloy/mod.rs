pub mod errors;
mod instrumentation;

use {
    crate::AlloyProvider,
    alloy::{
        network::{EthereumWallet, TxSigner},
        primitives::Signature,
        providers::{Provider, ProviderBuilder},
        rpc::client::ClientBuilder,
    },
    instrumentation::InstrumentationLayer,
    url::Url,
};

/// Creates a provider that signs the transactions it sends with `signer`.
///
/// The provider uses alloy's recommended fillers, so nonce, gas limit, fees
/// and chain id of outgoing transactions are filled in from the node.
pub fn provider_with_signer(
    url: &Url,
    signer: impl TxSigner<Signature> + Send + Sync + 'static,
) -> AlloyProvider {
    let rpc = ClientBuilder::default()
        .layer(InstrumentationLayer)
        .http(url.clone());
    let wallet = EthereumWallet::new(signer);

    ProviderBuilder::new()
        .wallet(wallet)
        .connect_client(rpc)
        .erased()
}
