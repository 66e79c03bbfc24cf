use {
    alloy::signers::local::PrivateKeySigner,
    std::{
        fmt::{self, Display, Formatter},
        path::PathBuf,
    },
    url::Url,
};

#[derive(clap::Parser)]
pub struct LoggingArguments {
    #[clap(
        long,
        env,
        default_value = "warn,whitelist_deployer=info,contracts=info,ethrpc=info"
    )]
    pub log_filter: String,

    /// Output log events as JSON lines.
    #[clap(long, env)]
    pub log_json: bool,
}

#[derive(clap::Parser)]
pub struct Arguments {
    #[clap(flatten)]
    pub logging: LoggingArguments,

    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Private key of the account paying for the deployment.
    #[clap(long, env, hide_env_values = true)]
    pub private_key: PrivateKeySigner,

    /// Directory containing the compiled contract artifacts.
    #[clap(long, env, default_value = "artifacts")]
    pub artifacts_dir: PathBuf,

    /// Comma separated accounts the contract whitelists on construction. Pass
    /// an empty value to deploy with an empty whitelist.
    #[clap(
        long,
        env,
        value_delimiter = ',',
        default_value = "0x010149cBd3dC42860EA6901fa36328b2dfaFC3DA"
    )]
    pub initial_whitelist: Vec<String>,

    /// Number of blocks that need to confirm the deployment transaction.
    #[clap(
        long,
        env,
        default_value = "1",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub confirmations: u64,

    /// The chain ID the deployment is expected to happen on. When set, the
    /// deployment is aborted if the node is connected to another chain.
    #[clap(long, env)]
    pub chain_id: Option<u64>,
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            logging,
            node_url,
            private_key,
            artifacts_dir,
            initial_whitelist,
            confirmations,
            chain_id,
        } = self;

        writeln!(f, "log_filter: {}", logging.log_filter)?;
        writeln!(f, "log_json: {}", logging.log_json)?;
        writeln!(f, "node_url: {node_url}")?;
        writeln!(f, "private_key: SECRET ({})", private_key.address())?;
        writeln!(f, "artifacts_dir: {}", artifacts_dir.display())?;
        writeln!(f, "initial_whitelist: {initial_whitelist:?}")?;
        writeln!(f, "confirmations: {confirmations}")?;
        writeln!(f, "chain_id: {chain_id:?}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, clap::Parser};

    const PRIVATE_KEY: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    #[test]
    fn defaults_match_local_node() {
        let args = Arguments::try_parse_from(["whitelist-deployer", "--private-key", PRIVATE_KEY])
            .unwrap();

        assert_eq!(args.node_url.as_str(), "http://localhost:8545/");
        assert_eq!(args.artifacts_dir, PathBuf::from("artifacts"));
        assert_eq!(
            args.initial_whitelist,
            ["0x010149cBd3dC42860EA6901fa36328b2dfaFC3DA"]
        );
        assert_eq!(args.confirmations, 1);
        assert_eq!(args.chain_id, None);
    }

    #[test]
    fn parses_whitelist_list() {
        let args = Arguments::try_parse_from([
            "whitelist-deployer",
            "--private-key",
            PRIVATE_KEY,
            "--initial-whitelist",
            "0x0000000000000000000000000000000000000001,0x0000000000000000000000000000000000000002",
        ])
        .unwrap();

        assert_eq!(args.initial_whitelist.len(), 2);
    }

    #[test]
    fn rejects_zero_confirmations() {
        let result = Arguments::try_parse_from([
            "whitelist-deployer",
            "--private-key",
            PRIVATE_KEY,
            "--confirmations",
            "0",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn display_hides_private_key() {
        let args = Arguments::try_parse_from(["whitelist-deployer", "--private-key", PRIVATE_KEY])
            .unwrap();

        let displayed = args.to_string();

        assert!(displayed.contains("private_key: SECRET"));
        assert!(!displayed.contains(PRIVATE_KEY.trim_start_matches("0x")));
    }
}
