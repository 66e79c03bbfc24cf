use {clap::Parser, std::process::ExitCode, whitelist_deployer::arguments::Arguments};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match Arguments::try_parse() {
        Ok(args) => args,
        // `--help` and `--version` are reported through the same error type
        // but are not failures.
        Err(err) => {
            let _ = err.print();
            return match err.use_stderr() {
                true => ExitCode::FAILURE,
                false => ExitCode::SUCCESS,
            };
        }
    };
    observe::tracing::initialize(&observe::Config::new(
        &args.logging.log_filter,
        args.logging.log_json,
    ));
    tracing::info!("running whitelist deployer with arguments:\n{}", args);

    match whitelist_deployer::run(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:?}", anyhow::Error::from(err));
            ExitCode::FAILURE
        }
    }
}
