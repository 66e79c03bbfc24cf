use {
    crate::{Config, panic_hook},
    std::io::IsTerminal,
    time::macros::format_description,
    tracing_subscriber::{
        EnvFilter,
        Layer,
        fmt::time::UtcTime,
        prelude::*,
        util::SubscriberInitExt,
    },
};

/// Initializes the global tracing subscriber and the panic hook.
///
/// Every event is written to stderr. Stdout is reserved for the result a
/// binary reports to its caller, so logs must never end up there.
pub fn initialize(config: &Config) {
    set_tracing_subscriber(config);
    panic_hook::install();
}

fn set_tracing_subscriber(config: &Config) {
    let env_filter = EnvFilter::new(&config.env_filter);
    let timer = UtcTime::new(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    ));

    let fmt_layer = if config.use_json_format {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_timer(timer)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_timer(timer)
            .with_ansi(std::io::stderr().is_terminal())
            .boxed()
    };

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(env_filter))
        .init();
}
