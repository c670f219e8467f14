use {
    dotenv::dotenv,
    rpc_resolver::{env::Config, error},
    std::str::FromStr,
    tokio::sync::broadcast,
    tracing::{info, warn},
    tracing_subscriber::fmt::format::FmtSpan,
};

#[tokio::main]
async fn main() -> error::ResolverResult<()> {
    dotenv().ok();

    let (signal, shutdown) = broadcast::channel(1);

    let config = Config::from_env()
        .map_err(|e| dbg!(e))
        .expect("Failed to load config, please ensure all env vars are valid.");

    tracing_subscriber::fmt()
        .with_max_level(
            tracing::Level::from_str(config.server.log_level.as_str()).expect("Invalid log level"),
        )
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(false)
        .init();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            // Dropping the sender would stop the server, so hold on to it.
            warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
        info!("Ctrl-C received, shutting down");
        let _ = signal.send(());
    });

    rpc_resolver::bootstrap(shutdown, config).await
}
