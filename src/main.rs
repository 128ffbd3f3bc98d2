use contacts_api::config::{Config, load_from_env};
use contacts_api::server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = load_from_env()?;
    init_tracing(&config);
    config.print_summary();

    server::run(config).await
}

/// Filter from `RUST_LOG`; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::new(config.log_level.as_str());

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if config.log_format.eq_ignore_ascii_case("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}
