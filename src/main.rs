use azmon_query_core::core::config::AppConfig;
use azmon_query_core::core::logging::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let _log_guard = init_tracing(config.log_dir.as_deref());

    azmon_query_core::run(config).await
}
