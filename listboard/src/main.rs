#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let config = listboard::config::Config::from_env()?;
    listboard::web::start_web_server(config).await
}
