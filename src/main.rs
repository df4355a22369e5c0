use thumbgenai::{logger, server, Config, GenAiClient};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let config = Config::from_env();
    logger::init_with_config(logger::LoggerConfig::from_env(&config))?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    logger::log_startup_info(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.server.host(),
        config.server.port(),
    );
    logger::log_config_info(&config);

    let clients = match GenAiClient::new(&config) {
        Ok(clients) => clients,
        Err(e) => {
            log::error!("❌ Failed to initialize upstream clients: {}", e);
            return Err(e.into());
        }
    };

    server::run(config, clients).await?;
    log::info!("👋 Server stopped");
    Ok(())
}
