use std::env;

use config::Config;
use dotenvy::dotenv;

use lavori_backoffice::models::config::AppConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        // Add `./config/default.yaml`
        .add_source(config::File::with_name("config/default"))
        // Add environment-specific overrides
        .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
        // Add settings from the environment (with a prefix of APP)
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {}", err);
            std::process::exit(1);
        }
    };

    let app_config = match settings.try_deserialize::<AppConfig>() {
        Ok(app_config) => app_config,
        Err(err) => {
            log::error!("Error loading app config: {}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = lavori_backoffice::run(app_config).await {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
