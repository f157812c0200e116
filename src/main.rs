use std::env;

use config::Config;
use dotenvy::dotenv;

use gym_admin::models::config::ServerConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        // Add `./config/default.yaml`
        .add_source(config::File::with_name("config/default"))
        // Add environment-specific overrides
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        // Add settings from the environment (with a prefix of APP)
        .add_source(config::Environment::with_prefix("APP"))
        .build()
        .map_err(|err| {
            log::error!("Error loading settings: {err}");
            std::io::Error::other(err)
        })?;

    let server_config = settings.try_deserialize::<ServerConfig>().map_err(|err| {
        log::error!("Error loading server config: {err}");
        std::io::Error::other(err)
    })?;

    gym_admin::run(server_config).await
}
