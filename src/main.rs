use color_eyre::eyre::Result;
use dotenv::dotenv;
use tracing::{info, warn};
use tutorsync_api::config::ApiConfig;
use tutorsync_db::{create_pool, schema::initialize_database, Stores};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let config = ApiConfig::from_env()?;
    tutorsync_api::init_tracing(config.log_level)?;

    let stores = match &config.database_url {
        Some(database_url) => {
            let db_pool = create_pool(database_url).await?;
            initialize_database(&db_pool).await?;
            info!("Using PostgreSQL store");
            Stores::postgres(db_pool)
        }
        None => {
            warn!("DATABASE_URL not set; data lives in memory and is lost on exit");
            Stores::memory()
        }
    };

    tutorsync_api::start_server(config, stores).await?;

    Ok(())
}
