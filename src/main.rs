use dotenvy::dotenv;
use store_service::{build_server, create_pool, run_migrations, Settings};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = Settings::from_env();

    std::fs::create_dir_all(&settings.upload_dir)?;

    let pool = create_pool(&settings.database_url);
    run_migrations(&pool);

    log::info!(
        "Starting server at http://{}:{}",
        settings.host,
        settings.port
    );

    build_server(pool, settings)?.await
}
