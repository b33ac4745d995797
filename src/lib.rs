pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::Settings;
pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::products::list_products,
        handlers::categories::list_categories,
        handlers::customers::list_customers,
        handlers::orders::list_orders,
        handlers::orders::create_order,
        handlers::stats::get_stats,
    ),
    components(schemas(
        handlers::orders::CreateOrderRequest,
        handlers::orders::OrderItemRequest,
        handlers::orders::CreateOrderResponse,
        handlers::stats::StatsResponse,
    )),
    tags((name = "store", description = "Store CRUD endpoints"))
)]
struct ApiDoc;

/// Build and return an actix-web `Server` bound to the configured address.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server. The `/api/load` routes are only registered when
/// `Settings::enable_load_endpoints` is set.
pub fn build_server(pool: DbPool, settings: Settings) -> std::io::Result<actix_web::dev::Server> {
    let bind_addr = (settings.host.clone(), settings.port);

    Ok(HttpServer::new(move || {
        let mut api = web::scope("/api")
            .route("/products", web::get().to(handlers::products::list_products))
            .route("/categories", web::get().to(handlers::categories::list_categories))
            .route("/customers", web::get().to(handlers::customers::list_customers))
            .route("/orders", web::get().to(handlers::orders::list_orders))
            .route("/orders", web::post().to(handlers::orders::create_order))
            .route("/stats", web::get().to(handlers::stats::get_stats))
            .route("/files", web::get().to(handlers::files::list_files))
            .route(
                "/files/download/{filename}",
                web::get().to(handlers::files::download_file),
            )
            .route("/upload", web::post().to(handlers::files::upload_file))
            .route(
                "/files/delete/{filename}",
                web::delete().to(handlers::files::delete_file),
            );

        if settings.enable_load_endpoints {
            api = api
                .route("/load/cpu", web::get().to(handlers::load::cpu_load))
                .route("/load/ram", web::get().to(handlers::load::ram_load));
        }

        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(settings.clone()))
            .wrap(Logger::default())
            .service(api)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind(bind_addr)?
    .run())
}
