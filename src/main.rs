mod api;
mod database;
mod middleware;
mod models;
mod services;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "4000".to_string());
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    log::info!("🚀 Starting Storefront Service...");
    log::info!("📊 Database: {}", database_url);

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_origin("http://localhost:5173") // Storefront (Vite)
            .allowed_origin("http://localhost:5174") // Admin panel (Vite)
            .allowed_origin("http://127.0.0.1:5173")
            .allowed_origin("http://127.0.0.1:5174")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .allowed_header("token")
            .supports_credentials()
            .max_age(3600);

        // Production origins
        if let Ok(frontend_url) = env::var("FRONTEND_URL") {
            cors = cors.allowed_origin(&frontend_url);
        }
        if let Ok(admin_url) = env::var("ADMIN_URL") {
            cors = cors.allowed_origin(&admin_url);
        }

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(api::json_error_config())
            .wrap(cors)
            .wrap(Logger::default())
            // Swagger UI
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()))
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Metrics
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            // Root route
            .route("/", web::get().to(|| async { HttpResponse::Ok().body("API Working") }))
            // User endpoints
            .service(
                web::scope("/api/user")
                    .route("/register", web::post().to(api::user::register))
                    .route("/login", web::post().to(api::user::login))
                    .route("/admin", web::post().to(api::user::admin_login)),
            )
            // Product catalog: listing is public, mutation is admin-only
            .service(
                web::scope("/api/product")
                    .route("/list", web::get().to(api::product::list_products))
                    .route("/single", web::post().to(api::product::single_product))
                    .service(
                        web::resource("/add")
                            .wrap(middleware::AdminAuthMiddleware)
                            .route(web::post().to(api::product::add_product)),
                    )
                    .service(
                        web::resource("/remove")
                            .wrap(middleware::AdminAuthMiddleware)
                            .route(web::post().to(api::product::remove_product)),
                    ),
            )
            // Cart reconciliation: one operation per request, token-resolved user
            .service(
                web::scope("/api/cart")
                    .wrap(middleware::AuthMiddleware)
                    .route("/add", web::post().to(api::cart::add_to_cart))
                    .route("/update", web::post().to(api::cart::update_cart))
                    .route("/get", web::post().to(api::cart::get_user_cart)),
            )
            // Orders: user checkout/tracking + admin management
            .service(
                web::scope("/api/order")
                    .service(
                        web::resource("/list")
                            .wrap(middleware::AdminAuthMiddleware)
                            .route(web::post().to(api::order::list_all_orders)),
                    )
                    .service(
                        web::resource("/status")
                            .wrap(middleware::AdminAuthMiddleware)
                            .route(web::post().to(api::order::update_status)),
                    )
                    .service(
                        web::scope("")
                            .wrap(middleware::AuthMiddleware)
                            .route("/place", web::post().to(api::order::place_order))
                            .route("/stripe", web::post().to(api::order::place_order_stripe))
                            .route("/verifyStripe", web::post().to(api::order::verify_stripe))
                            .route("/userorders", web::post().to(api::order::user_orders)),
                    ),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
