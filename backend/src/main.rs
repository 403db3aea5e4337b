mod config;
mod features;
mod model;
mod routes;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use config::ServerConfig;
use model::BudgetModel;
use routes::{configure_routes, LoadedModel};
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = ServerConfig::from_env();

    // Keep serving the page without a model; /predict reports the problem.
    let model: LoadedModel = match BudgetModel::load(&config.model_path) {
        Ok(model) => {
            log::info!("Model loaded from {}", config.model_path.display());
            Some(model)
        }
        Err(e) => {
            log::error!(
                "Failed to load model from {}: {}. Train and export the model first.",
                config.model_path.display(),
                e
            );
            None
        }
    };
    let model = web::Data::new(model);

    let frontend_dir = config.frontend_dir.clone();
    let bind_address = config.bind_address();
    log::info!("Serving frontend from {}", frontend_dir);
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(model.clone())
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
