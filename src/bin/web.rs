//! Single binary web server for the bracket API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! DATA_FILE persists records to a JSON file; ADMIN_TOKEN guards mutating routes.

use actix_web::{web::Data, App, HttpServer};
use bracket_tournament_web::{web, AdminKey, MemoryStore, ServerConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let store = match &config.data_file {
        Some(path) => MemoryStore::open(path).map_err(std::io::Error::other)?,
        None => {
            log::info!("DATA_FILE not set; records are kept in memory only");
            MemoryStore::new()
        }
    };
    let state = Data::new(web::BracketState::new(
        store,
        AdminKey::new(config.admin_token.clone()),
    ));

    log::info!("Starting server at http://{}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(web::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
