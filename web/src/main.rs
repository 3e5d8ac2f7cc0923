#![deny(missing_docs)]

//! # Autodoc Binary
//!
//! Entry point for the Actix Web server.

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use autodoc_web::config::Config;
use autodoc_web::{configure, AppState};
use clap::Parser;
use std::net::TcpListener;

fn build_server(
    listener: TcpListener,
    state: web::Data<AppState>,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .listen(listener)?
    .run())
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = Config::parse();
    let state = AppState::from_config(&config).map_err(std::io::Error::other)?;
    let listener = TcpListener::bind(&config.bind)?;
    log::info!("listening on {}", listener.local_addr()?);
    let server = build_server(listener, web::Data::new(state))?;

    if std::env::var("AUTODOC_ONESHOT").is_ok() {
        server.handle().stop(true).await;
    }

    server.await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_build_server_start_stop() {
        let config = Config::parse_from(["autodoc", "--in-memory"]);
        let state = web::Data::new(AppState::from_config(&config).unwrap());
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let server = build_server(listener, state).unwrap();
        let handle = server.handle();
        actix_web::rt::spawn(server);
        handle.stop(true).await;
    }
}
