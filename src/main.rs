use account_service::{account_requests, config::Config, db};
use actix_web::{middleware::Logger, web::Data, App, HttpServer};

fn startup_error<E: std::fmt::Display>(context: &str, err: E) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| startup_error("Invalid configuration", e))?;

    log::info!("Opening database at {}", config.database_url);
    let pool = db::build_pool(&config.database_url, config.pool_size)
        .map_err(|e| startup_error("Failed to create pool", e))?;
    db::run_migrations(&pool).map_err(|e| startup_error("Failed to apply database schema", e))?;

    let pool = Data::new(pool);

    log::info!("Starting HTTP server at {}", config.bind_address);
    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .wrap(Logger::default())
            .configure(account_requests::configure)
    })
    .bind(config.bind_address.as_str())?
    .run()
    .await
}
