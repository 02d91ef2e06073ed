use actix_governor::Governor;
use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use dotenvy::dotenv;
use std::env;
use url::Url;

use comick_rss::{api, comick::ComickClient, observability, security};

/// CLI options
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Override the listen port
    #[clap(long)]
    port: Option<u16>,
}

fn main() -> std::io::Result<()> {
    dotenv().ok();
    observability::init_logging();

    let mut config = load_config();

    let args = Args::parse();
    if let Some(port) = args.port {
        config.port = port;
    }

    run_server(config)
}

struct AppConfig {
    port: u16,
    comick_api: Url,
}

fn load_config() -> AppConfig {
    let port = match env::var("CR_PORT") {
        Ok(port) => {
            log::info!("Using port from CR_PORT: {}", port);
            port.parse::<u16>().expect("Failed to parse CR_PORT")
        }
        Err(_) => {
            log::info!("Using default port: 8080");
            8080
        }
    };
    let comick_api = match env::var("CR_COMICK_API") {
        Ok(raw) => {
            log::info!("Using Comick API base from CR_COMICK_API: {}", raw);
            Url::parse(&raw).expect("CR_COMICK_API must be a valid URL")
        }
        Err(_) => {
            let default = "https://api.comick.io";
            log::info!("Using default Comick API base: {}", default);
            Url::parse(default).expect("default API base is a valid URL")
        }
    };

    AppConfig { port, comick_api }
}

#[actix_web::main]
async fn run_server(config: AppConfig) -> std::io::Result<()> {
    tracing::info!("Starting server at http://127.0.0.1:{}", config.port);

    let client = web::Data::new(ComickClient::new(config.comick_api));

    HttpServer::new(move || {
        let feed_rate_limiter = security::create_rate_limiter();

        App::new()
            .wrap(tracing_actix_web::TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(middleware::NormalizePath::new(
                middleware::TrailingSlash::Trim,
            ))
            .wrap(security::SecurityHeaders)
            .app_data(client.clone())
            .service(api::health::routes())
            .service(api::feed::routes().wrap(Governor::new(&feed_rate_limiter)))
    })
    .workers(1)
    .bind(("127.0.0.1", config.port))?
    .run()
    .await
}
