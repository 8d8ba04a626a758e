use crate::configuration::Settings;
use crate::email_client::EmailClient;
use crate::routes::{create_user, health_check, home, list_users, service_info, submit_contact};
use crate::storage::Database;
use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::http::header;
use actix_web::web::{self, Data};
use actix_web::{App, HttpServer};
use std::net::TcpListener;
use std::path::Path;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let database = Database::connect(&configuration.database)?;
        database.ensure_schema().await?;
        let email_client = configuration.email_client.client();

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            database,
            email_client,
            configuration.cors.origin_list(),
            configuration.application.static_dir,
        )?;
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    database: Database,
    email_client: EmailClient,
    cors_origins: Option<Vec<String>>,
    static_dir: String,
) -> Result<Server, anyhow::Error> {
    let database = Data::new(database);
    let email_client = Data::new(email_client);
    let serve_frontend = Path::new(&static_dir).join("index.html").is_file();
    let server = HttpServer::new(move || {
        // Only POST and OPTIONS are allowed cross-origin; when no allow-list
        // is configured, every origin is echoed back.
        let cors = match &cors_origins {
            Some(origins) => origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin)),
            None => Cors::default().allowed_origin_fn(|_, _| true),
        }
        .allowed_methods(vec!["POST", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .supports_credentials();

        let mut app = App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .route("/health", web::get().to(health_check))
            .route("/info", web::get().to(service_info))
            .route("/users", web::get().to(list_users))
            .route("/users", web::post().to(create_user))
            .route("/contact", web::post().to(submit_contact))
            .app_data(database.clone())
            .app_data(email_client.clone());
        if serve_frontend {
            app = app.service(
                actix_files::Files::new("/", static_dir.clone()).index_file("index.html"),
            );
        } else {
            app = app.route("/", web::get().to(home));
        }
        app
    })
    .listen(listener)?
    .run();
    Ok(server)
}
