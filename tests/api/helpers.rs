use once_cell::sync::Lazy;
use opunnence::configuration::{
    ApplicationSettings, CorsSettings, DatabaseSettings, EmailClientSettings, Settings,
};
use opunnence::startup::Application;
use opunnence::storage::Database;
use opunnence::telemetry::{get_subscriber, init_subscriber};
use secrecy::Secret;
use uuid::Uuid;
use wiremock::MockServer;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub db: Database,
    pub email_server: MockServer,
    pub api_client: reqwest::Client,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

// Launch the application against a per-test SQLite file and a mocked email
// provider; `customize` can poke at the settings before startup.
pub async fn spawn_app_with<F>(customize: F) -> TestApp
where
    F: FnOnce(&mut Settings),
{
    Lazy::force(&TRACING);

    let email_server = MockServer::start().await;

    let mut settings = Settings {
        application: ApplicationSettings {
            host: "127.0.0.1".into(),
            port: 0, // Random OS port
            static_dir: "does-not-exist".into(),
        },
        database: DatabaseSettings {
            url: None,
            fallback_path: test_database_path(),
            pool_timeout_seconds: 5,
        },
        email_client: EmailClientSettings {
            base_url: email_server.uri(),
            sender_email: "onboarding@resend.dev".into(),
            api_key: Some(Secret::new("test-api-key".into())),
            recipient_email: Some("owner@example.com".into()),
        },
        cors: CorsSettings::default(),
    };
    customize(&mut settings);

    let db = Database::connect(&settings.database).expect("Failed to open the test database");

    let application = Application::build(settings)
        .await
        .expect("Failed to build application");

    let address = format!("http://127.0.0.1:{}", application.port());

    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address,
        db,
        email_server,
        api_client: reqwest::Client::new(),
    }
}

fn test_database_path() -> String {
    std::env::temp_dir()
        .join(format!("opunnence-test-{}.db", Uuid::new_v4()))
        .display()
        .to_string()
}

impl TestApp {
    pub async fn get_health(&self) -> reqwest::Response {
        self.api_client
            .get(&format!("{}/health", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_users(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/users", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_users(&self) -> reqwest::Response {
        self.api_client
            .get(&format!("{}/users", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_contact(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/contact", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
