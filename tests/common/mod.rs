use payment_service::config::{Config, DatabaseConfig, ImportConfig, ServerConfig};
use payment_service::services::MongoDb;
use payment_service::startup::Application;
use secrecy::Secret;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: MongoDb,
    pub db_name: String,
    pub api_client: reqwest::Client,
}

pub fn mongo_uri() -> String {
    std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
}

pub fn test_config(db_name: &str, csv_path: Option<String>) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port for testing
        },
        database: DatabaseConfig {
            uri: Secret::new(mongo_uri()),
            db_name: db_name.to_string(),
        },
        import: ImportConfig { csv_path },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_csv(None).await
    }

    pub async fn spawn_with_csv(csv_path: Option<String>) -> Self {
        let db_name = format!("payment_test_{}", Uuid::new_v4().simple());
        let config = test_config(&db_name, csv_path);

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("http://127.0.0.1:{}/health", port);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            db_name,
            api_client: client,
        }
    }

    /// Create a payment through the API and return its id.
    pub async fn create_payment(&self, body: &serde_json::Value) -> String {
        let response = self
            .api_client
            .post(format!("{}/payments/create", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute create request");
        assert_eq!(201, response.status().as_u16());

        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        body["payment_id"]
            .as_str()
            .expect("payment_id missing from create response")
            .to_string()
    }

    pub async fn upload_evidence(
        &self,
        payment_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> reqwest::Response {
        let form = reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(bytes)
                .file_name(file_name.to_string())
                .mime_str(mime)
                .expect("Invalid test MIME type"),
        );
        self.api_client
            .post(format!(
                "{}/payments/upload_evidence/{}",
                self.address, payment_id
            ))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute upload request")
    }

    pub async fn get_payments(&self, query: &str) -> serde_json::Value {
        let response = self
            .api_client
            .get(format!("{}/payments/get_payments{}", self.address, query))
            .send()
            .await
            .expect("Failed to execute list request");
        assert_eq!(200, response.status().as_u16());
        response.json().await.expect("Failed to parse JSON")
    }

    pub async fn cleanup(&self) {
        let _ = self.db.client().database(&self.db_name).drop(None).await;
    }
}

/// Full create payload with a far-future due date; tests override fields as
/// needed.
pub fn sample_payment_body() -> serde_json::Value {
    serde_json::json!({
        "payee_first_name": "Ana",
        "payee_last_name": "Silva",
        "payee_payment_status": "pending",
        "payee_added_date_utc": "2023-11-14T22:13:20Z",
        "payee_due_date": "2030-01-15",
        "payee_address_line_1": "1 Main St",
        "payee_city": "Springfield",
        "payee_country": "US",
        "payee_postal_code": "01101",
        "payee_phone_number": "15551234567",
        "payee_email": "ana@example.com",
        "currency": "USD",
        "due_amount": 100.0
    })
}
