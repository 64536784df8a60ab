//! Test helpers for service and Web API tests.

use std::sync::Arc;

use axum_test::TestServer;
use tempfile::TempDir;

use orgdrive::config::{ServerConfig, WebhookConfig};
use orgdrive::drive::{DriveService, ServiceOptions};
use orgdrive::storage::LocalBlobStorage;
use orgdrive::user::{NewUser, OrgRole, User};
use orgdrive::web::WebServer;
use orgdrive::{CallerIdentity, Database};

/// A service wired to an in-memory database and a temp blob directory.
pub struct TestContext {
    pub service: Arc<DriveService>,
    pub db: Database,
    // Held so the blob directory outlives the test
    pub storage_dir: TempDir,
}

/// Create a test service with default options.
pub async fn create_service() -> TestContext {
    create_service_with_options(ServiceOptions::default()).await
}

/// Create a test service with custom options.
pub async fn create_service_with_options(options: ServiceOptions) -> TestContext {
    let db = Database::connect_in_memory()
        .await
        .expect("Failed to create test database");

    let storage_dir = TempDir::new().expect("Failed to create temp storage dir");
    let storage = Arc::new(LocalBlobStorage::new(storage_dir.path()).unwrap());

    let service = Arc::new(DriveService::new(db.pool().clone(), storage, options));

    TestContext {
        service,
        db,
        storage_dir,
    }
}

/// Create a test server over a fresh service.
pub async fn create_test_server() -> (TestServer, TestContext) {
    create_test_server_with_secret("").await
}

/// Create a test server with a webhook secret configured.
pub async fn create_test_server_with_secret(secret: &str) -> (TestServer, TestContext) {
    let ctx = create_service().await;

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![],
    };
    let webhook = WebhookConfig {
        secret: secret.to_string(),
    };

    let web_server =
        WebServer::new(&config, &webhook, ctx.service.clone()).expect("Failed to build server");
    let server = TestServer::new(web_server.router()).expect("Failed to create test server");

    (server, ctx)
}

/// The caller identity used by most tests.
pub fn caller(token: &str) -> CallerIdentity {
    CallerIdentity::new(token)
}

/// Register a user and add a membership, the standard fixture of the
/// behavior scenarios.
pub async fn register_member(service: &DriveService, token: &str, org_id: &str) -> User {
    let user = service
        .create_user(NewUser {
            token_identifier: token.to_string(),
            name: "Test User".to_string(),
            image: "test-image-url".to_string(),
        })
        .await
        .unwrap();

    service
        .add_org_to_user(token, org_id, OrgRole::Member)
        .await
        .unwrap();

    user
}
