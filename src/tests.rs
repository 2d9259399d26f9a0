//! Integration tests for the statusboard backend.

use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::errors::AppError;
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    repo: Arc<Repository>,
    pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_psk(Some("test-api-key".to_string())).await
    }

    async fn with_psk(psk: Option<String>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool.clone()));

        // Create config
        let config = Config {
            api_psk: psk.clone(),
            db_path,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
        };

        let state = AppState {
            repo: repo.clone(),
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let mut client_builder = Client::builder();
        if let Some(key) = psk {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert("x-api-key", key.parse().unwrap());
            client_builder = client_builder.default_headers(headers);
        }

        TestFixture {
            client: client_builder.build().unwrap(),
            base_url,
            repo,
            pool,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Create a project through the API and return its id.
    async fn create_project(&self, body: Value) -> String {
        let resp = self
            .client
            .post(self.url("/api/projects"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Run a confirmed rollover and return the summary payload.
    async fn rollover(&self) -> Value {
        let resp = self
            .client
            .post(self.url("/api/periods/create-next"))
            .json(&json!({ "confirmed": true }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["success"], true);
        body["data"].clone()
    }
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_auth_missing_psk() {
    let fixture = TestFixture::new().await;

    // Request without API key
    let client = Client::new();
    let resp = client
        .get(fixture.url("/api/periods"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_auth_valid_psk() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/periods"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_current_period_404_before_bootstrap() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/periods/current"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_next_period_preview_is_idempotent() {
    let fixture = TestFixture::new().await;

    let mut previews = Vec::new();
    for _ in 0..3 {
        let resp = fixture
            .client
            .get(fixture.url("/api/periods/next"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        previews.push(body["data"].clone());
    }

    assert_eq!(previews[0], previews[1]);
    assert_eq!(previews[1], previews[2]);
    assert!(previews[0]["startDate"].is_string());
    assert!(previews[0]["endDate"].is_string());
    assert!(previews[0]["name"].is_string());

    // No mutation happened
    let list: Value = fixture
        .client
        .get(fixture.url("/api/periods"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_next_unconfirmed_returns_preview_only() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/periods/create-next"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["preview"], true);
    assert!(body["data"]["nextPeriod"]["name"].is_string());
    assert!(body["data"]["message"].is_string());
    assert!(!body["data"]["actions"].as_array().unwrap().is_empty());

    // Still no periods
    let list: Value = fixture
        .client
        .get(fixture.url("/api/periods"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_bootstrap_rollover_creates_active_period() {
    let fixture = TestFixture::new().await;

    let preview: Value = fixture
        .client
        .get(fixture.url("/api/periods/next"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let summary = fixture.rollover().await;
    assert_eq!(summary["newPeriod"]["isActive"], true);
    assert_eq!(summary["newPeriod"]["isLocked"], false);
    assert_eq!(
        summary["newPeriod"]["periodName"],
        preview["data"]["name"]
    );
    assert_eq!(
        summary["newPeriod"]["periodStart"],
        preview["data"]["startDate"]
    );
    assert_eq!(summary["lockedPreviousPeriodsCount"], 0);

    // Current period now resolves to the new one
    let current: Value = fixture
        .client
        .get(fixture.url("/api/periods/current"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(current["data"]["id"], summary["newPeriod"]["id"]);
}

#[tokio::test]
async fn test_rollover_locks_previous_and_keeps_one_active() {
    let fixture = TestFixture::new().await;

    let first = fixture.rollover().await;
    let second = fixture.rollover().await;

    assert_eq!(second["lockedPreviousPeriodsCount"], 1);

    let list: Value = fixture
        .client
        .get(fixture.url("/api/periods"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let periods = list["data"].as_array().unwrap();
    assert_eq!(periods.len(), 2);

    let active: Vec<&Value> = periods
        .iter()
        .filter(|p| p["isActive"] == true)
        .collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"], second["newPeriod"]["id"]);

    let old = periods
        .iter()
        .find(|p| p["id"] == first["newPeriod"]["id"])
        .unwrap();
    assert_eq!(old["isLocked"], true);
    assert!(old["lockedAt"].is_string());

    // Newest first ordering
    assert_eq!(periods[0]["id"], second["newPeriod"]["id"]);
}

#[tokio::test]
async fn test_copy_forward_fidelity() {
    let fixture = TestFixture::new().await;

    let benefits = json!({
        "fteSavings": { "applicable": "yes", "details": "x" }
    });
    let project_id = fixture
        .create_project(json!({
            "name": "Invoice OCR",
            "description": "Automated invoice reading",
            "benefits": benefits,
            "keyRisks": "risk A"
        }))
        .await;

    let summary = fixture.rollover().await;
    let period_id = summary["newPeriod"]["id"].as_str().unwrap();
    assert_eq!(summary["copiedProjectsCount"], 1);
    // benefits + key_risks + description copied; key_updates unset
    assert_eq!(summary["copiedDataRecordsCount"], 3);

    // Merged view returns the copied values byte-for-byte
    let merged: Value = fixture
        .client
        .get(fixture.url(&format!(
            "/api/projects/{}/periods/{}",
            project_id, period_id
        )))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(merged["data"]["benefits"], benefits);
    assert_eq!(merged["data"]["keyRisks"], "risk A");
    assert_eq!(merged["data"]["description"], "Automated invoice reading");

    // Live row untouched by the copy
    let live: Value = fixture
        .client
        .get(fixture.url(&format!("/api/projects/{}", project_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(live["data"]["benefits"], benefits);
    assert_eq!(live["data"]["keyRisks"], "risk A");
}

#[tokio::test]
async fn test_snapshot_survives_live_edit() {
    let fixture = TestFixture::new().await;

    let project_id = fixture
        .create_project(json!({ "name": "Chatbot", "keyRisks": "risk A" }))
        .await;

    let summary = fixture.rollover().await;
    let period_id = summary["newPeriod"]["id"].as_str().unwrap().to_string();

    // Edit the live row after the snapshot was taken
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/projects/{}", project_id)))
        .json(&json!({ "keyRisks": "risk B" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Period-scoped view still shows the snapshot value
    let merged: Value = fixture
        .client
        .get(fixture.url(&format!(
            "/api/projects/{}/periods/{}",
            project_id, period_id
        )))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(merged["data"]["keyRisks"], "risk A");

    let live: Value = fixture
        .client
        .get(fixture.url(&format!("/api/projects/{}", project_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(live["data"]["keyRisks"], "risk B");
}

#[tokio::test]
async fn test_duplicate_rollover_conflicts_and_rolls_back() {
    let fixture = TestFixture::new().await;

    fixture
        .create_project(json!({ "name": "Doc Summarizer", "keyRisks": "risk A" }))
        .await;

    let summary = fixture.rollover().await;
    let current_id = summary["newPeriod"]["id"].as_str().unwrap().to_string();

    // Force the transaction down the in-flight duplicate path: same bounds
    // as the period that already exists, bypassing the pre-check.
    let start = fixture
        .repo
        .get_period(&current_id)
        .await
        .unwrap()
        .unwrap()
        .period_start;
    let bounds = crate::schedule::period_containing(start);
    let err = fixture.repo.rollover_into(bounds).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Full rollback: the current period is still active and unlocked,
    // and no extra periods or data rows appeared.
    let current = fixture.repo.get_current_period().await.unwrap().unwrap();
    assert_eq!(current.id, current_id);
    assert!(current.is_active);
    assert!(!current.is_locked);
    assert_eq!(fixture.repo.list_periods().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_copy_forward_failure_rolls_back_period_insert() {
    let fixture = TestFixture::new().await;

    let project_id = fixture
        .create_project(json!({ "name": "Doc Summarizer", "keyRisks": "risk A" }))
        .await;

    let summary = fixture.rollover().await;
    let current_id = summary["newPeriod"]["id"].as_str().unwrap().to_string();
    let baseline_rows = fixture
        .repo
        .get_project_data(&project_id, &current_id)
        .await
        .unwrap()
        .len();

    // Make the copy step itself fail, after the lock and the new period
    // insert have already run inside the transaction.
    sqlx::query("ALTER TABLE project_data RENAME TO project_data_hidden")
        .execute(&fixture.pool)
        .await
        .unwrap();

    let bounds = fixture.repo.preview_next_period().await.unwrap();
    let err = fixture.repo.rollover_into(bounds).await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));

    sqlx::query("ALTER TABLE project_data_hidden RENAME TO project_data")
        .execute(&fixture.pool)
        .await
        .unwrap();

    // Full rollback: the inserted period row is gone, the predecessor is
    // still active and unlocked, and its data rows are untouched.
    assert!(fixture
        .repo
        .find_period_by_range(bounds.start, bounds.end)
        .await
        .unwrap()
        .is_none());
    assert_eq!(fixture.repo.list_periods().await.unwrap().len(), 1);
    let current = fixture.repo.get_current_period().await.unwrap().unwrap();
    assert_eq!(current.id, current_id);
    assert!(current.is_active);
    assert!(!current.is_locked);
    assert_eq!(
        fixture
            .repo
            .get_project_data(&project_id, &current_id)
            .await
            .unwrap()
            .len(),
        baseline_rows
    );
}

#[tokio::test]
async fn test_concurrent_rollovers_create_exactly_one_period() {
    let fixture = TestFixture::new().await;
    fixture.rollover().await;

    // Both contenders target the same boundaries; the unique index on
    // (period_start, period_end) must let exactly one through.
    let bounds = fixture.repo.preview_next_period().await.unwrap();
    let (a, b) = tokio::join!(
        fixture.repo.rollover_into(bounds),
        fixture.repo.rollover_into(bounds)
    );

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1);
    let err = if a.is_err() {
        a.unwrap_err()
    } else {
        b.unwrap_err()
    };
    assert!(matches!(err, AppError::Conflict(_)));

    // One bootstrap period plus exactly one new one
    assert_eq!(fixture.repo.list_periods().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_locked_period_rejects_field_writes() {
    let fixture = TestFixture::new().await;

    let project_id = fixture.create_project(json!({ "name": "Forecaster" })).await;

    let first = fixture.rollover().await;
    let locked_period_id = first["newPeriod"]["id"].as_str().unwrap().to_string();
    fixture.rollover().await;

    // The first period is now locked; direct field writes must be rejected
    let resp = fixture
        .client
        .put(fixture.url(&format!(
            "/api/projects/{}/periods/{}/fields/key_risks",
            project_id, locked_period_id
        )))
        .json(&json!({ "value": "sneaky edit" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 423);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "LOCKED");
}

#[tokio::test]
async fn test_locked_period_update_requires_force() {
    let fixture = TestFixture::new().await;

    let first = fixture.rollover().await;
    let locked_id = first["newPeriod"]["id"].as_str().unwrap().to_string();
    fixture.rollover().await;

    // Plain update is rejected
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/periods/{}", locked_id)))
        .json(&json!({ "periodName": "Renamed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 423);

    // Administrative path goes through
    let forced = fixture
        .client
        .put(fixture.url(&format!("/api/periods/{}", locked_id)))
        .json(&json!({ "periodName": "Renamed", "force": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(forced.status(), 200);
    let body: Value = forced.json().await.unwrap();
    assert_eq!(body["data"]["periodName"], "Renamed");

    // Deletion stays blocked while locked
    let deleted = fixture
        .client
        .delete(fixture.url(&format!("/api/periods/{}", locked_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), 423);
}

#[tokio::test]
async fn test_explicit_lock_with_snapshot() {
    let fixture = TestFixture::new().await;

    let summary = fixture.rollover().await;
    let period_id = summary["newPeriod"]["id"].as_str().unwrap().to_string();

    let snapshot = json!({ "projects": [{ "name": "Archived state" }] });
    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/periods/{}/lock", period_id)))
        .json(&json!({ "dataSnapshot": snapshot }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["isLocked"], true);
    assert_eq!(body["data"]["isActive"], false);
    assert_eq!(body["data"]["dataSnapshot"], snapshot);

    // Locking twice is a conflict
    let again = fixture
        .client
        .post(fixture.url(&format!("/api/periods/{}/lock", period_id)))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), 409);
}

#[tokio::test]
async fn test_field_write_and_merged_view() {
    let fixture = TestFixture::new().await;

    let project_id = fixture
        .create_project(json!({ "name": "Churn Model", "businessLead": "Alex" }))
        .await;
    let summary = fixture.rollover().await;
    let period_id = summary["newPeriod"]["id"].as_str().unwrap().to_string();

    let resp = fixture
        .client
        .put(fixture.url(&format!(
            "/api/projects/{}/periods/{}/fields/key_updates",
            project_id, period_id
        )))
        .json(&json!({ "value": "shipped v2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["fieldName"], "key_updates");
    assert_eq!(body["data"]["fieldValue"], "shipped v2");

    let merged: Value = fixture
        .client
        .get(fixture.url(&format!(
            "/api/projects/{}/periods/{}",
            project_id, period_id
        )))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(merged["data"]["keyUpdates"], "shipped v2");
    // Non-overridden fields show live values
    assert_eq!(merged["data"]["businessLead"], "Alex");

    // Unknown field names are rejected
    let bad = fixture
        .client
        .put(fixture.url(&format!(
            "/api/projects/{}/periods/{}/fields/password",
            project_id, period_id
        )))
        .json(&json!({ "value": "nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad.status(), 400);
}

#[tokio::test]
async fn test_period_projects_listing() {
    let fixture = TestFixture::new().await;

    fixture
        .create_project(json!({ "name": "Project A", "keyRisks": "a" }))
        .await;
    fixture
        .create_project(json!({ "name": "Project B", "keyRisks": "b" }))
        .await;

    let summary = fixture.rollover().await;
    let period_id = summary["newPeriod"]["id"].as_str().unwrap().to_string();

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/periods/{}/projects", period_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let projects = body["data"].as_array().unwrap();
    assert_eq!(projects.len(), 2);

    // Period detail carries the derived project count
    let detail: Value = fixture
        .client
        .get(fixture.url(&format!("/api/periods/{}", period_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["data"]["projectCount"], 2);

    // Unknown period is a 404
    let missing = fixture
        .client
        .get(fixture.url("/api/periods/unknown-id/projects"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_project_crud() {
    let fixture = TestFixture::new().await;

    let project_id = fixture
        .create_project(json!({
            "name": "Test Project",
            "businessLead": "Jordan",
            "currentProjectStage": "poc",
            "currentAiStage": "model-building"
        }))
        .await;

    // Get
    let get_body: Value = fixture
        .client
        .get(fixture.url(&format!("/api/projects/{}", project_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(get_body["data"]["name"], "Test Project");
    assert_eq!(get_body["data"]["currentProjectStage"], "poc");

    // Update merges fields
    let update_body: Value = fixture
        .client
        .put(fixture.url(&format!("/api/projects/{}", project_id)))
        .json(&json!({ "name": "Renamed Project", "currentAiStage": "deployment" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(update_body["data"]["name"], "Renamed Project");
    assert_eq!(update_body["data"]["currentAiStage"], "deployment");
    assert_eq!(update_body["data"]["businessLead"], "Jordan");

    // List
    let list_body: Value = fixture
        .client
        .get(fixture.url("/api/projects"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list_body["data"].as_array().unwrap().len(), 1);

    // Delete
    let delete_resp = fixture
        .client
        .delete(fixture.url(&format!("/api/projects/{}", project_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(delete_resp.status(), 200);

    let gone = fixture
        .client
        .get(fixture.url(&format!("/api/projects/{}", project_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(gone.status(), 404);
}

#[tokio::test]
async fn test_validation_errors() {
    let fixture = TestFixture::new().await;

    // Empty name
    let resp = fixture
        .client
        .post(fixture.url("/api/projects"))
        .json(&json!({ "name": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Overlong name
    let resp2 = fixture
        .client
        .post(fixture.url("/api/projects"))
        .json(&json!({ "name": "x".repeat(300) }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp2.status(), 400);
}

#[tokio::test]
async fn test_next_step_lifecycle() {
    let fixture = TestFixture::new().await;

    let project_id = fixture.create_project(json!({ "name": "Ticket Triage" })).await;
    let summary = fixture.rollover().await;
    let period_id = summary["newPeriod"]["id"].as_str().unwrap().to_string();

    // Create
    let create_body: Value = fixture
        .client
        .post(fixture.url(&format!(
            "/api/projects/{}/periods/{}/steps",
            project_id, period_id
        )))
        .json(&json!({ "description": "Collect labeled tickets", "owner": "Sam" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(create_body["success"], true);
    let step_id = create_body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(create_body["data"]["completed"], false);

    // List
    let list_body: Value = fixture
        .client
        .get(fixture.url(&format!(
            "/api/projects/{}/periods/{}/steps",
            project_id, period_id
        )))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list_body["data"].as_array().unwrap().len(), 1);

    // Update
    let update_body: Value = fixture
        .client
        .put(fixture.url(&format!("/api/steps/{}", step_id)))
        .json(&json!({ "completed": true }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(update_body["data"]["completed"], true);
    assert_eq!(update_body["data"]["owner"], "Sam");

    // Lock the period; further step writes are rejected
    fixture.rollover().await;
    let blocked = fixture
        .client
        .put(fixture.url(&format!("/api/steps/{}", step_id)))
        .json(&json!({ "completed": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(blocked.status(), 423);

    let blocked_delete = fixture
        .client
        .delete(fixture.url(&format!("/api/steps/{}", step_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(blocked_delete.status(), 423);
}

#[tokio::test]
async fn test_not_found_errors() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/projects/non-existent-id"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let resp2 = fixture
        .client
        .get(fixture.url("/api/periods/non-existent-id"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp2.status(), 404);
}
