use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use shelfmark_api::app::services::AppServices;
use shelfmark_auth::{CredentialStore, SessionClaims};
use shelfmark_core::AccountId;

struct TestServer {
    base_url: String,
    services: Arc<AppServices>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str) -> Self {
        // Same router as prod, bound to an ephemeral port; keep a handle on
        // the services so tests can reach the stores directly.
        let services = Arc::new(shelfmark_api::app::services::build_services(
            jwt_secret.to_string(),
        ));
        let app = shelfmark_api::app::build_app_with(services.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            services,
            handle,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(jwt_secret: &str, account_id: AccountId, iat: i64, exp: i64) -> String {
    let claims = SessionClaims {
        sub: account_id,
        iat,
        exp,
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

async fn register(
    client: &reqwest::Client,
    base_url: &str,
    name: &str,
    email: &str,
    password: &str,
) -> (String, serde_json::Value) {
    let res = client
        .post(format!("{}/auth/register", base_url))
        .json(&json!({ "name": name, "email": email, "password": password }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);

    let token = body["data"]["token"].as_str().unwrap().to_string();
    (token, body["data"]["user"].clone())
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/books", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "not authorized");
}

#[tokio::test]
async fn malformed_token_is_rejected() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/books", srv.base_url))
        .bearer_auth("not.a.jwt")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "invalid or expired");
}

#[tokio::test]
async fn expired_token_is_rejected_even_if_well_formed() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();

    let now = Utc::now().timestamp();
    let token = mint_jwt(jwt_secret, AccountId::new(), now - 600, now - 60);

    let res = client
        .get(format!("{}/books", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "invalid or expired");
}

#[tokio::test]
async fn token_for_vanished_account_is_rejected() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();

    // Well-formed, unexpired token for an account the store never held.
    let now = Utc::now().timestamp();
    let token = mint_jwt(jwt_secret, AccountId::new(), now, now + 600);

    let res = client
        .get(format!("{}/books", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "user not found");
}

#[tokio::test]
async fn register_login_and_me_flow() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let (_, user) = register(&client, &srv.base_url, "Alice", "alice@x.com", "secret1").await;
    assert_eq!(user["name"], "Alice");
    assert_eq!(user["email"], "alice@x.com");
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());

    // Wrong password: generic 401.
    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "alice@x.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "invalid credentials");

    // Unknown email: byte-for-byte the same failure.
    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "nobody@x.com", "password": "secret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let unknown: serde_json::Value = res.json().await.unwrap();
    assert_eq!(unknown, body);

    // Correct login, then /auth/me with the fresh token.
    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "alice@x.com", "password": "secret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let token = body["data"]["token"].as_str().unwrap();

    let res = client
        .get(format!("{}/auth/me", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["user"]["email"], "alice@x.com");
}

#[tokio::test]
async fn duplicate_email_is_rejected_case_insensitively() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "Alice", "alice@x.com", "secret1").await;

    let res = client
        .post(format!("{}/auth/register", srv.base_url))
        .json(&json!({ "name": "Other", "email": "ALICE@X.com", "password": "secret2" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn theme_update_accepts_enum_and_rejects_everything_else() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();
    let (token, _) = register(&client, &srv.base_url, "Alice", "alice@x.com", "secret1").await;

    let res = client
        .put(format!("{}/auth/theme", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "theme": "light" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["theme"], "light");

    let res = client
        .put(format!("{}/auth/theme", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "theme": "sepia" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn book_lifecycle_leaves_an_audit_trail() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();
    let (token, _) = register(&client, &srv.base_url, "Alice", "alice@x.com", "secret1").await;

    // Create.
    let res = client
        .post(format!("{}/books", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "isbn": "9780441013593",
            "year": 1965,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    let book_id = body["data"]["id"].as_str().unwrap().to_string();

    // Same ISBN again for the same account: conflict.
    let res = client
        .post(format!("{}/books", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Dune (again)",
            "author": "Frank Herbert",
            "isbn": "9780441013593",
            "year": 1965,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Update one field.
    let res = client
        .put(format!("{}/books/{}", srv.base_url, book_id))
        .bearer_auth(&token)
        .json(&json!({ "year": 1966 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["year"], 1966);
    assert_eq!(body["data"]["title"], "Dune");

    // Delete returns the prior state.
    let res = client
        .delete(format!("{}/books/{}", srv.base_url, book_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["title"], "Dune");

    // Deleting again: gone.
    let res = client
        .delete(format!("{}/books/{}", srv.base_url, book_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // History: one entry per mutation, newest first, DELETE keeps the title.
    let res = client
        .get(format!("{}/logs", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["action"], "DELETE");
    assert_eq!(entries[0]["book_title"], "Dune");
    assert_eq!(entries[1]["action"], "EDIT");
    assert_eq!(entries[1]["details"]["prior"]["year"], 1965);
    assert_eq!(entries[2]["action"], "ADD");

    // Clear is irreversible.
    let res = client
        .delete(format!("{}/logs", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/logs", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn books_are_invisible_across_accounts() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let (token_a, _) = register(&client, &srv.base_url, "Alice", "alice@x.com", "secret1").await;
    let (token_b, _) = register(&client, &srv.base_url, "Bob", "bob@x.com", "secret2").await;

    let res = client
        .post(format!("{}/books", srv.base_url))
        .bearer_auth(&token_a)
        .json(&json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "isbn": "9780441013593",
            "year": 1965,
        }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    let book_id = body["data"]["id"].as_str().unwrap().to_string();

    // Bob sees NotFound, never a "forbidden".
    let res = client
        .get(format!("{}/books/{}", srv.base_url, book_id))
        .bearer_auth(&token_b)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .put(format!("{}/books/{}", srv.base_url, book_id))
        .bearer_auth(&token_b)
        .json(&json!({ "year": 2000 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/books/{}", srv.base_url, book_id))
        .bearer_auth(&token_b)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Bob's own list is empty, and he may hold the same ISBN.
    let res = client
        .get(format!("{}/books", srv.base_url))
        .bearer_auth(&token_b)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());

    let res = client
        .post(format!("{}/books", srv.base_url))
        .bearer_auth(&token_b)
        .json(&json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "isbn": "9780441013593",
            "year": 1965,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn book_validation_failures_are_bad_requests() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();
    let (token, _) = register(&client, &srv.base_url, "Alice", "alice@x.com", "secret1").await;

    for body in [
        json!({ "title": "Dune", "author": "Herbert", "isbn": "short", "year": 1965 }),
        json!({ "title": "Dune", "author": "Herbert", "isbn": "9780441013593", "year": 999 }),
        json!({ "title": "  ", "author": "Herbert", "isbn": "9780441013593", "year": 1965 }),
    ] {
        let res = client
            .post(format!("{}/books", srv.base_url))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn undeserializable_bodies_get_enveloped_400s() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();
    let (token, _) = register(&client, &srv.base_url, "Alice", "alice@x.com", "secret1").await;

    // Missing fields must not fall through to the framework's plain-text 422.
    let res = client
        .post(format!("{}/books", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "title": "Dune" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());

    // Mistyped field, same contract.
    let res = client
        .put(format!("{}/auth/theme", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "theme": 7 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);

    // Public endpoints go through the same wrapper.
    let res = client
        .post(format!("{}/auth/register", srv.base_url))
        .json(&json!({ "email": "bob@x.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn password_reset_flow() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();
    register(&client, &srv.base_url, "Alice", "alice@x.com", "secret1").await;

    // Unknown email: 404.
    let res = client
        .post(format!("{}/auth/forgot-password", srv.base_url))
        .json(&json!({ "email": "nobody@x.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Known email: generic success, no token in the body.
    let res = client
        .post(format!("{}/auth/forgot-password", srv.base_url))
        .json(&json!({ "email": "alice@x.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body.get("data").is_none());

    // The raw token reaches the user out of band; the test grabs it from
    // the store the way the mailer collaborator would.
    let raw_token = srv
        .services
        .accounts
        .issue_reset_token("alice@x.com")
        .unwrap();

    let res = client
        .post(format!("{}/auth/reset-password/{}", srv.base_url, raw_token))
        .json(&json!({ "password": "newsecret" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // The same token a second time: spent.
    let res = client
        .post(format!("{}/auth/reset-password/{}", srv.base_url, raw_token))
        .json(&json!({ "password": "another1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Old password dead, new one works.
    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "alice@x.com", "password": "secret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "alice@x.com", "password": "newsecret" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
