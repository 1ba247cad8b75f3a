//! Integration tests for the HTTP API
//!
//! Exercises every route through actix-web's test service, including the
//! error envelope for each rejection class.

use actix_web::{test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;

use sigauth::auth_server::{configure_routes, AppState, AuthService};
use sigauth::security::{
    digest, verify_challenge, Challenge, KeyPair, PublicKey, SignatureCodec,
};

fn app_state() -> web::Data<AppState> {
    web::Data::new(AppState {
        service: Arc::new(AuthService::generate().expect("Failed to create service")),
    })
}

fn sign_hex(keypair: &KeyPair, message: &str) -> String {
    let signature = keypair
        .sign(&digest(message.as_bytes()))
        .expect("Failed to sign");
    SignatureCodec::encode(&signature)
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(App::new().app_data($state.clone()).configure(configure_routes)).await
    };
}

#[actix_web::test]
async fn test_register_client_public_key() {
    let state = app_state();
    let app = init_app!(state);
    let keypair = KeyPair::generate().unwrap();

    let req = test::TestRequest::post()
        .uri("/register_client_public_key")
        .set_json(json!({
            "client_id": "clientA",
            "public_key": keypair.export_public(),
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["client_id"], "clientA");
    assert_eq!(body["data"]["replaced"], false);

    assert!(state.service.directory().lookup("clientA").unwrap().is_some());
}

#[actix_web::test]
async fn test_register_invalid_public_key() {
    let state = app_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/register_client_public_key")
        .set_json(json!({
            "client_id": "clientA",
            "public_key": "definitely not a key",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "INVALID_PUBLIC_KEY");
    assert!(state.service.directory().is_empty().unwrap());
}

#[actix_web::test]
async fn test_register_missing_fields() {
    let state = app_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/register_client_public_key")
        .set_json(json!({ "client_id": "clientA" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");
}

#[actix_web::test]
async fn test_verify_outcomes() {
    let state = app_state();
    let app = init_app!(state);
    let keypair = KeyPair::generate().unwrap();
    state
        .service
        .directory()
        .register("clientA", keypair.export_public())
        .unwrap();

    let message = "Hello from client A!";
    let signature = sign_hex(&keypair, message);

    // Scenario A: valid signature
    let req = test::TestRequest::post()
        .uri("/verify")
        .set_json(json!({ "client_id": "clientA", "message": message, "signature": signature }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["valid"], true);

    // Scenario B: never registered
    let req = test::TestRequest::post()
        .uri("/verify")
        .set_json(json!({ "client_id": "clientB", "message": message, "signature": signature }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "UNKNOWN_CLIENT");

    // Scenario D: odd-length hex
    let req = test::TestRequest::post()
        .uri("/verify")
        .set_json(json!({ "client_id": "clientA", "message": message, "signature": "abc" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "MALFORMED_SIGNATURE");
    assert_eq!(body["error"]["details"]["outcome"], "malformed signature");
    assert_eq!(
        body["error"]["details"]["reason"],
        "odd number of hex characters (3)"
    );

    // Checked and failed
    let req = test::TestRequest::post()
        .uri("/verify")
        .set_json(json!({ "client_id": "clientA", "message": "tampered", "signature": signature }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_SIGNATURE");
    assert_eq!(body["error"]["details"]["valid"], false);
}

#[actix_web::test]
async fn test_server_public_key_and_challenge() {
    let state = app_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/server_public_key").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let pem = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    let server_key = PublicKey::from_pem(&pem).unwrap();

    // Scenario C: two challenges, distinct and both valid
    let mut challenges = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri("/generate_random_message")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let challenge: Challenge = test::read_body_json(resp).await;
        assert_eq!(challenge.random_message.len(), 32);
        assert!(verify_challenge(&server_key, &challenge));
        challenges.push(challenge);
    }
    assert_ne!(challenges[0].random_message, challenges[1].random_message);
}

#[actix_web::test]
async fn test_status() {
    let state = app_state();
    let app = init_app!(state);
    let keypair = KeyPair::generate().unwrap();
    state
        .service
        .directory()
        .register("clientA", keypair.export_public())
        .unwrap();

    let req = test::TestRequest::get().uri("/status").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["registered_clients"], 1);
    assert_eq!(body["data"]["scheme"], "Ed25519/SHA-256");
}
