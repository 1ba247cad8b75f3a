//! End-to-end protocol scenarios over the in-process transport

use std::sync::Arc;

use sigauth::auth_server::AuthService;
use sigauth::client::{AuthClient, ClientState};
use sigauth::security::{
    digest, verify_challenge, KeyPair, PublicKey, RegisterClientKeyRequest, SecurityError,
    SignatureCodec, VerificationOutcome, VerifySignatureRequest,
};

fn service() -> Arc<AuthService> {
    Arc::new(AuthService::generate().expect("Failed to create service"))
}

#[tokio::test]
async fn scenario_a_registered_client_signature_is_valid() {
    let service = service();
    let mut client = AuthClient::new("clientA", Arc::clone(&service));
    client.generate_keys().unwrap();
    client.register().await.unwrap();

    let outcome = client.sign_and_verify("Hello from client A!").await.unwrap();
    assert_eq!(outcome, VerificationOutcome::Valid);
}

#[tokio::test]
async fn scenario_b_same_signature_under_unregistered_id() {
    let service = service();
    let mut client = AuthClient::new("clientA", Arc::clone(&service));
    client.generate_keys().unwrap();
    client.register().await.unwrap();

    let mut request = client.sign_message("Hello from client A!").unwrap();
    request.client_id = "clientB".to_string();

    let outcome = service.verify_signature(&request).unwrap();
    assert_eq!(outcome, VerificationOutcome::UnknownClient);
    assert!(matches!(
        outcome.into_result("clientB"),
        Err(SecurityError::UnknownClient(_))
    ));
}

#[tokio::test]
async fn scenario_c_two_challenges_verify_independently() {
    let service = service();
    let server_key = PublicKey::from_pem(service.server_public_key()).unwrap();

    let first = service.issue_challenge().unwrap();
    let second = service.issue_challenge().unwrap();

    assert_ne!(first.random_message, second.random_message);
    assert!(verify_challenge(&server_key, &first));
    assert!(verify_challenge(&server_key, &second));

    // Signatures are bound to their own nonce
    let mut crossed = first.clone();
    crossed.signature = second.signature.clone();
    assert!(!verify_challenge(&server_key, &crossed));
}

#[tokio::test]
async fn scenario_d_odd_length_signature_is_malformed() {
    let service = service();
    let keypair = KeyPair::generate().unwrap();
    service
        .register_client_key(&RegisterClientKeyRequest {
            client_id: "clientA".to_string(),
            public_key: keypair.export_public().to_string(),
        })
        .unwrap();

    let outcome = service
        .verify_signature(&VerifySignatureRequest {
            client_id: "clientA".to_string(),
            message: "Hello from client A!".to_string(),
            signature: "0".repeat(127),
        })
        .unwrap();
    assert_eq!(outcome, VerificationOutcome::MalformedSignature);
}

#[tokio::test]
async fn reregistration_keeps_only_second_key() {
    let service = service();
    let first = KeyPair::generate().unwrap();
    let second = KeyPair::generate().unwrap();
    let message = "Hello from client A!";

    for keypair in [&first, &second] {
        service
            .register_client_key(&RegisterClientKeyRequest {
                client_id: "clientA".to_string(),
                public_key: keypair.export_public().to_string(),
            })
            .unwrap();
    }

    let request_for = |keypair: &KeyPair| VerifySignatureRequest {
        client_id: "clientA".to_string(),
        message: message.to_string(),
        signature: SignatureCodec::encode(&keypair.sign(&digest(message.as_bytes())).unwrap()),
    };

    assert_eq!(
        service.verify_signature(&request_for(&first)).unwrap(),
        VerificationOutcome::Invalid
    );
    assert_eq!(
        service.verify_signature(&request_for(&second)).unwrap(),
        VerificationOutcome::Valid
    );
}

#[tokio::test]
async fn client_checks_server_identity() {
    let service = service();
    let mut client = AuthClient::new("clientA", Arc::clone(&service));
    client.generate_keys().unwrap();
    client.register().await.unwrap();

    assert!(client.check_server_identity().await.unwrap());
    assert_eq!(client.state(), ClientState::ChallengeChecked);
}

#[tokio::test]
async fn impostor_server_key_fails_challenge() {
    let service = service();
    let impostor = KeyPair::generate().unwrap();

    let challenge = service.issue_challenge().unwrap();
    assert!(!verify_challenge(impostor.public_key(), &challenge));
}

#[tokio::test]
async fn concurrent_clients_verify_independently() {
    let service = service();
    let mut handles = Vec::new();

    for i in 0..8 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            let client_id = format!("client{}", i);
            let mut client = AuthClient::new(&client_id, service);
            client.generate_keys().unwrap();
            client.register().await.unwrap();
            client.sign_and_verify(&format!("message {}", i)).await.unwrap()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), VerificationOutcome::Valid);
    }
    assert_eq!(service.status().unwrap().registered_clients, 8);
}
