//! FCM multicast adapter against a mock push service.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lockwatch::{
    DeliveryErrorKind, DeviceToken, FcmTransport, NotificationPayload, PushError, PushTransport,
};

fn transport_for(server: &MockServer) -> FcmTransport {
    FcmTransport::with_client(
        reqwest::Client::new(),
        format!("{}/fcm/send", server.uri()),
        "test-server-key",
    )
}

fn tokens(names: &[&str]) -> Vec<DeviceToken> {
    names.iter().map(|n| DeviceToken::from(*n)).collect()
}

#[tokio::test]
async fn test_multicast_sends_batch_and_maps_results_positionally() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fcm/send"))
        .and(header("Authorization", "key=test-server-key"))
        .and(body_json(json!({
            "registration_ids": ["tok-a", "tok-b", "tok-c"],
            "notification": {
                "title": "Door Unlocked",
                "body": "The door was unlocked!",
            },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "multicast_id": 216,
            "success": 1,
            "failure": 2,
            "canonical_ids": 0,
            "results": [
                { "message_id": "0:1" },
                { "error": "NotRegistered" },
                { "error": "Unavailable" },
            ],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let batch = tokens(&["tok-a", "tok-b", "tok-c"]);
    let outcomes = transport
        .send_multicast(&batch, &NotificationPayload::door_unlocked())
        .await?;

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].succeeded());
    assert_eq!(outcomes[0].token, DeviceToken::from("tok-a"));
    assert_eq!(
        outcomes[1].error,
        Some(DeliveryErrorKind::TokenNotRegistered)
    );
    assert_eq!(outcomes[2].error, Some(DeliveryErrorKind::Unavailable));
    Ok(())
}

#[tokio::test]
async fn test_data_block_travels_with_the_batch() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fcm/send"))
        .and(body_json(json!({
            "registration_ids": ["tok-a"],
            "notification": {
                "title": "Warning: Multiple Failed Access Attempts",
                "body": "There have been 3 failed access attempts in the last 5 minutes.",
            },
            "data": {
                "click_action": "FLUTTER_NOTIFICATION_CLICK",
                "status": "failed_attempts",
                "count": "3",
            },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": 1,
            "failure": 0,
            "results": [{ "message_id": "0:2" }],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let outcomes = transport
        .send_multicast(
            &tokens(&["tok-a"]),
            &NotificationPayload::failed_attempts(3, 300_000),
        )
        .await?;

    assert!(outcomes[0].succeeded());
    Ok(())
}

#[tokio::test]
async fn test_rejected_batch_surfaces_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fcm/send"))
        .respond_with(ResponseTemplate::new(401).set_body_string("INVALID_KEY"))
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let result = transport
        .send_multicast(&tokens(&["tok-a"]), &NotificationPayload::door_unlocked())
        .await;

    match result {
        Err(PushError::Status(401, body)) => assert_eq!(body, "INVALID_KEY"),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_misaligned_results_surface_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fcm/send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": 1,
            "failure": 0,
            "results": [{ "message_id": "0:1" }],
        })))
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let result = transport
        .send_multicast(
            &tokens(&["tok-a", "tok-b"]),
            &NotificationPayload::door_unlocked(),
        )
        .await;

    assert!(matches!(result, Err(PushError::Decode(_))));
}

#[tokio::test]
async fn test_unreachable_service_surfaces_transport_error() {
    // Nothing listens on this port
    let transport = FcmTransport::with_client(
        reqwest::Client::new(),
        "http://127.0.0.1:9/fcm/send",
        "test-server-key",
    );

    let result = transport
        .send_multicast(&tokens(&["tok-a"]), &NotificationPayload::door_unlocked())
        .await;

    assert!(matches!(result, Err(PushError::Transport(_))));
}
