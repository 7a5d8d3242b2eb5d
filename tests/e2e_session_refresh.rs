//! End-to-end tests of the refresh-and-replay protocol against a mock
//! backend.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{bearer_token, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clinic_http::{HttpConfig, HttpError, Request, SessionHttpClient, GENERIC_ERROR};
use clinic_session::{Session, SessionEvent, TokenPair};

fn stale_session() -> Session {
    let session = Session::new();
    session.set_tokens(TokenPair {
        access_token: "stale-access".to_string(),
        refresh_token: "refresh-1".to_string(),
    });
    session
}

fn client_for(server: &MockServer, session: Session) -> SessionHttpClient {
    SessionHttpClient::new(HttpConfig::new(server.uri()), session).expect("client builds")
}

async fn mount_refresh_exchange(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/auth/refresh"))
        .and(bearer_token("refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"access_token": "fresh-access", "refresh_token": "refresh-2"}),
        ))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn refresh_and_replay_returns_the_replay_result() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/patients/patients/5"))
        .and(bearer_token("stale-access"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"detail": "expired"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh_exchange(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/patients/patients/5"))
        .and(bearer_token("fresh-access"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "deleted"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = stale_session();
    let client = client_for(&server, session.clone());

    let value = client
        .send_value(Request::delete("/patients/patients/5"))
        .await
        .expect("replay succeeds");

    assert_eq!(value, json!({"success": true, "message": "deleted"}));
    // the session now holds the refreshed pair
    assert_eq!(session.access_token(), "fresh-access");
    assert_eq!(session.refresh_token(), "refresh-2");
    assert!(!client.is_loading());
    assert!(client.last_error().is_none());
}

#[tokio::test]
async fn second_auth_failure_is_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(bearer_token("stale-access"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh_exchange(&server).await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(bearer_token("fresh-access"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "still expired"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, stale_session());
    let err = client
        .send_value(Request::get("/users/me"))
        .await
        .expect_err("replay failure propagates");

    // the replay's failure comes back; the single refresh already ran, and
    // the expect(1) on the exchange proves no second one was attempted
    assert!(err.is_auth());
    assert_eq!(err.message(), "still expired");
    assert_eq!(client.last_error().as_deref(), Some("still expired"));
}

#[tokio::test]
async fn refresh_failure_logs_out_and_propagates_the_original_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "original failure"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"detail": "bad refresh"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = stale_session();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    session.set_observer(move |event| sink.lock().unwrap().push(event));

    let client = client_for(&server, session.clone());
    let err = client
        .send_value(Request::get("/users/me"))
        .await
        .expect_err("failure propagates");

    assert!(err.is_auth());
    assert_eq!(err.message(), "original failure");
    assert!(!session.is_authenticated());
    assert!(events
        .lock()
        .unwrap()
        .contains(&SessionEvent::LoggedOut));
}

#[tokio::test]
async fn auth_failure_on_the_refresh_path_itself_logs_out_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"detail": "nope"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = stale_session();
    let client = client_for(&server, session.clone());

    let err = client
        .send_value(Request::get("/auth/refresh"))
        .await
        .expect_err("refresh rejection propagates");

    assert!(err.is_auth());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn concurrent_failures_share_a_single_refresh() {
    let server = MockServer::start().await;
    for route in ["/patients/patients", "/chambres/services"] {
        Mock::given(method("GET"))
            .and(path(route))
            .and(bearer_token("stale-access"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"detail": "expired"}))
                    .set_delay(Duration::from_millis(50)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(route))
            .and(bearer_token("fresh-access"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": route})))
            .mount(&server)
            .await;
    }
    mount_refresh_exchange(&server).await;

    let client = Arc::new(client_for(&server, stale_session()));
    let first = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.send_value(Request::get("/patients/patients")).await })
    };
    let second = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.send_value(Request::get("/chambres/services")).await })
    };

    let (first, second) = (first.await.unwrap(), second.await.unwrap());
    assert!(first.is_ok());
    assert!(second.is_ok());
    // expect(1) on the refresh exchange verifies the coalescing on drop
    server.verify().await;
}

#[tokio::test]
async fn loading_is_true_across_the_whole_refresh_cycle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(bearer_token("stale-access"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "expired"}))
                .set_delay(Duration::from_millis(150)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(
                    json!({"access_token": "fresh-access", "refresh_token": "refresh-2"}),
                )
                .set_delay(Duration::from_millis(150)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(bearer_token("fresh-access"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"role": "admin"}))
                .set_delay(Duration::from_millis(150)),
        )
        .mount(&server)
        .await;

    let client = Arc::new(client_for(&server, stale_session()));
    assert!(!client.is_loading());

    let call = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.send_value(Request::get("/users/me")).await })
    };

    // sample the gauge while the original attempt, the refresh exchange and
    // the replay are each still in flight
    for _ in 0..3 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(client.is_loading());
    }

    let value = call.await.unwrap().expect("cycle succeeds");
    assert_eq!(value, json!({"role": "admin"}));
    assert!(!client.is_loading());
}

#[tokio::test]
async fn network_failure_propagates_with_generic_message() {
    // nothing listens on this port
    let session = stale_session();
    let client = SessionHttpClient::new(
        HttpConfig::new("http://127.0.0.1:9/api")
            .with_connect_timeout(Duration::from_millis(200))
            .with_timeout(Duration::from_millis(500)),
        session.clone(),
    )
    .expect("client builds");

    let err = client
        .send_value(Request::get("/users/me"))
        .await
        .expect_err("no backend");

    assert!(matches!(err, HttpError::Network(_)));
    assert_eq!(client.last_error().as_deref(), Some(GENERIC_ERROR));
    assert!(!client.is_loading());
    // a transport failure is not an auth failure; the session survives
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn patients_listing_resolves_with_the_parsed_body() {
    let server = MockServer::start().await;
    let body = json!({
        "data": [
            {"id_patient": 1, "nom": "Martin"},
            {"id_patient": 2, "nom": "Durand"}
        ],
        "total": 2
    });
    Mock::given(method("GET"))
        .and(path("/patients/patients"))
        .and(bearer_token("stale-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let client = client_for(&server, stale_session());
    let value = client
        .send_value(Request::get("/patients/patients"))
        .await
        .expect("listing succeeds");

    assert_eq!(value, body);
    assert!(!client.is_loading());
}

#[tokio::test]
async fn server_failures_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients/patients"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"detail": "maintenance"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, stale_session());
    let err = client
        .send_value(Request::get("/patients/patients"))
        .await
        .expect_err("5xx propagates");

    assert!(err.is_server_error());
    assert_eq!(err.message(), "maintenance");
}
