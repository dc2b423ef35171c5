//! Order-insert feed tests: events for new rows, cursor advancement, and
//! unsubscribe-on-drop.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use medina_admin::backend::AdminDataClient;
use medina_admin::feed::OrderInsertFeed;
use medina_admin::notifications::NotificationCenter;

use medina_integration_tests::{admin_config, order_json};

const ORDER_ID: &str = "11111111-2222-4333-8444-555555555555";

/// Cursor well before the mocked rows.
fn cursor() -> chrono::DateTime<chrono::Utc> {
    "2026-03-01T00:00:00Z".parse().expect("timestamp parses")
}

#[tokio::test]
async fn feed_publishes_each_insert_once() {
    let platform = MockServer::start().await;

    // First poll returns the new row; every later poll is empty, as the
    // real platform would answer once the cursor moved past the row.
    Mock::given(method("GET"))
        .and(path("/rest/v1/orders"))
        .and(query_param("order", "created_at.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([order_json(
            ORDER_ID,
            260.0,
            "pending",
            "2026-03-01T10:00:00Z"
        )])))
        .up_to_n_times(1)
        .mount(&platform)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&platform)
        .await;

    let config = admin_config(&platform.uri());
    let data = AdminDataClient::new(&config.backend).expect("client builds");
    let feed = OrderInsertFeed::spawn(data, Duration::from_millis(20), cursor());
    let mut events = feed.subscribe();

    let event = tokio::time::timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("an event arrives")
        .expect("channel open");
    assert_eq!(event.id.to_string(), ORDER_ID);
    assert_eq!(event.customer_name, "Amina K");

    // The cursor advanced past the row; no duplicate follows.
    let second = tokio::time::timeout(Duration::from_millis(200), events.recv()).await;
    assert!(second.is_err(), "no second event expected");
}

#[tokio::test]
async fn feed_events_land_in_the_notification_center_unread() {
    let platform = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([order_json(
            ORDER_ID,
            260.0,
            "pending",
            "2026-03-01T10:00:00Z"
        )])))
        .up_to_n_times(1)
        .mount(&platform)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&platform)
        .await;

    let config = admin_config(&platform.uri());
    let data = AdminDataClient::new(&config.backend).expect("client builds");
    let center = NotificationCenter::new();

    let feed = OrderInsertFeed::spawn(data, Duration::from_millis(20), cursor());
    let mut events = feed.subscribe();

    let order = tokio::time::timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("an event arrives")
        .expect("channel open");
    center.record_insert(&order);

    assert_eq!(center.unread_count(), 1);
    let notifications = center.list();
    assert_eq!(notifications[0].reference, "11111111");
    assert!(!notifications[0].read);

    assert!(center.mark_read(order.id));
    assert_eq!(center.unread_count(), 0);
}

#[tokio::test]
async fn dropping_the_feed_unsubscribes() {
    let platform = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&platform)
        .await;

    let config = admin_config(&platform.uri());
    let data = AdminDataClient::new(&config.backend).expect("client builds");

    let feed = OrderInsertFeed::spawn(data, Duration::from_millis(20), cursor());
    let mut events = feed.subscribe();

    drop(feed);

    // The poll task is aborted with the handle; the channel closes.
    let result = tokio::time::timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("recv resolves");
    assert!(matches!(
        result,
        Err(tokio::sync::broadcast::error::RecvError::Closed)
    ));
}

#[tokio::test]
async fn poll_failures_are_retried_without_killing_the_feed() {
    let platform = MockServer::start().await;

    // One failed poll, then the row.
    Mock::given(method("GET"))
        .and(path("/rest/v1/orders"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&platform)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([order_json(
            ORDER_ID,
            260.0,
            "pending",
            "2026-03-01T10:00:00Z"
        )])))
        .up_to_n_times(1)
        .mount(&platform)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&platform)
        .await;

    let config = admin_config(&platform.uri());
    let data = AdminDataClient::new(&config.backend).expect("client builds");
    let feed = OrderInsertFeed::spawn(data, Duration::from_millis(20), cursor());
    let mut events = feed.subscribe();

    let event = tokio::time::timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("the event still arrives")
        .expect("channel open");
    assert_eq!(event.id.to_string(), ORDER_ID);
}
