//! End-to-end admin tests: login with the role gate, order management, and
//! the notification read flow.

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use medina_core::tables::OrderRow;

use medina_integration_tests::{admin_config, client, order_json, spawn_admin};

const ADMIN_USER_ID: &str = "99999999-8888-4777-8666-555555555555";
const ORDER_ID: &str = "11111111-2222-4333-8444-555555555555";

/// Mount a successful password grant for the admin user.
async fn mount_login(platform: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "admin-jwt",
            "user": { "id": ADMIN_USER_ID, "email": "boss@medina.example" }
        })))
        .mount(platform)
        .await;
}

/// Mount the `user_roles` lookup with the given rows.
async fn mount_roles(platform: &MockServer, rows: Value) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/user_roles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(platform)
        .await;
}

async fn login(http: &reqwest::Client, base: &str) -> reqwest::Response {
    http.post(format!("{base}/auth/login"))
        .json(&json!({ "email": "boss@medina.example", "password": "hunter2hunter2" }))
        .send()
        .await
        .expect("login request")
}

#[tokio::test]
async fn login_without_admin_role_is_forbidden() {
    let platform = MockServer::start().await;
    mount_login(&platform).await;
    mount_roles(&platform, json!([])).await;

    let state =
        medina_admin::state::AppState::new(admin_config(&platform.uri())).expect("state builds");
    let base = spawn_admin(state).await;
    let http = client();

    let response = login(&http, &base).await;
    assert_eq!(response.status(), 403);

    // No session was issued.
    let response = http
        .get(format!("{base}/orders"))
        .send()
        .await
        .expect("orders request");
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn unauthenticated_requests_are_rejected() {
    let platform = MockServer::start().await;
    let state =
        medina_admin::state::AppState::new(admin_config(&platform.uri())).expect("state builds");
    let base = spawn_admin(state).await;

    for route in ["/orders", "/products", "/customers", "/dashboard", "/analytics"] {
        let response = client()
            .get(format!("{base}{route}"))
            .send()
            .await
            .expect("request");
        assert_eq!(response.status(), 401, "route {route} should require auth");
    }
}

#[tokio::test]
async fn status_change_is_reflected_and_marks_the_notification_read() {
    let platform = MockServer::start().await;
    mount_login(&platform).await;
    mount_roles(
        &platform,
        json!([{ "user_id": ADMIN_USER_ID, "role": "admin" }]),
    )
    .await;

    let pending = order_json(ORDER_ID, 260.0, "pending", "2026-03-01T10:00:00Z");
    let shipped = order_json(ORDER_ID, 260.0, "shipped", "2026-03-01T10:00:00Z");

    // Order list before and after; wiremock serves the first matching
    // mount, so the pre-change response is limited to one use.
    Mock::given(method("GET"))
        .and(path("/rest/v1/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([pending.clone()])))
        .up_to_n_times(1)
        .mount(&platform)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([shipped.clone()])))
        .mount(&platform)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/orders"))
        .and(query_param("id", format!("eq.{ORDER_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([shipped])))
        .expect(1)
        .mount(&platform)
        .await;

    let state =
        medina_admin::state::AppState::new(admin_config(&platform.uri())).expect("state builds");

    // Seed the bell as startup would: one pending order, unread.
    let seeded: OrderRow = serde_json::from_value(pending).expect("row parses");
    state.notifications().seed(&[seeded]);

    let base = spawn_admin(state).await;
    let http = client();

    assert_eq!(login(&http, &base).await.status(), 200);

    // The pending order is listed and its notification unread.
    let orders: Value = http
        .get(format!("{base}/orders"))
        .send()
        .await
        .expect("orders")
        .json()
        .await
        .expect("orders json");
    assert_eq!(orders.as_array().expect("array").len(), 1);
    assert_eq!(orders[0]["status"], "pending");

    let bell: Value = http
        .get(format!("{base}/notifications"))
        .send()
        .await
        .expect("bell")
        .json()
        .await
        .expect("bell json");
    assert_eq!(bell["unread_count"], 1);

    // Ship it.
    let updated: Value = http
        .post(format!("{base}/orders/{ORDER_ID}/status"))
        .json(&json!({ "status": "shipped" }))
        .send()
        .await
        .expect("status change")
        .json()
        .await
        .expect("updated json");
    assert_eq!(updated["status"], "shipped");

    // A subsequent fetch reflects the change, and the bell entry reads as
    // handled.
    let orders: Value = http
        .get(format!("{base}/orders"))
        .send()
        .await
        .expect("orders")
        .json()
        .await
        .expect("orders json");
    assert_eq!(orders[0]["status"], "shipped");

    let bell: Value = http
        .get(format!("{base}/notifications"))
        .send()
        .await
        .expect("bell")
        .json()
        .await
        .expect("bell json");
    assert_eq!(bell["unread_count"], 0);
}

#[tokio::test]
async fn order_list_filters_by_status_and_free_text() {
    let platform = MockServer::start().await;
    mount_login(&platform).await;
    mount_roles(
        &platform,
        json!([{ "user_id": ADMIN_USER_ID, "role": "admin" }]),
    )
    .await;

    let mut other = order_json(
        "22222222-3333-4444-8555-666666666666",
        50.0,
        "pending",
        "2026-03-02T10:00:00Z",
    );
    other["customer_name"] = json!("Yanis B");
    other["customer_email"] = json!("yanis@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/orders"))
        .and(query_param("status", "eq.pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            order_json(ORDER_ID, 260.0, "pending", "2026-03-01T10:00:00Z"),
            other
        ])))
        .mount(&platform)
        .await;

    let state =
        medina_admin::state::AppState::new(admin_config(&platform.uri())).expect("state builds");
    let base = spawn_admin(state).await;
    let http = client();
    login(&http, &base).await;

    // Status filter is pushed to the platform; the free-text match then
    // narrows to the one matching customer.
    let orders: Value = http
        .get(format!("{base}/orders?status=pending&q=yanis"))
        .send()
        .await
        .expect("orders")
        .json()
        .await
        .expect("orders json");

    let orders = orders.as_array().expect("array");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["customer_name"], "Yanis B");

    // An unknown status is a client error, not a platform query.
    let response = http
        .get(format!("{base}/orders?status=refunded"))
        .send()
        .await
        .expect("orders");
    assert_eq!(response.status(), 400);
}
