//! End-to-end storefront tests: cart, quote, and the checkout submission,
//! with `wiremock` standing in for the hosted platform.

use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use medina_integration_tests::{
    checkout_form, client, order_json, product_json, spawn_storefront, storefront_config,
};

const PRODUCT_A: &str = "00000000-0000-4000-8000-00000000000a";
const PRODUCT_B: &str = "00000000-0000-4000-8000-00000000000b";
const ORDER_ID: &str = "11111111-2222-4333-8444-555555555555";

/// Mount a product-by-id fetch.
async fn mount_product(platform: &MockServer, id: &str, name: &str, price: &str) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .and(query_param("id", format!("eq.{id}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([product_json(id, name, price)])),
        )
        .mount(platform)
        .await;
}

/// Pull a money field out of a response as f64 (serialized as a string).
fn money(value: &Value) -> f64 {
    value
        .as_str()
        .expect("money serializes as a string")
        .parse()
        .expect("money parses as a number")
}

#[tokio::test]
async fn checkout_happy_path_writes_order_then_items_and_clears_cart() {
    let platform = MockServer::start().await;
    mount_product(&platform, PRODUCT_A, "Product A", "100").await;
    mount_product(&platform, PRODUCT_B, "Product B", "50").await;

    // Order insert must carry the computed total (250 + 10 shipping fee)
    // and pending status.
    Mock::given(method("POST"))
        .and(path("/rest/v1/orders"))
        .and(body_partial_json(json!({
            "total_amount": "260",
            "status": "pending",
            "city": "Oran"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!([order_json(
                ORDER_ID,
                260.0,
                "pending",
                "2026-03-01T10:00:00Z"
            )])),
        )
        .expect(1)
        .mount(&platform)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/order_items"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(1)
        .mount(&platform)
        .await;

    let base = spawn_storefront(storefront_config(&platform.uri())).await;
    let http = client();

    // Two distinct cart lines: A x2 at 100, B x1 at 50.
    let cart: Value = http
        .post(format!("{base}/cart/add"))
        .json(&json!({ "product_id": PRODUCT_A, "quantity": 2 }))
        .send()
        .await
        .expect("add A")
        .json()
        .await
        .expect("cart json");
    assert_eq!(cart["count"], 2);

    let cart: Value = http
        .post(format!("{base}/cart/add"))
        .json(&json!({ "product_id": PRODUCT_B, "size": "M" }))
        .send()
        .await
        .expect("add B")
        .json()
        .await
        .expect("cart json");
    assert_eq!(cart["count"], 3);
    assert_eq!(cart["lines"].as_array().expect("lines").len(), 2);

    // Quote: 250 subtotal is below the 300 threshold, so the fee applies.
    let quote: Value = http
        .get(format!("{base}/checkout/quote"))
        .send()
        .await
        .expect("quote")
        .json()
        .await
        .expect("quote json");
    assert!((money(&quote["subtotal"]) - 250.0).abs() < f64::EPSILON);
    assert!((money(&quote["total"]) - 260.0).abs() < f64::EPSILON);
    assert_eq!(quote["free_shipping"], false);

    // Submit.
    let response = http
        .post(format!("{base}/checkout"))
        .json(&checkout_form())
        .send()
        .await
        .expect("submit");
    assert_eq!(response.status(), 201);

    let placed: Value = response.json().await.expect("placed json");
    assert_eq!(placed["order_id"], ORDER_ID);
    assert_eq!(placed["reference"], "11111111");
    assert_eq!(placed["payment"]["method"], "cash_on_delivery");

    // Exactly one order and exactly two line items went over the wire.
    let requests = platform.received_requests().await.expect("recording on");
    let item_bodies: Vec<Value> = requests
        .iter()
        .filter(|r| r.url.path() == "/rest/v1/order_items")
        .map(|r| serde_json::from_slice(&r.body).expect("items body"))
        .collect();
    assert_eq!(item_bodies.len(), 1);
    let items = item_bodies[0].as_array().expect("items array");
    assert_eq!(items.len(), 2);
    for item in items {
        assert_eq!(item["order_id"], ORDER_ID);
    }
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[1]["quantity"], 1);
    assert_eq!(items[1]["size"], "M");

    // Success emptied the cart; a second submit finds nothing to buy.
    let cart: Value = http
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart")
        .json()
        .await
        .expect("cart json");
    assert_eq!(cart["count"], 0);

    let response = http
        .post(format!("{base}/checkout"))
        .json(&checkout_form())
        .send()
        .await
        .expect("resubmit");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn checkout_at_free_shipping_threshold_charges_subtotal_exactly() {
    let platform = MockServer::start().await;
    mount_product(&platform, PRODUCT_A, "Product A", "150").await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/orders"))
        .and(body_partial_json(json!({ "total_amount": "300" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!([order_json(
                ORDER_ID,
                300.0,
                "pending",
                "2026-03-01T10:00:00Z"
            )])),
        )
        .expect(1)
        .mount(&platform)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/order_items"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .mount(&platform)
        .await;

    let base = spawn_storefront(storefront_config(&platform.uri())).await;
    let http = client();

    http.post(format!("{base}/cart/add"))
        .json(&json!({ "product_id": PRODUCT_A, "quantity": 2 }))
        .send()
        .await
        .expect("add");

    let quote: Value = http
        .get(format!("{base}/checkout/quote"))
        .send()
        .await
        .expect("quote")
        .json()
        .await
        .expect("quote json");
    assert!((money(&quote["total"]) - 300.0).abs() < f64::EPSILON);
    assert_eq!(quote["free_shipping"], true);

    let response = http
        .post(format!("{base}/checkout"))
        .json(&checkout_form())
        .send()
        .await
        .expect("submit");
    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn checkout_validation_failure_never_reaches_the_platform() {
    let platform = MockServer::start().await;
    mount_product(&platform, PRODUCT_A, "Product A", "100").await;

    // Any order write would be a bug.
    Mock::given(method("POST"))
        .and(path("/rest/v1/orders"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&platform)
        .await;

    let base = spawn_storefront(storefront_config(&platform.uri())).await;
    let http = client();

    http.post(format!("{base}/cart/add"))
        .json(&json!({ "product_id": PRODUCT_A }))
        .send()
        .await
        .expect("add");

    // The locality field left unfilled.
    let mut form = checkout_form();
    form["city"] = json!("");

    let response = http
        .post(format!("{base}/checkout"))
        .json(&form)
        .send()
        .await
        .expect("submit");
    assert_eq!(response.status(), 422);

    let body: Value = response.json().await.expect("error json");
    assert!(body["fields"]["city"].is_string());

    // Still editing: the cart kept its line.
    let cart: Value = http
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart")
        .json()
        .await
        .expect("cart json");
    assert_eq!(cart["count"], 1);
}

#[tokio::test]
async fn checkout_backend_failure_surfaces_retry_and_keeps_cart() {
    let platform = MockServer::start().await;
    mount_product(&platform, PRODUCT_A, "Product A", "100").await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/orders"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "database unavailable"
        })))
        .mount(&platform)
        .await;

    let base = spawn_storefront(storefront_config(&platform.uri())).await;
    let http = client();

    http.post(format!("{base}/cart/add"))
        .json(&json!({ "product_id": PRODUCT_A, "quantity": 2 }))
        .send()
        .await
        .expect("add");

    let response = http
        .post(format!("{base}/checkout"))
        .json(&checkout_form())
        .send()
        .await
        .expect("submit");
    assert_eq!(response.status(), 502);

    // Failed submit leaves the cart untouched for a manual retry.
    let cart: Value = http
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart")
        .json()
        .await
        .expect("cart json");
    assert_eq!(cart["count"], 2);
}

#[tokio::test]
async fn checkout_partial_write_reports_failure_and_keeps_cart() {
    let platform = MockServer::start().await;
    mount_product(&platform, PRODUCT_A, "Product A", "100").await;

    // The order lands, the line items do not: the documented
    // inconsistency window.
    Mock::given(method("POST"))
        .and(path("/rest/v1/orders"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!([order_json(
                ORDER_ID,
                110.0,
                "pending",
                "2026-03-01T10:00:00Z"
            )])),
        )
        .expect(1)
        .mount(&platform)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/order_items"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&platform)
        .await;

    let base = spawn_storefront(storefront_config(&platform.uri())).await;
    let http = client();

    http.post(format!("{base}/cart/add"))
        .json(&json!({ "product_id": PRODUCT_A }))
        .send()
        .await
        .expect("add");

    let response = http
        .post(format!("{base}/checkout"))
        .json(&checkout_form())
        .send()
        .await
        .expect("submit");
    assert_eq!(response.status(), 502);

    let cart: Value = http
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart")
        .json()
        .await
        .expect("cart json");
    assert_eq!(cart["count"], 1);
}

#[tokio::test]
async fn bank_transfer_checkout_echoes_the_account_reference() {
    let platform = MockServer::start().await;
    mount_product(&platform, PRODUCT_A, "Product A", "100").await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/orders"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!([order_json(
                ORDER_ID,
                110.0,
                "pending",
                "2026-03-01T10:00:00Z"
            )])),
        )
        .mount(&platform)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/order_items"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .mount(&platform)
        .await;

    let base = spawn_storefront(storefront_config(&platform.uri())).await;
    let http = client();

    http.post(format!("{base}/cart/add"))
        .json(&json!({ "product_id": PRODUCT_A }))
        .send()
        .await
        .expect("add");

    let mut form = checkout_form();
    form["payment_method"] = json!("bank_transfer");

    let placed: Value = http
        .post(format!("{base}/checkout"))
        .json(&form)
        .send()
        .await
        .expect("submit")
        .json()
        .await
        .expect("placed json");

    assert_eq!(placed["payment"]["method"], "bank_transfer");
    assert_eq!(placed["payment"]["account_reference"], "RIB-0042-TEST");
}
