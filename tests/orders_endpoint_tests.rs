//! Integration tests for the orders endpoints.
//!
//! A wiremock server plays the Admin API; the gateway is configured with the
//! mock as its upstream base.

mod common;

use common::{gateway, gateway_with, get, get_bearer, json, BEARER_SECRET};
use order_gateway::config::{OrdersLocale, OrdersPresentation};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SHOP: &str = "test-shop.myshopify.com";
const ORDERS_PATH: &str = "/admin/api/2025-10/orders.json";

fn orders_fixture() -> serde_json::Value {
    serde_json::json!({
        "orders": [
            {
                "id": 450789469,
                "order_number": 1001,
                "name": "#1001",
                "created_at": "2025-06-01T12:00:00Z",
                "processed_at": "2025-06-01T12:00:05Z",
                "currency": "USD",
                "subtotal_price": "199.00",
                "total_tax": "39.80",
                "total_discounts": "0.00",
                "total_price": "238.80",
                "financial_status": "paid",
                "fulfillment_status": "fulfilled",
                "browser_ip": "203.0.113.7",
                "line_items": [
                    {"id": 1, "title": "Aviator sunglasses", "sku": "AVI", "quantity": 2, "price": "89.50"}
                ],
                "customer": {"id": 207119551, "first_name": "Bob", "last_name": "Norman", "email": "bob@example.com"}
            },
            {
                "id": 450789470,
                "order_number": 1002,
                "name": "#1002",
                "currency": "USD",
                "total_price": "20.00",
                "financial_status": "pending",
                "line_items": []
            }
        ]
    })
}

// ============================================================================
// Input validation
// ============================================================================

#[tokio::test]
async fn test_orders_without_shop_is_400() {
    let gw = gateway(None);
    let (status, _, body) = get_bearer(&gw.router, "/v1/orders", BEARER_SECRET).await;

    assert_eq!(status, 400);
    assert_eq!(json(&body)["error"], "validation_error");
    assert!(json(&body)["message"].as_str().unwrap().contains("shop"));
}

#[tokio::test]
async fn test_orders_with_invalid_shop_is_400() {
    let gw = gateway(None);
    let (status, _, body) =
        get_bearer(&gw.router, "/v1/orders?shop=foo.notshopify.com", BEARER_SECRET).await;

    assert_eq!(status, 400);
    assert_eq!(json(&body)["error"], "validation_error");
}

#[tokio::test]
async fn test_orders_for_unauthenticated_shop_is_401_with_auth_url() {
    let gw = gateway(None);
    let (status, _, body) = get_bearer(
        &gw.router,
        "/v1/orders?shop=not-installed.myshopify.com",
        BEARER_SECRET,
    )
    .await;

    assert_eq!(status, 401);
    let body = json(&body);
    assert_eq!(body["error"], "unauthorized");
    assert_eq!(
        body["auth_url"],
        "https://gateway.example.com/auth?shop=not-installed.myshopify.com"
    );
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_orders_list_projects_and_envelopes() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .and(header("X-Shopify-Access-Token", "shpat_test"))
        .and(query_param("limit", "10"))
        .and(query_param("status", "any"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_fixture()))
        .mount(&mock_server)
        .await;

    let gw = gateway(Some(&mock_server.uri()));
    gw.install(SHOP, "shpat_test");

    let (status, _, body) =
        get_bearer(&gw.router, &format!("/v1/orders?shop={SHOP}"), BEARER_SECRET).await;

    assert_eq!(status, 200);
    let body = json(&body);
    assert_eq!(body["ok"], true);
    assert_eq!(body["shop"], SHOP);
    assert_eq!(body["count"], 2);

    let first = &body["orders"][0];
    assert_eq!(first["id"], 450_789_469_u64);
    assert_eq!(first["number"], 1001);
    assert_eq!(first["financial_status"], "paid");
    assert_eq!(first["totals"]["total"], "238.80");
    assert_eq!(first["line_items"][0]["line_total"], "179.00");
    assert_eq!(first["customer"]["name"], "Bob Norman");

    // Upstream-internal fields never leak through the projection
    assert!(body.to_string().find("browser_ip").is_none());
}

#[tokio::test]
async fn test_orders_limit_is_clamped_before_forwarding() {
    let mock_server = MockServer::start().await;
    // Only a limit=250 request is answered; anything else would 404 the mock
    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .and(query_param("limit", "250"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"orders": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gw = gateway(Some(&mock_server.uri()));
    gw.install(SHOP, "shpat_test");

    let (status, _, _) = get_bearer(
        &gw.router,
        &format!("/v1/orders?shop={SHOP}&limit=9999"),
        BEARER_SECRET,
    )
    .await;

    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_orders_limit_lower_bound_and_status_forwarding() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .and(query_param("limit", "1"))
        .and(query_param("status", "closed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"orders": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gw = gateway(Some(&mock_server.uri()));
    gw.install(SHOP, "shpat_test");

    let (status, _, _) = get_bearer(
        &gw.router,
        &format!("/v1/orders?shop={SHOP}&limit=0&status=closed"),
        BEARER_SECRET,
    )
    .await;

    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_orders_default_limit_is_configurable() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"orders": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gw = gateway_with(Some(&mock_server.uri()), |builder| {
        builder.orders(OrdersPresentation {
            default_limit: 50,
            locale: OrdersLocale::En,
        })
    });
    gw.install(SHOP, "shpat_test");

    let (status, _, _) =
        get_bearer(&gw.router, &format!("/v1/orders?shop={SHOP}"), BEARER_SECRET).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_orders_es_locale_envelope() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_fixture()))
        .mount(&mock_server)
        .await;

    let gw = gateway_with(Some(&mock_server.uri()), |builder| {
        builder.orders(OrdersPresentation {
            default_limit: 10,
            locale: OrdersLocale::Es,
        })
    });
    gw.install(SHOP, "shpat_test");

    let (status, _, body) =
        get_bearer(&gw.router, &format!("/v1/orders?shop={SHOP}"), BEARER_SECRET).await;

    assert_eq!(status, 200);
    let body = json(&body);
    assert_eq!(body["exito"], true);
    assert_eq!(body["tienda"], SHOP);
    assert_eq!(body["cantidad"], 2);
    assert_eq!(body["pedidos"][0]["financial_status"], "pagado");
    assert!(body.get("ok").is_none());
}

// ============================================================================
// Upstream error mapping
// ============================================================================

#[tokio::test]
async fn test_upstream_401_maps_to_reauth() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"errors": "[API] Invalid API key or access token"})),
        )
        .mount(&mock_server)
        .await;

    let gw = gateway(Some(&mock_server.uri()));
    gw.install(SHOP, "shpat_revoked");

    let (status, _, body) =
        get_bearer(&gw.router, &format!("/v1/orders?shop={SHOP}"), BEARER_SECRET).await;

    assert_eq!(status, 401);
    let body = json(&body);
    assert!(body["message"].as_str().unwrap().contains("invalid or expired token"));
    assert_eq!(
        body["auth_url"],
        format!("https://gateway.example.com/auth?shop={SHOP}")
    );
}

#[tokio::test]
async fn test_upstream_403_maps_to_insufficient_permissions() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let gw = gateway(Some(&mock_server.uri()));
    gw.install(SHOP, "shpat_test");

    let (status, _, body) =
        get_bearer(&gw.router, &format!("/v1/orders?shop={SHOP}"), BEARER_SECRET).await;

    assert_eq!(status, 403);
    assert!(json(&body)["message"]
        .as_str()
        .unwrap()
        .contains("insufficient permissions"));
}

#[tokio::test]
async fn test_other_upstream_statuses_pass_through() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(serde_json::json!({"errors": "Exceeded rate limit"})),
        )
        .mount(&mock_server)
        .await;

    let gw = gateway(Some(&mock_server.uri()));
    gw.install(SHOP, "shpat_test");

    let (status, _, body) =
        get_bearer(&gw.router, &format!("/v1/orders?shop={SHOP}"), BEARER_SECRET).await;

    assert_eq!(status, 429);
    let body = json(&body);
    assert_eq!(body["error"], "upstream_error");
    assert_eq!(body["details"]["errors"], "Exceeded rate limit");
}

#[tokio::test]
async fn test_upstream_transport_failure_is_500() {
    // Nothing listens on the upstream base
    let gw = gateway(Some("http://127.0.0.1:1"));
    gw.install(SHOP, "shpat_test");

    let (status, _, body) =
        get_bearer(&gw.router, &format!("/v1/orders?shop={SHOP}"), BEARER_SECRET).await;

    assert_eq!(status, 500);
    assert_eq!(json(&body)["error"], "internal_error");
}

// ============================================================================
// Single order
// ============================================================================

#[tokio::test]
async fn test_single_order_success() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/api/2025-10/orders/450789469.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "order": orders_fixture()["orders"][0]
        })))
        .mount(&mock_server)
        .await;

    let gw = gateway(Some(&mock_server.uri()));
    gw.install(SHOP, "shpat_test");

    let (status, _, body) = get_bearer(
        &gw.router,
        &format!("/v1/orders/450789469?shop={SHOP}"),
        BEARER_SECRET,
    )
    .await;

    assert_eq!(status, 200);
    let body = json(&body);
    assert_eq!(body["ok"], true);
    assert_eq!(body["order"]["id"], 450_789_469_u64);
    assert_eq!(body["order"]["name"], "#1001");
}

#[tokio::test]
async fn test_single_order_upstream_404_maps_to_404() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/api/2025-10/orders/999.json"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"errors": "Not Found"})),
        )
        .mount(&mock_server)
        .await;

    let gw = gateway(Some(&mock_server.uri()));
    gw.install(SHOP, "shpat_test");

    let (status, _, body) = get_bearer(
        &gw.router,
        &format!("/v1/orders/999?shop={SHOP}"),
        BEARER_SECRET,
    )
    .await;

    assert_eq!(status, 404);
    assert_eq!(json(&body)["error"], "not_found");
}

#[tokio::test]
async fn test_single_order_requires_shop() {
    let gw = gateway(None);
    let (status, _, body) = get_bearer(&gw.router, "/v1/orders/123", BEARER_SECRET).await;

    assert_eq!(status, 400);
    assert_eq!(json(&body)["error"], "validation_error");
}

// ============================================================================
// Protection
// ============================================================================

#[tokio::test]
async fn test_orders_requires_bearer() {
    let gw = gateway(None);
    let (status, _, _) = get(&gw.router, &format!("/v1/orders?shop={SHOP}")).await;
    assert_eq!(status, 401);
}
