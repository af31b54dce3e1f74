use std::str::FromStr;

use pricebook_core::TenantId;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::{json, Value};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port.
        let services = std::sync::Arc::new(pricebook_api::app::services::AppServices::in_memory());
        let app = pricebook_api::app::build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Thin client that always sends the tenant header.
struct TenantClient<'a> {
    http: reqwest::Client,
    srv: &'a TestServer,
    tenant_id: TenantId,
}

impl<'a> TenantClient<'a> {
    fn new(srv: &'a TestServer, tenant_id: TenantId) -> Self {
        Self {
            http: reqwest::Client::new(),
            srv,
            tenant_id,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.srv.base_url, path)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let res = self
            .http
            .get(self.url(path))
            .header("x-tenant-id", self.tenant_id.to_string())
            .send()
            .await
            .unwrap();
        read(res).await
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self
            .http
            .post(self.url(path))
            .header("x-tenant-id", self.tenant_id.to_string())
            .json(&body)
            .send()
            .await
            .unwrap();
        read(res).await
    }

    async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self
            .http
            .put(self.url(path))
            .header("x-tenant-id", self.tenant_id.to_string())
            .json(&body)
            .send()
            .await
            .unwrap();
        read(res).await
    }

    async fn delete(&self, path: &str) -> (StatusCode, Value) {
        let res = self
            .http
            .delete(self.url(path))
            .header("x-tenant-id", self.tenant_id.to_string())
            .send()
            .await
            .unwrap();
        read(res).await
    }

    async fn create_product(&self, sku: &str, base_price: &str) -> String {
        let (status, body) = self
            .post(
                "/products",
                json!({ "sku": sku, "name": format!("Product {sku}"), "base_price": base_price }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create product: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    async fn create_price_list(&self, name: &str) -> String {
        let (status, body) = self.post("/price-lists", json!({ "name": name })).await;
        assert_eq!(status, StatusCode::CREATED, "create price list: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    async fn add_entry(&self, list_id: &str, product_id: &str) {
        let (status, body) = self
            .post(
                &format!("/price-lists/{list_id}/entries"),
                json!({ "product_id": product_id }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "add entry: {body}");
    }
}

async fn read(res: reqwest::Response) -> (StatusCode, Value) {
    let status = res.status();
    let text = res.text().await.unwrap_or_default();
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    (status, body)
}

fn money(v: &Value) -> Decimal {
    match v {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        other => Decimal::from_str(&other.to_string()).unwrap(),
    }
}

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[tokio::test]
async fn health_does_not_require_a_tenant() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn tenant_header_is_required_on_domain_routes() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "missing_tenant");

    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .header("x-tenant-id", "not-a-uuid")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_tenant");
}

#[tokio::test]
async fn tenant_context_is_derived_from_header() {
    let srv = TestServer::spawn().await;
    let tenant_id = TenantId::new();
    let client = TenantClient::new(&srv, tenant_id);

    let (status, body) = client.get("/whoami").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tenant_id"].as_str().unwrap(), tenant_id.to_string());
}

#[tokio::test]
async fn product_lifecycle_create_activate_reprice_archive() {
    let srv = TestServer::spawn().await;
    let client = TenantClient::new(&srv, TenantId::new());

    let (status, body) = client
        .post(
            "/products",
            json!({ "sku": "W-1", "name": "Widget", "base_price": "19.99", "currency": "usd" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, product) = client.get(&format!("/products/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["status"], "draft");
    assert_eq!(product["currency"], "USD");
    assert_eq!(money(&product["base_price"]), d("19.99"));

    let (status, _) = client.post(&format!("/products/{id}/activate"), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = client
        .post(&format!("/products/{id}/base-price"), json!({ "base_price": 24.5 }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = client.post(&format!("/products/{id}/archive"), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (_, product) = client.get(&format!("/products/{id}")).await;
    assert_eq!(product["status"], "archived");
    assert_eq!(money(&product["base_price"]), d("24.5"));

    // Archived products keep their price.
    let (status, body) = client
        .post(&format!("/products/{id}/base-price"), json!({ "base_price": "30" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
}

#[tokio::test]
async fn negative_base_price_is_a_validation_error() {
    let srv = TestServer::spawn().await;
    let client = TenantClient::new(&srv, TenantId::new());

    let (status, body) = client
        .post(
            "/products",
            json!({ "sku": "W-1", "name": "Widget", "base_price": "-1.00" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn bulk_decrease_reprices_listed_products() {
    let srv = TestServer::spawn().await;
    let client = TenantClient::new(&srv, TenantId::new());

    let p1 = client.create_product("A", "250.505").await;
    let p2 = client.create_product("B", "80.00").await;
    let list = client.create_price_list("Wholesale").await;
    client.add_entry(&list, &p1).await;
    client.add_entry(&list, &p2).await;

    let (status, body) = client
        .post(
            &format!("/price-lists/{list}/adjustments"),
            json!({ "product_ids": [p1, p2], "direction": "decrease", "percentage": "20" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["product_id"].as_str().unwrap(), p1);
    assert_eq!(money(&items[0]["new_price"]), d("200.40"));
    assert_eq!(items[1]["product_id"].as_str().unwrap(), p2);
    assert_eq!(money(&items[1]["new_price"]), d("64.00"));

    let (status, view) = client.get(&format!("/price-lists/{list}")).await;
    assert_eq!(status, StatusCode::OK);
    let entries = view["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e["source"] == "adjustment"));
}

#[tokio::test]
async fn bulk_adjustment_validates_its_input() {
    let srv = TestServer::spawn().await;
    let client = TenantClient::new(&srv, TenantId::new());

    let p1 = client.create_product("A", "10.00").await;
    let list = client.create_price_list("Retail").await;
    client.add_entry(&list, &p1).await;
    let path = format!("/price-lists/{list}/adjustments");

    let (status, body) = client
        .post(&path, json!({ "product_ids": [p1], "direction": "decrease", "percentage": "-5" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_argument");

    let (status, body) = client
        .post(&path, json!({ "product_ids": [p1], "direction": "sideways", "percentage": "5" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_argument");

    let (status, body) = client
        .post(&path, json!({ "product_ids": [], "direction": "increase", "percentage": "5" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "empty_input");

    // Nothing was changed by the rejected requests.
    let (_, view) = client.get(&format!("/price-lists/{list}")).await;
    assert_eq!(money(&view["entries"][0]["price"]), d("10.00"));
    assert_eq!(view["entries"][0]["source"], "base");
}

#[tokio::test]
async fn resolved_price_prefers_the_list_entry() {
    let srv = TestServer::spawn().await;
    let client = TenantClient::new(&srv, TenantId::new());

    let product = client.create_product("A", "100.00").await;
    let list = client.create_price_list("VIP").await;
    let price_path = format!("/price-lists/{list}/entries/{product}/price");

    let (status, body) = client.get(&price_path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "base");
    assert_eq!(money(&body["price"]), d("100.00"));

    client.add_entry(&list, &product).await;
    let (status, _) = client
        .put(
            &format!("/price-lists/{list}/entries/{product}"),
            json!({ "price": "89.90" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = client.get(&price_path).await;
    assert_eq!(body["source"], "list");
    assert_eq!(money(&body["price"]), d("89.90"));

    // Zero is a real list price, not a missing one.
    client
        .put(
            &format!("/price-lists/{list}/entries/{product}"),
            json!({ "price": "0" }),
        )
        .await;
    let (_, body) = client.get(&price_path).await;
    assert_eq!(money(&body["price"]), Decimal::ZERO);

    let (status, _) = client
        .post(&format!("/price-lists/{list}/entries/{product}/reset"), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = client.get(&price_path).await;
    assert_eq!(money(&body["price"]), d("100.00"));

    let (status, _) = client
        .delete(&format!("/price-lists/{list}/entries/{product}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = client.get(&price_path).await;
    assert_eq!(body["source"], "base");
}

#[tokio::test]
async fn archived_products_cannot_be_added_to_a_list() {
    let srv = TestServer::spawn().await;
    let client = TenantClient::new(&srv, TenantId::new());

    let product = client.create_product("A", "5.00").await;
    client.post(&format!("/products/{product}/archive"), json!({})).await;
    let list = client.create_price_list("Retail").await;

    let (status, body) = client
        .post(
            &format!("/price-lists/{list}/entries"),
            json!({ "product_id": product }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invariant_violation");
}

#[tokio::test]
async fn deleted_price_list_rejects_further_changes() {
    let srv = TestServer::spawn().await;
    let client = TenantClient::new(&srv, TenantId::new());

    let product = client.create_product("A", "5.00").await;
    let list = client.create_price_list("Seasonal").await;
    client.add_entry(&list, &product).await;

    let (status, _) = client.delete(&format!("/price-lists/{list}")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, view) = client.get(&format!("/price-lists/{list}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["status"], "deleted");
    assert!(view["entries"].as_array().unwrap().is_empty());

    let (status, _) = client.delete(&format!("/price-lists/{list}")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = client
        .post(
            &format!("/price-lists/{list}/adjustments"),
            json!({ "product_ids": [product], "direction": "increase", "percentage": "10" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn preview_computes_prices_without_persisting() {
    let srv = TestServer::spawn().await;
    let client = TenantClient::new(&srv, TenantId::new());

    let product = client.create_product("A", "100.00").await;
    let list = client.create_price_list("Retail").await;
    client.add_entry(&list, &product).await;

    let (status, body) = client
        .post(
            "/pricing/preview",
            json!({
                "items": [
                    { "product_id": product, "base_price": "100.00" },
                    { "product_id": product, "base_price": "0.10" },
                ],
                "direction": "increase",
                "percentage": "15",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let items = body["items"].as_array().unwrap();
    assert_eq!(money(&items[0]["new_price"]), d("115.00"));
    assert_eq!(money(&items[1]["new_price"]), d("0.12"));

    let (_, view) = client.get(&format!("/price-lists/{list}")).await;
    assert_eq!(money(&view["entries"][0]["price"]), d("100.00"));

    let (status, body) = client
        .post(
            "/pricing/preview",
            json!({ "items": [], "direction": "increase", "percentage": "15" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "empty_input");
}

#[tokio::test]
async fn tenant_isolation_blocks_cross_tenant_reads_and_writes() {
    let srv = TestServer::spawn().await;
    let tenant1 = TenantClient::new(&srv, TenantId::new());
    let tenant2 = TenantClient::new(&srv, TenantId::new());

    let product = tenant1.create_product("A", "10.00").await;
    let list = tenant1.create_price_list("Tenant one").await;

    let (status, _) = tenant2.get(&format!("/price-lists/{list}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = tenant2.get(&format!("/products/{product}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = tenant2
        .post(
            &format!("/price-lists/{list}/entries"),
            json!({ "product_id": product }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn product_id_does_not_address_a_price_list() {
    let srv = TestServer::spawn().await;
    let client = TenantClient::new(&srv, TenantId::new());

    let product = client.create_product("A", "10.00").await;

    let (status, body) = client.get(&format!("/price-lists/{product}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");
    assert_eq!(body["error"], "not_found");

    let (status, body) = client
        .post(
            &format!("/price-lists/{product}/adjustments"),
            json!({ "product_ids": [product], "direction": "increase", "percentage": "10" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");

    // The product itself is untouched.
    let (status, view) = client.get(&format!("/products/{product}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&view["base_price"]), d("10.00"));
    assert_eq!(view["version"], 1);
}

#[tokio::test]
async fn price_list_id_does_not_address_a_product() {
    let srv = TestServer::spawn().await;
    let client = TenantClient::new(&srv, TenantId::new());

    let list = client.create_price_list("Retail").await;

    let (status, _) = client.get(&format!("/products/{list}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = client
        .post(&format!("/products/{list}/archive"), json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn adjustment_response_lists_the_committed_prices_in_request_order() {
    let srv = TestServer::spawn().await;
    let client = TenantClient::new(&srv, TenantId::new());

    let p1 = client.create_product("A", "19.99").await;
    let p2 = client.create_product("B", "0.05").await;
    let list = client.create_price_list("Retail").await;

    // Neither product is listed yet; the adjustment adds them.
    let (status, body) = client
        .post(
            &format!("/price-lists/{list}/adjustments"),
            json!({ "product_ids": [p2, p1], "direction": "increase", "percentage": "10" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["product_id"].as_str().unwrap(), p2);
    assert_eq!(money(&items[0]["new_price"]), d("0.06"));
    assert_eq!(items[1]["product_id"].as_str().unwrap(), p1);
    assert_eq!(money(&items[1]["new_price"]), d("21.99"));
}
