//! Product catalog HTTP API.
//!
//! Endpoints:
//! - `GET    /products`                - filtered, sorted, paginated listing
//! - `POST   /products`                - create a product (id assigned by the store)
//! - `GET    /products/{id}`           - fetch one product
//! - `PUT    /products/{id}`           - replace a product (moves it to the end)
//! - `DELETE /products/{id}`           - remove a product
//! - `POST   /products/calculatePrice` - price a quantity of a named product
//!
//! Errors are returned as plain text with a 400, 404 or 500 status.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use storefront_core::catalog::{
    calculate_price, filter_products, has_category, paginate, ListQuery,
};
use serde::Serialize;
use storefront_core::{CatalogError, CatalogStore, PriceRequest, ProductDraft, ProductId};
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct CatalogState {
    store: Arc<CatalogStore>,
}

impl CatalogState {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self { store }
    }
}

#[derive(Debug)]
pub struct ApiError {
    error: CatalogError,
    correlation_id: String,
}

impl ApiError {
    fn new(error: CatalogError, correlation_id: &str) -> Self {
        Self { error, correlation_id: correlation_id.to_string() }
    }

    fn status(&self) -> StatusCode {
        match self.error {
            CatalogError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                event_name = "catalog.request.failed",
                correlation_id = %self.correlation_id,
                error_kind = self.error.kind(),
                error = %self.error,
                "catalog request failed"
            );
        } else {
            warn!(
                event_name = "catalog.request.rejected",
                correlation_id = %self.correlation_id,
                error_kind = self.error.kind(),
                status = status.as_u16(),
                error = %self.error,
                "catalog request rejected"
            );
        }

        (status, self.error.to_string()).into_response()
    }
}

pub fn router(store: Arc<CatalogStore>) -> Router {
    Router::new()
        .route("/products", get(list_products).post(add_product))
        .route("/products/calculatePrice", post(calculate_product_price))
        .route("/products/{id}", get(get_product).put(update_product).delete(delete_product))
        .with_state(CatalogState::new(store))
}

async fn list_products(
    State(state): State<CatalogState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let correlation_id = correlation_id();
    let validated = query.validate().map_err(|error| ApiError::new(error, &correlation_id))?;

    // Category existence and filtering must see the same catalog state.
    let products = state.store.snapshot().await;
    let category = &validated.filter.category;
    if !category.is_empty() && !has_category(&products, category) {
        let error = CatalogError::invalid("invalid category value");
        return Err(ApiError::new(error, &correlation_id));
    }

    let filtered = filter_products(&products, &validated.filter);
    let page = paginate(filtered, validated.limit, validated.offset);

    info!(
        event_name = "catalog.products.listed",
        correlation_id = %correlation_id,
        total_items = page.pagination.total_items,
        returned = page.data.len(),
        limit = validated.limit,
        offset = validated.offset,
        "products listed"
    );

    encode_json(&page, &correlation_id)
}

async fn get_product(
    State(state): State<CatalogState>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    let correlation_id = correlation_id();
    let id = parse_id(&raw_id, &correlation_id)?;

    let product = state
        .store
        .find(id)
        .await
        .ok_or_else(|| ApiError::new(CatalogError::product_not_found(id), &correlation_id))?;

    encode_json(&product, &correlation_id)
}

async fn add_product(
    State(state): State<CatalogState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let correlation_id = correlation_id();
    let draft = decode_draft(&body, &correlation_id)?;

    let product = state.store.insert(draft).await;

    info!(
        event_name = "catalog.product.created",
        correlation_id = %correlation_id,
        product_id = %product.id,
        "product created"
    );

    encode_json(&product, &correlation_id)
}

async fn update_product(
    State(state): State<CatalogState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let correlation_id = correlation_id();
    let id = parse_id(&raw_id, &correlation_id)?;

    // A missing product is reported before the body is looked at.
    if state.store.find(id).await.is_none() {
        return Err(ApiError::new(CatalogError::product_not_found(id), &correlation_id));
    }
    let draft = decode_draft(&body, &correlation_id)?;

    let product = state
        .store
        .replace(id, draft)
        .await
        .map_err(|error| ApiError::new(error, &correlation_id))?;

    info!(
        event_name = "catalog.product.updated",
        correlation_id = %correlation_id,
        product_id = %product.id,
        "product updated"
    );

    encode_json(&product, &correlation_id)
}

async fn delete_product(
    State(state): State<CatalogState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let correlation_id = correlation_id();
    let id = parse_id(&raw_id, &correlation_id)?;

    let removed =
        state.store.remove(id).await.map_err(|error| ApiError::new(error, &correlation_id))?;

    info!(
        event_name = "catalog.product.deleted",
        correlation_id = %correlation_id,
        product_id = %removed.id,
        "product deleted"
    );

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "application/json")]))
}

async fn calculate_product_price(
    State(state): State<CatalogState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let correlation_id = correlation_id();
    let request: PriceRequest = serde_json::from_slice(&body).map_err(|error| {
        let error = CatalogError::invalid(format!("invalid price request: {error}"));
        ApiError::new(error, &correlation_id)
    })?;

    let product = state.store.find_by_name(&request.name).await.ok_or_else(|| {
        ApiError::new(
            CatalogError::NotFound(format!("product `{}` not found", request.name)),
            &correlation_id,
        )
    })?;

    let quote = calculate_price(&product, request.quantity)
        .map_err(|error| ApiError::new(error, &correlation_id))?;

    info!(
        event_name = "catalog.price.calculated",
        correlation_id = %correlation_id,
        product_id = %product.id,
        quantity = quote.quantity,
        total_price = %quote.total_price,
        "price calculated"
    );

    encode_json(&quote, &correlation_id)
}

fn parse_id(raw_id: &str, correlation_id: &str) -> Result<ProductId, ApiError> {
    raw_id
        .parse::<ProductId>()
        .map_err(|_| ApiError::new(CatalogError::invalid("invalid product id"), correlation_id))
}

/// An empty body is a product with every field at its zero value. Anything
/// else has to decode as a product.
fn decode_draft(body: &[u8], correlation_id: &str) -> Result<ProductDraft, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ProductDraft::default());
    }

    serde_json::from_slice(body).map_err(|error| {
        let error = CatalogError::invalid(format!("invalid product body: {error}"));
        ApiError::new(error, correlation_id)
    })
}

fn encode_json<T: Serialize>(value: &T, correlation_id: &str) -> Result<Response, ApiError> {
    let body = serde_json::to_vec(value).map_err(|error| {
        let error = CatalogError::Internal(format!("failed to encode JSON: {error}"));
        ApiError::new(error, correlation_id)
    })?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

fn correlation_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        response::IntoResponse,
        Router,
    };
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use storefront_core::{CatalogStore, ProductId};
    use tower::ServiceExt;

    use super::{encode_json, router};

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let body = match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        };
        let request = Request::builder().method(method).uri(uri).body(body).expect("request");

        let response = app.clone().oneshot(request).await.expect("router response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
        (status, bytes.to_vec())
    }

    async fn send_raw(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_string()))
            .expect("request");

        let response = app.clone().oneshot(request).await.expect("router response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
        (status, bytes.to_vec())
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let (status, body) = send(app, Method::GET, uri, None).await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    fn seeded() -> (Router, Arc<CatalogStore>) {
        let store = Arc::new(CatalogStore::seeded());
        (router(store.clone()), store)
    }

    fn ids(page: &Value) -> Vec<i64> {
        page["data"]
            .as_array()
            .map(|items| items.iter().filter_map(|item| item["id"].as_i64()).collect())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn list_first_page_in_insertion_order() {
        let (app, _) = seeded();

        let (status, page) = get_json(&app, "/products?limit=2&offset=0").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&page), vec![1, 2]);
        assert_eq!(
            page["pagination"],
            json!({"current_page": 1, "total_pages": 2, "total_items": 3, "limit": 2, "offset": 0})
        );
        assert_eq!(page["data"][0]["name"], "kaas");
        assert_eq!(page["data"][0]["price"], 50);
    }

    #[tokio::test]
    async fn list_filters_by_category_case_insensitively() {
        let (app, _) = seeded();

        let (status, page) = get_json(&app, "/products?limit=1&offset=0&category=ZUIVEL").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&page), vec![1]);
        assert_eq!(page["pagination"]["total_items"], 1);
        assert_eq!(page["pagination"]["total_pages"], 1);
    }

    #[tokio::test]
    async fn list_rejects_unknown_category() {
        let (app, _) = seeded();

        let (status, body) =
            send(&app, Method::GET, "/products?limit=1&offset=0&category=nonexistent", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(String::from_utf8_lossy(&body), "invalid category value");
    }

    #[tokio::test]
    async fn list_reports_the_first_invalid_parameter() {
        let (app, _) = seeded();

        let cases = [
            ("/products", "invalid limit value"),
            ("/products?limit=0&offset=0", "invalid limit value"),
            ("/products?limit=2", "invalid offset value"),
            ("/products?limit=2&offset=-3", "invalid offset value"),
            ("/products?limit=2&offset=0&min_price=abc", "invalid minimum price value"),
            ("/products?limit=2&offset=0&max_price=-1", "invalid maximum price value"),
            (
                "/products?limit=2&offset=0&min_price=40&max_price=20",
                "maximum price cannot be less than minimum price",
            ),
            ("/products?limit=2&offset=0&sort_by=cheap", "invalid sort_by value"),
        ];

        for (uri, expected) in cases {
            let (status, body) = send(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(String::from_utf8_lossy(&body), expected, "{uri}");
        }
    }

    #[tokio::test]
    async fn list_sorts_and_bounds_by_price() {
        let (app, _) = seeded();

        let (_, ascending) = get_json(&app, "/products?limit=10&offset=0&sort_by=LnH").await;
        let (_, descending) = get_json(&app, "/products?limit=10&offset=0&sort_by=HnL").await;
        let (_, bounded) =
            get_json(&app, "/products?limit=10&offset=0&min_price=20&max_price=50").await;
        let (_, named) = get_json(&app, "/products?limit=10&offset=0&name=SHIRT").await;

        assert_eq!(ids(&ascending), vec![2, 3, 1]);
        assert_eq!(ids(&descending), vec![1, 3, 2]);
        assert_eq!(ids(&bounded), vec![1, 3]);
        assert_eq!(ids(&named), vec![2]);
    }

    #[tokio::test]
    async fn list_with_offset_past_the_end_is_empty() {
        let (app, _) = seeded();

        let (status, page) = get_json(&app, "/products?limit=2&offset=5").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["data"], json!([]));
        assert_eq!(page["pagination"]["total_items"], 3);
    }

    #[tokio::test]
    async fn get_by_id_returns_product_or_errors() {
        let (app, _) = seeded();

        let (status, product) = get_json(&app, "/products/3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(product["name"], "nike air max");

        let (status, _) = send(&app, Method::GET, "/products/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, Method::GET, "/products/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(String::from_utf8_lossy(&body), "invalid product id");
    }

    #[tokio::test]
    async fn create_then_fetch_round_trips() {
        let (app, _) = seeded();

        let (status, body) = send(
            &app,
            Method::POST,
            "/products",
            Some(json!({
                "id": 500,
                "price": 2.5,
                "name": "melk",
                "description": "volle melk",
                "category": "zuivel"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let created: Value = serde_json::from_slice(&body).expect("created product json");
        assert_eq!(created["id"], 4);

        let (status, fetched) = get_json(&app, "/products/4").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn create_with_empty_body_stores_zero_valued_product() {
        let (app, store) = seeded();

        let (status, body) = send(&app, Method::POST, "/products", None).await;

        assert_eq!(status, StatusCode::OK);
        let created: Value = serde_json::from_slice(&body).expect("created product json");
        assert_eq!(created, json!({"id": 4, "price": 0, "name": "", "description": "", "category": ""}));
        assert_eq!(store.len().await, 4);
    }

    #[tokio::test]
    async fn create_with_malformed_body_is_rejected_without_mutation() {
        let (app, store) = seeded();

        let (status, _) = send_raw(&app, Method::POST, "/products", "{\"name\": ").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn update_replaces_record_and_moves_it_to_the_end() {
        let (app, store) = seeded();

        let (status, body) = send(
            &app,
            Method::PUT,
            "/products/1",
            Some(json!({"price": 55, "name": "belegen kaas", "description": "", "category": "zuivel"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let updated: Value = serde_json::from_slice(&body).expect("updated product json");
        assert_eq!(updated["id"], 1);
        assert_eq!(updated["name"], "belegen kaas");

        let order: Vec<i64> = store.snapshot().await.iter().map(|product| product.id.0).collect();
        assert_eq!(order, vec![2, 3, 1]);
        let stored = store.find(ProductId(1)).await.expect("updated product is stored");
        assert_eq!(stored.price, Decimal::from(55));
    }

    #[tokio::test]
    async fn update_unknown_or_invalid_id() {
        let (app, _) = seeded();

        let (status, _) = send(&app, Method::PUT, "/products/9", Some(json!({"name": "x"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::PUT, "/products/x", Some(json!({"name": "x"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found_before_body_is_decoded() {
        let (app, store) = seeded();

        let (status, body) = send_raw(&app, Method::PUT, "/products/99", "not json").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(String::from_utf8_lossy(&body), "product 99 not found");
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn update_of_known_id_with_malformed_body_is_rejected() {
        let (app, store) = seeded();

        let (status, _) = send_raw(&app, Method::PUT, "/products/1", "not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let order: Vec<i64> = store.snapshot().await.iter().map(|product| product.id.0).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    struct Unencodable;

    impl serde::Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("value cannot be encoded"))
        }
    }

    #[tokio::test]
    async fn encoding_failure_is_an_internal_error() {
        let response = match encode_json(&Unencodable, "corr-1") {
            Ok(_) => panic!("encoding should fail"),
            Err(error) => error.into_response(),
        };

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
        assert!(String::from_utf8_lossy(&body).starts_with("failed to encode JSON"));
    }

    #[tokio::test]
    async fn delete_then_fetch_is_not_found() {
        let (app, store) = seeded();

        let (status, body) = send(&app, Method::DELETE, "/products/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());

        let (status, _) = send(&app, Method::GET, "/products/2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let order: Vec<i64> = store.snapshot().await.iter().map(|product| product.id.0).collect();
        assert_eq!(order, vec![1, 3]);
    }

    #[tokio::test]
    async fn delete_of_the_last_product_does_not_stop_at_the_first_mismatch() {
        let (app, _) = seeded();

        let (status, _) = send(&app, Method::DELETE, "/products/3", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, Method::DELETE, "/products/3", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, "/products/three", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn calculate_price_multiplies_by_quantity() {
        let (app, _) = seeded();

        let (status, body) = send(
            &app,
            Method::POST,
            "/products/calculatePrice",
            Some(json!({"name": "kaas", "quantity": 3})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let quote: Value = serde_json::from_slice(&body).expect("price json");
        assert_eq!(quote["name"], "kaas");
        assert_eq!(quote["quantity"], 3);
        assert_eq!(quote["total_price"], 150);
        assert_eq!(
            String::from_utf8_lossy(&body),
            r#"{"name":"kaas","quantity":3,"total_price":150}"#
        );
    }

    #[tokio::test]
    async fn calculate_price_errors() {
        let (app, _) = seeded();

        let (status, _) = send(
            &app,
            Method::POST,
            "/products/calculatePrice",
            Some(json!({"name": "Kaas", "quantity": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) =
            send_raw(&app, Method::POST, "/products/calculatePrice", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            Method::POST,
            "/products/calculatePrice",
            Some(json!({"name": "kaas", "quantity": 1.5})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
