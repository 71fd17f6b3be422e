//! Integration tests for the Jikoni admin client.
//!
//! [`MockApi`] serves the catalogue API on an ephemeral localhost port. It
//! behaves like the real backend (login, bearer checks, product and message
//! CRUD, dashboard counters) and records every request it receives, so tests
//! can drive the real reqwest gateway and then assert on exactly what went
//! over the wire.
//!
//! Any `(method, path)` can be overridden with a scripted response:
//!
//! ```rust,ignore
//! let api = MockApi::start().await?;
//! api.respond(Method::GET, "/api/dashboard/stats", StatusCode::UNAUTHORIZED,
//!     json!({"msg": "Token has expired"})).await;
//! ```
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p jikoni-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use jikoni_client::navigator::ChannelNavigator;
use jikoni_client::{AdminClient, ClientConfig, Route, Session};
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Username accepted by the mock login.
pub const ADMIN_USERNAME: &str = "admin";

/// Password accepted by the mock login.
pub const ADMIN_PASSWORD: &str = "admin123";

/// Token issued by a successful mock login.
pub const ADMIN_TOKEN: &str = "mock-admin-token";

const CATEGORIES: [&str; 4] = ["Kitchen", "Wardrobe", "Cabinetry", "Custom"];
const SEED_TIME: &str = "2025-01-20 14:02:11";

/// One request as the mock API saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    /// Raw query string, `None` when the URL had no `?`.
    pub query: Option<String>,
    pub headers: HeaderMap,
    /// Parsed JSON body; `Null` when empty.
    pub body: Value,
}

impl RecordedRequest {
    /// Header value as text.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// `Authorization` header value.
    #[must_use]
    pub fn authorization(&self) -> Option<&str> {
        self.header(header::AUTHORIZATION.as_str())
    }

    /// Query parameter names in order of appearance.
    #[must_use]
    pub fn query_keys(&self) -> Vec<String> {
        self.query
            .as_deref()
            .unwrap_or_default()
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| pair.split('=').next().unwrap_or_default().to_owned())
            .collect()
    }
}

#[derive(Clone)]
struct Scripted {
    status: StatusCode,
    body: Value,
}

/// Backend data, shaped like the database rows the real API returns.
struct Store {
    admin_email: String,
    admin_password: String,
    products: Vec<Value>,
    messages: Vec<Value>,
    next_product_id: i64,
    next_message_id: i64,
}

impl Store {
    fn seeded() -> Self {
        Self {
            admin_email: "admin@jikonistudios.com".to_owned(),
            admin_password: ADMIN_PASSWORD.to_owned(),
            products: vec![
                json!({
                    "id": 1, "name": "Walnut Island", "category": "Kitchen",
                    "description": "Solid walnut kitchen island", "price": 185_000.0,
                    "featured": true, "image_url": "/uploads/island.jpg", "created_at": SEED_TIME
                }),
                json!({
                    "id": 2, "name": "Sliding Wardrobe", "category": "Wardrobe",
                    "description": "", "price": null, "featured": false,
                    "image_url": null, "created_at": SEED_TIME
                }),
                json!({
                    "id": 3, "name": "Shaker Cabinets", "category": "Cabinetry",
                    "description": null, "price": 64_500.0, "featured": false,
                    "image_url": null, "created_at": SEED_TIME
                }),
            ],
            messages: vec![
                json!({
                    "id": 1, "name": "Wanjiru", "email": "wanjiru@example.com", "phone": "",
                    "message": "Do you build fitted wardrobes?", "status": "new",
                    "created_at": SEED_TIME
                }),
                json!({
                    "id": 2, "name": "Otieno", "email": "otieno@example.com",
                    "phone": "+254700000000", "message": "Quote for a kitchen please",
                    "status": "read", "created_at": SEED_TIME
                }),
            ],
            next_product_id: 4,
            next_message_id: 3,
        }
    }

    fn admin(&self) -> Value {
        json!({"id": 1, "username": ADMIN_USERNAME, "email": self.admin_email})
    }
}

struct MockState {
    requests: Mutex<Vec<RecordedRequest>>,
    scripted: Mutex<HashMap<(Method, String), Scripted>>,
    store: Mutex<Store>,
}

/// In-process mock of the catalogue API.
pub struct MockApi {
    addr: SocketAddr,
    state: Arc<MockState>,
    server: JoinHandle<()>,
}

impl MockApi {
    /// Bind an ephemeral port and start serving seeded data.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = Arc::new(MockState {
            requests: Mutex::new(Vec::new()),
            scripted: Mutex::new(HashMap::new()),
            store: Mutex::new(Store::seeded()),
        });

        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state))
            .layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Mock API stopped");
            }
        });

        debug!(%addr, "Mock API listening");
        Ok(Self {
            addr,
            state,
            server,
        })
    }

    /// Origin to point a client at, e.g. `http://127.0.0.1:41234`.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client config pointing at this mock, session kept in memory.
    ///
    /// # Panics
    ///
    /// Never in practice: the mock URL is always a valid `http` origin.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&self.url()).expect("mock URL is a valid origin")
    }

    /// Fresh client with an empty in-memory session and a navigator whose
    /// requests arrive on the returned receiver.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn client(
        &self,
    ) -> Result<(AdminClient, mpsc::UnboundedReceiver<Route>), jikoni_client::ApiError> {
        self.client_with_session(Session::in_memory())
    }

    /// As [`MockApi::client`] but over an existing session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn client_with_session(
        &self,
        session: Session,
    ) -> Result<(AdminClient, mpsc::UnboundedReceiver<Route>), jikoni_client::ApiError> {
        let (navigator, routes) = ChannelNavigator::channel();
        let client = AdminClient::new(&self.config(), session, Arc::new(navigator))?;
        Ok((client, routes))
    }

    /// Answer every `method path` request with `status` and `body` until
    /// [`MockApi::clear_script`] is called.
    pub async fn respond(&self, method: Method, path: &str, status: StatusCode, body: Value) {
        self.state
            .scripted
            .lock()
            .await
            .insert((method, path.to_owned()), Scripted { status, body });
    }

    /// Drop every scripted response.
    pub async fn clear_script(&self) {
        self.state.scripted.lock().await.clear();
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().await.clone()
    }

    /// Requests matching `method` and `path`.
    pub async fn requests_to(&self, method: &Method, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .await
            .into_iter()
            .filter(|r| r.method == *method && r.path == path)
            .collect()
    }

    /// Forget recorded requests.
    pub async fn reset_requests(&self) {
        self.state.requests.lock().await.clear();
    }

    /// Current product rows.
    pub async fn products(&self) -> Vec<Value> {
        self.state.store.lock().await.products.clone()
    }

    /// Current message rows.
    pub async fn messages(&self) -> Vec<Value> {
        self.state.store.lock().await.messages.clone()
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

// =============================================================================
// Request handling
// =============================================================================

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_owned();
    let query = uri.query().map(str::to_owned);
    let json_body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };

    state.requests.lock().await.push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: query.clone(),
        headers: headers.clone(),
        body: json_body.clone(),
    });

    let scripted = state
        .scripted
        .lock()
        .await
        .get(&(method.clone(), path.clone()))
        .cloned();
    if let Some(Scripted { status, body }) = scripted {
        return reply(status, body);
    }

    let params = parse_query(query.as_deref());
    let mut store = state.store.lock().await;
    route(&mut store, &method, &path, &params, &headers, json_body)
}

fn route(
    store: &mut Store,
    method: &Method,
    path: &str,
    params: &HashMap<String, String>,
    headers: &HeaderMap,
    body: Value,
) -> Response {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", ["api", "health"]) => ok(json!({"status": "healthy", "message": "API is running"})),
        ("GET", ["api", "categories"]) => ok(json!({"categories": CATEGORIES})),
        ("POST", ["api", "auth", "login"]) => login(store, &body),
        ("GET", ["api", "products"]) => list_products(store, params),
        ("GET", ["api", "products", id]) => find(&store.products, id)
            .map_or_else(|| not_found("Product"), |p| ok(p.clone())),
        ("POST", ["api", "messages"]) => submit_message(store, body),
        _ => {
            if let Err(rejection) = authorize(headers) {
                return rejection;
            }
            admin_route(store, method.as_str(), &segments, params, body)
        }
    }
}

fn admin_route(
    store: &mut Store,
    method: &str,
    segments: &[&str],
    params: &HashMap<String, String>,
    body: Value,
) -> Response {
    match (method, segments) {
        ("GET", ["api", "auth", "profile"]) => ok(store.admin()),
        ("PUT", ["api", "auth", "profile"]) => {
            if let Some(email) = body.get("email").and_then(Value::as_str) {
                email.clone_into(&mut store.admin_email);
            }
            if let Some(password) = body.get("new_password").and_then(Value::as_str) {
                password.clone_into(&mut store.admin_password);
            }
            ok(json!({"message": "Profile updated", "admin": store.admin()}))
        }

        ("POST", ["api", "products"]) => create_product(store, body),
        ("PUT", ["api", "products", id]) => update_product(store, id, body),
        ("DELETE", ["api", "products", id]) => {
            if remove(&mut store.products, id) {
                ok(json!({"message": "Product deleted"}))
            } else {
                not_found("Product")
            }
        }

        ("GET", ["api", "messages"]) => {
            let status = params.get("status");
            let messages: Vec<Value> = store
                .messages
                .iter()
                .filter(|m| status.is_none_or(|s| m["status"] == s.as_str()))
                .cloned()
                .collect();
            ok(json!({"messages": messages}))
        }
        ("GET", ["api", "messages", id]) => find(&store.messages, id)
            .map_or_else(|| not_found("Message"), |m| ok(m.clone())),
        ("PUT", ["api", "messages", id]) => {
            let Some(status) = body.get("status").and_then(Value::as_str) else {
                return bad_request("Status is required");
            };
            if !matches!(status, "new" | "read" | "replied") {
                return bad_request("Invalid status");
            }
            match find_mut(&mut store.messages, id) {
                Some(message) => {
                    message["status"] = json!(status);
                    ok(json!({"message": "Message updated"}))
                }
                None => not_found("Message"),
            }
        }
        ("DELETE", ["api", "messages", id]) => {
            if remove(&mut store.messages, id) {
                ok(json!({"message": "Message deleted"}))
            } else {
                not_found("Message")
            }
        }

        ("GET", ["api", "dashboard", "stats"]) => ok(dashboard(store)),

        _ => reply(StatusCode::NOT_FOUND, json!({"message": "Not found"})),
    }
}

fn login(store: &Store, body: &Value) -> Response {
    let username = body.get("username").and_then(Value::as_str).unwrap_or_default();
    let password = body.get("password").and_then(Value::as_str).unwrap_or_default();

    if username.is_empty() || password.is_empty() {
        return bad_request("Username and password required");
    }
    if username == ADMIN_USERNAME && password == store.admin_password {
        return ok(json!({"token": ADMIN_TOKEN, "admin": store.admin()}));
    }
    reply(StatusCode::UNAUTHORIZED, json!({"message": "Invalid credentials"}))
}

fn authorize(headers: &HeaderMap) -> Result<(), Response> {
    let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return Err(reply(
            StatusCode::UNAUTHORIZED,
            json!({"msg": "Missing Authorization Header"}),
        ));
    };
    if value == format!("Bearer {ADMIN_TOKEN}") {
        Ok(())
    } else {
        Err(reply(
            StatusCode::UNAUTHORIZED,
            json!({"msg": "Token has expired"}),
        ))
    }
}

fn list_products(store: &Store, params: &HashMap<String, String>) -> Response {
    let category = params.get("category");
    let featured_only = params.get("featured").is_some_and(|v| v == "true");
    let page = params
        .get("page")
        .and_then(|p| p.parse::<usize>().ok())
        .unwrap_or(1)
        .max(1);
    let per_page = params
        .get("per_page")
        .and_then(|p| p.parse::<usize>().ok())
        .unwrap_or(12)
        .max(1);

    let matching: Vec<&Value> = store
        .products
        .iter()
        .filter(|p| category.is_none_or(|c| p["category"] == c.as_str()))
        .filter(|p| !featured_only || p["featured"] == true)
        .collect();
    let total = matching.len();
    let products: Vec<Value> = matching
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .cloned()
        .collect();

    ok(json!({
        "products": products,
        "total": total,
        "pages": total.div_ceil(per_page).max(1),
        "current_page": page,
    }))
}

fn create_product(store: &mut Store, body: Value) -> Response {
    let row = match product_row(store.next_product_id, &body, None) {
        Ok(row) => row,
        Err(rejection) => return rejection,
    };
    store.next_product_id += 1;
    store.products.push(row.clone());
    reply(
        StatusCode::CREATED,
        json!({"message": "Product created", "product": row}),
    )
}

fn update_product(store: &mut Store, id: &str, body: Value) -> Response {
    let Some(existing) = find(&store.products, id).cloned() else {
        return not_found("Product");
    };
    let row = match product_row(existing["id"].as_i64().unwrap_or_default(), &body, Some(&existing)) {
        Ok(row) => row,
        Err(rejection) => return rejection,
    };
    if let Some(slot) = find_mut(&mut store.products, id) {
        *slot = row.clone();
    }
    ok(json!({"message": "Product updated", "product": row}))
}

/// Validate a product body and build the stored row. Fields absent from an
/// update keep their existing value.
fn product_row(id: i64, body: &Value, existing: Option<&Value>) -> Result<Value, Response> {
    let field = |key: &str| -> Value {
        body.get(key)
            .cloned()
            .or_else(|| existing.and_then(|e| e.get(key).cloned()))
            .unwrap_or(Value::Null)
    };

    let name = field("name");
    if name.as_str().is_none_or(|n| n.trim().is_empty()) {
        return Err(bad_request("Name is required"));
    }
    let category = field("category");
    if !category.as_str().is_some_and(|c| CATEGORIES.contains(&c)) {
        return Err(bad_request("Invalid category"));
    }
    let price = field("price");
    if !(price.is_null() || price.as_f64().is_some_and(|p| p >= 0.0)) {
        return Err(bad_request("Price must be a non-negative number"));
    }

    Ok(json!({
        "id": id,
        "name": name,
        "category": category,
        "description": field("description"),
        "price": price,
        "featured": field("featured").as_bool().unwrap_or(false),
        "image_url": field("image_url"),
        "created_at": existing.map_or_else(|| json!(SEED_TIME), |e| e["created_at"].clone()),
    }))
}

fn submit_message(store: &mut Store, body: Value) -> Response {
    let text = |key: &str| {
        body.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
            .to_owned()
    };
    let (name, email, message) = (text("name"), text("email"), text("message"));
    if name.is_empty() || email.is_empty() || message.is_empty() {
        return bad_request("Name, email, and message are required");
    }

    let row = json!({
        "id": store.next_message_id,
        "name": name,
        "email": email,
        "phone": text("phone"),
        "message": message,
        "status": "new",
        "created_at": SEED_TIME,
    });
    store.next_message_id += 1;
    store.messages.push(row);
    reply(
        StatusCode::CREATED,
        json!({"message": "Message sent successfully"}),
    )
}

fn dashboard(store: &Store) -> Value {
    let count = |rows: &[Value], key: &str, value: Value| {
        rows.iter().filter(|r| r[key] == value).count()
    };
    let recent = |rows: &[Value], keys: &[&str]| -> Vec<Value> {
        rows.iter()
            .rev()
            .take(5)
            .map(|row| {
                let summary: Map<String, Value> = keys
                    .iter()
                    .map(|k| ((*k).to_owned(), row[*k].clone()))
                    .collect();
                Value::Object(summary)
            })
            .collect()
    };

    json!({
        "stats": {
            "total_products": store.products.len(),
            "total_messages": store.messages.len(),
            "new_messages": count(&store.messages, "status", json!("new")),
            "featured_products": count(&store.products, "featured", json!(true)),
        },
        "recent_products": recent(&store.products, &["id", "name", "category", "created_at"]),
        "recent_messages": recent(&store.messages, &["id", "name", "email", "status", "created_at"]),
    })
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    query
        .unwrap_or_default()
        .split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (!key.is_empty()).then(|| (key.to_owned(), value.to_owned()))
        })
        .collect()
}

fn find<'a>(rows: &'a [Value], id: &str) -> Option<&'a Value> {
    let id: i64 = id.parse().ok()?;
    rows.iter().find(|r| r["id"] == id)
}

fn find_mut<'a>(rows: &'a mut [Value], id: &str) -> Option<&'a mut Value> {
    let id: i64 = id.parse().ok()?;
    rows.iter_mut().find(|r| r["id"] == id)
}

fn remove(rows: &mut Vec<Value>, id: &str) -> bool {
    let Ok(id) = id.parse::<i64>() else {
        return false;
    };
    let before = rows.len();
    rows.retain(|r| r["id"] != id);
    rows.len() != before
}

fn reply(status: StatusCode, body: Value) -> Response {
    if body.is_null() {
        return status.into_response();
    }
    (status, axum::Json(body)).into_response()
}

fn ok(body: Value) -> Response {
    reply(StatusCode::OK, body)
}

fn bad_request(message: &str) -> Response {
    reply(StatusCode::BAD_REQUEST, json!({"message": message}))
}

fn not_found(what: &str) -> Response {
    reply(
        StatusCode::NOT_FOUND,
        json!({"message": format!("{what} not found")}),
    )
}
