//! Test harness for the partner shop directory.
//!
//! [`TestContext::start`] serves a fake shop data service and the real web
//! router, both on ephemeral localhost ports, and hands back a `reqwest`
//! client pointed at the web side.
//!
//! ```rust,ignore
//! let ctx = TestContext::start(sample_shops(), Options::admin()).await;
//! let body = ctx.get_text("/admin/shops").await;
//! assert!(body.contains("Mode Admin"));
//! ```

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use partner_shops_web::config::{DataServiceConfig, WebConfig};
use partner_shops_web::routes;
use partner_shops_web::state::AppState;
use reqwest::{Client, Response, redirect};
use serde_json::{Value, json};
use url::Url;

/// Three shops: one with a WhatsApp number, one verified with a blank phone.
#[must_use]
pub fn sample_shops() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "name": "Boutique A",
            "type": "Mode",
            "image": "https://img.test/a.png",
            "description": "Vêtements et accessoires",
        }),
        json!({
            "id": 3,
            "name": "Boutique B",
            "type": "Beauté",
            "description": "Cosmétiques naturels",
            "phone": "+225 07 00 00 00 03",
        }),
        json!({
            "id": 7,
            "name": "Boutique X",
            "type": "Épicerie",
            "description": "Produits locaux",
            "verified": true,
            "phone": "   ",
        }),
    ]
}

/// How the harness is wired.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Mount the admin routes.
    pub admin_enabled: bool,
    /// Make every delete on the fake data service fail with 500.
    pub fail_delete: bool,
    /// Make every listing on the fake data service fail with 500.
    pub fail_fetch: bool,
}

impl Options {
    #[must_use]
    pub const fn public() -> Self {
        Self {
            admin_enabled: false,
            fail_delete: false,
            fail_fetch: false,
        }
    }

    #[must_use]
    pub const fn admin() -> Self {
        Self {
            admin_enabled: true,
            fail_delete: false,
            fail_fetch: false,
        }
    }

    #[must_use]
    pub const fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    #[must_use]
    pub const fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }
}

/// In-memory stand-in for the remote shop data service.
#[derive(Debug, Clone, Default)]
pub struct FakeDataService {
    shops: Arc<Mutex<Vec<Value>>>,
    deleted: Arc<Mutex<Vec<i64>>>,
    fail_delete: bool,
    fail_fetch: Arc<AtomicBool>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().expect("fake data service lock poisoned")
}

impl FakeDataService {
    fn new(shops: Vec<Value>, options: Options) -> Self {
        Self {
            shops: Arc::new(Mutex::new(shops)),
            deleted: Arc::default(),
            fail_delete: options.fail_delete,
            fail_fetch: Arc::new(AtomicBool::new(options.fail_fetch)),
        }
    }

    /// Switch listing failures on or off while the service is running.
    pub fn set_failing_fetch(&self, failing: bool) {
        self.fail_fetch.store(failing, Ordering::SeqCst);
    }

    /// Ids the service has deleted, in order.
    #[must_use]
    pub fn deleted(&self) -> Vec<i64> {
        lock(&self.deleted).clone()
    }

    /// Number of shops the service still holds.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.shops).len()
    }

    /// Whether the service holds no shops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn router(&self) -> Router {
        async fn list(State(service): State<FakeDataService>) -> Result<Json<Value>, StatusCode> {
            if service.fail_fetch.load(Ordering::SeqCst) {
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
            Ok(Json(Value::Array(lock(&service.shops).clone())))
        }

        async fn remove(State(service): State<FakeDataService>, Path(id): Path<i64>) -> StatusCode {
            if service.fail_delete {
                return StatusCode::INTERNAL_SERVER_ERROR;
            }
            let mut shops = lock(&service.shops);
            let before = shops.len();
            shops.retain(|shop| shop.get("id").and_then(Value::as_i64) != Some(id));
            if shops.len() == before {
                return StatusCode::NOT_FOUND;
            }
            lock(&service.deleted).push(id);
            StatusCode::NO_CONTENT
        }

        Router::new()
            .route("/api/shops", get(list))
            .route("/api/shops/{id}", delete(remove))
            .with_state(self.clone())
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server error");
    });
    addr
}

/// A running data service plus web front end.
#[derive(Debug)]
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub data_service: FakeDataService,
}

impl TestContext {
    /// Start both servers.
    ///
    /// # Panics
    ///
    /// Panics if a listener cannot be bound or the app state cannot be built.
    pub async fn start(shops: Vec<Value>, options: Options) -> Self {
        let data_service = FakeDataService::new(shops, options);
        let data_addr = serve(data_service.router()).await;

        let data_url =
            Url::parse(&format!("http://{data_addr}/api")).expect("Invalid data service URL");
        let config = WebConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            admin_enabled: options.admin_enabled,
            data_service: DataServiceConfig::new(data_url),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let state = AppState::new(config).expect("Failed to build app state");
        let web_addr = serve(routes::app(state)).await;

        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{web_addr}"),
            data_service,
        }
    }

    /// Absolute URL for `path` on the web front end.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// GET `path`, assert 200 and return the body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the status is not 200.
    pub async fn get_text(&self, path: &str) -> String {
        let response = self.get(path).await;
        assert_eq!(response.status(), 200, "GET {path}");
        response.text().await.expect("Failed to read body")
    }

    /// POST the deletion form for `id` with the given answer.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_delete(&self, id: i32, confirm: &str) -> Response {
        self.client
            .post(self.url(&format!("/admin/shops/{id}/delete")))
            .form(&[("confirm", confirm)])
            .send()
            .await
            .expect("POST request failed")
    }
}

/// Number of shop rows rendered in a list page.
#[must_use]
pub fn row_count(body: &str) -> usize {
    body.matches("class=\"shop-row\"").count()
}
