//! Runs the HTTP client against an in-process axum server that replays canned
//! responses and records what it was sent.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;

use scoop::config::ApiSettings;
use scoop::domain::{Credentials, FailureKind, FeedIdentity};
use scoop::feed::{FeedController, FeedView};
use scoop::fetcher::{HttpFetcher, PageFetcher};

#[derive(Debug, Clone)]
struct Request {
    method: String,
    target: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Request {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

struct Reply {
    status: u16,
    headers: Vec<(HeaderName, String)>,
    body: String,
}

impl Reply {
    fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn with_cookie(mut self, cookie: &str) -> Self {
        self.headers.push((header::SET_COOKIE, cookie.to_string()));
        self
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        for (name, value) in self.headers {
            headers.append(name, HeaderValue::from_str(&value).unwrap());
        }
        (status, headers, self.body).into_response()
    }
}

type Handler = Arc<dyn Fn(&Request) -> Reply + Send + Sync>;

#[derive(Clone)]
struct Canned {
    handler: Handler,
    requests: Arc<Mutex<Vec<Request>>>,
}

/// Answers every route from the canned handler and keeps a copy of the request.
async fn replay(
    State(canned): State<Canned>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Reply {
    let request = Request {
        method: method.as_str().to_string(),
        target: uri
            .path_and_query()
            .map(|target| target.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string()),
        headers: headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect(),
        body,
    };
    let reply = (canned.handler)(&request);
    canned.requests.lock().unwrap().push(request);
    reply
}

struct TestServer {
    base_url: String,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl TestServer {
    async fn start(handler: impl Fn(&Request) -> Reply + Send + Sync + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new().fallback(replay).with_state(Canned {
            handler: Arc::new(handler),
            requests: requests.clone(),
        });
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, requests }
    }

    fn fetcher(&self) -> HttpFetcher {
        let settings = ApiSettings {
            base_url: self.base_url.clone(),
            ..ApiSettings::default()
        };
        HttpFetcher::new(&settings).unwrap()
    }

    fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

fn article(id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": format!("Headline {}", id),
        "summary": "Summary",
        "link": format!("https://example.com/{}", id),
        "source": "NDTV",
        "category": "World",
        "published": "2024-05-01T10:00:00Z",
        "image_url": null,
        "author": null,
        "tags": [],
        "created_at": "2024-05-01T10:05:00Z"
    })
}

fn news_pages(request: &Request) -> Reply {
    match request.target.as_str() {
        "/api/news/?page=1" => Reply::json(
            200,
            serde_json::json!({
                "count": 3,
                "next": "http://server/api/news/?page=2",
                "previous": null,
                "results": [article("a"), article("b")]
            }),
        ),
        "/api/news/?page=2" => Reply::json(
            200,
            serde_json::json!({
                "count": 3,
                "next": null,
                "previous": "http://server/api/news/?page=1",
                "results": [article("c")]
            }),
        ),
        _ => Reply::json(404, serde_json::json!({ "detail": "Not found." })),
    }
}

#[tokio::test]
async fn fetch_page_follows_next_link() {
    let server = TestServer::start(news_pages).await;
    let fetcher = server.fetcher();

    let first = fetcher.fetch_page(&FeedIdentity::all(), 1).await.unwrap();
    assert_eq!(first.items.len(), 2);
    assert!(first.has_next);

    let second = fetcher.fetch_page(&FeedIdentity::all(), 2).await.unwrap();
    assert_eq!(second.items[0].id, "c");
    assert!(!second.has_next);
}

#[tokio::test]
async fn controller_loads_two_pages_over_http() {
    let server = TestServer::start(news_pages).await;
    let mut controller = FeedController::new(Arc::new(server.fetcher()));

    controller.observe(FeedIdentity::all());
    controller.settle().await;
    controller.load_more().unwrap();
    controller.settle().await;

    let ids: Vec<&str> = controller
        .state()
        .items
        .iter()
        .map(|a| a.id.as_str())
        .collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert!(matches!(
        controller.view(),
        FeedView::Populated {
            has_more: false,
            ..
        }
    ));
}

#[tokio::test]
async fn category_and_search_requests() {
    let server = TestServer::start(|_| {
        Reply::json(200, serde_json::json!({ "results": [], "next": null }))
    })
    .await;
    let fetcher = server.fetcher();

    fetcher
        .fetch_page(&FeedIdentity::category("World"), 1)
        .await
        .unwrap();
    fetcher
        .fetch_page(&FeedIdentity::search("election results"), 2)
        .await
        .unwrap();

    let targets: Vec<String> = server.requests().into_iter().map(|r| r.target).collect();
    assert_eq!(
        targets,
        vec![
            "/api/news/category/World/?page=1",
            "/api/news/?page=2&search=election+results"
        ]
    );
}

#[tokio::test]
async fn personalized_feed_accepts_bare_list() {
    let server = TestServer::start(|_| {
        Reply::json(200, serde_json::json!([article("x"), article("y")]))
    })
    .await;

    let page = server
        .fetcher()
        .fetch_page(&FeedIdentity::personalized(), 1)
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert!(!page.has_next);
}

#[tokio::test]
async fn bare_list_rejected_for_general_feed() {
    let server = TestServer::start(|_| Reply::json(200, serde_json::json!([article("x")]))).await;

    let failure = server
        .fetcher()
        .fetch_page(&FeedIdentity::all(), 1)
        .await
        .unwrap_err();
    assert_eq!(failure.kind, FailureKind::Parse);
}

#[tokio::test]
async fn server_error_message_is_surfaced() {
    let server = TestServer::start(|_| {
        Reply::json(500, serde_json::json!({ "error": "Database unavailable" }))
    })
    .await;
    let fetcher = server.fetcher();

    let failure = fetcher
        .fetch_page(&FeedIdentity::category("Sports"), 1)
        .await
        .unwrap_err();
    assert_eq!(failure.kind, FailureKind::Server { status: 500 });
    assert_eq!(failure.message, "Database unavailable");
}

#[tokio::test]
async fn server_error_without_body_uses_fallback() {
    let server = TestServer::start(|_| Reply {
        status: 502,
        headers: Vec::new(),
        body: String::new(),
    })
    .await;

    let failure = server
        .fetcher()
        .fetch_page(&FeedIdentity::category("Sports"), 1)
        .await
        .unwrap_err();
    assert_eq!(failure.message, "Failed to fetch category news");
    assert_eq!(failure.status(), Some(502));
}

#[tokio::test]
async fn unreachable_server_is_network_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let settings = ApiSettings {
        base_url: format!("http://{}", addr),
        ..ApiSettings::default()
    };
    let fetcher = HttpFetcher::new(&settings).unwrap();
    let failure = fetcher
        .fetch_page(&FeedIdentity::all(), 1)
        .await
        .unwrap_err();
    assert_eq!(failure.kind, FailureKind::Network);
}

#[tokio::test]
async fn auth_status_maps_401_to_none() {
    let server = TestServer::start(|_| {
        Reply::json(
            401,
            serde_json::json!({ "authenticated": false, "error": "Not authenticated" }),
        )
    })
    .await;

    assert_eq!(server.fetcher().auth_status().await.unwrap(), None);
}

#[tokio::test]
async fn login_cookies_are_sent_back_with_csrf_header() {
    let server = TestServer::start(|request| match request.target.as_str() {
        "/api/auth/login/" => Reply::json(
            200,
            serde_json::json!({
                "message": "Login successful",
                "user": { "id": 7, "username": "asha", "email": "asha@example.com" }
            }),
        )
        .with_cookie("csrftoken=tok123; Path=/")
        .with_cookie("sessionid=sess456; Path=/; HttpOnly"),
        "/api/auth/status/" => Reply::json(
            200,
            serde_json::json!({
                "authenticated": true,
                "user": { "id": 7, "username": "asha", "email": "asha@example.com" }
            }),
        ),
        _ => Reply::json(200, serde_json::json!({ "message": "ok" })),
    })
    .await;
    let fetcher = server.fetcher();

    let user = fetcher
        .login(&Credentials {
            username: "asha".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();
    assert_eq!(user.id, 7);

    let status = fetcher.auth_status().await.unwrap();
    assert_eq!(status.map(|u| u.username), Some("asha".to_string()));

    fetcher.logout().await.unwrap();

    let requests = server.requests();
    let login = &requests[0];
    assert_eq!(login.method, "POST");
    let body: serde_json::Value = serde_json::from_str(&login.body).unwrap();
    assert_eq!(body["username"], "asha");

    let status = &requests[1];
    assert_eq!(status.method, "GET");
    assert_eq!(status.header("X-CSRFToken"), None);
    assert!(status.header("Cookie").unwrap().contains("sessionid=sess456"));

    let logout = &requests[2];
    assert_eq!(logout.target, "/api/auth/logout/");
    assert_eq!(logout.header("X-CSRFToken"), Some("tok123"));
    assert!(logout.header("Referer").is_some());
}

#[tokio::test]
async fn profile_requires_login() {
    let server = TestServer::start(|_| {
        Reply::json(
            401,
            serde_json::json!({ "detail": "Authentication credentials were not provided." }),
        )
    })
    .await;

    let failure = server.fetcher().profile().await.unwrap_err();
    assert!(failure.is_unauthenticated());
    assert_eq!(failure.message, "Authentication credentials were not provided.");
}
