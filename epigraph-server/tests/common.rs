use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use axum_test::TestServer;
use bytes::Bytes;
use epigraph_core::chart::PNG_SIGNATURE;
use epigraph_core::{
    Catalog, ChartCache, ChartRenderer, ChartSpec, EpisodeRecord,
    GraphError, GraphPipeline, RatingCell, Result, SeriesMatch,
};
use epigraph_server::slack::dispatcher::CallbackDispatcher;
use epigraph_server::{AppState, create_app};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use url::Url;

pub const PUBLIC_BASE_URL: &str = "https://graphs.example.com";

/// In-memory catalog with a handful of known series.
#[derive(Default)]
pub struct FixtureCatalog {
    pub searches: AtomicUsize,
    pub top_titles: Vec<String>,
}

// Code is used by test modules, but not in this scope
#[allow(unused)]
impl FixtureCatalog {
    pub fn with_top_titles(titles: &[&str]) -> Self {
        Self {
            searches: AtomicUsize::new(0),
            top_titles: titles.iter().map(|title| title.to_string()).collect(),
        }
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Catalog for FixtureCatalog {
    async fn search(&self, query: &str) -> Result<Vec<SeriesMatch>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        let canonical_id = match query {
            "Breaking Bad" => "tt0903747",
            "Dark" => "tt5753856",
            "Planet Earth II" => "tt5491994",
            "Chernobyl" => "tt7366338",
            "Catalog Down" => {
                return Err(GraphError::upstream("connection reset by peer"));
            }
            _ => return Ok(Vec::new()),
        };
        Ok(vec![SeriesMatch {
            canonical_id: canonical_id.to_string(),
            display_title: query.to_string(),
        }])
    }

    async fn season_ids(&self, _canonical_id: &str) -> Result<Vec<String>> {
        Ok(vec!["1".into(), "2".into()])
    }

    async fn season_episodes(
        &self,
        _canonical_id: &str,
        season_id: &str,
    ) -> Result<Vec<EpisodeRecord>> {
        let season = season_id.parse().ok();
        Ok((1..=3)
            .map(|number| EpisodeRecord {
                season,
                episode_number: number,
                title: format!("Episode {number}"),
                link: None,
                rating: RatingCell::Score(8.0 + f64::from(number) / 10.0),
            })
            .collect())
    }

    async fn top_rated_titles(&self) -> Result<Vec<String>> {
        Ok(self.top_titles.clone())
    }
}

/// Emits the PNG signature followed by the chart title.
pub struct FakeRenderer {
    pub fail: bool,
}

#[async_trait]
impl ChartRenderer for FakeRenderer {
    async fn render(&self, spec: &ChartSpec) -> Result<Bytes> {
        if self.fail {
            return Err(GraphError::render("image service returned HTTP 401"));
        }
        let mut png = PNG_SIGNATURE.to_vec();
        png.extend_from_slice(spec.title().as_bytes());
        Ok(Bytes::from(png))
    }

    fn backend(&self) -> &'static str {
        "fake"
    }
}

#[allow(unused)]
pub struct TestApp {
    pub server: TestServer,
    pub catalog: Arc<FixtureCatalog>,
    pub charts: Arc<ChartCache>,
    pub callbacks: CallbackDispatcher,
}

#[allow(unused)]
pub fn build_test_app(catalog: FixtureCatalog, renderer: FakeRenderer) -> TestApp {
    let catalog = Arc::new(catalog);
    let pipeline = GraphPipeline::new(catalog.clone(), Arc::new(renderer));
    let charts = Arc::new(ChartCache::new(pipeline, 16));
    let callbacks = CallbackDispatcher::new(
        charts.clone(),
        reqwest::Client::new(),
        Url::parse(PUBLIC_BASE_URL).unwrap(),
    )
    .unwrap();

    let app = create_app(AppState::new(charts.clone(), callbacks.clone()));
    TestApp {
        server: TestServer::new(app).unwrap(),
        catalog,
        charts,
        callbacks,
    }
}

/// A local endpoint standing in for a chat platform's `response_url`.
#[allow(unused)]
pub async fn callback_receiver() -> (Url, mpsc::UnboundedReceiver<Value>) {
    let (tx, rx) = mpsc::unbounded_channel::<Value>();
    let app = Router::new()
        .route(
            "/hook",
            post(
                |State(tx): State<mpsc::UnboundedSender<Value>>,
                 Json(body): Json<Value>| async move {
                    let _ = tx.send(body);
                    StatusCode::OK
                },
            ),
        )
        .with_state(tx);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (Url::parse(&format!("http://{addr}/hook")).unwrap(), rx)
}

#[allow(unused)]
pub async fn next_callback(rx: &mut mpsc::UnboundedReceiver<Value>) -> Value {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("callback was not delivered in time")
        .expect("callback receiver closed")
}

#[allow(unused)]
pub async fn assert_no_callback(rx: &mut mpsc::UnboundedReceiver<Value>) {
    let outcome =
        tokio::time::timeout(Duration::from_millis(300), rx.recv()).await;
    assert!(outcome.is_err(), "unexpected callback: {outcome:?}");
}
