#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use tokio_util::sync::CancellationToken;

use redirector::application::services::RedirectService;
use redirector::domain::click_handler::{ClickHandler, StoreClickHandler};
use redirector::domain::entities::{Click, TrackingLink, UserAgent};
use redirector::domain::repositories::{ClicksRepository, TrackingLinksRepository};
use redirector::domain::services::{IpAddressParser, ParserError, UserAgentParser};
use redirector::error::ClickError;
use redirector::infrastructure::services::MeteredClickHandler;
use redirector::state::AppState;

/// Fixed set of tracking links served from memory.
pub struct InMemoryTrackingLinks {
    links: HashMap<String, TrackingLink>,
}

impl InMemoryTrackingLinks {
    pub fn new(links: Vec<TrackingLink>) -> Self {
        Self {
            links: links
                .into_iter()
                .map(|link| (link.slug.clone(), link))
                .collect(),
        }
    }
}

#[async_trait]
impl TrackingLinksRepository for InMemoryTrackingLinks {
    async fn find_tracking_link(&self, slug: &str) -> Option<TrackingLink> {
        self.links.get(slug).cloned()
    }
}

/// Click store that records every saved click for assertions.
#[derive(Default)]
pub struct RecordingClicksRepository {
    clicks: Mutex<Vec<Click>>,
}

impl RecordingClicksRepository {
    pub fn saved(&self) -> Vec<Click> {
        self.clicks.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClicksRepository for RecordingClicksRepository {
    async fn save(&self, click: &Click) -> Result<(), ClickError> {
        self.clicks.lock().unwrap().push(click.clone());
        Ok(())
    }
}

/// IP classifier answering a fixed country code.
pub struct FixedIpParser(pub &'static str);

impl IpAddressParser for FixedIpParser {
    fn parse(&self, _ip: std::net::IpAddr) -> Result<String, ParserError> {
        Ok(self.0.to_string())
    }
}

/// User-Agent classifier answering a fixed visitor profile.
pub struct FixedUserAgentParser;

impl UserAgentParser for FixedUserAgentParser {
    fn parse(&self, user_agent: &str) -> Result<UserAgent, ParserError> {
        Ok(UserAgent {
            src_string: user_agent.to_string(),
            is_bot: false,
            device: "pc".to_string(),
            platform: "windows 10".to_string(),
            browser: "chrome".to_string(),
        })
    }
}

/// Builds an [`AppState`] over in-memory collaborators, returning the click
/// store for assertions.
pub fn create_test_state(links: Vec<TrackingLink>) -> (AppState, Arc<RecordingClicksRepository>) {
    let clicks = Arc::new(RecordingClicksRepository::default());

    let store: Arc<dyn ClickHandler> = Arc::new(StoreClickHandler::new(clicks.clone()));
    let handlers: Vec<Arc<dyn ClickHandler>> =
        vec![Arc::new(MeteredClickHandler::new(store, "store"))];

    let service = Arc::new(RedirectService::new(
        Arc::new(InMemoryTrackingLinks::new(links)),
        Arc::new(FixedIpParser("PL")),
        Arc::new(FixedUserAgentParser),
        handlers,
        3,
    ));

    let state = AppState::new(service, CancellationToken::new());

    (state, clicks)
}

/// Waits until the click store has seen `count` clicks (click processing
/// runs on background tasks after the response is written).
pub async fn wait_for_clicks(repo: &RecordingClicksRepository, count: usize) -> Vec<Click> {
    for _ in 0..100 {
        let saved = repo.saved();
        if saved.len() >= count {
            return saved;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("expected {} clicks, got {}", count, repo.saved().len());
}

/// Injects a fixed peer address so handlers relying on `ConnectInfo` work
/// under `TestServer`.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> tower::Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
