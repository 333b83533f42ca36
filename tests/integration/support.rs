//! In-process stand-in for a browser
//!
//! A [`FakeSite`] maps URLs to scripted responses. Each response is a
//! sequence of frames: navigation shows the first one and every later
//! `content()` call advances to the next, staying on the last. This is
//! enough to model client-side rendering that fills in over time.

use async_trait::async_trait;
use cardlens::browser::{
    scripts, BrowserEngine, BrowserError, BrowserResult, EngineLauncher, PageHandle,
};
use cardlens::config::Config;
use cardlens::Catalog;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// One rendering state of a page
#[derive(Clone)]
pub struct Frame {
    pub html: String,
    /// Value returned for the embedded state script
    pub state: Value,
}

impl Frame {
    pub fn html(html: &str) -> Self {
        Self {
            html: html.to_string(),
            state: Value::Null,
        }
    }

    pub fn with_state(mut self, state: Value) -> Self {
        self.state = state;
        self
    }
}

#[derive(Clone)]
pub enum Response {
    Frames(Vec<Frame>),
    /// Navigation fails with this message
    Fail(String),
    /// Navigation never completes
    Hang,
}

/// What the fake browser was asked to do
#[derive(Default)]
pub struct Activity {
    pub launches: usize,
    pub shutdowns: usize,
    pub pages_opened: usize,
    pub pages_closed: usize,
    pub visited: Vec<String>,
    pub user_agents: Vec<String>,
    /// Scripts other than the embedded state read
    pub scripts: Vec<String>,
}

#[derive(Default)]
pub struct FakeSite {
    routes: Mutex<HashMap<String, Response>>,
    launch_failure: Mutex<Option<String>>,
    activity: Mutex<Activity>,
}

impl FakeSite {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, url: &str, response: Response) {
        self.routes.lock().unwrap().insert(url.to_string(), response);
    }

    pub fn serve(&self, url: &str, frames: Vec<Frame>) {
        self.route(url, Response::Frames(frames));
    }

    pub fn fail_launch(&self, message: &str) {
        *self.launch_failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn activity<T>(&self, read: impl FnOnce(&Activity) -> T) -> T {
        read(&self.activity.lock().unwrap())
    }

    fn record(&self, update: impl FnOnce(&mut Activity)) {
        update(&mut self.activity.lock().unwrap());
    }
}

pub struct FakeLauncher {
    site: Arc<FakeSite>,
}

impl FakeLauncher {
    pub fn new(site: Arc<FakeSite>) -> Arc<Self> {
        Arc::new(Self { site })
    }
}

#[async_trait]
impl EngineLauncher for FakeLauncher {
    async fn launch(&self) -> BrowserResult<Arc<dyn BrowserEngine>> {
        if let Some(message) = self.site.launch_failure.lock().unwrap().clone() {
            return Err(BrowserError::Launch(message));
        }
        self.site.record(|a| a.launches += 1);
        Ok(Arc::new(FakeEngine {
            site: Arc::clone(&self.site),
        }))
    }
}

struct FakeEngine {
    site: Arc<FakeSite>,
}

#[async_trait]
impl BrowserEngine for FakeEngine {
    async fn new_page(&self) -> BrowserResult<Box<dyn PageHandle>> {
        self.site.record(|a| a.pages_opened += 1);
        Ok(Box::new(FakePage {
            site: Arc::clone(&self.site),
            view: Mutex::new(View::default()),
        }))
    }

    async fn shutdown(&self) -> BrowserResult<()> {
        self.site.record(|a| a.shutdowns += 1);
        Ok(())
    }
}

#[derive(Default)]
struct View {
    url: String,
    frames: Vec<Frame>,
    current: usize,
    served: bool,
}

impl View {
    fn frame(&self) -> Option<&Frame> {
        self.frames.get(self.current)
    }
}

struct FakePage {
    site: Arc<FakeSite>,
    view: Mutex<View>,
}

#[async_trait]
impl PageHandle for FakePage {
    async fn set_user_agent(&self, user_agent: &str) -> BrowserResult<()> {
        self.site.record(|a| a.user_agents.push(user_agent.to_string()));
        Ok(())
    }

    async fn goto(&self, url: &str) -> BrowserResult<()> {
        self.site.record(|a| a.visited.push(url.to_string()));
        let response = self.site.routes.lock().unwrap().get(url).cloned();

        match response {
            Some(Response::Frames(frames)) => {
                *self.view.lock().unwrap() = View {
                    url: url.to_string(),
                    frames,
                    current: 0,
                    served: false,
                };
                Ok(())
            }
            Some(Response::Fail(message)) => Err(BrowserError::Navigation(message)),
            Some(Response::Hang) => std::future::pending().await,
            None => Err(BrowserError::Navigation(format!(
                "net::ERR_NAME_NOT_RESOLVED at {}",
                url
            ))),
        }
    }

    async fn title(&self) -> BrowserResult<String> {
        let view = self.view.lock().unwrap();
        let html = view.frame().map(|f| f.html.as_str()).unwrap_or_default();
        Ok(title_of(html))
    }

    async fn url(&self) -> BrowserResult<String> {
        Ok(self.view.lock().unwrap().url.clone())
    }

    async fn content(&self) -> BrowserResult<String> {
        let mut view = self.view.lock().unwrap();
        if view.served && view.current + 1 < view.frames.len() {
            view.current += 1;
        }
        view.served = true;
        Ok(view.frame().map(|f| f.html.clone()).unwrap_or_default())
    }

    async fn evaluate(&self, script: &str) -> BrowserResult<Value> {
        if script == scripts::STRUCTURED_STATE {
            let view = self.view.lock().unwrap();
            return Ok(view.frame().map(|f| f.state.clone()).unwrap_or(Value::Null));
        }

        self.site.record(|a| a.scripts.push(script.to_string()));
        if script == scripts::PAGE_DIAGNOSTICS {
            let url = self.view.lock().unwrap().url.clone();
            return Ok(json!({ "url": url, "hasState": false }));
        }
        Ok(Value::Bool(true))
    }

    async fn screenshot(&self, path: &Path) -> BrowserResult<()> {
        std::fs::write(path, b"\x89PNG").map_err(|e| BrowserError::Protocol(e.to_string()))
    }

    async fn close(self: Box<Self>) -> BrowserResult<()> {
        self.site.record(|a| a.pages_closed += 1);
        Ok(())
    }
}

fn title_of(html: &str) -> String {
    let Some(start) = html.find("<title>") else {
        return String::new();
    };
    let rest = &html[start + "<title>".len()..];
    rest.find("</title>")
        .map(|end| rest[..end].trim().to_string())
        .unwrap_or_default()
}

/// A catalog over `site` with the default configuration
pub fn catalog(site: &Arc<FakeSite>) -> Catalog {
    catalog_with(site, Config::default())
}

pub fn catalog_with(site: &Arc<FakeSite>, config: Config) -> Catalog {
    Catalog::new(config, FakeLauncher::new(Arc::clone(site)))
}

pub const SEARCH_URL: &str = "https://www.pokemon-card.com/card-search/";

pub fn detail_url(card_id: &str, regulation: &str) -> String {
    let mut url = format!(
        "https://www.pokemon-card.com/card-search/details.php/card/{}/",
        card_id
    );
    if !regulation.is_empty() {
        url.push_str(&format!("regu/{}/", regulation));
    }
    url
}
