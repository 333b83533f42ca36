//! Lifecycle of the process-wide browser engine

use crate::browser::{BrowserEngine, EngineLauncher, PageHandle};
use crate::navigation::classify_failure;
use crate::CardError;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Owns the single browser engine shared by every request
///
/// The engine is launched lazily by the first [`SessionManager::acquire`]
/// and reused until [`SessionManager::release`] tears it down. Concurrent
/// first callers are serialized on the slot lock, so at most one launch
/// happens.
pub struct SessionManager {
    launcher: Arc<dyn EngineLauncher>,
    user_agent: String,
    engine: Mutex<Option<Arc<dyn BrowserEngine>>>,
}

impl SessionManager {
    /// Creates a manager that launches engines with `launcher` and stamps
    /// `user_agent` on every page it opens
    pub fn new(launcher: Arc<dyn EngineLauncher>, user_agent: impl Into<String>) -> Self {
        Self {
            launcher,
            user_agent: user_agent.into(),
            engine: Mutex::new(None),
        }
    }

    /// Returns the running engine, launching it on first use
    ///
    /// A failed launch is reported as a network-class error and is not
    /// retried here; the next call simply tries again.
    pub async fn acquire(&self) -> Result<Arc<dyn BrowserEngine>, CardError> {
        let mut slot = self.engine.lock().await;

        if let Some(engine) = slot.as_ref() {
            return Ok(Arc::clone(engine));
        }

        tracing::info!("Launching browser engine");
        let engine = self.launcher.launch().await.map_err(|e| {
            tracing::error!("Browser launch failed: {}", e);
            CardError::Network(e.to_string())
        })?;

        *slot = Some(Arc::clone(&engine));
        Ok(engine)
    }

    /// Shuts the engine down and forgets it
    ///
    /// Calling this when nothing is running is a no-op.
    pub async fn release(&self) -> Result<(), CardError> {
        let engine = self.engine.lock().await.take();

        match engine {
            Some(engine) => {
                tracing::info!("Shutting down browser engine");
                engine
                    .shutdown()
                    .await
                    .map_err(|e| CardError::Other(e.to_string()))
            }
            None => Ok(()),
        }
    }

    /// Returns true if an engine is currently held
    pub async fn is_running(&self) -> bool {
        self.engine.lock().await.is_some()
    }

    /// Opens a fresh, isolated page with the configured user-agent applied
    pub async fn new_page_context(&self) -> Result<Box<dyn PageHandle>, CardError> {
        let engine = self.acquire().await?;

        let page = engine
            .new_page()
            .await
            .map_err(|e| classify_failure(e.message()))?;

        if let Err(e) = page.set_user_agent(&self.user_agent).await {
            if let Err(close_err) = page.close().await {
                tracing::warn!("Failed to close page after setup error: {}", close_err);
            }
            return Err(classify_failure(e.message()));
        }

        Ok(page)
    }
}
