//! Map data loading lifecycle
//!
//! Fetches the world once and the shelves on a fixed interval. Requests run
//! on a background runtime (tokio natively, `spawn_local` in the browser) and
//! land in `Arc<Mutex<Option<Result<..>>>>` slots that [`MapLoader::poll`]
//! checks every frame.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use agrolink_types::{ShelfDto, ShelfType, WorldSpec};
use warehouse_board::{ApiClient, ApiError};

use crate::config::AppConfig;

type Slot<T> = Arc<Mutex<Option<Result<T, ApiError>>>>;

/// Data that arrived since the last poll.
#[derive(Debug, Default)]
pub struct LoadUpdate {
    pub world: Option<WorldSpec>,
    pub shelves: Option<Vec<ShelfDto>>,
}

pub struct MapLoader {
    api: ApiClient,
    center_id: String,
    shelf_type: Option<ShelfType>,
    poll_interval: Duration,

    #[cfg(not(target_arch = "wasm32"))]
    runtime: tokio::runtime::Runtime,

    pending_world: Option<Slot<WorldSpec>>,
    pending_shelves: Option<Slot<Vec<ShelfDto>>>,
    /// Time (seconds, UI clock) of the last shelf request
    last_shelf_request: Option<f64>,
    error: Option<String>,
}

impl MapLoader {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            api: ApiClient::new(&config.api_url),
            center_id: config.center_id.clone(),
            shelf_type: config.shelf_type,
            poll_interval: config.poll_interval,
            #[cfg(not(target_arch = "wasm32"))]
            runtime: tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .thread_name("agrolink-io")
                .enable_all()
                .build()?,
            pending_world: None,
            pending_shelves: None,
            last_shelf_request: None,
            error: None,
        })
    }

    /// A request is in flight.
    pub fn busy(&self) -> bool {
        self.pending_world.is_some() || self.pending_shelves.is_some()
    }

    /// The last world or shelf request failed.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn center_id(&self) -> &str {
        &self.center_id
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn spawn<T, F>(&self, fut: F) -> Slot<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let result: Slot<T> = Arc::new(Mutex::new(None));
        let result_clone = result.clone();
        self.runtime.spawn(async move {
            let res = fut.await;
            if let Ok(mut slot) = result_clone.lock() {
                *slot = Some(res);
            }
        });
        result
    }

    // fetch futures are !Send in the browser
    #[cfg(target_arch = "wasm32")]
    fn spawn<T, F>(&self, fut: F) -> Slot<T>
    where
        T: 'static,
        F: Future<Output = Result<T, ApiError>> + 'static,
    {
        let result: Slot<T> = Arc::new(Mutex::new(None));
        let result_clone = result.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let res = fut.await;
            if let Ok(mut slot) = result_clone.lock() {
                *slot = Some(res);
            }
        });
        result
    }

    /// Fetch world and shelves from scratch.
    pub fn reload(&mut self, now: f64) {
        self.error = None;
        self.load_world();
        self.load_shelves(now);
    }

    fn load_world(&mut self) {
        if self.pending_world.is_some() {
            return;
        }
        tracing::info!(center = %self.center_id, "loading world");
        let api = self.api.clone();
        let center = self.center_id.clone();
        self.pending_world = Some(self.spawn(async move {
            with_fallback_world(api.get_world(&center).await)
        }));
    }

    fn load_shelves(&mut self, now: f64) {
        if self.pending_shelves.is_some() {
            return;
        }
        tracing::debug!(
            center = %self.center_id,
            shelf_type = ?self.shelf_type,
            "loading shelves"
        );
        let api = self.api.clone();
        let center = self.center_id.clone();
        let shelf_type = self.shelf_type;
        self.last_shelf_request = Some(now);
        self.pending_shelves = Some(self.spawn(async move {
            api.get_shelves(&center, shelf_type).await
        }));
    }

    /// Whether the shelf poll interval has elapsed.
    pub fn shelves_due(&self, now: f64) -> bool {
        match self.last_shelf_request {
            None => true,
            Some(last) => now - last >= self.poll_interval.as_secs_f64(),
        }
    }

    /// Time until the next scheduled shelf poll.
    pub fn next_poll_in(&self, now: f64) -> Option<Duration> {
        if self.pending_shelves.is_some() {
            return None;
        }
        let last = self.last_shelf_request?;
        let remaining = (last + self.poll_interval.as_secs_f64() - now).max(0.0);
        Some(Duration::from_secs_f64(remaining))
    }

    /// Collect finished requests and start due ones. Call once per frame.
    pub fn poll(&mut self, now: f64) -> LoadUpdate {
        let mut update = LoadUpdate::default();

        if let Some(result) = take_ready(&mut self.pending_world) {
            match result {
                Ok(world) => {
                    tracing::info!(zones = world.zones.len(), "world loaded");
                    update.world = Some(world);
                }
                Err(e) => {
                    tracing::error!("failed to load world: {}", e);
                    self.error = Some(e.to_string());
                }
            }
        }

        if let Some(result) = take_ready(&mut self.pending_shelves) {
            match result {
                Ok(shelves) => {
                    tracing::debug!(count = shelves.len(), "shelves loaded");
                    update.shelves = Some(shelves);
                }
                Err(e) => {
                    tracing::error!("failed to load shelves: {}", e);
                    self.error = Some(e.to_string());
                }
            }
        }

        if !self.is_error() && self.shelves_due(now) {
            self.load_shelves(now);
        }

        update
    }
}

/// A center without a stored world gets the built-in layout.
fn with_fallback_world(result: Result<WorldSpec, ApiError>) -> Result<WorldSpec, ApiError> {
    match result {
        Err(e) if e.is_not_found() => {
            tracing::info!("no stored world, using fallback layout");
            Ok(WorldSpec::fallback())
        }
        other => other,
    }
}

/// Take a finished result out of a pending slot, clearing the slot.
fn take_ready<T>(pending: &mut Option<Slot<T>>) -> Option<Result<T, ApiError>> {
    let ready = pending
        .as_ref()
        .and_then(|slot| slot.lock().ok().and_then(|mut guard| guard.take()));
    if ready.is_some() {
        *pending = None;
    }
    ready
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrolink_types::TypesError;

    fn loader(poll_secs: u64) -> MapLoader {
        let config = AppConfig {
            poll_interval: Duration::from_secs(poll_secs),
            ..AppConfig::default()
        };
        MapLoader::new(&config).unwrap()
    }

    #[test]
    fn not_found_world_falls_back() {
        let world = with_fallback_world(Err(ApiError::NotFound("/world".into()))).unwrap();
        assert_eq!(world, WorldSpec::fallback());

        let err = with_fallback_world(Err(ApiError::Status {
            status: 500,
            url: "/world".into(),
        }));
        assert!(err.is_err());

        let err = with_fallback_world(Err(ApiError::Decode(TypesError::InvalidScale(0.0))));
        assert!(matches!(err, Err(ApiError::Decode(_))));
    }

    #[test]
    fn take_ready_clears_finished_slot() {
        let slot: Slot<u32> = Arc::new(Mutex::new(None));
        let mut pending = Some(slot.clone());

        assert!(take_ready(&mut pending).is_none());
        assert!(pending.is_some());

        *slot.lock().unwrap() = Some(Ok(7));
        assert!(matches!(take_ready(&mut pending), Some(Ok(7))));
        assert!(pending.is_none());
    }

    #[test]
    fn poll_schedule() {
        let mut loader = loader(15);
        assert!(loader.shelves_due(0.0));
        assert_eq!(loader.next_poll_in(0.0), None);

        loader.last_shelf_request = Some(10.0);
        assert!(!loader.shelves_due(20.0));
        assert!(loader.shelves_due(25.0));
        assert_eq!(loader.next_poll_in(20.0), Some(Duration::from_secs(5)));
        assert_eq!(loader.next_poll_in(40.0), Some(Duration::ZERO));
    }

    #[test]
    fn failed_request_sets_error() {
        let mut loader = loader(15);
        let slot: Slot<Vec<ShelfDto>> = Arc::new(Mutex::new(Some(Err(ApiError::Transport(
            "connection refused".into(),
        )))));
        loader.pending_shelves = Some(slot);
        loader.last_shelf_request = Some(0.0);

        let update = loader.poll(1.0);
        assert!(update.shelves.is_none());
        assert!(loader.is_error());
        assert!(!loader.busy());
        assert!(loader.error().unwrap_or_default().contains("connection refused"));
    }
}
