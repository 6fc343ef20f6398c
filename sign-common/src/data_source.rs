use crate::{
    cache::{CacheSnapshot, CacheStore},
    signapi::{FetchError, SignApiClient, SignConfigPayload, SlidesResponse},
    slides::Slide,
};
use log::*;
use std::future::Future;
use tokio::time::{Duration, Instant};

/// Where fresh slides and remote configuration come from.
pub trait SlideSource {
    fn fetch_slides(&self) -> impl Future<Output = Result<SlidesResponse, FetchError>> + Send;

    fn fetch_sign_config(
        &self,
    ) -> impl Future<Output = Result<SignConfigPayload, FetchError>> + Send;
}

impl SlideSource for SignApiClient {
    fn fetch_slides(&self) -> impl Future<Output = Result<SlidesResponse, FetchError>> + Send {
        self.get_slides()
    }

    fn fetch_sign_config(
        &self,
    ) -> impl Future<Output = Result<SignConfigPayload, FetchError>> + Send {
        self.get_sign_config()
    }
}

#[derive(Debug, Default)]
struct FetchState {
    last_fetch: Option<Instant>,
    slides: Vec<Slide>,
}

/// Turns an unreliable [`SlideSource`] into a slide list that is always available.
///
/// Successful fetches are held in memory for `refresh_interval` and persisted to the
/// [`CacheStore`]. When a fetch fails the previous in-memory slides are used, then the cached
/// snapshot, then an empty list.
pub struct DataSource<S> {
    source: S,
    cache: CacheStore,
    refresh_interval: Duration,
    state: FetchState,
}

impl<S: SlideSource> DataSource<S> {
    pub fn new(source: S, cache: CacheStore, refresh_interval: Duration) -> Self {
        Self {
            source,
            cache,
            refresh_interval,
            state: FetchState::default(),
        }
    }

    pub fn set_refresh_interval(&mut self, refresh_interval: Duration) {
        self.refresh_interval = refresh_interval;
    }

    /// The slides currently held in memory.
    pub fn slides(&self) -> &[Slide] {
        &self.state.slides
    }

    pub fn last_fetch(&self) -> Option<Instant> {
        self.state.last_fetch
    }

    fn is_fresh(&self) -> bool {
        self.state
            .last_fetch
            .is_some_and(|at| at.elapsed() < self.refresh_interval)
    }

    pub async fn get_slides(&mut self, force_refresh: bool) -> Vec<Slide> {
        if !force_refresh && self.is_fresh() {
            debug!("Using {} in-memory slides", self.state.slides.len());
            return self.state.slides.clone();
        }

        match self.source.fetch_slides().await {
            Ok(response) => {
                let slides = prepare(response.slides);
                info!("Fetched {} slides", slides.len());

                self.state = FetchState {
                    last_fetch: Some(Instant::now()),
                    slides: slides.clone(),
                };

                if let Err(e) = self.cache.save(&CacheSnapshot::now(slides.clone())) {
                    warn!("Failed to save cache: {e}");
                }
                slides
            }
            Err(e) => {
                warn!("Failed to fetch slides: {e}");
                self.fallback()
            }
        }
    }

    fn fallback(&mut self) -> Vec<Slide> {
        if !self.state.slides.is_empty() {
            info!("Using {} stale in-memory slides", self.state.slides.len());
            return self.state.slides.clone();
        }

        let slides = match self.cache.load() {
            Some(snapshot) => snapshot.slides,
            None => {
                warn!("No slides available from memory or cache");
                Vec::new()
            }
        };
        self.state.slides = slides.clone();
        slides
    }

    /// Remote configuration is best-effort: any failure is logged and reported as `None`.
    pub async fn fetch_sign_config(&self) -> Option<SignConfigPayload> {
        match self.source.fetch_sign_config().await {
            Ok(payload) => {
                debug!("Fetched sign config version {}", payload.payload_version);
                Some(payload)
            }
            Err(e) => {
                warn!("Failed to fetch sign config: {e}");
                None
            }
        }
    }
}

fn prepare(mut slides: Vec<Slide>) -> Vec<Slide> {
    for slide in slides.iter_mut() {
        match slide {
            Slide::Standings(standings) => standings.sort_by_rank(),
            Slide::Unknown(unknown) => warn!(
                "Passing through slide with unknown type {:?}: {}",
                unknown.slide_type, unknown.raw
            ),
            Slide::LastGame(_) | Slide::NextGame(_) => {}
        }
    }
    slides
}
