use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use led_panel_sim::{DisplaySink, push_frame};
use log::*;
use matrix_drawing::{FrameBuffer, SlideRenderer};
use sign_common::{
    config::{Config, Schedule},
    data_source::{DataSource, SlideSource},
    signapi::{RemoteSignConfig, SignConfigPayload},
    slides::Slide,
};
use std::{future::Future, io, sync::Arc};
use time::OffsetDateTime;
use tokio::{
    select,
    sync::{Mutex, mpsc},
    task::JoinHandle,
    time::{Duration, Instant, Interval, MissedTickBehavior, interval_at},
};

const MIN_PERIOD: Duration = Duration::from_secs(1);

/// Result of one background refresh.
#[derive(Debug)]
pub struct RefreshOutcome {
    pub slides: Vec<Slide>,
    pub config: Option<SignConfigPayload>,
}

/// Owns the panel and decides what it shows: rotates through the current slides, blanks the
/// panel outside of the schedule and re-presents the last frame on a watchdog timer.
pub struct Driver<S> {
    data: Arc<Mutex<DataSource<S>>>,
    sink: Box<dyn DisplaySink>,
    renderer: SlideRenderer,
    frame: FrameBuffer,
    slides: Vec<Slide>,
    next_slide: usize,
    schedule: Schedule,
    rotation_interval: Duration,
    refresh_interval: Duration,
    watchdog_interval: Duration,
    refresh: Option<JoinHandle<()>>,
}

fn interval_after(period: Duration) -> Interval {
    let period = period.max(MIN_PERIOD);
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

impl<S: SlideSource> Driver<S> {
    pub fn new(data: DataSource<S>, mut sink: Box<dyn DisplaySink>, config: &Config) -> Self {
        sink.set_brightness(config.display.brightness);

        Self {
            data: Arc::new(Mutex::new(data)),
            sink,
            renderer: SlideRenderer::new(config.schedule.timezone),
            frame: FrameBuffer::new(config.display.width, config.display.height),
            slides: Vec::new(),
            next_slide: 0,
            schedule: config.schedule.clone(),
            rotation_interval: Duration::from_secs(config.display.rotation_interval_secs),
            refresh_interval: config.api.refresh_interval(),
            watchdog_interval: Duration::from_secs(config.display.watchdog_interval_secs),
            refresh: None,
        }
    }

    fn present(&mut self) {
        if let Err(e) = push_frame(&mut self.sink, &self.frame) {
            warn!("Failed to present frame: {e}");
        }
    }

    pub fn show_loading(&mut self) {
        info!("Showing loading indicator");
        let Ok(()) = self.renderer.render_loading(&mut self.frame);
        self.present();
    }

    /// Shows the next slide, a status frame when there is nothing to show, or a blank panel
    /// outside of the schedule.
    pub fn rotate(&mut self, now: OffsetDateTime) {
        if !self.schedule.is_on(now) {
            debug!("Outside of the display schedule, blanking the panel");
            self.frame.fill(Rgb888::BLACK);
        } else if self.slides.is_empty() {
            let Ok(()) = self
                .renderer
                .render_status(&mut self.frame, "OFFLINE", "RETRYING");
        } else {
            let index = self.next_slide % self.slides.len();
            let slide = &self.slides[index];
            debug!("Showing slide {index} ({})", slide.slide_type());
            let Ok(()) = self.renderer.render(slide, &mut self.frame);
            self.next_slide = (index + 1) % self.slides.len();
        }
        self.present();
    }

    /// Re-sends the current frame without re-rendering.
    pub fn watchdog(&mut self) {
        trace!("Watchdog re-presenting the current frame");
        self.present();
    }

    /// Adopts the result of a refresh. Returns `true` when the rotation interval changed.
    pub fn apply_refresh(&mut self, outcome: RefreshOutcome) -> bool {
        if outcome.slides.is_empty() {
            warn!("Refresh produced no slides");
        } else if outcome.slides != self.slides {
            info!("Now rotating through {} slides", outcome.slides.len());
            self.slides = outcome.slides;
            self.next_slide = 0;
        }

        outcome
            .config
            .is_some_and(|payload| self.apply_remote_config(&payload.config))
    }

    /// Applies the parts of the remote configuration the panel understands. Returns `true`
    /// when the rotation interval changed.
    pub fn apply_remote_config(&mut self, config: &RemoteSignConfig) -> bool {
        let mut rotation_changed = false;

        if let Some(display) = &config.display {
            if let Some(brightness) = display.brightness {
                info!("Remote config sets brightness to {brightness}");
                self.sink.set_brightness(brightness);
            }
            match display.rotation_interval_seconds {
                Some(0) => warn!("Ignoring a remote rotation interval of 0 seconds"),
                Some(secs) if Duration::from_secs(secs) != self.rotation_interval => {
                    info!("Remote config sets rotation interval to {secs}s");
                    self.rotation_interval = Duration::from_secs(secs);
                    rotation_changed = true;
                }
                _ => {}
            }
        }

        if let Some(remote) = &config.schedule {
            let schedule = remote.to_schedule(self.schedule.timezone);
            if schedule != self.schedule {
                info!(
                    "Remote config sets schedule {} - {} ({}, enabled: {})",
                    schedule.on_time, schedule.off_time, schedule.timezone, schedule.enabled
                );
                self.renderer.set_timezone(schedule.timezone);
                self.schedule = schedule;
            }
        }

        rotation_changed
    }

    pub fn rotation_interval(&self) -> Duration {
        self.rotation_interval
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }
}

impl<S: SlideSource + Send + Sync + 'static> Driver<S> {
    /// Whether a background refresh task is still running. A task that panicked or was
    /// aborted counts as finished.
    pub fn refresh_running(&self) -> bool {
        self.refresh
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Starts a refresh in the background unless one is already running.
    pub fn spawn_refresh(&mut self, tx: &mpsc::Sender<RefreshOutcome>, force: bool) {
        if self.refresh_running() {
            debug!("Refresh already in progress");
            return;
        }

        let data = self.data.clone();
        let tx = tx.clone();
        self.refresh = Some(tokio::spawn(async move {
            let mut data = data.lock().await;
            let slides = data.get_slides(force).await;
            let config = data.fetch_sign_config().await;
            if tx.send(RefreshOutcome { slides, config }).await.is_err() {
                debug!("Driver stopped before the refresh finished");
            }
        }));
    }

    pub async fn run<F>(mut self, shutdown: F)
    where
        F: Future<Output = io::Result<()>>,
    {
        tokio::pin!(shutdown);
        let (tx, mut rx) = mpsc::channel(4);

        self.show_loading();
        self.spawn_refresh(&tx, false);

        let mut rotation = interval_after(self.rotation_interval);
        let mut refresh = interval_after(self.refresh_interval);
        let mut watchdog = interval_after(self.watchdog_interval);

        loop {
            select! {
                _ = rotation.tick() => self.rotate(OffsetDateTime::now_utc()),
                _ = refresh.tick() => self.spawn_refresh(&tx, true),
                _ = watchdog.tick() => {
                    self.watchdog();
                    if self.slides.is_empty() {
                        self.spawn_refresh(&tx, false);
                    }
                }
                Some(outcome) = rx.recv() => {
                    let first = self.slides.is_empty();
                    if self.apply_refresh(outcome) {
                        rotation = interval_after(self.rotation_interval);
                    }
                    if first {
                        self.rotate(OffsetDateTime::now_utc());
                    }
                }
                res = &mut shutdown => {
                    match res {
                        Ok(()) => info!("Shutting down"),
                        Err(e) => error!("Failed to listen for shutdown, stopping: {e}"),
                    }
                    break;
                }
            }
        }

        self.frame.fill(Rgb888::BLACK);
        self.present();
    }
}
