//! Clock-driven player for demos, headless hosts, and tests.
//!
//! No audio is produced. Each bound session advances its position on a tokio
//! interval while playing and pushes a [`PlayerStatus`] every tick and after
//! every command. Any URI binds, including empty and `demo` placeholders,
//! unless it was marked with [`SimulatedPlayer::fail_uri`].

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::{
    status_channel, BoundPlayer, Player, PlayerHandle, PlayerStatus, StatusSender,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Duration of simulated tracks without an explicit one.
pub const DEFAULT_SIMULATED_DURATION: Duration = Duration::from_secs(180);

const DEFAULT_TICK: Duration = Duration::from_millis(500);

struct Session {
    status: StatusSender,
    playing: bool,
    position: Duration,
    duration: Duration,
    volume: f32,
    ticker: JoinHandle<()>,
}

impl Session {
    fn report(&self) {
        let _ = self.status.send(PlayerStatus::new(
            self.playing,
            self.position.as_secs_f64(),
            self.duration.as_secs_f64(),
        ));
    }

    fn advance(&mut self, step: Duration) {
        if !self.playing {
            return;
        }
        self.position = (self.position + step).min(self.duration);
        if self.position >= self.duration {
            self.playing = false;
        }
    }
}

#[derive(Default)]
struct Inner {
    sessions: HashMap<PlayerHandle, Session>,
    durations: HashMap<String, Duration>,
    failing: HashSet<String>,
}

/// Deterministic [`Player`] driven by the tokio clock.
pub struct SimulatedPlayer {
    inner: Arc<Mutex<Inner>>,
    tick: Duration,
}

impl SimulatedPlayer {
    /// Create a player reporting status every `tick`.
    pub fn new(tick: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            tick,
        }
    }

    /// Simulated length of `uri`.
    pub fn with_duration(self, uri: impl Into<String>, duration: Duration) -> Self {
        self.inner.lock().durations.insert(uri.into(), duration);
        self
    }

    /// Make every later bind of `uri` fail.
    pub fn fail_uri(&self, uri: impl Into<String>) {
        self.inner.lock().failing.insert(uri.into());
    }

    /// Number of bound, unreleased sessions.
    pub fn active_sessions(&self) -> usize {
        self.inner.lock().sessions.len()
    }

    /// Last volume applied to `handle`.
    pub fn volume(&self, handle: PlayerHandle) -> Option<f32> {
        self.inner.lock().sessions.get(&handle).map(|s| s.volume)
    }

    fn spawn_ticker(&self, handle: PlayerHandle) -> JoinHandle<()> {
        let inner: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
        let tick = self.tick;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(shared) = inner.upgrade() else {
                    break;
                };
                let mut guard = shared.lock();
                let Some(session) = guard.sessions.get_mut(&handle) else {
                    break;
                };
                if session.playing {
                    session.advance(tick);
                    session.report();
                }
            }
            trace!(%handle, "Simulated ticker stopped");
        })
    }

    fn with_session<R>(
        &self,
        handle: PlayerHandle,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Result<R> {
        let mut inner = self.inner.lock();
        let session = inner
            .sessions
            .get_mut(&handle)
            .ok_or_else(|| BridgeError::UnknownHandle(handle.to_string()))?;
        let out = f(session);
        session.report();
        Ok(out)
    }
}

impl Default for SimulatedPlayer {
    fn default() -> Self {
        Self::new(DEFAULT_TICK)
    }
}

#[async_trait]
impl Player for SimulatedPlayer {
    async fn bind(&self, uri: &str) -> Result<BoundPlayer> {
        let handle = PlayerHandle::new();
        let (tx, rx) = status_channel();

        {
            let inner = self.inner.lock();
            if inner.failing.contains(uri) {
                return Err(BridgeError::NotAvailable(format!(
                    "simulated bind failure for {}",
                    uri
                )));
            }
        }

        let ticker = self.spawn_ticker(handle);
        let mut inner = self.inner.lock();
        let duration = inner
            .durations
            .get(uri)
            .copied()
            .unwrap_or(DEFAULT_SIMULATED_DURATION);
        inner.sessions.insert(
            handle,
            Session {
                status: tx,
                playing: false,
                position: Duration::ZERO,
                duration,
                volume: 1.0,
                ticker,
            },
        );

        debug!(%handle, uri, "Simulated player bound");
        Ok(BoundPlayer::new(handle, rx))
    }

    async fn release(&self, handle: PlayerHandle) -> Result<()> {
        if let Some(session) = self.inner.lock().sessions.remove(&handle) {
            session.ticker.abort();
            debug!(%handle, "Simulated player released");
        }
        Ok(())
    }

    async fn play(&self, handle: PlayerHandle) -> Result<()> {
        self.with_session(handle, |s| {
            if s.position >= s.duration {
                s.position = Duration::ZERO;
            }
            s.playing = true;
        })
    }

    async fn pause(&self, handle: PlayerHandle) -> Result<()> {
        self.with_session(handle, |s| s.playing = false)
    }

    async fn seek_to(&self, handle: PlayerHandle, seconds: f64) -> Result<()> {
        self.with_session(handle, |s| {
            let target = if seconds.is_finite() && seconds > 0.0 {
                Duration::from_secs_f64(seconds)
            } else {
                Duration::ZERO
            };
            s.position = target.min(s.duration);
        })
    }

    async fn set_volume(&self, handle: PlayerHandle, volume: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(BridgeError::OperationFailed(format!(
                "volume {} out of range",
                volume
            )));
        }
        let mut inner = self.inner.lock();
        let session = inner
            .sessions
            .get_mut(&handle)
            .ok_or_else(|| BridgeError::UnknownHandle(handle.to_string()))?;
        session.volume = volume;
        Ok(())
    }
}
