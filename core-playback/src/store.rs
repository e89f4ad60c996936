//! # Playback State Store
//!
//! Single source of truth for what is playing.
//!
//! ## Overview
//!
//! [`PlaybackStateStore`] owns one [`PlaybackState`], drives an injected
//! [`Player`] and republishes the state to every listener after each change.
//!
//! ```text
//! Empty ──load_track──▶ Loading ──bind ok──▶ Paused ⇄ Playing
//!   ▲                      │                   │
//!   └──────bind failed─────┘        load_track returns to Loading
//! ```
//!
//! - `is_playing`, position and duration come from the player's status
//!   reports; commands never flip `is_playing` optimistically
//! - `stop` rewinds and publishes immediately
//! - overlapping loads are resolved by sequence number: only the latest
//!   `load_track` call may install its player session
//!
//! ## Usage
//!
//! ```ignore
//! use core_playback::{LogOnError, PlaybackStateStore};
//!
//! let store = PlaybackStateStore::new(player, settings);
//! let sub = store.subscribe(|state| println!("{:?}", state.phase()));
//!
//! store.load_track(track).await?;
//! store.play().await.log_on_error("play");
//! sub.unsubscribe();
//! store.dispose().await;
//! ```

use bridge_traits::error::BridgeError;
use bridge_traits::{BoundPlayer, Player, PlayerHandle, PlayerStatus, StatusReceiver};
use core_library::Track;
use core_runtime::config::PlaybackSettings;
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
use parking_lot::{Mutex, ReentrantMutex};
use std::sync::{Arc, Weak};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, trace, warn};

use crate::error::{PlaybackError, Result};
use crate::state::PlaybackState;
use crate::subscribers::{ListenerRegistry, Subscription};
use crate::units::{ms_to_secs, secs_to_ms};

/// A bound player resource together with its status forwarding task.
struct Session {
    seq: u64,
    handle: PlayerHandle,
    track_id: String,
    forwarder: JoinHandle<()>,
}

/// Rolls back a `load_track` call dropped before it reached an outcome:
/// clears the loading flag it raised and releases any handle it still owns.
struct PendingLoad<'a> {
    store: &'a PlaybackStateStore,
    seq: u64,
    /// Previous session handle whose release has not completed
    releasing: Option<PlayerHandle>,
    /// Newly bound handle not yet installed
    bound: Option<PlayerHandle>,
    settled: bool,
}

impl PendingLoad<'_> {
    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let seq = self.seq;
        debug!(seq, "Load cancelled before completion");
        self.store.commit(|inner| {
            if inner.disposed || inner.load_seq != seq {
                return (false, ());
            }
            inner.state.is_loading = false;
            (true, ())
        });
        for handle in self.releasing.take().into_iter().chain(self.bound.take()) {
            self.store.release_detached(handle);
        }
    }
}

struct Inner {
    state: PlaybackState,
    session: Option<Session>,
    /// Sequence number of the latest `load_track` call
    load_seq: u64,
    disposed: bool,
}

/// Observable playback state driven by a [`Player`].
pub struct PlaybackStateStore {
    me: Weak<PlaybackStateStore>,
    player: Arc<dyn Player>,
    inner: Mutex<Inner>,
    listeners: Arc<ListenerRegistry>,
    /// Serializes mutate-then-notify so listeners see snapshots in order.
    /// Reentrant because a listener may issue a command that publishes.
    publish_gate: ReentrantMutex<()>,
    events: Option<EventBus>,
}

impl PlaybackStateStore {
    pub fn new(player: Arc<dyn Player>, settings: PlaybackSettings) -> Arc<Self> {
        Self::build(player, settings, None)
    }

    /// Like [`new`](Self::new), also emitting [`PlaybackEvent`]s on `events`.
    pub fn with_event_bus(
        player: Arc<dyn Player>,
        settings: PlaybackSettings,
        events: EventBus,
    ) -> Arc<Self> {
        Self::build(player, settings, Some(events))
    }

    fn build(
        player: Arc<dyn Player>,
        settings: PlaybackSettings,
        events: Option<EventBus>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            player,
            inner: Mutex::new(Inner {
                state: PlaybackState::with_volume(settings.initial_volume),
                session: None,
                load_seq: 0,
                disposed: false,
            }),
            listeners: Arc::new(ListenerRegistry::default()),
            publish_gate: ReentrantMutex::new(()),
            events,
        })
    }

    /// Current state snapshot.
    pub fn state(&self) -> PlaybackState {
        self.inner.lock().state.clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.lock().disposed
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Register a listener called synchronously after every state change.
    ///
    /// The listener is not called with the current state; use
    /// [`state`](Self::state) for that.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&PlaybackState) + Send + Sync + 'static,
    {
        self.listeners.subscribe(Box::new(listener))
    }

    /// Load a track, replacing whatever was loaded before.
    ///
    /// Publishes the loading state before any player call, releases the
    /// previous player resource, then binds `track.uri`. On success exactly
    /// one state with the new track is published.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::LoadFailed`] when the player cannot bind the URI;
    ///   the store is left without a track
    /// - [`PlaybackError::Superseded`] when a newer load started meanwhile
    /// - [`PlaybackError::Disposed`]
    #[instrument(skip(self, track), fields(track_id = %track.id))]
    pub async fn load_track(&self, track: Track) -> Result<()> {
        let (seq, previous) = self.commit(|inner| {
            if inner.disposed {
                return (false, Err(PlaybackError::Disposed));
            }
            inner.load_seq += 1;
            let previous = inner.session.take();
            inner.state.reset();
            inner.state.is_loading = true;
            (true, Ok((inner.load_seq, previous)))
        })?;

        let mut pending = PendingLoad {
            store: self,
            seq,
            releasing: None,
            bound: None,
            settled: false,
        };

        if let Some(previous) = previous {
            pending.releasing = Some(previous.handle);
            self.release_session(previous).await;
            pending.releasing = None;
        }

        debug!(seq, uri = %track.uri, "Binding player");
        let bound = match self.player.bind(&track.uri).await {
            Ok(bound) => bound,
            Err(source) => {
                pending.settle();
                warn!(error = %source, "Player could not bind track");
                self.commit(|inner| {
                    // A newer load owns the loading flag now.
                    if inner.disposed || inner.load_seq != seq {
                        return (false, ());
                    }
                    inner.state.is_loading = false;
                    (true, ())
                });
                self.emit(PlaybackEvent::LoadFailed {
                    track_id: track.id.clone(),
                    message: source.to_string(),
                });
                return Err(PlaybackError::LoadFailed {
                    track_id: track.id,
                    source,
                });
            }
        };

        let BoundPlayer { handle, status } = bound;
        pending.bound = Some(handle);

        let volume = self.inner.lock().state.volume;
        if let Err(e) = self.player.set_volume(handle, volume).await {
            warn!(error = %e, volume, "Could not apply volume to new player");
        }

        let installed = self.commit(|inner| {
            if inner.disposed {
                return (false, Err(PlaybackError::Disposed));
            }
            if inner.load_seq != seq {
                return (
                    false,
                    Err(PlaybackError::Superseded {
                        track_id: track.id.clone(),
                    }),
                );
            }
            inner.session = Some(Session {
                seq,
                handle,
                track_id: track.id.clone(),
                forwarder: self.spawn_forwarder(seq, status),
            });
            inner.state.is_loading = false;
            inner.state.position_ms = 0;
            inner.state.duration_ms = track.duration_ms.unwrap_or(0);
            inner.state.current_track = Some(track.clone());
            (true, Ok(()))
        });

        match installed {
            Ok(()) => {
                pending.settle();
                info!(title = %track.title, "Track loaded");
                self.emit(PlaybackEvent::TrackLoaded {
                    track_id: track.id,
                    title: track.title,
                    duration_ms: track.duration_ms,
                });
                Ok(())
            }
            Err(e) => {
                debug!(error = %e, "Discarding stale player binding");
                if let Err(release_err) = self.player.release(handle).await {
                    warn!(error = %release_err, "Failed to release stale player");
                }
                pending.settle();
                Err(e)
            }
        }
    }

    /// Start playback. A no-op when nothing is loaded.
    ///
    /// `is_playing` flips when the player's status report confirms it.
    pub async fn play(&self) -> Result<()> {
        let Some((handle, _)) = self.bound_session()? else {
            debug!("play ignored: no track loaded");
            return Ok(());
        };
        self.player
            .play(handle)
            .await
            .map_err(|e| self.command_failed("play", e))
    }

    /// Pause playback. A no-op when nothing is loaded.
    pub async fn pause(&self) -> Result<()> {
        let Some((handle, _)) = self.bound_session()? else {
            debug!("pause ignored: no track loaded");
            return Ok(());
        };
        self.player
            .pause(handle)
            .await
            .map_err(|e| self.command_failed("pause", e))
    }

    /// Pause and rewind, then publish `position_ms = 0, is_playing = false`
    /// without waiting for the player to confirm.
    pub async fn stop(&self) -> Result<()> {
        let bound = self.bound_session()?;

        if let Some((handle, _)) = bound {
            self.player
                .pause(handle)
                .await
                .map_err(|e| self.command_failed("stop", e))?;
            self.player
                .seek_to(handle, 0.0)
                .await
                .map_err(|e| self.command_failed("stop", e))?;
        }

        let track_id = self.commit(|inner| {
            if inner.disposed {
                return (false, None);
            }
            inner.state.position_ms = 0;
            inner.state.is_playing = false;
            (true, inner.state.track_id().map(str::to_string))
        });

        self.emit(PlaybackEvent::Stopped { track_id });
        Ok(())
    }

    /// Seek to `position_ms`. Out-of-range positions are left for the player
    /// to clamp or reject. A no-op when nothing is loaded.
    pub async fn seek(&self, position_ms: u64) -> Result<()> {
        let Some((handle, seq)) = self.bound_session()? else {
            debug!("seek ignored: no track loaded");
            return Ok(());
        };

        self.player
            .seek_to(handle, ms_to_secs(position_ms))
            .await
            .map_err(|e| self.command_failed("seek", e))?;

        let track_id = self.commit(|inner| match &inner.session {
            Some(session) if session.seq == seq && !inner.disposed => {
                let track_id = session.track_id.clone();
                inner.state.position_ms = position_ms;
                (true, Some(track_id))
            }
            _ => (false, None),
        });

        if let Some(track_id) = track_id {
            self.emit(PlaybackEvent::Seeked {
                track_id,
                position_ms,
            });
        }
        Ok(())
    }

    /// Set the output volume in `0.0..=1.0`.
    ///
    /// The value is recorded only after the player accepts it. With nothing
    /// loaded it is recorded directly and applied to the next bound player.
    pub async fn set_volume(&self, volume: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(PlaybackError::InvalidVolume(volume));
        }

        if let Some((handle, _)) = self.bound_session()? {
            self.player
                .set_volume(handle, volume)
                .await
                .map_err(|e| self.command_failed("set_volume", e))?;
        }

        let recorded = self.commit(|inner| {
            if inner.disposed {
                return (false, false);
            }
            inner.state.volume = volume;
            (true, true)
        });

        if recorded {
            self.emit(PlaybackEvent::VolumeChanged { volume });
        }
        Ok(())
    }

    /// Release the player resource, reset state, publish once, and drop all
    /// listeners. Later commands fail with [`PlaybackError::Disposed`].
    pub async fn dispose(&self) {
        let session = self.commit(|inner| {
            if inner.disposed {
                return (false, None);
            }
            inner.disposed = true;
            inner.load_seq += 1;
            inner.state.reset();
            (true, Some(inner.session.take()))
        });

        let Some(session) = session else {
            return;
        };

        self.listeners.clear();
        if let Some(session) = session {
            self.release_session(session).await;
        }
        info!("Playback store disposed");
    }

    /// Apply a status report from the session started by load `seq`.
    fn apply_status(&self, seq: u64, status: PlayerStatus) {
        let event = self.commit(|inner| {
            let Some(session) = &inner.session else {
                return (false, None);
            };
            if inner.disposed || session.seq != seq {
                trace!(seq, "Ignoring status from stale session");
                return (false, None);
            }

            let track_id = session.track_id.clone();
            let state = &mut inner.state;
            let position_ms = secs_to_ms(status.current_time_secs).unwrap_or(0);
            let duration_ms = secs_to_ms(status.duration_secs)
                .filter(|ms| *ms > 0)
                .unwrap_or(state.duration_ms);

            if state.is_playing == status.playing
                && state.position_ms == position_ms
                && state.duration_ms == duration_ms
            {
                return (false, None);
            }

            let event = match (state.is_playing, status.playing) {
                (false, true) => Some(PlaybackEvent::Started { track_id }),
                (true, false) => Some(PlaybackEvent::Paused {
                    track_id,
                    position_ms,
                }),
                _ => None,
            };

            state.is_playing = status.playing;
            state.position_ms = position_ms;
            state.duration_ms = duration_ms;
            (true, event)
        });

        if let Some(event) = event {
            self.emit(event);
        }
    }

    /// Mutate the state under the lock and, when `f` reports a change,
    /// notify listeners with the resulting snapshot.
    fn commit<R>(&self, f: impl FnOnce(&mut Inner) -> (bool, R)) -> R {
        let _gate = self.publish_gate.lock();
        let (snapshot, out) = {
            let mut inner = self.inner.lock();
            let (changed, out) = f(&mut inner);
            (changed.then(|| inner.state.clone()), out)
        };
        if let Some(snapshot) = snapshot {
            self.listeners.notify(&snapshot);
        }
        out
    }

    fn bound_session(&self) -> Result<Option<(PlayerHandle, u64)>> {
        let inner = self.inner.lock();
        if inner.disposed {
            return Err(PlaybackError::Disposed);
        }
        Ok(inner.session.as_ref().map(|s| (s.handle, s.seq)))
    }

    fn spawn_forwarder(&self, seq: u64, mut status: StatusReceiver) -> JoinHandle<()> {
        let store = self.me.clone();
        tokio::spawn(async move {
            while let Some(report) = status.recv().await {
                let Some(store) = store.upgrade() else {
                    break;
                };
                store.apply_status(seq, report);
            }
            trace!(seq, "Status stream closed");
        })
    }

    async fn release_session(&self, session: Session) {
        session.forwarder.abort();
        debug!(seq = session.seq, handle = %session.handle, "Releasing player");
        if let Err(e) = self.player.release(session.handle).await {
            warn!(error = %e, "Failed to release player");
        }
    }

    /// Release `handle` on a background task, for paths that cannot await.
    fn release_detached(&self, handle: PlayerHandle) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(%handle, "No runtime to release player on");
            return;
        };
        let player = Arc::clone(&self.player);
        runtime.spawn(async move {
            if let Err(e) = player.release(handle).await {
                warn!(%handle, error = %e, "Failed to release player");
            }
        });
    }

    fn command_failed(&self, command: &'static str, source: BridgeError) -> PlaybackError {
        warn!(command, error = %source, "Player rejected command");
        let track_id = self.inner.lock().state.track_id().map(str::to_string);
        self.emit(PlaybackEvent::Error {
            track_id,
            command: command.to_string(),
            message: source.to_string(),
        });
        PlaybackError::CommandFailed { command, source }
    }

    fn emit(&self, event: PlaybackEvent) {
        if let Some(events) = &self.events {
            let _ = events.emit(CoreEvent::Playback(event));
        }
    }
}

impl Drop for PlaybackStateStore {
    fn drop(&mut self) {
        if let Some(session) = self.inner.get_mut().session.take() {
            session.forwarder.abort();
            debug!(handle = %session.handle, "Store dropped without dispose");
            self.release_detached(session.handle);
        }
    }
}
