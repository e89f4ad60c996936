//! Audio output through `rodio`.
//!
//! The output stream is not `Send` on every platform, so [`RodioPlayer`] keeps
//! it on a dedicated thread. Async callers talk to that thread over a command
//! channel and wait for a oneshot reply; the thread pushes a [`PlayerStatus`]
//! for every playing session once per tick and right after each transport
//! command.

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::uri::path_from_uri;
use bridge_traits::{
    status_channel, BoundPlayer, Player, PlayerHandle, PlayerStatus, StatusSender,
};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

enum Transport {
    Play,
    Pause,
    Seek(f64),
    Volume(f32),
    Release,
}

enum AudioCommand {
    Bind {
        path: PathBuf,
        reply: oneshot::Sender<Result<BoundPlayer>>,
    },
    Transport {
        handle: PlayerHandle,
        op: Transport,
        reply: oneshot::Sender<Result<()>>,
    },
    Shutdown,
}

struct Session {
    path: PathBuf,
    sink: Sink,
    status: StatusSender,
    duration: Option<Duration>,
}

impl Session {
    fn report(&self) {
        let playing = !self.sink.is_paused() && !self.sink.empty();
        let position = if self.sink.empty() {
            self.duration.unwrap_or_default()
        } else {
            self.sink.get_pos()
        };
        let _ = self.status.send(PlayerStatus::new(
            playing,
            position.as_secs_f64(),
            self.duration.map(|d| d.as_secs_f64()).unwrap_or(0.0),
        ));
    }

    fn refill(&mut self) -> Result<()> {
        let (source, _) = open_source(&self.path)?;
        self.sink.append(source);
        Ok(())
    }
}

fn open_source(path: &Path) -> Result<(Decoder<BufReader<File>>, Option<Duration>)> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BridgeError::NotAvailable(path.display().to_string())
        } else {
            BridgeError::Io(e)
        }
    })?;
    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| {
        BridgeError::Unsupported(format!("cannot decode {}: {}", path.display(), e))
    })?;
    let duration = decoder.total_duration();
    Ok((decoder, duration))
}

struct AudioThread {
    stream: OutputStream,
    sessions: HashMap<PlayerHandle, Session>,
}

impl AudioThread {
    fn run(mut self, commands: Receiver<AudioCommand>, tick: Duration) {
        loop {
            match commands.recv_timeout(tick) {
                Ok(AudioCommand::Shutdown) => break,
                Ok(cmd) => self.handle(cmd),
                Err(RecvTimeoutError::Timeout) => self.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        for (_, session) in self.sessions.drain() {
            session.sink.stop();
        }
        info!("Audio thread stopped");
    }

    fn handle(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::Bind { path, reply } => {
                let _ = reply.send(self.bind(path));
            }
            AudioCommand::Transport { handle, op, reply } => {
                let _ = reply.send(self.transport(handle, op));
            }
            AudioCommand::Shutdown => {}
        }
    }

    fn bind(&mut self, path: PathBuf) -> Result<BoundPlayer> {
        let (source, duration) = open_source(&path)?;
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.pause();

        let handle = PlayerHandle::new();
        let (tx, rx) = status_channel();
        let session = Session {
            path,
            sink,
            status: tx,
            duration,
        };
        session.report();
        debug!(%handle, file = %session.path.display(), "Bound audio session");
        self.sessions.insert(handle, session);

        Ok(BoundPlayer::new(handle, rx))
    }

    fn transport(&mut self, handle: PlayerHandle, op: Transport) -> Result<()> {
        if let Transport::Release = op {
            if let Some(session) = self.sessions.remove(&handle) {
                session.sink.stop();
                debug!(%handle, "Released audio session");
            }
            return Ok(());
        }

        let session = self
            .sessions
            .get_mut(&handle)
            .ok_or_else(|| BridgeError::UnknownHandle(handle.to_string()))?;

        match op {
            Transport::Play => {
                if session.sink.empty() {
                    session.refill()?;
                }
                session.sink.play();
            }
            Transport::Pause => session.sink.pause(),
            Transport::Seek(secs) => {
                let target = if secs.is_finite() && secs > 0.0 {
                    Duration::from_secs_f64(secs)
                } else {
                    Duration::ZERO
                };
                if session.sink.empty() {
                    session.refill()?;
                    session.sink.pause();
                }
                session
                    .sink
                    .try_seek(target)
                    .map_err(|e| BridgeError::OperationFailed(format!("seek failed: {}", e)))?;
            }
            Transport::Volume(volume) => {
                session.sink.set_volume(volume);
                return Ok(());
            }
            Transport::Release => {}
        }

        session.report();
        Ok(())
    }

    fn tick(&mut self) {
        for session in self.sessions.values() {
            if session.sink.is_paused() {
                continue;
            }
            session.report();
            if session.sink.empty() {
                // Reported as finished once; stays quiet until played again.
                session.sink.pause();
            }
        }
    }
}

/// [`Player`] that renders audio to the default output device.
pub struct RodioPlayer {
    commands: Sender<AudioCommand>,
    thread: Option<JoinHandle<()>>,
}

impl RodioPlayer {
    /// Open the default output device on a new audio thread.
    ///
    /// # Errors
    ///
    /// [`BridgeError::NotAvailable`] when no output device can be opened.
    pub fn new(status_interval: Duration) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<std::result::Result<(), String>>(1);

        let thread = thread::Builder::new()
            .name("tunedeck-audio".to_string())
            .spawn(move || {
                let mut stream = match OutputStreamBuilder::open_default_stream() {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };
                stream.log_on_drop(false);
                let _ = ready_tx.send(Ok(()));

                AudioThread {
                    stream,
                    sessions: HashMap::new(),
                }
                .run(rx, status_interval);
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                info!("Opened default audio output");
                Ok(Self {
                    commands: tx,
                    thread: Some(thread),
                })
            }
            Ok(Err(msg)) => {
                error!(error = %msg, "No audio output device");
                Err(BridgeError::NotAvailable(format!(
                    "no audio output device: {}",
                    msg
                )))
            }
            Err(_) => Err(BridgeError::NotAvailable(
                "audio thread exited during startup".to_string(),
            )),
        }
    }

    async fn send_transport(&self, handle: PlayerHandle, op: Transport) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(AudioCommand::Transport { handle, op, reply })
            .map_err(|_| thread_gone())?;
        rx.await.map_err(|_| thread_gone())?
    }
}

fn thread_gone() -> BridgeError {
    BridgeError::NotAvailable("audio thread is not running".to_string())
}

impl Drop for RodioPlayer {
    fn drop(&mut self) {
        let _ = self.commands.send(AudioCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Audio thread panicked");
            }
        }
    }
}

#[async_trait]
impl Player for RodioPlayer {
    async fn bind(&self, uri: &str) -> Result<BoundPlayer> {
        let path = path_from_uri(uri)?;
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(AudioCommand::Bind { path, reply })
            .map_err(|_| thread_gone())?;
        rx.await.map_err(|_| thread_gone())?
    }

    async fn release(&self, handle: PlayerHandle) -> Result<()> {
        self.send_transport(handle, Transport::Release).await
    }

    async fn play(&self, handle: PlayerHandle) -> Result<()> {
        self.send_transport(handle, Transport::Play).await
    }

    async fn pause(&self, handle: PlayerHandle) -> Result<()> {
        self.send_transport(handle, Transport::Pause).await
    }

    async fn seek_to(&self, handle: PlayerHandle, seconds: f64) -> Result<()> {
        self.send_transport(handle, Transport::Seek(seconds)).await
    }

    async fn set_volume(&self, handle: PlayerHandle, volume: f32) -> Result<()> {
        self.send_transport(handle, Transport::Volume(volume.clamp(0.0, 1.0)))
            .await
    }
}
