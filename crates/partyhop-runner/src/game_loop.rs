use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use partyhop_core::game_trait::{GameEvent, MiniGame};
use partyhop_core::input::{Control, ControlSource, ControlTracker};
use partyhop_core::time::FrameClock;
use partyhop_core::viewport::Viewport;

use crate::config::LoopConfig;
use crate::error::LoopError;

/// Commands sent from the host (input handlers, window events) to the frame loop.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopCommand {
    /// The intro overlay's "Start" action.
    Start,
    Press {
        control: Control,
        source: ControlSource,
    },
    Release {
        control: Control,
        source: ControlSource,
    },
    /// Drop every control held by one source (pointer leave, focus loss).
    ReleaseAll { source: ControlSource },
    /// The host window changed size.
    Resize { width: f32, height: f32 },
    Stop,
}

/// Receives one snapshot per executed step.
pub trait Renderer<S>: Send + 'static {
    fn render(&mut self, snapshot: &S);
}

/// Forwards owned snapshots into an unbounded channel.
pub struct ChannelRenderer<S> {
    tx: mpsc::UnboundedSender<S>,
}

impl<S> ChannelRenderer<S> {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<S>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl<S: Clone + Send + 'static> Renderer<S> for ChannelRenderer<S> {
    fn render(&mut self, snapshot: &S) {
        // A closed receiver just means nobody is watching any more
        let _ = self.tx.send(snapshot.clone());
    }
}

/// One-shot completion notification. Consumed on delivery, so it can fire
/// at most once.
pub trait CompletionSink: Send + 'static {
    fn complete(self);
}

impl<F> CompletionSink for F
where
    F: FnOnce() + Send + 'static,
{
    fn complete(self) {
        self()
    }
}

/// What a finished frame loop reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopSummary {
    /// Ticks executed, including any before `Start`.
    pub frames: u64,
    /// Whether the completion sink fired.
    pub completed: bool,
}

/// Owner's handle to a running frame loop. Dropping it cancels the loop.
pub struct FrameLoopHandle {
    commands: mpsc::UnboundedSender<LoopCommand>,
    cancel: CancellationToken,
    task: Option<JoinHandle<LoopSummary>>,
}

impl FrameLoopHandle {
    pub fn send(&self, command: LoopCommand) -> Result<(), LoopError> {
        self.commands.send(command).map_err(|_| LoopError::Closed)
    }

    pub fn start(&self) -> Result<(), LoopError> {
        self.send(LoopCommand::Start)
    }

    pub fn press(&self, control: Control, source: ControlSource) -> Result<(), LoopError> {
        self.send(LoopCommand::Press { control, source })
    }

    pub fn release(&self, control: Control, source: ControlSource) -> Result<(), LoopError> {
        self.send(LoopCommand::Release { control, source })
    }

    pub fn resize(&self, width: f32, height: f32) -> Result<(), LoopError> {
        self.send(LoopCommand::Resize { width, height })
    }

    /// Whether the loop task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|t| t.is_finished())
    }

    /// Cancel the loop and wait for it to exit. No step (and no render)
    /// happens after this returns.
    pub async fn stop(mut self) -> Result<LoopSummary, LoopError> {
        self.cancel.cancel();
        self.wait().await
    }

    /// Wait for the loop to exit on its own (a `Stop` command or completion).
    pub async fn join(mut self) -> Result<LoopSummary, LoopError> {
        self.wait().await
    }

    async fn wait(&mut self) -> Result<LoopSummary, LoopError> {
        match self.task.take() {
            Some(task) => Ok(task.await?),
            None => Err(LoopError::Closed),
        }
    }
}

impl Drop for FrameLoopHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Spawn a frame loop as a tokio task. The task owns the game exclusively.
pub fn spawn_frame_loop<G, R, C>(
    game: G,
    config: LoopConfig,
    renderer: R,
    sink: C,
) -> FrameLoopHandle
where
    G: MiniGame + 'static,
    R: Renderer<G::Snapshot>,
    C: CompletionSink,
{
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    let task = tokio::spawn(run_frame_loop(
        game,
        config,
        renderer,
        sink,
        cmd_rx,
        cancel.clone(),
    ));

    FrameLoopHandle {
        commands: cmd_tx,
        cancel,
        task: Some(task),
    }
}

async fn run_frame_loop<G, R, C>(
    mut game: G,
    config: LoopConfig,
    mut renderer: R,
    sink: C,
    mut cmd_rx: mpsc::UnboundedReceiver<LoopCommand>,
    cancel: CancellationToken,
) -> LoopSummary
where
    G: MiniGame,
    R: Renderer<G::Snapshot>,
    C: CompletionSink,
{
    let mut interval = tokio::time::interval(config.frame_interval());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut clock = FrameClock::new();
    let mut controls = ControlTracker::new();
    let mut sink = Some(sink);
    let mut frames: u64 = 0;

    tracing::info!(
        game = %game.metadata().name,
        frame_rate_hz = config.frame_rate_hz,
        "Frame loop started"
    );

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                break;
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(LoopCommand::Start) => {
                        game.start();
                        clock.reset();
                    },
                    Some(LoopCommand::Press { control, source }) => {
                        controls.press(control, source);
                    },
                    Some(LoopCommand::Release { control, source }) => {
                        controls.release(control, source);
                    },
                    Some(LoopCommand::ReleaseAll { source }) => {
                        controls.release_all(source);
                    },
                    Some(LoopCommand::Resize { width, height }) => {
                        game.resize(Viewport::fit(width, height));
                    },
                    Some(LoopCommand::Stop) | None => {
                        break;
                    },
                }
            }
            _ = interval.tick() => {
                if cancel.is_cancelled() {
                    break;
                }
                let dt = clock.tick(Instant::now());
                let events = game.update(dt, &controls.state());
                frames += 1;
                renderer.render(&game.snapshot());

                if events.contains(&GameEvent::Completed)
                    && let Some(sink) = sink.take()
                {
                    tracing::info!(frames, "Game complete");
                    sink.complete();
                    if config.stop_on_complete {
                        break;
                    }
                }
            }
        }
    }

    let summary = LoopSummary {
        frames,
        completed: sink.is_none(),
    };
    tracing::info!(frames = summary.frames, completed = summary.completed, "Frame loop stopped");
    summary
}
