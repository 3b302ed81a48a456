use std::time::Duration;

use tokio::sync::oneshot;

use partyhop_core::flow::{Experience, GiftCarousel, Screen};
use partyhop_core::game_trait::MiniGame;
use partyhop_core::input::{Control, ControlSource, InputState};
use partyhop_platformer::PlatformerSimulation;
use partyhop_platformer::autopilot::Autopilot;

use crate::config::RunnerConfig;
use crate::error::{AppError, LoopError};
use crate::game_loop::{ChannelRenderer, FrameLoopHandle, LoopSummary, spawn_frame_loop};

/// How the game screen was left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Completed,
    Skipped,
}

/// Result of a headless run through every screen.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: GameOutcome,
    pub loop_summary: LoopSummary,
    pub gift_id: String,
}

/// Walk the whole screen sequence: the static screens, the platformer (driven
/// by the autopilot or skipped), the gift picker, and the final message.
pub async fn run_experience(
    config: &RunnerConfig,
    gift_override: Option<&str>,
) -> Result<RunReport, AppError> {
    let mut experience = Experience::new();
    while experience.screen() != Screen::Game {
        experience.advance()?;
    }

    let game = PlatformerSimulation::with_config(config.platformer.clone(), config.window.viewport());
    let meta = game.metadata();
    tracing::info!(name = %meta.name, description = %meta.description, "Game intro");

    let (outcome, loop_summary) = play(game, config).await?;
    experience.finish_game()?;

    let carousel = GiftCarousel::default();
    let gift_id = gift_override
        .or(config.demo.gift.as_deref())
        .unwrap_or(carousel.current().id)
        .to_string();
    experience.select_gift(&gift_id)?;

    Ok(RunReport {
        outcome,
        loop_summary,
        gift_id,
    })
}

async fn play(
    game: PlatformerSimulation,
    config: &RunnerConfig,
) -> Result<(GameOutcome, LoopSummary), LoopError> {
    let (renderer, mut frames) = ChannelRenderer::new();
    let (done_tx, mut done_rx) = oneshot::channel::<()>();
    let handle = spawn_frame_loop(game, config.frame_loop.clone(), renderer, move || {
        let _ = done_tx.send(());
    });

    if !config.demo.autopilot {
        tracing::info!("Autopilot disabled, skipping the game");
        let summary = handle.stop().await?;
        return Ok((GameOutcome::Skipped, summary));
    }

    handle.start()?;
    let mut pilot = Autopilot::new();
    let mut held = InputState::default();
    let deadline = tokio::time::sleep(Duration::from_secs(config.demo.timeout_secs));
    tokio::pin!(deadline);

    let outcome = loop {
        tokio::select! {
            biased;
            done = &mut done_rx => {
                break match done {
                    Ok(()) => GameOutcome::Completed,
                    Err(_) => GameOutcome::Skipped,
                };
            }
            () = &mut deadline => {
                tracing::warn!(
                    timeout_secs = config.demo.timeout_secs,
                    stage = pilot.stage(),
                    "Autopilot did not finish in time, skipping"
                );
                break GameOutcome::Skipped;
            }
            snapshot = frames.recv() => {
                let Some(snapshot) = snapshot else {
                    break GameOutcome::Skipped;
                };
                let next = pilot.next_input(&snapshot);
                sync_controls(&handle, held, next)?;
                held = next;
            }
        }
    };

    let summary = handle.stop().await?;
    Ok((outcome, summary))
}

/// Send the press/release commands that turn `held` into `next`, the way a
/// keyboard would.
fn sync_controls(
    handle: &FrameLoopHandle,
    held: InputState,
    next: InputState,
) -> Result<(), LoopError> {
    let pairs = [
        (Control::Left, held.left, next.left),
        (Control::Right, held.right, next.right),
        (Control::Jump, held.jump, next.jump),
    ];
    for (control, was, now) in pairs {
        match (was, now) {
            (false, true) => handle.press(control, ControlSource::Keyboard)?,
            (true, false) => handle.release(control, ControlSource::Keyboard)?,
            _ => {},
        }
    }
    Ok(())
}
