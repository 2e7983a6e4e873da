//! Sound effects
//!
//! One-shot clips keyed off game events. Clips are optional; a configured
//! clip that fails to load is a setup error.

use macroquad::audio::{load_sound, play_sound_once, Sound};
use thiserror::Error;

use crate::config::SoundPaths;
use super::event::Events;

#[derive(Debug, Error)]
#[error("failed to load sound {path}: {message}")]
pub struct SoundLoadError {
    pub path: String,
    pub message: String,
}

/// Which clip an event asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Coin,
    Jump,
    GameOver,
}

/// Drain this frame's events into the cues they trigger, in event order
/// per kind: jumps, coins, then game over.
pub fn drain_cues(events: &mut Events) -> Vec<Cue> {
    let mut cues = Vec::new();
    cues.extend(events.jump.drain().map(|_| Cue::Jump));
    cues.extend(events.coin_collected.drain().map(|_| Cue::Coin));
    cues.extend(events.game_over.drain().map(|_| Cue::GameOver));
    for done in events.level_complete.drain() {
        tracing::info!(completed = done.completed, next = done.next, "level complete");
    }
    for restart in events.run_restarted.drain() {
        tracing::info!(final_score = restart.final_score, "run over");
    }
    cues
}

#[derive(Default)]
pub struct SoundBank {
    coin: Option<Sound>,
    jump: Option<Sound>,
    game_over: Option<Sound>,
}

impl SoundBank {
    /// A bank with no clips; every cue is silent
    pub fn silent() -> Self {
        Self::default()
    }

    pub async fn load(paths: &SoundPaths) -> Result<Self, SoundLoadError> {
        Ok(Self {
            coin: load_optional(paths.coin.as_deref()).await?,
            jump: load_optional(paths.jump.as_deref()).await?,
            game_over: load_optional(paths.game_over.as_deref()).await?,
        })
    }

    fn clip(&self, cue: Cue) -> Option<&Sound> {
        match cue {
            Cue::Coin => self.coin.as_ref(),
            Cue::Jump => self.jump.as_ref(),
            Cue::GameOver => self.game_over.as_ref(),
        }
    }

    /// Play the clip for every event raised this frame and empty the queues
    pub fn play_events(&self, events: &mut Events) {
        for cue in drain_cues(events) {
            if let Some(sound) = self.clip(cue) {
                play_sound_once(sound);
            }
        }
    }
}

async fn load_optional(path: Option<&str>) -> Result<Option<Sound>, SoundLoadError> {
    let Some(path) = path else {
        return Ok(None);
    };
    match load_sound(path).await {
        Ok(sound) => {
            tracing::debug!(path, "loaded sound");
            Ok(Some(sound))
        }
        Err(e) => Err(SoundLoadError {
            path: path.to_string(),
            message: e.to_string(),
        }),
    }
}
