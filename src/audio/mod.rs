pub mod command;

pub use command::CommandSpeech;

use crate::core::ShiziError;

/// Speaks the target word when a round begins or on a replay request.
///
/// Playback failure is a transient condition: the caller shows a message
/// and the round carries on, the user can re-request the cue.
pub trait SpeechPlayer: Send + Sync {
    fn play(&self, text: &str) -> Result<(), ShiziError>;
}

/// No-op player for tests and `--quiet` runs.
pub struct SilentPlayer;

impl SpeechPlayer for SilentPlayer {
    fn play(&self, _text: &str) -> Result<(), ShiziError> {
        Ok(())
    }
}
