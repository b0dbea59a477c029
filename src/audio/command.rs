use std::process::{
    Command,
    Stdio,
};

use super::SpeechPlayer;
use crate::core::ShiziError;

/// espeak-ng ships Mandarin voices on the platforms we target and takes
/// the text as a plain argument.
const DEFAULT_PROGRAM: &str = "espeak-ng";
const DEFAULT_ARGS: &[&str] = &["-v", "cmn"];

/// Text-to-speech through an external command, one invocation per cue.
///
/// The command runs to completion on the task worker thread, so `play`
/// returning is the completion signal.
pub struct CommandSpeech {
    program: String,
    args: Vec<String>,
}

impl CommandSpeech {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }
}

impl Default for CommandSpeech {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM, DEFAULT_ARGS.iter().map(|s| s.to_string()).collect())
    }
}

impl SpeechPlayer for CommandSpeech {
    fn play(&self, text: &str) -> Result<(), ShiziError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| {
                ShiziError::AudioPlayback(format!("failed to launch {}: {}", self.program, e))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ShiziError::AudioPlayback(format!("{} exited with {}", self.program, status)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_a_playback_error() {
        let player = CommandSpeech::new("shizi-no-such-tts-binary", Vec::new());
        let result = player.play("你好");
        assert!(matches!(result, Err(ShiziError::AudioPlayback(_))));
    }

    #[test]
    fn true_command_counts_as_completed() {
        // `true` ignores its arguments and exits zero, standing in for a
        // player that finished the cue.
        let player = CommandSpeech::new("true", Vec::new());
        assert!(player.play("你好").is_ok());
    }
}
