pub use super::handle::TaskHandle;

#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Audio cue finished, Err carries the player's message (non-fatal).
    AudioFinished(Result<(), String>),

    /// The post-answer feedback delay elapsed; the driver should start
    /// the next round.
    AdvanceRound,
}

impl TaskResult {
    pub fn task_type(&self) -> &'static str {
        match self {
            TaskResult::AudioFinished(_) => "audio_finished",
            TaskResult::AdvanceRound => "advance_round",
        }
    }
}
