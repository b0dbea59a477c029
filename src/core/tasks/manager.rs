use std::{
    sync::{
        atomic::{
            AtomicBool,
            Ordering,
        },
        mpsc,
        Arc,
    },
    thread,
    time::Duration,
};

use tokio::runtime::Runtime;

use super::{
    TaskHandle,
    TaskResult,
};
use crate::audio::SpeechPlayer;

/// Runs deferred effects (audio cues, the post-answer delay) on worker
/// threads and reports back over a channel the driver polls.
///
/// Core state is never touched from here; workers only send results,
/// keeping every ledger/progress mutation on the session thread.
pub struct TaskManager {
    runtime: Arc<Runtime>,
    receiver: mpsc::Receiver<TaskResult>,
    sender: mpsc::Sender<TaskResult>,
}

impl TaskManager {
    pub fn new() -> Self {
        let runtime = Arc::new(Runtime::new().expect("Failed to create TaskManager runtime"));

        let (sender, receiver) = mpsc::channel();

        Self { runtime, receiver, sender }
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }

        results
    }

    fn task_context(&self) -> (mpsc::Sender<TaskResult>, Arc<Runtime>) {
        (self.sender.clone(), self.runtime.clone())
    }

    /// Speak `text` on a worker thread. Completion or failure comes back
    /// as `TaskResult::AudioFinished`; playback errors never abort a round.
    pub fn play_audio(&self, player: Arc<dyn SpeechPlayer>, text: String) {
        let (sender, _) = self.task_context();

        thread::spawn(move || {
            let result = player.play(&text).map_err(|e| e.to_string());
            let _ = sender.send(TaskResult::AudioFinished(result));
        });
    }

    /// Schedule the next-round advance after a feedback delay.
    ///
    /// The returned handle lets the driver supersede a pending advance
    /// (last-scheduled wins); a cancelled task sends nothing.
    pub fn schedule_advance(&self, delay: Duration) -> TaskHandle {
        let (sender, runtime) = self.task_context();

        let cancel_token = Arc::new(AtomicBool::new(false));
        let token = cancel_token.clone();

        let join_handle = thread::spawn(move || {
            runtime.block_on(async {
                tokio::time::sleep(delay).await;
            });

            if !token.load(Ordering::Relaxed) {
                let _ = sender.send(TaskResult::AdvanceRound);
            }
        });

        TaskHandle::new(cancel_token, join_handle)
    }
}

impl Default for TaskManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::audio::SilentPlayer;

    #[test]
    fn audio_completion_is_reported() {
        let mut manager = TaskManager::new();
        manager.play_audio(Arc::new(SilentPlayer), "你好".to_string());

        let mut results = Vec::new();
        for _ in 0..50 {
            results = manager.poll_results();
            if !results.is_empty() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }

        assert!(matches!(results.as_slice(), [TaskResult::AudioFinished(Ok(()))]));
    }

    #[test]
    fn cancelled_advance_sends_nothing() {
        let mut manager = TaskManager::new();
        let handle = manager.schedule_advance(Duration::from_millis(20));
        handle.cancel();

        thread::sleep(Duration::from_millis(80));
        assert!(manager.poll_results().is_empty());
        assert!(handle.is_finished());
    }

    #[test]
    fn advance_arrives_after_delay() {
        let mut manager = TaskManager::new();
        let _handle = manager.schedule_advance(Duration::from_millis(10));

        let mut results = Vec::new();
        for _ in 0..50 {
            results = manager.poll_results();
            if !results.is_empty() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }

        assert!(matches!(results.as_slice(), [TaskResult::AdvanceRound]));
    }
}
