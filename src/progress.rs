// Progress observers for document translation
//
// The batch coordinator reports `(done, total)` after every batch. Observers
// only watch; nothing they do affects the translation result.

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// Receives completion counts as batches resolve
pub trait ProgressReporter: Send + Sync {
    /// Called after each batch with the number of cues finished so far
    fn report(&self, done: usize, total: usize);

    /// Called once after the last batch
    fn finish(&self) {}
}

/// Discards all progress
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _done: usize, _total: usize) {}
}

/// Terminal progress bar
pub struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} Translating [{bar:40.cyan/blue}] {pos}/{len} cues ({eta})")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        Self { bar }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&self, done: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(done as u64);
    }

    fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}

/// One progress update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub done: usize,
    pub total: usize,
}

/// Forwards progress over a channel so a caller can subscribe from another task
pub struct ChannelProgress {
    sender: UnboundedSender<ProgressEvent>,
}

impl ChannelProgress {
    pub fn new() -> (Self, UnboundedReceiver<ProgressEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl ProgressReporter for ChannelProgress {
    fn report(&self, done: usize, total: usize) {
        if self.sender.send(ProgressEvent { done, total }).is_err() {
            debug!("Progress receiver dropped at {}/{}", done, total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_progress_forwards_events() {
        let (progress, mut receiver) = ChannelProgress::new();
        progress.report(20, 45);
        progress.report(45, 45);
        progress.finish();

        assert_eq!(receiver.try_recv().unwrap(), ProgressEvent { done: 20, total: 45 });
        assert_eq!(receiver.try_recv().unwrap(), ProgressEvent { done: 45, total: 45 });
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_channel_progress_survives_dropped_receiver() {
        let (progress, receiver) = ChannelProgress::new();
        drop(receiver);
        progress.report(1, 2);
    }

    #[test]
    fn test_console_progress_tracks_position() {
        let progress = ConsoleProgress::new();
        progress.report(20, 45);
        assert_eq!(progress.bar.position(), 20);
        assert_eq!(progress.bar.length(), Some(45));
        progress.finish();
    }
}
