//! Progress channel implementation using crossbeam-channel.
//!
//! Carries the ordered stream of [`ScanProgress`] states from the scan
//! worker thread to whatever layer is presenting it.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::ScanProgress;

/// Sends progress states from the scan pipeline.
///
/// Thin wrapper around crossbeam's Sender so it can be cloned and moved
/// into the worker thread.
#[derive(Clone)]
pub struct ProgressSender {
    inner: Sender<ScanProgress>,
}

impl ProgressSender {
    /// Publish a progress state.
    ///
    /// If the receiver has been dropped the state is silently discarded,
    /// which lets the pipeline run without a subscriber.
    pub fn send(&self, progress: ScanProgress) {
        let _ = self.inner.send(progress);
    }
}

/// Receives progress states from the scan pipeline.
pub struct ProgressReceiver {
    inner: Receiver<ScanProgress>,
}

impl ProgressReceiver {
    /// Block until the next state is received
    pub fn recv(&self) -> Option<ScanProgress> {
        self.inner.recv().ok()
    }

    /// Try to receive a state without blocking
    pub fn try_recv(&self) -> Option<ScanProgress> {
        self.inner.try_recv().ok()
    }

    /// Returns an iterator over received states
    pub fn iter(&self) -> impl Iterator<Item = ScanProgress> + '_ {
        self.inner.iter()
    }
}

/// Create a new unbounded progress channel.
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    let (sender, receiver) = unbounded();
    (
        ProgressSender { inner: sender },
        ProgressReceiver { inner: receiver },
    )
}

/// A no-op sender for when progress reporting is not needed (e.g. tests).
pub fn null_sender() -> ProgressSender {
    let (sender, _receiver) = progress_channel();
    sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn states_can_be_sent_across_threads() {
        let (sender, receiver) = progress_channel();

        let handle = thread::spawn(move || {
            sender.send(ScanProgress::Scanning {
                processed: 100,
                total: 500,
            });
        });
        handle.join().unwrap();

        match receiver.recv().unwrap() {
            ScanProgress::Scanning { processed, total } => {
                assert_eq!(processed, 100);
                assert_eq!(total, 500);
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn null_sender_does_not_panic() {
        let sender = null_sender();
        sender.send(ScanProgress::Idle);
    }

    #[test]
    fn channel_preserves_order() {
        let (sender, receiver) = progress_channel();
        for processed in [10, 20, 30] {
            sender.send(ScanProgress::Hashing {
                processed,
                total: 30,
            });
        }
        drop(sender);

        let processed: Vec<usize> = receiver
            .iter()
            .map(|p| match p {
                ScanProgress::Hashing { processed, .. } => processed,
                other => panic!("unexpected state: {other:?}"),
            })
            .collect();
        assert_eq!(processed, vec![10, 20, 30]);
    }
}
