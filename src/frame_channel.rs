//! Producer/consumer frame hand-off
//!
//! A fixed-capacity FIFO between the capture producer and the encode
//! consumer. Neither side ever blocks: a put against a full channel fails
//! and the caller discards the frame (capture cadence is worth more than
//! completeness under encoder backpressure), and a take against an empty
//! channel reports empty.

use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};

use crate::capture::FrameBuffer;

/// Create a frame channel holding at most `capacity` frames.
pub fn bounded(capacity: usize) -> (FrameSender, FrameReceiver) {
    let (tx, rx) = crossbeam_channel::bounded(capacity);
    (FrameSender { tx }, FrameReceiver { rx })
}

/// Writing half, owned by the capture producer.
#[derive(Clone)]
pub struct FrameSender {
    tx: Sender<FrameBuffer>,
}

impl FrameSender {
    /// Enqueue a frame, transferring ownership to the consumer. Returns
    /// false when the channel is at capacity; the frame is dropped and the
    /// channel content is left unchanged.
    pub fn try_put(&self, frame: FrameBuffer) -> bool {
        match self.tx.try_send(frame) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Reading half, owned by the encode consumer.
pub struct FrameReceiver {
    rx: Receiver<FrameBuffer>,
}

impl FrameReceiver {
    /// Remove and return the oldest frame, or None when the channel is
    /// empty. Never blocks.
    pub fn try_take(&self) -> Option<FrameBuffer> {
        match self.rx.try_recv() {
            Ok(frame) => Some(frame),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Frames tagged through the width field so order is observable.
    fn frame(id: u32) -> FrameBuffer {
        FrameBuffer {
            data: Vec::new(),
            width: id,
            height: 0,
            stride: 0,
        }
    }

    #[test]
    fn takes_preserve_put_order() {
        let (tx, rx) = bounded(10);
        for id in 0..5 {
            assert!(tx.try_put(frame(id)));
        }
        for id in 0..5 {
            assert_eq!(rx.try_take().unwrap().width, id);
        }
        assert!(rx.try_take().is_none());
    }

    #[test]
    fn put_beyond_capacity_fails_and_content_is_unchanged() {
        let (tx, rx) = bounded(100);
        for id in 0..100 {
            assert!(tx.try_put(frame(id)));
        }

        // The 101st put is rejected, not queued.
        assert!(!tx.try_put(frame(100)));

        // The oldest of the original 100 is still first out.
        assert_eq!(rx.try_take().unwrap().width, 0);
        let mut remaining = 0;
        while let Some(f) = rx.try_take() {
            remaining += 1;
            assert!(f.width < 100);
        }
        assert_eq!(remaining, 99);
    }

    #[test]
    fn take_after_drain_reports_empty_without_blocking() {
        let (tx, rx) = bounded(2);
        assert!(rx.try_take().is_none());
        assert!(tx.try_put(frame(1)));
        assert!(rx.try_take().is_some());
        assert!(rx.try_take().is_none());
    }

    #[test]
    fn capacity_frees_up_after_takes() {
        let (tx, rx) = bounded(2);
        assert!(tx.try_put(frame(1)));
        assert!(tx.try_put(frame(2)));
        assert!(!tx.try_put(frame(3)));
        assert_eq!(rx.try_take().unwrap().width, 1);
        assert!(tx.try_put(frame(4)));
        assert_eq!(rx.try_take().unwrap().width, 2);
        assert_eq!(rx.try_take().unwrap().width, 4);
    }
}
