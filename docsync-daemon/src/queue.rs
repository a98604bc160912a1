//! Multi-producer, single-consumer FIFO of [`ChangeEvent`]s with an
//! observable depth counter.
//!
//! Unbounded: producers never block. The depth is an approximation that is
//! exact whenever no push or pop is in flight.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use docsync_core::ChangeEvent;

use crate::error::DaemonError;

/// Create a connected sink/receiver pair.
pub fn event_queue() -> (EventSink, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let depth = Arc::new(AtomicUsize::new(0));
    (
        EventSink {
            tx,
            depth: depth.clone(),
        },
        EventReceiver { rx, depth },
    )
}

/// Producer handle. Cheap to clone; safe to use from any thread.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<ChangeEvent>,
    depth: Arc<AtomicUsize>,
}

impl EventSink {
    pub fn push(&self, event: ChangeEvent) -> Result<(), DaemonError> {
        self.depth.fetch_add(1, Ordering::SeqCst);
        self.tx.send(event).map_err(|_| {
            self.depth.fetch_sub(1, Ordering::SeqCst);
            DaemonError::ChannelClosed("event queue")
        })
    }

    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Result of a bounded-wait pop.
#[derive(Debug, PartialEq, Eq)]
pub enum Pop {
    Event(ChangeEvent),
    /// Nothing arrived within the wait.
    Timeout,
    /// Every sink has been dropped and the queue is drained.
    Closed,
}

/// Consumer handle, owned by the dispatcher.
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::UnboundedReceiver<ChangeEvent>,
    depth: Arc<AtomicUsize>,
}

impl EventReceiver {
    /// Wait up to `wait` for the next event.
    pub async fn pop(&mut self, wait: Duration) -> Pop {
        match tokio::time::timeout(wait, self.rx.recv()).await {
            Ok(Some(event)) => {
                self.depth.fetch_sub(1, Ordering::SeqCst);
                Pop::Event(event)
            }
            Ok(None) => Pop::Closed,
            Err(_) => Pop::Timeout,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsync_core::EventKind;

    #[tokio::test]
    async fn fifo_order_and_depth() {
        let (sink, mut rx) = event_queue();
        for name in ["a.rs", "b.rs", "c.rs"] {
            sink.push(ChangeEvent::new(name, EventKind::Modified)).expect("push");
        }
        assert_eq!(sink.depth(), 3);

        let Pop::Event(first) = rx.pop(Duration::from_millis(10)).await else {
            panic!("expected event");
        };
        assert_eq!(first.path.to_str(), Some("a.rs"));
        assert_eq!(rx.depth(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_queue_times_out() {
        let (_sink, mut rx) = event_queue();
        assert_eq!(rx.pop(Duration::from_secs(1)).await, Pop::Timeout);
    }

    #[tokio::test]
    async fn dropped_sinks_close_after_drain() {
        let (sink, mut rx) = event_queue();
        sink.push(ChangeEvent::new("a.rs", EventKind::Created)).expect("push");
        drop(sink);
        assert!(matches!(rx.pop(Duration::from_millis(10)).await, Pop::Event(_)));
        assert_eq!(rx.pop(Duration::from_millis(10)).await, Pop::Closed);
    }

    #[tokio::test]
    async fn push_after_receiver_dropped_fails() {
        let (sink, rx) = event_queue();
        drop(rx);
        let err = sink.push(ChangeEvent::new("a.rs", EventKind::Created)).unwrap_err();
        assert!(matches!(err, DaemonError::ChannelClosed(_)));
        assert_eq!(sink.depth(), 0);
    }

    #[test]
    fn sink_pushes_from_plain_threads() {
        let (sink, mut rx) = event_queue();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let sink = sink.clone();
                std::thread::spawn(move || {
                    sink.push(ChangeEvent::new(format!("{i}.rs"), EventKind::Modified))
                        .expect("push");
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("join");
        }
        assert_eq!(sink.depth(), 4);
        let popped = tokio_test::block_on(async {
            let mut n = 0;
            while let Pop::Event(_) = rx.pop(Duration::from_millis(10)).await {
                n += 1;
                if n == 4 {
                    break;
                }
            }
            n
        });
        assert_eq!(popped, 4);
    }
}
