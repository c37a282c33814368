//! Readiness signal between the lifecycle and search controllers.
//!
//! Only the lifecycle controller can open the gate; everything else observes
//! it. The index state itself is never shared.

use tokio::sync::watch;

/// Create a closed gate.
pub fn channel() -> (ReadyPublisher, ReadySignal) {
    let (tx, rx) = watch::channel(false);
    (ReadyPublisher { tx }, ReadySignal { rx })
}

/// Write side, owned by the lifecycle controller.
#[derive(Debug)]
pub struct ReadyPublisher {
    tx: watch::Sender<bool>,
}

impl ReadyPublisher {
    /// Open the gate. Idempotent.
    pub fn open(&self) {
        self.tx.send_replace(true);
    }

    /// Obtain another read handle.
    pub fn subscribe(&self) -> ReadySignal {
        ReadySignal {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read side, cloned into whoever needs to know.
#[derive(Debug, Clone)]
pub struct ReadySignal {
    rx: watch::Receiver<bool>,
}

impl ReadySignal {
    /// Whether the index has been confirmed ready.
    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the gate opens. Returns false if the publisher went away
    /// without opening it.
    pub async fn wait(&mut self) -> bool {
        self.rx.wait_for(|ready| *ready).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_closed() {
        let (_publisher, signal) = channel();
        assert!(!signal.is_ready());
    }

    #[test]
    fn test_open_is_visible_to_all_handles() {
        let (publisher, signal) = channel();
        let other = publisher.subscribe();
        let cloned = signal.clone();
        publisher.open();
        publisher.open();
        assert!(signal.is_ready());
        assert!(other.is_ready());
        assert!(cloned.is_ready());
    }

    #[tokio::test]
    async fn test_wait_resolves_when_opened() {
        let (publisher, mut signal) = channel();
        let waiter = tokio::spawn(async move { signal.wait().await });
        publisher.open();
        assert!(waiter.await.unwrap());
    }

    #[tokio::test]
    async fn test_wait_fails_when_publisher_dropped() {
        let (publisher, mut signal) = channel();
        drop(publisher);
        assert!(!signal.wait().await);
    }
}
