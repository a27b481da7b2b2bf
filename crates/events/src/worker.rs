//! Generic background consumer loop.
//!
//! A `Worker` drains a bus subscription on its own thread so the publishing
//! side (the ledger's write path) never waits on the handler. Handlers run
//! one attempt per message; failures are logged and the loop continues.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::bus::{EventBus, Subscription};

/// Handle to control and join a background worker.
#[derive(Debug)]
pub struct WorkerHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    /// Request graceful shutdown and wait for the worker to stop.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}

/// Generic event worker loop.
///
/// - Subscribes to an event bus before returning (no missed-early-message race
///   for messages published after `spawn` returns)
/// - Runs the handler once per message; the handler must tolerate duplicates
/// - Supports graceful shutdown via the returned handle
#[derive(Debug)]
pub struct Worker;

impl Worker {
    /// Spawn a worker thread that processes messages from a bus subscription.
    pub fn spawn<M, B, H, E>(name: &'static str, bus: B, mut handler: H) -> WorkerHandle
    where
        M: Send + 'static,
        B: EventBus<M> + Send + Sync + 'static,
        H: FnMut(M) -> Result<(), E> + Send + 'static,
        E: core::fmt::Debug + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let sub: Subscription<M> = bus.subscribe();

        let join = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || worker_loop(name, sub, shutdown_rx, &mut handler))
            .expect("failed to spawn event worker thread");

        WorkerHandle {
            shutdown: shutdown_tx,
            join: Some(join),
        }
    }
}

fn worker_loop<M, H, E>(
    name: &'static str,
    sub: Subscription<M>,
    shutdown_rx: mpsc::Receiver<()>,
    handler: &mut H,
) where
    H: FnMut(M) -> Result<(), E>,
    E: core::fmt::Debug,
{
    let tick = Duration::from_millis(250);

    loop {
        // Shutdown check (non-blocking)
        if shutdown_rx.try_recv().is_ok() {
            break;
        }

        match sub.recv_timeout(tick) {
            Ok(msg) => {
                if let Err(err) = handler(msg) {
                    warn!(worker = name, error = ?err, "event worker handler failed");
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::in_memory_bus::InMemoryEventBus;

    #[test]
    fn worker_processes_published_messages() {
        let bus: Arc<InMemoryEventBus<u32>> = Arc::new(InMemoryEventBus::new());
        let seen: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let handle = Worker::spawn("test-worker", bus.clone(), move |m: u32| {
            sink.lock().unwrap().push(m);
            Ok::<(), String>(())
        });

        bus.publish(1).unwrap();
        bus.publish(2).unwrap();

        // The worker thread processes asynchronously; give it a moment.
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while seen.lock().unwrap().len() < 2 && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }

        handle.shutdown();
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn handler_failure_does_not_stop_the_loop() {
        let bus: Arc<InMemoryEventBus<u32>> = Arc::new(InMemoryEventBus::new());
        let seen: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let handle = Worker::spawn("flaky-worker", bus.clone(), move |m: u32| {
            if m == 1 {
                return Err("boom".to_string());
            }
            sink.lock().unwrap().push(m);
            Ok(())
        });

        bus.publish(1).unwrap();
        bus.publish(2).unwrap();

        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while seen.lock().unwrap().is_empty() && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }

        handle.shutdown();
        assert_eq!(*seen.lock().unwrap(), vec![2]);
    }

    #[test]
    fn shutdown_joins_the_thread() {
        let bus: Arc<InMemoryEventBus<u32>> = Arc::new(InMemoryEventBus::new());
        let handle = Worker::spawn("idle-worker", bus, |_m: u32| Ok::<(), String>(()));
        handle.shutdown();
    }
}
