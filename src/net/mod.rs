//! Connection contract between the simulation core and the transport layer
//!
//! The core never touches sockets. Whatever carries the session (WebSocket,
//! WebTransport, an in-process bot) implements [`Connection`] and receives
//! the few events the simulation emits.

/// Events the simulation pushes to a client connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The player's tank was destroyed or the session was evicted
    Death,
}

/// Transport-side handle for one client session
pub trait Connection: Send {
    /// Deliver a game event to the client
    fn notify(&mut self, event: SessionEvent);
    /// Tear the connection down; no further events will be sent
    fn terminate(&mut self);
}

/// Connection that discards everything, for headless and scripted sessions
#[derive(Debug, Default)]
pub struct NullConnection;

impl Connection for NullConnection {
    fn notify(&mut self, _event: SessionEvent) {}
    fn terminate(&mut self) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{Connection, SessionEvent};
    use std::sync::{Arc, Mutex};

    /// Connection double that records everything the core sends it
    #[derive(Debug, Clone, Default)]
    pub struct RecordingConnection {
        pub events: Arc<Mutex<Vec<SessionEvent>>>,
        pub terminated: Arc<Mutex<bool>>,
    }

    impl RecordingConnection {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn death_count(&self) -> usize {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|e| **e == SessionEvent::Death)
                .count()
        }

        pub fn is_terminated(&self) -> bool {
            *self.terminated.lock().unwrap()
        }
    }

    impl Connection for RecordingConnection {
        fn notify(&mut self, event: SessionEvent) {
            self.events.lock().unwrap().push(event);
        }

        fn terminate(&mut self) {
            *self.terminated.lock().unwrap() = true;
        }
    }
}
