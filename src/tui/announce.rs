use std::time::{Duration, Instant};

/// How long an announcement stays in the status row
pub const ANNOUNCE_TTL: Duration = Duration::from_secs(4);

/// Transient status-row messages, newest wins.
///
/// Every message is also written to the log so the transition trail
/// survives after it fades from the screen.
#[derive(Debug)]
pub struct Announcer {
    current: Option<(String, Instant)>,
    ttl: Duration,
    /// Set for messages that should read as a failure (red)
    pub is_error: bool,
}

impl Default for Announcer {
    fn default() -> Self {
        Announcer::new(ANNOUNCE_TTL)
    }
}

impl Announcer {
    pub fn new(ttl: Duration) -> Self {
        Announcer {
            current: None,
            ttl,
            is_error: false,
        }
    }

    pub fn announce(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(announcement = %message);
        self.current = Some((message, Instant::now()));
        self.is_error = false;
    }

    pub fn announce_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(announcement = %message);
        self.current = Some((message, Instant::now()));
        self.is_error = true;
    }

    /// Drop the message once it has been visible for the TTL.
    pub fn tick(&mut self, now: Instant) {
        if let Some((_, at)) = &self.current
            && now.duration_since(*at) >= self.ttl
        {
            self.current = None;
            self.is_error = false;
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_ref().map(|(m, _)| m.as_str())
    }

    pub fn dismiss(&mut self) {
        self.current = None;
        self.is_error = false;
    }
}
