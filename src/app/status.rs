//! User-facing status line with a one-shot delayed clear
//!
//! The clear timer is the only asynchronous piece of the application. It is
//! spawned on the ambient tokio runtime when there is one; without a runtime
//! the success message simply stays until replaced.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::ports::{StatusLevel, StatusPort};

/// How long "Finished Exporting" stays up
pub const FINISHED_CLEAR_DELAY: Duration = Duration::from_secs(5);

/// A message in the status area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub level: StatusLevel,
    pub message: String,
}

#[derive(Default)]
struct BoardState {
    line: Option<StatusLine>,
    busy: Option<String>,
    pending_clear: Option<JoinHandle<()>>,
    // Bumped on every change so a stale timer never clears a newer line
    generation: u64,
}

impl BoardState {
    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending_clear.take() {
            handle.abort();
        }
    }

    fn replace(&mut self, line: Option<StatusLine>) {
        self.generation += 1;
        self.line = line;
    }
}

/// Status area shared by the interactors
#[derive(Clone)]
pub struct StatusBoard {
    state: Arc<Mutex<BoardState>>,
    clear_delay: Duration,
    echo: bool,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBoard {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(BoardState::default())),
            clear_delay: FINISHED_CLEAR_DELAY,
            echo: false,
        }
    }

    /// Also print every status change to stderr
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn with_clear_delay(mut self, delay: Duration) -> Self {
        self.clear_delay = delay;
        self
    }

    /// Current status line, if any
    pub fn current(&self) -> Option<StatusLine> {
        self.lock().line.clone()
    }

    /// Label of the busy indicator while it is shown
    pub fn busy(&self) -> Option<String> {
        self.lock().busy.clone()
    }

    /// Whether a delayed clear is still waiting to fire
    pub fn has_pending_clear(&self) -> bool {
        self.lock()
            .pending_clear
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, level: StatusLevel, message: &str) {
        match level {
            StatusLevel::Info => info!(status = %message, "Status"),
            StatusLevel::Warning => warn!(status = %message, "Status"),
            StatusLevel::Error => error!(status = %message, "Status"),
        }
        if self.echo {
            let prefix = match level {
                StatusLevel::Info => "",
                StatusLevel::Warning => "warning: ",
                StatusLevel::Error => "error: ",
            };
            eprintln!("{}{}", prefix, message);
        }
    }

    fn schedule_clear(&self, state: &mut BoardState) {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => return,
        };

        let generation = state.generation;
        let shared = Arc::clone(&self.state);
        let delay = self.clear_delay;
        state.pending_clear = Some(handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = shared
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if state.generation == generation {
                state.line = None;
                state.pending_clear = None;
            }
        }));
    }
}

impl StatusPort for StatusBoard {
    fn show(&self, level: StatusLevel, message: &str) {
        self.emit(level, message);
        self.lock().replace(Some(StatusLine {
            level,
            message: message.to_string(),
        }));
    }

    fn clear(&self) {
        let mut state = self.lock();
        state.cancel_pending();
        state.replace(None);
    }

    fn begin_busy(&self, label: &str) {
        self.emit(StatusLevel::Info, label);
        let mut state = self.lock();
        state.cancel_pending();
        state.busy = Some(label.to_string());
    }

    fn end_busy(&self) {
        self.lock().busy = None;
    }

    fn finished(&self, message: &str) {
        self.emit(StatusLevel::Info, message);
        let mut state = self.lock();
        state.cancel_pending();
        state.replace(Some(StatusLine {
            level: StatusLevel::Info,
            message: message.to_string(),
        }));
        self.schedule_clear(&mut state);
    }
}
