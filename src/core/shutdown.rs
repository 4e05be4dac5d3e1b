//! Explicit cancellation token for the controller and the build watcher.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

type CancelHook = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct ShutdownFlag {
    cancelled: bool,
    hooks: Vec<CancelHook>,
}

#[derive(Default)]
struct ShutdownState {
    flag: Mutex<ShutdownFlag>,
    cvar: Condvar,
}

/// Cloneable shutdown flag. Cancelling is sticky and wakes every waiter.
#[derive(Clone, Default)]
pub struct ShutdownToken {
    state: Arc<ShutdownState>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel and run every registered hook once, on the calling thread.
    pub fn cancel(&self) {
        let hooks = {
            let mut flag = self.lock();
            flag.cancelled = true;
            self.state.cvar.notify_all();
            std::mem::take(&mut flag.hooks)
        };
        for hook in hooks {
            hook();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    /// Run `hook` when the token is cancelled, or right away if it already is.
    ///
    /// Hooks run on the cancelling thread and must not block.
    pub fn on_cancel(&self, hook: impl FnOnce() + Send + 'static) {
        let mut flag = self.lock();
        if flag.cancelled {
            drop(flag);
            hook();
        } else {
            flag.hooks.push(Box::new(hook));
        }
    }

    /// Block until cancelled.
    pub fn wait(&self) {
        let mut flag = self.lock();
        while !flag.cancelled {
            flag = self
                .state
                .cvar
                .wait(flag)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    /// Block until cancelled or `timeout` elapses. Returns whether cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut flag = self.lock();
        while !flag.cancelled {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            flag = self
                .state
                .cvar
                .wait_timeout(flag, remaining)
                .map(|(guard, _)| guard)
                .unwrap_or_else(|poisoned| poisoned.into_inner().0);
        }
        flag.cancelled
    }

    fn lock(&self) -> MutexGuard<'_, ShutdownFlag> {
        match self.state.flag.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl std::fmt::Debug for ShutdownToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
