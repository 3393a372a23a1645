//! Supersession of in-flight requests.
//!
//! Re-querying before a previous query answered makes the earlier answer
//! stale. [`RequestSequencer`] hands out increasing [`RequestTicket`]s over
//! a [`tokio::sync::watch`] channel; beginning a request supersedes every
//! older ticket, whose holders can await [`RequestTicket::superseded`] to
//! cancel their work and must not apply results once
//! [`RequestTicket::is_current`] turns false.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

/// Issues request tickets; the most recently issued one is current.
#[derive(Debug, Clone)]
pub struct RequestSequencer {
    latest: Arc<watch::Sender<u64>>,
}

impl RequestSequencer {
    /// Creates a sequencer with no request issued yet.
    #[must_use]
    pub fn new() -> Self {
        let (latest, _) = watch::channel(0);
        Self {
            latest: Arc::new(latest),
        }
    }

    /// Starts a new request, superseding all earlier ones.
    #[must_use]
    pub fn begin(&self) -> RequestTicket {
        let mut generation = 0;
        self.latest.send_modify(|current| {
            *current += 1;
            generation = *current;
        });
        RequestTicket {
            generation,
            latest: self.latest.subscribe(),
        }
    }

    /// Generation of the most recently issued ticket (0 before any).
    #[must_use]
    pub fn current(&self) -> u64 {
        *self.latest.borrow()
    }

    /// Runs `work` under a fresh ticket.
    ///
    /// Returns `None` if a newer request began before `work` finished, in
    /// which case `work` is dropped as soon as supersession is observed.
    pub async fn run_latest<F, T>(&self, work: F) -> Option<(RequestTicket, T)>
    where
        F: Future<Output = T>,
    {
        let mut ticket = self.begin();
        let out = {
            let superseded = ticket.superseded();
            tokio::select! {
                biased;
                () = superseded => None,
                out = work => Some(out),
            }
        }?;
        ticket.is_current().then_some((ticket, out))
    }
}

impl Default for RequestSequencer {
    fn default() -> Self {
        Self::new()
    }
}

/// Claim on being the latest request.
#[derive(Debug)]
pub struct RequestTicket {
    generation: u64,
    latest: watch::Receiver<u64>,
}

impl RequestTicket {
    /// Generation number of this ticket.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` while no newer request has begun.
    #[must_use]
    pub fn is_current(&self) -> bool {
        *self.latest.borrow() == self.generation
    }

    /// Resolves once a newer request begins. Never resolves if the
    /// sequencer is dropped first.
    pub async fn superseded(&mut self) {
        loop {
            if !self.is_current() {
                return;
            }
            if self.latest.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
