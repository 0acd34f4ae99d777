//! The delegate proxy: registry of live performers and event switchboard.
//!
//! Registration and cancellation come from caller tasks while routing comes
//! from the platform's callback thread. All three go through one lock, and
//! deliveries happen while it is held, so a one-shot performer is matched,
//! resolved and removed in a single step.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::{PlatformError, ProxyError, Result};
use crate::event::{EventKind, LocationEvent};
use crate::performer::{Delivery, Interest, Performer, PerformerId, PerformerType};

/// Thread-safe registry of performers waiting for platform callbacks
#[derive(Debug, Default)]
pub struct DelegateProxy {
    performers: Mutex<HashMap<PerformerId, Performer>>,
}

impl DelegateProxy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a linked performer.
    ///
    /// Returns `Ok(false)` without touching the registry if a performer with
    /// the same identifier is already live.
    pub fn add(&self, performer: Performer) -> Result<bool> {
        let id = performer.id();
        if !performer.is_linked() {
            return Err(ProxyError::Unlinked(id));
        }

        let mut performers = self.performers.lock();
        if performers.contains_key(&id) {
            tracing::warn!("Ignoring duplicate registration of {}", id);
            return Ok(false);
        }

        tracing::debug!(
            "Registered {} ({:?}, one-shot: {})",
            id,
            performer.performer_type(),
            performer.is_one_shot()
        );
        performers.insert(id, performer);
        Ok(true)
    }

    /// Remove the performer with `id`. Idempotent.
    pub fn cancel(&self, id: PerformerId) -> bool {
        let removed = self.performers.lock().remove(&id).is_some();
        if removed {
            tracing::debug!("Cancelled {}", id);
        }
        removed
    }

    /// Remove every performer of `performer_type`.
    pub fn cancel_type(&self, performer_type: PerformerType) -> usize {
        self.cancel_where(performer_type, |_| true)
    }

    /// Remove performers of `performer_type` whose interest satisfies `predicate`.
    ///
    /// Siblings of the same type that fail the predicate stay registered.
    pub fn cancel_where<F>(&self, performer_type: PerformerType, predicate: F) -> usize
    where
        F: Fn(&Interest) -> bool,
    {
        let mut performers = self.performers.lock();
        let before = performers.len();
        performers.retain(|_, performer| {
            !(performer.performer_type() == performer_type && predicate(performer.interest()))
        });
        let removed = before - performers.len();

        if removed > 0 {
            tracing::debug!("Cancelled {} {:?} performer(s)", removed, performer_type);
        }
        removed
    }

    /// Deliver `event` to every performer it matches.
    ///
    /// One-shot performers are removed in the same critical section that
    /// resolves them. Returns the number of deliveries made; zero is the
    /// normal outcome for callbacks arriving after cancellation.
    pub fn route(&self, event: &LocationEvent) -> usize {
        let kind = event.kind();
        let delivered = self.dispatch(|performer| {
            performer
                .matches(event)
                .then(|| performer.deliver(event))
        });

        if delivered == 0 {
            tracing::trace!("No performer matched {}", kind);
        } else if kind.is_failure() {
            tracing::debug!("Routed {} to {} performer(s)", kind, delivered);
        } else {
            tracing::trace!("Routed {} to {} performer(s)", kind, delivered);
        }
        delivered
    }

    /// Deliver a failure to every performer accepting `kind`.
    ///
    /// Only the type tag is checked; stream performers shape the failure
    /// from their own refinement value.
    pub fn route_error(&self, kind: EventKind, error: PlatformError) -> usize {
        if !kind.is_failure() {
            tracing::warn!("Routing a failure under non-failure kind {}", kind);
        }
        let delivered = self.dispatch(|performer| {
            performer
                .interest()
                .accepts(kind)
                .then(|| performer.deliver_error(error.clone()))
        });

        if delivered == 0 {
            tracing::trace!("No performer accepted {} failure: {}", kind, error);
        } else {
            tracing::debug!("Routed {} failure to {} performer(s): {}", kind, delivered, error);
        }
        delivered
    }

    /// Visit every performer under the lock, dropping the ones whose
    /// delivery was terminal. `visit` returns `None` to skip a performer.
    fn dispatch<F>(&self, mut visit: F) -> usize
    where
        F: FnMut(&mut Performer) -> Option<Delivery>,
    {
        let mut performers = self.performers.lock();
        let mut delivered = 0;
        let mut finished = Vec::new();

        for (id, performer) in performers.iter_mut() {
            let Some(outcome) = visit(performer) else {
                continue;
            };
            if outcome.is_terminal() {
                finished.push(*id);
            }
            if outcome != Delivery::Disconnected {
                delivered += 1;
            }
        }

        for id in &finished {
            performers.remove(id);
        }
        delivered
    }

    /// Fail one specific performer, removing it.
    ///
    /// Used by platform calls that report errors through a completion
    /// handler rather than a delegate callback.
    pub fn fail(&self, id: PerformerId, error: PlatformError) -> bool {
        let mut performers = self.performers.lock();
        match performers.remove(&id) {
            Some(mut performer) => {
                let outcome = performer.deliver_error(error);
                if !outcome.is_terminal() {
                    // Streams survive failures.
                    performers.insert(id, performer);
                }
                outcome != Delivery::Disconnected
            }
            None => false,
        }
    }

    pub fn contains(&self, id: PerformerId) -> bool {
        self.performers.lock().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.performers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.performers.lock().is_empty()
    }

    /// Number of live performers of `performer_type`.
    pub fn count_of(&self, performer_type: PerformerType) -> usize {
        self.performers
            .lock()
            .values()
            .filter(|p| p.performer_type() == performer_type)
            .count()
    }

    /// Whether any live performer of `performer_type` satisfies `predicate`.
    pub fn has_matching<F>(&self, performer_type: PerformerType, predicate: F) -> bool
    where
        F: Fn(&Interest) -> bool,
    {
        self.performers
            .lock()
            .values()
            .any(|p| p.performer_type() == performer_type && predicate(p.interest()))
    }

    /// Snapshot of the registry contents
    pub fn stats(&self) -> ProxyStats {
        let performers = self.performers.lock();
        let mut type_breakdown = HashMap::new();
        let mut one_shot = 0;
        for performer in performers.values() {
            *type_breakdown.entry(performer.performer_type()).or_insert(0) += 1;
            if performer.is_one_shot() {
                one_shot += 1;
            }
        }

        ProxyStats {
            total_performers: performers.len(),
            one_shot_performers: one_shot,
            type_breakdown,
        }
    }
}

/// Statistics about the registry state
#[derive(Debug, Clone, Default)]
pub struct ProxyStats {
    pub total_performers: usize,
    pub one_shot_performers: usize,
    pub type_breakdown: HashMap<PerformerType, usize>,
}

impl std::fmt::Display for ProxyStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Delegate Proxy Stats:")?;
        writeln!(
            f,
            "  Total: {} ({} one-shot)",
            self.total_performers, self.one_shot_performers
        )?;
        writeln!(f, "  Type breakdown:")?;
        let mut types: Vec<_> = self.type_breakdown.iter().collect();
        types.sort();
        for (performer_type, count) in types {
            writeln!(f, "    {:?}: {}", performer_type, count)?;
        }
        Ok(())
    }
}
