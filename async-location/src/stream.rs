//! Monitor streams returned by the `start_*` methods.
//!
//! A [`MonitorStream`] owns the receiving end of a stream performer. When it
//! is stopped or dropped its teardown runs exactly once: the performer is
//! cancelled and, if no other live monitor still needs it, the matching
//! platform activity is stopped.

use std::fmt;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use location_proxy::{DelegateProxy, Interest, LocationEvent, PerformerId};
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::platform::{stop_activity, LocationPlatform};

/// What to undo when a monitor stream goes away
pub(crate) struct Teardown {
    proxy: Arc<DelegateProxy>,
    platform: Arc<dyn LocationPlatform>,
    activity: Arc<Mutex<()>>,
    interest: Interest,
}

impl Teardown {
    pub(crate) fn new(
        proxy: Arc<DelegateProxy>,
        platform: Arc<dyn LocationPlatform>,
        activity: Arc<Mutex<()>>,
        interest: Interest,
    ) -> Self {
        Self {
            proxy,
            platform,
            activity,
            interest,
        }
    }

    fn run(&self, id: PerformerId) {
        // Held until the platform stop returns so a concurrent start cannot
        // register in between and then lose its activity.
        let _activity = self.activity.lock();

        // Already removed by a `stop_*` call, which stopped the platform side itself.
        if !self.proxy.cancel(id) {
            return;
        }

        let performer_type = self.interest.performer_type();
        if self
            .proxy
            .has_matching(performer_type, |other| other.same_activity(&self.interest))
        {
            tracing::debug!(
                "{} torn down; platform activity kept for other {:?} monitors",
                id,
                performer_type
            );
            return;
        }

        stop_activity(self.platform.as_ref(), &self.interest);
    }
}

/// Stream of typed monitor events
///
/// Yields events in the order the platform delivered them. Ends after
/// [`stop`](MonitorStream::stop) or when the performer is cancelled elsewhere.
pub struct MonitorStream<T> {
    id: PerformerId,
    receiver: mpsc::UnboundedReceiver<LocationEvent>,
    teardown: Teardown,
    stopped: AtomicBool,
    _event: PhantomData<fn() -> T>,
}

impl<T> MonitorStream<T> {
    pub(crate) fn new(
        id: PerformerId,
        receiver: mpsc::UnboundedReceiver<LocationEvent>,
        teardown: Teardown,
    ) -> Self {
        Self {
            id,
            receiver,
            teardown,
            stopped: AtomicBool::new(false),
            _event: PhantomData,
        }
    }

    /// Identifier of the performer feeding this stream.
    pub fn performer_id(&self) -> PerformerId {
        self.id
    }

    /// Stop monitoring. Idempotent.
    ///
    /// Events already delivered stay readable; the stream then ends.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }
        self.teardown.run(self.id);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

impl<T> Stream for MonitorStream<T>
where
    T: TryFrom<LocationEvent>,
{
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match this.receiver.poll_recv(cx) {
                Poll::Ready(Some(event)) => {
                    let kind = event.kind();
                    match T::try_from(event) {
                        Ok(item) => return Poll::Ready(Some(item)),
                        Err(_) => {
                            tracing::warn!("{} dropped unexpected {} event", this.id, kind);
                        }
                    }
                }
                Poll::Ready(None) => {
                    // Sender is gone: the performer was cancelled.
                    this.stop();
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl<T> Drop for MonitorStream<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<T> fmt::Debug for MonitorStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorStream")
            .field("id", &self.id)
            .field("interest", &self.teardown.interest)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
