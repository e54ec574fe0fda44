//! Serial request queue with a minimum spacing between dispatches.
//!
//! Every call to the generative endpoint goes through a [`Throttler`]. Actions
//! are queued in submission order and run one at a time by a single worker
//! task, which owns the queue and the timestamp of the last dispatch. Callers
//! only hold a cheap handle and await the outcome of their own action.

use std::{future::Future, pin::Pin, time::Duration};

use serde::Deserialize;
use tokio::{
    sync::{mpsc, oneshot},
    time::{sleep_until, Instant},
};
use tracing::{debug, error};

use super::deserialize_duration;
use crate::framework::Error;

const THROTTLE_MIN_SPAN_MILLIS: u64 = 1_000;

type Job = Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send>;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_duration")]
    pub min_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(THROTTLE_MIN_SPAN_MILLIS),
        }
    }
}

struct Throttle {
    last_action: Option<Instant>,
    min_delay: Duration,
}

impl Throttle {
    fn new(min_delay: Duration) -> Throttle {
        Throttle {
            last_action: None,
            min_delay,
        }
    }

    async fn wait_turn(&mut self) {
        if let Some(last) = self.last_action {
            sleep_until(last + self.min_delay).await;
        }

        self.last_action = Some(Instant::now());
    }
}

/// Handle to the request queue. Clones share the same queue and worker.
#[derive(Clone)]
pub struct Throttler {
    queue: mpsc::UnboundedSender<Job>,
    min_interval: Duration,
}

impl Throttler {
    /// Spawns the queue worker on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn new(min_interval: Duration) -> Self {
        let (queue, pending) = mpsc::unbounded_channel();

        tokio::spawn(drain(pending, Throttle::new(min_interval)));

        Self {
            queue,
            min_interval,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Enqueues `action` right away and returns a future for its outcome.
    ///
    /// The action runs once its turn comes, even if the returned future is
    /// dropped in the meantime. If the action panics, or the worker is gone,
    /// the outcome is [`Error::ThrottlerClosed`].
    pub fn submit<T, F, Fut>(&self, action: F) -> impl Future<Output = Result<T, Error>> + Send
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, Error>> + Send + 'static,
    {
        let (reply, outcome) = oneshot::channel();

        let job: Job = Box::new(move || {
            Box::pin(async move {
                let result = action().await;

                if reply.send(result).is_err() {
                    debug!("caller stopped waiting, dropping throttled result");
                }
            })
        });

        let accepted = self.queue.send(job).is_ok();

        async move {
            if !accepted {
                return Err(Error::ThrottlerClosed);
            }

            outcome.await.map_err(|_| Error::ThrottlerClosed)?
        }
    }
}

impl From<Config> for Throttler {
    fn from(value: Config) -> Self {
        Throttler::new(value.min_interval)
    }
}

async fn drain(mut pending: mpsc::UnboundedReceiver<Job>, mut throttle: Throttle) {
    while let Some(job) = pending.recv().await {
        throttle.wait_turn().await;

        debug!("dispatching throttled request");

        // a panicking action drops its reply handle, which settles the caller
        if let Err(err) = tokio::spawn(job()).await {
            error!("throttled request aborted: {}", err);
        }
    }

    debug!("throttler queue closed");
}
