//! Sample sources and the latest-value hand-off
//!
//! A producer task pulls samples from a [`SampleSource`] at its sampling rate
//! and publishes each one into a single-slot cell. The transmitter reads the
//! most recent value whenever it ticks; older values are overwritten, never
//! queued.

mod sine;

pub use self::sine::SineWave;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::core::{sampling_period, Result};

/// A generator of scalar samples at a fixed rate
pub trait SampleSource: Send {
    /// Samples produced per second
    fn sample_rate(&self) -> f64;

    /// Produces the next sample
    fn next_sample(&mut self) -> f32;
}

/// Creates a latest-sample cell, initially empty
pub fn latest_sample() -> (SamplePublisher, SampleReader) {
    let (tx, rx) = watch::channel(None);
    (SamplePublisher { tx }, SampleReader { rx })
}

/// Writing half of the latest-sample cell
#[derive(Debug)]
pub struct SamplePublisher {
    tx: watch::Sender<Option<f32>>,
}

impl SamplePublisher {
    /// Replaces the current sample
    pub fn publish(&self, sample: f32) {
        self.tx.send_replace(Some(sample));
    }
}

/// Reading half of the latest-sample cell
#[derive(Debug, Clone)]
pub struct SampleReader {
    rx: watch::Receiver<Option<f32>>,
}

impl SampleReader {
    /// Most recently published sample, if any
    pub fn latest(&self) -> Option<f32> {
        *self.rx.borrow()
    }
}

/// Runs a producer until cancelled, publishing one sample per sampling period.
///
/// Cancellation is checked once per period. Fails before publishing anything
/// if the source's rate has no usable period.
pub async fn run_producer<S>(
    mut source: S,
    publisher: SamplePublisher,
    cancel: CancellationToken,
) -> Result<()>
where
    S: SampleSource,
{
    let period = sampling_period(source.sample_rate())?;
    info!(rate = source.sample_rate(), ?period, "Sample producer started");

    let mut produced = 0u64;
    while !cancel.is_cancelled() {
        publisher.publish(source.next_sample());
        produced += 1;
        tokio::time::sleep(period).await;
    }

    debug!(produced, "Sample producer stopped");
    Ok(())
}
