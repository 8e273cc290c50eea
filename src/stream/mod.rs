//! Streaming session module
//!
//! A session runs two tasks joined by a latest-sample cell: a producer that
//! samples the signal source at its own rate, and a transmitter that encodes
//! and sends whatever sample is newest at each packet interval. Both stop on
//! a shared cancellation token.

mod transmitter;

pub use self::transmitter::{TransmitStats, Transmitter};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::core::{Error, Result, StreamConfig};
use crate::network::{bind_multicast_sender, DatagramSink};
use crate::source::{latest_sample, run_producer, SampleSource, SineWave};
use crate::time::SessionClock;

/// Entry points for starting a streaming session
pub struct Session;

impl Session {
    /// Starts a sine-wave session sending over a UDP multicast socket built
    /// from the configuration.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: StreamConfig) -> Result<SessionHandle> {
        config.validate()?;
        let socket = bind_multicast_sender(config.bind_interface, config.multicast_ttl)?;
        Self::spawn(config, socket)
    }

    /// Starts a sine-wave session sending into `sink`
    pub fn spawn<S>(config: StreamConfig, sink: S) -> Result<SessionHandle>
    where
        S: DatagramSink + 'static,
    {
        let source = SineWave::new(
            config.signal_frequency,
            config.sample_rate,
            config.amplitude,
        );
        Self::spawn_with_source(config, source, sink)
    }

    /// Starts a session with a custom sample source
    pub fn spawn_with_source<Src, S>(
        config: StreamConfig,
        source: Src,
        sink: S,
    ) -> Result<SessionHandle>
    where
        Src: SampleSource + 'static,
        S: DatagramSink + 'static,
    {
        config.validate()?;

        let cancel = CancellationToken::new();
        let clock = SessionClock::start();
        let (publisher, samples) = latest_sample();

        info!(
            destination = %config.destination,
            data_channel = config.data_channel_id,
            time_channel = config.time_channel_id,
            "Starting session"
        );

        // The session stops with its producer, whether it fails or panics
        let producer_cancel = cancel.clone();
        let producer = tokio::spawn(async move {
            let _stop_session = producer_cancel.clone().drop_guard();
            run_producer(source, publisher, producer_cancel).await
        });
        let transmitter = Transmitter::new(config, clock, sink, samples);
        let transmitter = tokio::spawn(transmitter.run(cancel.clone()));

        Ok(SessionHandle {
            cancel,
            producer,
            transmitter,
        })
    }
}

/// Handle to a running session
#[derive(Debug)]
pub struct SessionHandle {
    cancel: CancellationToken,
    producer: JoinHandle<Result<()>>,
    transmitter: JoinHandle<Result<TransmitStats>>,
}

impl SessionHandle {
    /// Token that stops both tasks when cancelled
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Whether the transmitter task has ended
    pub fn is_finished(&self) -> bool {
        self.transmitter.is_finished()
    }

    /// Signals both tasks to stop and waits for them
    pub async fn shutdown(self) -> Result<TransmitStats> {
        self.cancel.cancel();
        self.join().await
    }

    /// Waits for the transmitter to end, then stops the producer.
    ///
    /// The transmitter ends on cancellation, on its first send failure, or
    /// when the producer stops on its own. A transmitter failure is returned
    /// first, then the producer's error. A panicked task is an invalid state.
    pub async fn join(self) -> Result<TransmitStats> {
        let transmitted = self
            .transmitter
            .await
            .map_err(|e| Error::invalid_state(format!("Transmitter task failed: {}", e)));

        self.cancel.cancel();
        let produced = match self.producer.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e),
            Err(e) => Err(Error::invalid_state(format!("Producer task failed: {}", e))),
        };
        if let Err(e) = &produced {
            warn!("{}", e);
        }

        let stats = transmitted??;
        produced?;
        info!(datagrams = stats.datagrams, "Session stopped");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::packet::decode::decode;
    use std::net::SocketAddr;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn fast_config() -> StreamConfig {
        StreamConfig {
            sample_rate: 1000.0,
            packet_interval: Duration::from_millis(20),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_session_streams_until_shutdown() {
        let (tx, mut rx) = mpsc::channel::<(Vec<u8>, SocketAddr)>(64);
        let handle = Session::spawn(fast_config(), tx).unwrap();

        let mut data_packets = 0;
        let mut time_packets = 0;
        while data_packets < 3 {
            let (datagram, _) = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .unwrap()
                .unwrap();
            match decode(&datagram[4..]).data_type {
                105 => data_packets += 1,
                17 => time_packets += 1,
                other => panic!("unexpected data type {}", other),
            }
        }
        assert!(time_packets >= 1);

        let drain = tokio::spawn(async move { while rx.recv().await.is_some() {} });
        let stats = tokio::time::timeout(Duration::from_secs(2), handle.shutdown())
            .await
            .unwrap()
            .unwrap();
        assert!(stats.data_ticks >= 3);
        drain.await.unwrap();
    }

    #[tokio::test]
    async fn test_sink_failure_ends_session() {
        let (tx, rx) = mpsc::channel::<(Vec<u8>, SocketAddr)>(1);
        drop(rx);

        let handle = Session::spawn(fast_config(), tx).unwrap();
        let err = tokio::time::timeout(Duration::from_secs(2), handle.join())
            .await
            .unwrap()
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let (tx, _rx) = mpsc::channel::<(Vec<u8>, SocketAddr)>(1);
        let config = StreamConfig {
            sample_rate: 0.0,
            ..Default::default()
        };
        assert!(matches!(Session::spawn(config, tx), Err(Error::Config(_))));

        let (tx, _rx) = mpsc::channel::<(Vec<u8>, SocketAddr)>(1);
        let config = StreamConfig {
            sample_rate: 1e-320,
            ..Default::default()
        };
        assert!(matches!(Session::spawn(config, tx), Err(Error::Config(_))));
    }

    struct FixedRate {
        rate: f64,
        panics: bool,
    }

    impl SampleSource for FixedRate {
        fn sample_rate(&self) -> f64 {
            self.rate
        }

        fn next_sample(&mut self) -> f32 {
            assert!(!self.panics, "sensor read failed");
            1.0
        }
    }

    #[tokio::test]
    async fn test_producer_rate_error_ends_session() {
        let (tx, _rx) = mpsc::channel::<(Vec<u8>, SocketAddr)>(64);
        let source = FixedRate {
            rate: 1e12,
            panics: false,
        };
        let handle = Session::spawn_with_source(fast_config(), source, tx).unwrap();

        let err = tokio::time::timeout(Duration::from_secs(2), handle.join())
            .await
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_producer_panic_is_reported() {
        let (tx, _rx) = mpsc::channel::<(Vec<u8>, SocketAddr)>(64);
        let source = FixedRate {
            rate: 100.0,
            panics: true,
        };
        let handle = Session::spawn_with_source(fast_config(), source, tx).unwrap();

        let err = tokio::time::timeout(Duration::from_secs(2), handle.join())
            .await
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_cancel_token_stops_session() {
        let (tx, mut rx) = mpsc::channel::<(Vec<u8>, SocketAddr)>(64);
        let handle = Session::spawn(fast_config(), tx).unwrap();

        handle.cancel_token().cancel();
        let drain = tokio::spawn(async move { while rx.recv().await.is_some() {} });

        tokio::time::timeout(Duration::from_secs(2), handle.join())
            .await
            .unwrap()
            .unwrap();
        drain.await.unwrap();
    }
}
