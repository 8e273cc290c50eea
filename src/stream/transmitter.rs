use bytes::Bytes;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::core::{Encapsulation, Error, Result, StreamConfig, MAX_DATAGRAM_SIZE};
use crate::network::DatagramSink;
use crate::protocol::{
    sub_protocol_message, Chapter11Packet, DataType, EthernetEnvelope, SequenceCounters,
    TransportFramer,
};
use crate::source::SampleReader;
use crate::time::{time_packet_payload, RelativeTimeCounter, SessionClock, WallTime};
use crate::util::HexPreview;

/// Totals reported when a transmitter stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransmitStats {
    /// Ticks that found a sample and emitted data
    pub data_ticks: u64,
    /// Time packets emitted
    pub time_packets: u64,
    /// Datagrams handed to the sink
    pub datagrams: u64,
    /// Bytes handed to the sink
    pub bytes: u64,
}

/// Consumer side of a session: encodes the latest sample on every tick.
///
/// The transmitter owns every sequence counter and the transport framer, so
/// each is driven by exactly one task.
pub struct Transmitter<S> {
    config: StreamConfig,
    clock: SessionClock,
    sink: S,
    samples: SampleReader,
    counters: SequenceCounters,
    framer: TransportFramer,
    envelope: EthernetEnvelope,
    /// Epoch second of the last time packet
    last_time_second: Option<u64>,
    stats: TransmitStats,
}

impl<S> Transmitter<S>
where
    S: DatagramSink,
{
    /// Creates a transmitter for one session
    pub fn new(config: StreamConfig, clock: SessionClock, sink: S, samples: SampleReader) -> Self {
        Transmitter {
            config,
            clock,
            sink,
            samples,
            counters: SequenceCounters::default(),
            framer: TransportFramer::new(),
            envelope: EthernetEnvelope::default(),
            last_time_second: None,
            stats: TransmitStats::default(),
        }
    }

    /// Replaces the Ethernet envelope encoder
    pub fn with_envelope(mut self, envelope: EthernetEnvelope) -> Self {
        self.envelope = envelope;
        self
    }

    /// Counters as they stand
    pub fn counters(&self) -> &SequenceCounters {
        &self.counters
    }

    /// Totals so far
    pub fn stats(&self) -> TransmitStats {
        self.stats
    }

    /// Ticks at the packet interval until cancelled.
    ///
    /// Cancellation is observed between ticks; a tick in progress always
    /// completes. A sink failure ends the loop with that error.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<TransmitStats> {
        let mut ticker = interval(self.config.packet_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of an interval completes immediately
        ticker.tick().await;

        info!(
            destination = %self.config.destination,
            sub_protocol = ?self.config.sub_protocol,
            encapsulation = ?self.config.encapsulation,
            "Transmitter started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            self.tick(WallTime::now()).await?;
        }

        info!(
            datagrams = self.stats.datagrams,
            bytes = self.stats.bytes,
            "Transmitter stopped"
        );
        Ok(self.stats)
    }

    /// Runs one emission cycle, returning the number of datagrams sent.
    ///
    /// Emits nothing until the producer has published a sample. After the
    /// data datagram, a time packet follows whenever the wall-clock second
    /// has advanced since the previous one.
    pub async fn tick(&mut self, now: WallTime) -> Result<usize> {
        let Some(sample) = self.samples.latest() else {
            trace!("No sample published yet, skipping tick");
            return Ok(0);
        };

        let rtc = self.clock.rtc()?;
        let data = self.encode_data(sample, rtc, &now)?;
        self.send(&data).await?;
        self.stats.data_ticks += 1;
        let mut sent = 1;

        if self.config.encapsulation.is_chapter11() && self.time_packet_due(&now) {
            let time = self.encode_time(rtc, &now)?;
            self.send(&time).await?;
            self.stats.time_packets += 1;
            sent += 1;
        }

        debug!(sample, rtc = rtc.ticks(), sent, "Tick complete");
        Ok(sent)
    }

    /// Builds the datagram carrying one sample
    pub fn encode_data(
        &mut self,
        sample: f32,
        rtc: RelativeTimeCounter,
        now: &WallTime,
    ) -> Result<Bytes> {
        let message =
            sub_protocol_message(self.config.sub_protocol, &mut self.counters, sample, now)?;

        let (data_type, payload) = match self.config.encapsulation {
            Encapsulation::Bare => return Ok(message),
            Encapsulation::Analog => (DataType::Analog, message),
            Encapsulation::EthernetFrame => {
                (DataType::EthernetF0, self.envelope.wrap(rtc, &message)?)
            }
        };

        let packet = Chapter11Packet::new(
            self.config.data_channel_id,
            self.counters.next_data_packet(),
            data_type,
            rtc,
            payload,
        )
        .encode()?;

        Ok(self.framer.frame(&packet))
    }

    /// Builds the framed time packet for `now`
    pub fn encode_time(&mut self, rtc: RelativeTimeCounter, now: &WallTime) -> Result<Bytes> {
        let payload = time_packet_payload(&now.local)?;

        let packet = Chapter11Packet::new(
            self.config.time_channel_id,
            self.counters.next_time_packet(),
            DataType::Time,
            rtc,
            Bytes::copy_from_slice(&payload),
        )
        .encode()?;

        Ok(self.framer.frame(&packet))
    }

    /// Records `now` and reports whether its second is newer than the last
    /// time packet's
    fn time_packet_due(&mut self, now: &WallTime) -> bool {
        let second = now.epoch_second();
        match self.last_time_second {
            Some(last) if second <= last => false,
            _ => {
                self.last_time_second = Some(second);
                true
            }
        }
    }

    async fn send(&mut self, datagram: &[u8]) -> Result<()> {
        if datagram.len() > MAX_DATAGRAM_SIZE {
            return Err(Error::range("datagram_length", datagram.len() as u64, 16));
        }

        trace!(len = datagram.len(), bytes = %HexPreview(datagram), "Sending datagram");
        let sent = self.sink.send_to(datagram, self.config.destination).await?;
        self.stats.datagrams += 1;
        self.stats.bytes += sent as u64;
        Ok(())
    }
}
