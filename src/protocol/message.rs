use bytes::Bytes;

use crate::core::{Result, SubProtocol};
use crate::time::{epoch_parts, WallTime};
use super::iena::{iena_message, IenaHeader};
use super::inetx::{inetx_message, InetxHeader};
use super::sequence::SequenceCounters;

/// Wraps one sample in the configured sub-protocol, advancing that
/// sub-protocol's sequence counter once
pub fn sub_protocol_message(
    protocol: SubProtocol,
    counters: &mut SequenceCounters,
    sample: f32,
    now: &WallTime,
) -> Result<Bytes> {
    match protocol {
        SubProtocol::Iena => {
            let header = IenaHeader::at(counters.next_iena(), &now.local)?;
            iena_message(&header, sample)
        }
        SubProtocol::Inetx => {
            let (seconds, nanos) = epoch_parts(now.system)?;
            let header = InetxHeader {
                sequence: counters.next_inetx(),
                seconds,
                nanos,
            };
            Ok(inetx_message(&header, sample))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::time::{Duration, UNIX_EPOCH};

    fn wall_time() -> WallTime {
        WallTime {
            local: NaiveDate::from_ymd_opt(2024, 3, 7)
                .unwrap()
                .and_hms_opt(13, 45, 9)
                .unwrap(),
            system: UNIX_EPOCH + Duration::new(1_709_819_109, 250),
        }
    }

    #[test]
    fn test_iena_message_advances_only_iena() {
        let mut counters = SequenceCounters::default();
        let now = wall_time();

        let first = sub_protocol_message(SubProtocol::Iena, &mut counters, 0.25, &now).unwrap();
        let second = sub_protocol_message(SubProtocol::Iena, &mut counters, 0.25, &now).unwrap();

        assert_eq!(first.len(), 22);
        assert_eq!(&first[14..16], &[0, 0]);
        assert_eq!(&second[14..16], &[0, 1]);
        assert_eq!(counters.inetx.peek(), 0);
        assert_eq!(counters.data_packet.peek(), 0);
    }

    #[test]
    fn test_inetx_message_uses_epoch_time() {
        let mut counters = SequenceCounters::default();
        let message =
            sub_protocol_message(SubProtocol::Inetx, &mut counters, 2.0, &wall_time()).unwrap();

        assert_eq!(message.len(), 32);
        assert_eq!(&message[8..12], &0u32.to_be_bytes());
        assert_eq!(&message[16..20], &1_709_819_109u32.to_be_bytes());
        assert_eq!(&message[20..24], &250u32.to_be_bytes());
        assert_eq!(&message[28..], &2.0f32.to_be_bytes());
        assert_eq!(counters.inetx.peek(), 1);
        assert_eq!(counters.iena.peek(), 0);
    }
}
