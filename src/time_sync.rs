//! Sources of UTC time for the refresh task.
//!
//! [`TimeSource`] is the seam the scheduler talks to. On the Pico W with the `wifi`
//! feature the firmware uses [`NtpTimeSource`], which asks an NTP server over UDP.
//! Without Wi-Fi, [`Unavailable`] always fails, so the display keeps its initial value.

use crate::Result;
use crate::error::Error::TimeUnavailable;
use crate::unix_seconds::UnixSeconds;

/// Anything that can report the current UTC time, or fail.
///
/// Implementations must give up in bounded time; a hung fetch stalls every
/// future refresh.
#[expect(
    async_fn_in_trait,
    reason = "single-threaded executor, futures never cross threads"
)]
pub trait TimeSource {
    /// # Errors
    ///
    /// Returns [`crate::Error::TimeUnavailable`] when no time could be obtained.
    async fn fetch_utc(&mut self) -> Result<UnixSeconds>;
}

/// A time source with no backing network.
#[derive(Copy, Clone, Debug, Default)]
pub struct Unavailable;

impl TimeSource for Unavailable {
    async fn fetch_utc(&mut self) -> Result<UnixSeconds> {
        Err(TimeUnavailable("no network time source"))
    }
}

// ============================================================================
// NTP reply parsing
// ============================================================================

/// Length of an SNTP packet without extension fields.
pub const NTP_PACKET_LEN: usize = 48;

const MODE_MASK: u8 = 0b0000_0111;
const MODE_SERVER: u8 = 4;

/// Extract the transmit time from an SNTP server reply.
///
/// # Errors
///
/// Returns a short reason if the packet is truncated, is not in server mode, or
/// carries a timestamp outside the NTP era this firmware handles.
pub fn parse_ntp_reply(reply: &[u8]) -> core::result::Result<UnixSeconds, &'static str> {
    if reply.len() < NTP_PACKET_LEN {
        return Err("NTP response too short");
    }
    let mode = reply.first().map_or(0, |first| first & MODE_MASK);
    if mode != MODE_SERVER {
        return Err("NTP response not from a server");
    }
    // Transmit timestamp, integer seconds: bytes 40..44, big-endian
    let seconds_bytes: [u8; 4] = reply
        .get(40..44)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or("NTP response too short")?;
    UnixSeconds::from_ntp_seconds(u32::from_be_bytes(seconds_bytes)).ok_or("Invalid NTP timestamp")
}

// ============================================================================
// Network Time Protocol (NTP) over WiFi
// ============================================================================

#[cfg(all(feature = "wifi", feature = "pico1"))]
mod wifi_impl {
    use defmt::{info, warn};
    use embassy_net::{Stack, dns, udp};
    use embassy_time::{Duration, Timer};

    use super::{NTP_PACKET_LEN, TimeSource, parse_ntp_reply};
    use crate::Result;
    use crate::error::Error::TimeUnavailable;
    use crate::unix_seconds::UnixSeconds;

    const NTP_PORT: u16 = 123;
    const RECEIVE_TIMEOUT: Duration = Duration::from_secs(5);
    const ATTEMPTS: u8 = 3;
    const RETRY_PAUSE: Duration = Duration::from_secs(1);

    /// Fetches time from an NTP server, trying up to three times per call.
    ///
    /// Each try waits at most five seconds for a reply, so one call is bounded
    /// by roughly twenty seconds in total.
    pub struct NtpTimeSource {
        stack: Stack<'static>,
        server: &'static str,
    }

    impl NtpTimeSource {
        #[must_use]
        pub const fn new(stack: Stack<'static>, server: &'static str) -> Self {
            Self { stack, server }
        }
    }

    impl TimeSource for NtpTimeSource {
        async fn fetch_utc(&mut self) -> Result<UnixSeconds> {
            if !self.stack.is_config_up() {
                return Err(TimeUnavailable("network not up"));
            }
            let mut last_error = "no attempt made";
            for attempt in 1..=ATTEMPTS {
                match fetch_ntp_time(self.stack, self.server).await {
                    Ok(unix_seconds) => return Ok(unix_seconds),
                    Err(message) => {
                        info!("NTP attempt {}/{} failed: {}", attempt, ATTEMPTS, message);
                        last_error = message;
                    }
                }
                if attempt < ATTEMPTS {
                    Timer::after(RETRY_PAUSE).await;
                }
            }
            Err(TimeUnavailable(last_error))
        }
    }

    async fn fetch_ntp_time(
        stack: Stack<'static>,
        server: &str,
    ) -> core::result::Result<UnixSeconds, &'static str> {
        use dns::DnsQueryType;
        use udp::UdpSocket;

        info!("Resolving NTP host {}...", server);
        let dns_result = stack
            .dns_query(server, DnsQueryType::A)
            .await
            .map_err(|err| {
                warn!("DNS lookup failed: {:?}", err);
                "DNS lookup failed"
            })?;
        let server_addr = dns_result.first().ok_or("No DNS results")?;

        let mut rx_meta = [udp::PacketMetadata::EMPTY; 1];
        let mut rx_buffer = [0; 128];
        let mut tx_meta = [udp::PacketMetadata::EMPTY; 1];
        let mut tx_buffer = [0; 128];
        let mut socket = UdpSocket::new(
            stack,
            &mut rx_meta,
            &mut rx_buffer,
            &mut tx_meta,
            &mut tx_buffer,
        );

        socket.bind(0).map_err(|err| {
            warn!("Socket bind failed: {:?}", err);
            "Socket bind failed"
        })?;

        // LI=0, VN=3, Mode=3 (client)
        let mut ntp_request = [0_u8; NTP_PACKET_LEN];
        if let Some(first) = ntp_request.first_mut() {
            *first = 0x1B;
        }

        socket
            .send_to(&ntp_request, (*server_addr, NTP_PORT))
            .await
            .map_err(|err| {
                warn!("NTP send failed: {:?}", err);
                "NTP send failed"
            })?;

        let mut response = [0_u8; NTP_PACKET_LEN];
        let (len, from) = embassy_time::with_timeout(RECEIVE_TIMEOUT, socket.recv_from(&mut response))
            .await
            .map_err(|_| "NTP receive timeout")?
            .map_err(|err| {
                warn!("NTP receive failed: {:?}", err);
                "NTP receive failed"
            })?;
        if from.endpoint.addr != *server_addr || from.endpoint.port != NTP_PORT {
            return Err("NTP response from unexpected host");
        }
        let unix_seconds = parse_ntp_reply(response.get(..len).unwrap_or(&[]))?;

        info!("NTP time: {} (unix timestamp)", unix_seconds.as_i64());
        Ok(unix_seconds)
    }
}

#[cfg(all(feature = "wifi", feature = "pico1"))]
pub use wifi_impl::NtpTimeSource;

#[cfg(test)]
#[allow(clippy::indexing_slicing, reason = "fixed-size packets")]
mod tests {
    use embassy_futures::block_on;

    use super::{NTP_PACKET_LEN, TimeSource, Unavailable, parse_ntp_reply};
    use crate::{Error, UnixSeconds};

    #[test]
    fn unavailable_always_fails() {
        let mut source = Unavailable;
        for _ in 0..2 {
            assert!(matches!(
                block_on(source.fetch_utc()),
                Err(Error::TimeUnavailable(_))
            ));
        }
    }

    fn server_reply(ntp_seconds: u32) -> [u8; NTP_PACKET_LEN] {
        let mut reply = [0_u8; NTP_PACKET_LEN];
        reply[0] = 0x1C; // LI=0, VN=3, Mode=4 (server)
        reply[40..44].copy_from_slice(&ntp_seconds.to_be_bytes());
        reply
    }

    #[test]
    fn server_reply_gives_transmit_time() {
        // 2024-03-19 00:00:00 UTC
        let reply = server_reply(3_919_795_200);
        assert_eq!(parse_ntp_reply(&reply), Ok(UnixSeconds(1_710_806_400)));
    }

    #[test]
    fn non_server_packets_are_rejected() {
        let mut reply = server_reply(3_919_795_200);
        reply[0] = 0x1B; // our own client request echoed back
        assert!(parse_ntp_reply(&reply).is_err());
        reply[0] = 0x1D; // broadcast
        assert!(parse_ntp_reply(&reply).is_err());
    }

    #[test]
    fn truncated_reply_is_rejected() {
        let reply = server_reply(3_919_795_200);
        assert!(parse_ntp_reply(&reply[..NTP_PACKET_LEN - 1]).is_err());
        assert!(parse_ntp_reply(&[]).is_err());
    }
}
