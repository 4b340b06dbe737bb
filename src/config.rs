//! Build-time configuration.
//!
//! `build.rs` reads these from the environment (or a `.env` file) and bakes them
//! into the firmware. Defaults live in `build.rs`.

use heapless::Vec;

use crate::elapsed_days::ReferenceDate;
use crate::{Error, Result};

/// Date the count starts from, `YYYY-MM-DD`.
pub const REFERENCE_DATE: &str = env!("REFERENCE_DATE");

/// Networks to try, as `ssid=password` entries separated by `;`.
pub const WIFI_NETWORKS: &str = env!("WIFI_NETWORKS");

/// Single network from `WIFI_SSID`, tried after [`WIFI_NETWORKS`].
pub const WIFI_SSID: &str = env!("WIFI_SSID");
pub const WIFI_PASS: &str = env!("WIFI_PASS");

/// Host name of the NTP server.
pub const NTP_SERVER: &str = env!("NTP_SERVER");

/// Maximum number of networks the firmware will remember.
pub const MAX_NETWORKS: usize = 8;

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`Error::InvalidReferenceDate`] if the text is malformed or names a
/// day that does not exist.
pub fn parse_reference_date(text: &str) -> Result<ReferenceDate> {
    let mut parts = text.trim().splitn(3, '-');
    let mut next = || parts.next().ok_or(Error::InvalidReferenceDate);
    let year = next()?
        .parse::<i32>()
        .map_err(|_| Error::InvalidReferenceDate)?;
    let month = next()?
        .parse::<u8>()
        .map_err(|_| Error::InvalidReferenceDate)?;
    let day = next()?
        .parse::<u8>()
        .map_err(|_| Error::InvalidReferenceDate)?;
    ReferenceDate::new(year, month, day).map_err(|_| Error::InvalidReferenceDate)
}

/// One Wi-Fi network the device may join.
#[derive(Copy, Clone, Debug, PartialEq, Eq, defmt::Format)]
pub struct WifiNetwork {
    pub ssid: &'static str,
    pub password: &'static str,
}

/// Known networks, in the order they are tried.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WifiNetworks(Vec<WifiNetwork, MAX_NETWORKS>);

impl WifiNetworks {
    /// Parses `ssid=password;ssid=password`. An entry without `=` is an open network.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWifiConfig`] for an empty SSID or more than
    /// [`MAX_NETWORKS`] entries.
    pub fn parse(text: &'static str) -> Result<Self> {
        let mut networks = Vec::new();
        for entry in text.split(';').map(str::trim).filter(|entry| !entry.is_empty()) {
            let (ssid, password) = entry.split_once('=').unwrap_or((entry, ""));
            let network = WifiNetwork {
                ssid: ssid.trim(),
                password,
            };
            if network.ssid.is_empty() {
                return Err(Error::InvalidWifiConfig);
            }
            networks
                .push(network)
                .map_err(|_| Error::InvalidWifiConfig)?;
        }
        Ok(Self(networks))
    }

    /// Appends a single network unless its SSID is empty or already listed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWifiConfig`] if the list is already full.
    pub fn with_network(mut self, ssid: &'static str, password: &'static str) -> Result<Self> {
        if ssid.is_empty() || self.0.iter().any(|network| network.ssid == ssid) {
            return Ok(self);
        }
        self.0
            .push(WifiNetwork { ssid, password })
            .map_err(|_| Error::InvalidWifiConfig)?;
        Ok(self)
    }

    /// The networks configured at build time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWifiConfig`] if the build environment was malformed.
    pub fn from_build_env() -> Result<Self> {
        Self::parse(WIFI_NETWORKS)?.with_network(WIFI_SSID, WIFI_PASS)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WifiNetwork> {
        self.0.iter()
    }

    /// Known networks that `is_visible` reports in range, in configured order.
    pub fn visible<F>(&self, is_visible: F) -> impl Iterator<Item = &WifiNetwork>
    where
        F: Fn(&str) -> bool,
    {
        self.0.iter().filter(move |network| is_visible(network.ssid))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{WifiNetwork, WifiNetworks, parse_reference_date};
    use crate::Error;

    #[test]
    fn reference_date_parses() {
        let date = parse_reference_date("2024-03-19").expect("valid");
        assert_eq!(date.date().to_calendar_date().2, 19);
        assert!(parse_reference_date(" 2024-3-9 ").is_ok());
    }

    #[test]
    fn reference_date_rejects_garbage() {
        for text in ["", "2024", "2024-03", "2024-02-30", "2024-13-01", "24-xx-01"] {
            assert!(matches!(
                parse_reference_date(text),
                Err(Error::InvalidReferenceDate)
            ));
        }
    }

    #[test]
    fn networks_keep_order_and_allow_open() {
        let networks = WifiNetworks::parse("Home=secret; Work=pass=word ;Cafe;").expect("valid");
        let collected: heapless::Vec<WifiNetwork, 4> = networks.iter().copied().collect();
        assert_eq!(
            collected.as_slice(),
            &[
                WifiNetwork {
                    ssid: "Home",
                    password: "secret"
                },
                WifiNetwork {
                    ssid: "Work",
                    password: "pass=word"
                },
                WifiNetwork {
                    ssid: "Cafe",
                    password: ""
                },
            ]
        );
    }

    #[test]
    fn visible_networks_keep_configured_order() {
        let networks = WifiNetworks::parse("Home=a;Work=b;School=c").expect("valid");
        let in_range = ["School", "Home", "Neighbor"];
        let mut visible = networks.visible(|ssid| in_range.contains(&ssid));
        assert_eq!(visible.next().map(|network| network.ssid), Some("Home"));
        assert_eq!(visible.next().map(|network| network.ssid), Some("School"));
        assert_eq!(visible.next(), None);
    }

    #[test]
    fn networks_reject_empty_ssid() {
        assert!(WifiNetworks::parse("=nope").is_err());
    }

    #[test]
    fn single_network_is_appended_once() {
        let networks = WifiNetworks::parse("Home=secret")
            .and_then(|networks| networks.with_network("Home", "other"))
            .and_then(|networks| networks.with_network("Lab", "pw"))
            .and_then(|networks| networks.with_network("", ""))
            .expect("valid");
        assert_eq!(networks.len(), 2);
    }
}
