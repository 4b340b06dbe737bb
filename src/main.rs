//! Shows the number of days since a reference date on a 4-digit 7-segment display.
//!
//! Runs on a Raspberry Pi Pico W. Time comes from NTP over WiFi (with the `wifi`
//! feature) and is converted to US Eastern time before counting days.
#![no_std]
#![no_main]
#![allow(clippy::future_not_send, reason = "Single-threaded")]

use core::convert::Infallible;

use days_since::config::{self, WifiNetworks};
use days_since::hardware::Hardware;
use days_since::led4::{Led4, Led4Static};
use days_since::scheduler::{FirmwareTimeSource, Scheduler, spawn_refresh};
use days_since::Result;
use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_time::Timer;
use panic_probe as _;

#[embassy_executor::main]
pub async fn main(spawner: Spawner) -> ! {
    // If it returns, something went wrong.
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<Infallible> {
    static LED4_STATIC: Led4Static = Led4::new_static();

    let reference = config::parse_reference_date(config::REFERENCE_DATE)?;
    info!("Counting days since {}", config::REFERENCE_DATE);

    let hardware = Hardware::default();
    let led4 = Led4::new(&LED4_STATIC, hardware.display, spawner)?;

    let networks = WifiNetworks::from_build_env()?;
    #[cfg(feature = "wifi")]
    let source = {
        let stack = days_since::wifi::connect(hardware.wifi, networks, spawner).await?;
        FirmwareTimeSource::new(stack, config::NTP_SERVER)
    };
    #[cfg(not(feature = "wifi"))]
    let source = {
        if !networks.is_empty() {
            defmt::warn!("WiFi networks configured but the `wifi` feature is off");
        }
        FirmwareTimeSource::default()
    };

    spawn_refresh(Scheduler::new(reference), source, &led4, spawner)?;

    loop {
        Timer::after_secs(3600).await;
    }
}
