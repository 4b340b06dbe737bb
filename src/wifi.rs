//! WiFi client for the Pico W.
//!
//! [`connect`] brings up the CYW43 radio and a DHCP network stack, then spawns a
//! task that joins the first configured network it can see and rejoins whenever
//! the link drops. The stack is returned straight away; until DHCP completes,
//! NTP requests simply fail and the refresh task retries a minute later.

use cyw43::{Control, JoinOptions, ScanOptions};
use cyw43_pio::{DEFAULT_CLOCK_DIVIDER, PioSpi};
use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_net::{Config, Stack, StackResources};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{DMA_CH0, PIN_23, PIN_24, PIN_25, PIN_29, PIO0};
use embassy_rp::pio::{InterruptHandler, Pio};
use embassy_rp::{Peri, bind_interrupts};
use embassy_time::{Duration, Timer, with_timeout};
use heapless::{String, Vec};
use static_cell::StaticCell;

use crate::Result;
use crate::config::{WifiNetwork, WifiNetworks};

/// Join attempts per network before moving on to the next one.
const JOIN_ATTEMPTS: u8 = 10;
const JOIN_RETRY_PAUSE: Duration = Duration::from_secs(1);
/// Pause after every known network has failed, before scanning again.
const ROUND_PAUSE: Duration = Duration::from_secs(30);
/// How long DHCP gets after a join before the pass starts over.
const DHCP_TIMEOUT: Duration = Duration::from_secs(30);
const LINK_CHECK_INTERVAL: Duration = Duration::from_secs(10);
const MAX_VISIBLE: usize = 16;

/// The pins and peripherals wired to the CYW43 chip.
pub struct WifiPeripherals {
    pub pin_23: Peri<'static, PIN_23>,
    pub pin_25: Peri<'static, PIN_25>,
    pub pio0: Peri<'static, PIO0>,
    pub pin_24: Peri<'static, PIN_24>,
    pub pin_29: Peri<'static, PIN_29>,
    pub dma_ch0: Peri<'static, DMA_CH0>,
}

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
});

/// Start the radio and network stack and spawn the join task.
///
/// # Errors
///
/// Returns an error if one of the background tasks cannot be spawned.
pub async fn connect(
    peripherals: WifiPeripherals,
    networks: WifiNetworks,
    spawner: Spawner,
) -> Result<Stack<'static>> {
    info!("WiFi initializing, {} known network(s)", networks.len());
    if networks.is_empty() {
        warn!("No WiFi networks configured; set WIFI_NETWORKS or WIFI_SSID");
    }

    let fw = cyw43_firmware::CYW43_43439A0;
    let clm = cyw43_firmware::CYW43_43439A0_CLM;

    let WifiPeripherals {
        pin_23,
        pin_25,
        pio0,
        pin_24,
        pin_29,
        dma_ch0,
    } = peripherals;
    let pwr = Output::new(pin_23, Level::Low);
    let cs = Output::new(pin_25, Level::High);
    let mut pio = Pio::new(pio0, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        pin_24,
        pin_29,
        dma_ch0,
    );

    static STATE: StaticCell<cyw43::State> = StaticCell::new();
    let state = STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
    let wifi_token = wifi_task(runner)?;
    spawner.spawn(wifi_token);

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;

    let config = Config::dhcpv4(Default::default());
    let seed = 0x5d1c_e4a7_2b90_3f68;

    static RESOURCES: StaticCell<StackResources<5>> = StaticCell::new();
    let (stack, runner) = embassy_net::new(
        net_device,
        config,
        RESOURCES.init(StackResources::<5>::new()),
        seed,
    );

    let net_token = net_task(runner)?;
    spawner.spawn(net_token);

    let join_token = join_loop(control, stack, networks)?;
    spawner.spawn(join_token);

    Ok(stack)
}

// ============================================================================
// WiFi Tasks
// ============================================================================

#[embassy_executor::task]
async fn join_loop(
    mut control: Control<'static>,
    stack: Stack<'static>,
    networks: WifiNetworks,
) -> ! {
    loop {
        let visible = scan(&mut control).await;
        let mut joined = false;
        for network in networks.visible(|ssid| visible.iter().any(|seen| seen == ssid)) {
            if join(&mut control, network).await {
                joined = true;
                break;
            }
        }

        if !joined {
            info!("No known network could be joined; retrying in {}s", ROUND_PAUSE.as_secs());
            Timer::after(ROUND_PAUSE).await;
            continue;
        }

        info!("WiFi connected! Waiting for DHCP...");
        if with_timeout(DHCP_TIMEOUT, stack.wait_config_up()).await.is_err() {
            warn!("DHCP timed out after {}s, rejoining", DHCP_TIMEOUT.as_secs());
            continue;
        }
        if let Some(config) = stack.config_v4() {
            info!("IP Address: {}", config.address);
        }

        while stack.is_link_up() {
            Timer::after(LINK_CHECK_INTERVAL).await;
        }
        warn!("WiFi link lost, rejoining");
    }
}

async fn scan(control: &mut Control<'static>) -> Vec<String<32>, MAX_VISIBLE> {
    let mut visible = Vec::new();
    let mut scanner = control.scan(ScanOptions::default()).await;
    while let Some(bss) = scanner.next().await {
        let len = usize::from(bss.ssid_len);
        let Some(ssid) = bss
            .ssid
            .get(..len)
            .and_then(|bytes| core::str::from_utf8(bytes).ok())
        else {
            continue;
        };
        if ssid.is_empty() || visible.iter().any(|seen: &String<32>| seen == ssid) {
            continue;
        }
        let Ok(ssid) = String::try_from(ssid) else {
            continue;
        };
        // A full list just means some far-away networks are ignored
        let _ = visible.push(ssid);
    }
    info!("Scan found {} network(s)", visible.len());
    visible
}

async fn join(control: &mut Control<'static>, network: &WifiNetwork) -> bool {
    info!("Connecting to {}...", network.ssid);
    for attempt in 1..=JOIN_ATTEMPTS {
        let options = if network.password.is_empty() {
            JoinOptions::new_open()
        } else {
            JoinOptions::new(network.password.as_bytes())
        };
        match control.join(network.ssid, options).await {
            Ok(_) => return true,
            Err(err) => {
                info!("Join {} attempt {} failed: {}", network.ssid, attempt, err.status);
                Timer::after(JOIN_RETRY_PAUSE).await;
            }
        }
    }
    warn!("Failed to connect to {}", network.ssid);
    false
}

#[embassy_executor::task]
async fn wifi_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}
