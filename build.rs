use std::{env, fs, path::PathBuf};

fn main() {
    // 1) Pico 1W linker memory map, only for the ARM target
    let target = env::var("TARGET").unwrap_or_default();
    if target.starts_with("thumbv6m") {
        let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
        let memory_x =
            fs::read_to_string("memory-pico1w.x").expect("Failed to read memory-pico1w.x");
        fs::write(out_dir.join("memory.x"), memory_x).expect("Failed to write memory.x");
        println!("cargo:rustc-link-search={}", out_dir.display());
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
        println!("cargo:rerun-if-changed=memory-pico1w.x");
    }

    // 2) Load optional env files
    let _ = dotenvy::from_filename(".env");
    load_home_env(".pico.env");
    load_home_env(".env");

    // 3) Fallbacks so every build compiles without a .env
    let reference_date = env_or_default("REFERENCE_DATE", "2024-03-19");
    let wifi_networks = env_or_default("WIFI_NETWORKS", "");
    let wifi_ssid = env_or_default("WIFI_SSID", "");
    let wifi_pass = env_or_default("WIFI_PASS", "");
    let ntp_server = env_or_default("NTP_SERVER", "pool.ntp.org");

    if env::var_os("CARGO_FEATURE_WIFI").is_some() && wifi_networks.is_empty() && wifi_ssid.is_empty()
    {
        println!(
            "cargo:warning=WIFI feature enabled but neither WIFI_NETWORKS nor WIFI_SSID is set"
        );
    }

    // 4) Expose as compile-time constants
    println!("cargo:rustc-env=REFERENCE_DATE={reference_date}");
    println!("cargo:rustc-env=WIFI_NETWORKS={wifi_networks}");
    println!("cargo:rustc-env=WIFI_SSID={wifi_ssid}");
    println!("cargo:rustc-env=WIFI_PASS={wifi_pass}");
    println!("cargo:rustc-env=NTP_SERVER={ntp_server}");

    for key in ["REFERENCE_DATE", "WIFI_NETWORKS", "WIFI_SSID", "WIFI_PASS", "NTP_SERVER"] {
        println!("cargo:rerun-if-env-changed={key}");
    }
    println!("cargo:rerun-if-changed=.env");
}

fn load_home_env(file: &str) {
    let home = match env::var_os("USERPROFILE").or_else(|| env::var_os("HOME")) {
        Some(path) => PathBuf::from(path),
        None => return,
    };
    let _ = dotenvy::from_path(home.join(file));
}

fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
