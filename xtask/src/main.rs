//! Build automation tasks for the days-since firmware.
//!
//! Run with: `cargo xtask <command>`

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::process::{Command, ExitCode};

const TARGET: &str = "thumbv6m-none-eabi";
const BIN: &str = "days-since";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for the days-since firmware", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: build firmware with and without wifi, run host tests, generate docs
    CheckAll,
    /// Build the firmware
    Build {
        #[arg(long)]
        wifi: bool,
    },
    /// Run unit and integration tests on the host
    Test,
    /// Build UF2 firmware file for flashing to the Pico W
    Uf2 {
        #[arg(long)]
        wifi: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::CheckAll => check_all(),
        Commands::Build { wifi } => exit_code(build_firmware(wifi, false)),
        Commands::Test => exit_code(host_tests()),
        Commands::Uf2 { wifi } => build_uf2(wifi),
    }
}

fn check_all() -> ExitCode {
    println!("{}", "==> Building firmware (no wifi)...".cyan());
    if !build_firmware(false, false) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> Building firmware (with wifi)...".cyan());
    if !build_firmware(true, false) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> Running doc tests...".cyan());
    if !run_command(Command::new("cargo").current_dir(workspace_root()).args([
        "test",
        "--doc",
        "--target",
        TARGET,
        "--features",
        &features(true),
        "--no-default-features",
    ])) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> Running host tests...".cyan());
    if !host_tests() {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> Building documentation...".cyan());
    if !run_command(Command::new("cargo").current_dir(workspace_root()).args([
        "doc",
        "--target",
        TARGET,
        "--no-deps",
        "--features",
        &features(true),
        "--no-default-features",
    ])) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> All checks passed!".green().bold());
    ExitCode::SUCCESS
}

fn build_firmware(wifi: bool, release: bool) -> bool {
    let features = features(wifi);
    println!(
        "{}",
        format!("Building firmware with features: {features}").cyan()
    );

    let mut cmd = Command::new("cargo");
    cmd.current_dir(workspace_root())
        .args(["build", "--bin", BIN, "--target", TARGET]);
    if release {
        cmd.arg("--release");
    }
    cmd.args(["--features", &features, "--no-default-features"]);

    let ok = run_command(&mut cmd);
    if ok {
        println!("{}", "Build successful!".green());
    }
    ok
}

fn host_tests() -> bool {
    let host_target = host_target();
    match host_target.as_deref() {
        Some(target) => {
            println!(
                "  {}",
                format!("Using host target: {target}").bright_black()
            );
        }
        None => {
            println!(
                "{}",
                "  Unable to detect host target; relying on cargo default.".bright_black()
            );
        }
    }

    let mut test_cmd = Command::new("cargo");
    test_cmd
        .current_dir(workspace_root())
        .args(["test", "--lib", "--tests"]);

    if let Some(target) = host_target {
        test_cmd.arg("--target").arg(target);
    }

    test_cmd.args(["--no-default-features", "--features", "host"]);

    run_command(&mut test_cmd)
}

fn build_uf2(wifi: bool) -> ExitCode {
    println!("{}", format!("Building UF2 for '{BIN}'").cyan());
    println!("  Features: {}", features(wifi).bright_black());
    println!("  Target: {}", TARGET.bright_black());

    if !build_firmware(wifi, true) {
        return ExitCode::FAILURE;
    }

    let elf_path = format!("target/{TARGET}/release/{BIN}");
    let uf2_path = format!("{BIN}.uf2");

    println!("\n{}", "Converting to UF2 format...".cyan());

    if run_command(
        Command::new("elf2uf2-rs")
            .current_dir(workspace_root())
            .args([&elf_path, &uf2_path]),
    ) {
        println!("{}", format!("UF2 created: {uf2_path}").green().bold());
        println!("{}", "Ready to drag-and-drop to your Pico!".bright_black());
        ExitCode::SUCCESS
    } else {
        println!(
            "{}",
            "Note: Install elf2uf2-rs with: cargo install elf2uf2-rs".yellow()
        );
        ExitCode::FAILURE
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn features(wifi: bool) -> String {
    let mut features = vec!["defmt", "pico1", "arm"];
    if wifi {
        features.push("wifi");
    }
    features.join(",")
}

fn workspace_root() -> std::path::PathBuf {
    // cargo xtask runs from the workspace root
    std::env::current_dir().expect("Failed to get current directory")
}

fn host_target() -> Option<String> {
    let output = Command::new("rustc").arg("-vV").output().ok()?;
    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("host: "))
        .map(|host| host.trim().to_string())
}

fn run_command(cmd: &mut Command) -> bool {
    match cmd.status() {
        Ok(status) => status.success(),
        Err(e) => {
            eprintln!("{}", format!("Failed to execute command: {e}").red());
            false
        }
    }
}
