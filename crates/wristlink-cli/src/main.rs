//! Wristlink - Main entry point
//!
//! Command line tool that connects to a wakeuptech E26 wristband over
//! BLE, keeps it synced and runs measurements.

mod ble;
mod config;

use anyhow::Result;
use btleplug::api::Peripheral as _;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use wristlink_proto::{ClockMode, DeviceEvent, VitalKind};
use wristlink_session::BandLink;

#[derive(Parser, Debug)]
#[command(name = "wristlink")]
#[command(about = "Sync and control wakeuptech E26 wristbands over BLE")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "wristlink.toml")]
    config: PathBuf,

    /// Band MAC address, overrides the configured one
    #[arg(short, long)]
    device: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List nearby BLE devices
    Scan,
    /// Write a starter configuration file
    InitConfig,
    /// Push time, profile, clock mode and alarms to the band
    Sync,
    /// Push only the configured alarms
    Alarms,
    /// Set the clock face to 12 or 24 hour display
    Clock {
        /// "12h" or "24h"
        mode: String,
    },
    /// Vibrate the band so it can be found
    Find,
    /// Run a one-shot heart rate measurement
    HeartRate,
    /// Run a one-shot blood oxygen measurement
    BloodOxygen,
    /// Run a one-shot blood pressure measurement
    BloodPressure,
    /// Stream heart rate continuously until interrupted
    StreamHeartRate,
    /// Stay connected and print every report
    Listen {
        /// Print reports as JSON, one object per line
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Wristlink v{}", env!("CARGO_PKG_VERSION"));

    if matches!(args.command, Command::InitConfig) {
        config::save_default_config(&args.config)?;
        println!("Wrote starter configuration to {}", args.config.display());
        return Ok(());
    }

    // Load configuration
    let mut config = config::load_config(&args.config)?;

    // Override band address if specified
    if let Some(device) = args.device {
        config.device.address = Some(device);
    }

    if matches!(args.command, Command::Scan) {
        return ble::scan(&config.device).await;
    }

    let adapter = ble::adapter().await?;
    let peripheral = ble::discover_band(&adapter, &config.device).await?;
    ble::connect(&peripheral).await?;

    let transport = Arc::new(ble::BleTransport::new(peripheral.clone()));
    let link = Arc::new(BandLink::new(transport));
    let pump = tokio::spawn(ble::pump_notifications(peripheral.clone(), link.clone()));

    link.initialize(&config.profile, config.clock_mode).await?;

    match &args.command {
        Command::Sync => {
            let alarms = config.alarms()?;
            link.set_alarms(&alarms).await?;
            println!(
                "Synced time, profile, clock mode and {} alarm(s)",
                alarms.len()
            );
        }
        Command::Alarms => {
            let alarms = config.alarms()?;
            link.set_alarms(&alarms).await?;
            println!("Programmed {} alarm(s)", alarms.len());
        }
        Command::Clock { mode } => {
            let mode = match mode.as_str() {
                "12h" => ClockMode::TwelveHour,
                "24h" => ClockMode::TwentyFourHour,
                other => anyhow::bail!("clock mode must be 12h or 24h, got {other:?}"),
            };
            link.set_clock_mode(mode).await?;
            println!("Clock face set to {mode:?}");
        }
        Command::Find => {
            link.find_band(true).await?;
            println!("Band is vibrating");
        }
        Command::HeartRate => run_vital_test(&link, VitalKind::HeartRate).await?,
        Command::BloodOxygen => run_vital_test(&link, VitalKind::BloodOxygen).await?,
        Command::BloodPressure => run_vital_test(&link, VitalKind::BloodPressure).await?,
        Command::StreamHeartRate => stream_heart_rate(&link).await?,
        Command::Listen { json } => listen(&link, *json).await?,
        Command::Scan | Command::InitConfig => unreachable!(),
    }

    pump.abort();
    let _ = peripheral.disconnect().await;
    Ok(())
}

/// Run a one-shot measurement and print readings as they arrive.
async fn run_vital_test(link: &BandLink, kind: VitalKind) -> Result<()> {
    let mut events = link.subscribe();
    println!("Measuring, keep the band still...");

    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => print_reading(&event),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    link.run_vital_test(kind).await?;
    printer.abort();
    Ok(())
}

async fn stream_heart_rate(link: &BandLink) -> Result<()> {
    link.set_realtime_heart_rate(true).await?;
    println!("Streaming heart rate, press Ctrl-C to stop");

    let mut events = link.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(DeviceEvent::HeartRate { bpm, .. }) => println!("{bpm} bpm"),
                Ok(_) => {}
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            },
        }
    }

    link.set_realtime_heart_rate(false).await?;
    Ok(())
}

async fn listen(link: &BandLink, json: bool) -> Result<()> {
    println!("Listening for reports, press Ctrl-C to stop");

    let mut events = link.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(event) => {
                    if json {
                        println!("{}", serde_json::to_string(&event)?);
                    } else {
                        print_reading(&event);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "dropped events");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
    Ok(())
}

fn print_reading(event: &DeviceEvent) {
    match event {
        DeviceEvent::HeartRate { bpm, .. } => println!("Heart rate: {bpm} bpm"),
        DeviceEvent::BloodOxygen { percent, .. } => println!("Blood oxygen: {percent}%"),
        DeviceEvent::BloodPressure {
            systolic,
            diastolic,
            ..
        } => println!("Blood pressure: {systolic}/{diastolic} mmHg"),
        DeviceEvent::AllVitals {
            heart_rate,
            blood_oxygen,
            systolic,
            diastolic,
        } => println!("Vitals: {heart_rate} bpm, {blood_oxygen}% SpO2, {systolic}/{diastolic} mmHg"),
        DeviceEvent::BatteryLevel { percent, charging } => {
            if *charging {
                println!("Battery: {percent}% (charging)");
            } else {
                println!("Battery: {percent}%");
            }
        }
        DeviceEvent::FirmwareVersion { version } => println!("Firmware: {version}"),
        DeviceEvent::LocatePhoneTriggered => println!("Band asked to find this phone"),
        DeviceEvent::Unhandled { code } => println!("Unhandled report {code:#04x}"),
    }
}
