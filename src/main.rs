//! HeatGuard — simulation entry point.
//!
//! Wires the controller to a simulated room and runs it on a virtual
//! clock, so a day of control takes a fraction of a second.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  ThermalPlant        LogDisplay     LogEventSink   SimClock    │
//! │  (Sensor+Actuator)   (DisplayPort)  (EventSink)    (Clock+Delay)│
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Scheduler · Health · FSM                              │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  TickDriver (now → tick → delay)                               │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `heatguard [config.json] [--hours N] [--start C] [--ambient C]`

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use log::info;

use heatguard::adapters::display::LogDisplay;
use heatguard::adapters::log_sink::LogEventSink;
use heatguard::adapters::rig::PlantRig;
use heatguard::adapters::time::SimClock;
use heatguard::app::events::AppEvent;
use heatguard::app::ports::{ClockPort, EventSink};
use heatguard::app::service::AppService;
use heatguard::config::ControlConfig;
use heatguard::scheduler::TickDriver;
use heatguard::sensors::ThermalPlant;

// ── Command line ──────────────────────────────────────────────

struct Args {
    config: Option<PathBuf>,
    hours: u64,
    start_c: f32,
    ambient_c: f32,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut args = Self {
            config: None,
            hours: 24,
            start_c: 18.0,
            ambient_c: 12.0,
        };

        let mut it = std::env::args().skip(1);
        while let Some(arg) = it.next() {
            match arg.as_str() {
                "--hours" => args.hours = value(&mut it, "--hours")?,
                "--start" => args.start_c = value(&mut it, "--start")?,
                "--ambient" => args.ambient_c = value(&mut it, "--ambient")?,
                flag if flag.starts_with("--") => bail!("unknown option {flag}"),
                path => {
                    if args.config.is_some() {
                        bail!("more than one config file given");
                    }
                    args.config = Some(PathBuf::from(path));
                }
            }
        }
        Ok(args)
    }
}

fn value<T>(it: &mut impl Iterator<Item = String>, flag: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = it.next().with_context(|| format!("{flag} needs a value"))?;
    raw.parse()
        .with_context(|| format!("invalid value for {flag}: {raw}"))
}

/// Simulated span for `--hours`.
fn sim_span(hours: u64) -> Result<Duration> {
    let secs = hours
        .checked_mul(3600)
        .with_context(|| format!("--hours {hours} is too large"))?;
    Ok(Duration::from_secs(secs))
}

fn load_config(path: Option<&PathBuf>) -> Result<ControlConfig> {
    let Some(path) = path else {
        info!("No config file given, using defaults");
        return Ok(ControlConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let cfg: ControlConfig =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    info!("Config loaded from {}", path.display());
    Ok(cfg)
}

// ── Entry point ───────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    info!("╔══════════════════════════════════════╗");
    info!("║  HeatGuard v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let args = Args::parse()?;
    let config = load_config(args.config.as_ref())?;

    // ── 1. Build the controller (rejects bad config) ──────────
    let mut service =
        AppService::new(config.clone()).context("configuration rejected")?;

    // ── 2. Simulated hardware on a shared virtual clock ───────
    let clock = SimClock::new();
    let plant = ThermalPlant::new(clock.clone(), args.start_c, args.ambient_c);
    let mut rig = PlantRig::new(plant, LogDisplay::new());
    let mut sink = LogEventSink::new();
    let mut driver = TickDriver::new(clock);

    service.start(&mut sink);
    info!(
        "Simulating {}h (room {:.1}\u{00b0}C, ambient {:.1}\u{00b0}C)",
        args.hours, args.start_c, args.ambient_c
    );

    // ── 3. Run, one telemetry snapshot per sample interval ────
    let total = sim_span(args.hours)?;
    let chunk = config.sample_interval().min(total.max(config.tick_interval()));
    while driver.timer().now() < total {
        driver.run_for(&mut service, &mut rig, &mut sink, chunk);
        let telemetry = service.build_telemetry(driver.timer().now());
        sink.emit(&AppEvent::Telemetry(telemetry));
    }

    info!(
        "Done: {} ticks, final state {:?}, room {:.2}\u{00b0}C",
        service.tick_count(),
        service.state(),
        rig.plant.temperature_c()
    );

    // ── 4. Final report ───────────────────────────────────────
    let report = serde_json::to_string_pretty(&service.diagnostics_report())?;
    println!("{report}");
    Ok(())
}
