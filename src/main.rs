//! valvecontrol — main entry point
//!
//! Hexagonal architecture: adapters are chosen here and injected into the
//! controller core, which is then served over stdin/stdout.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  PinBank<SysfsPin> / SimulatedLines   LogEventSink             │
//! │  (LinePort)                           (EventSink)              │
//! │  JsonConfigStore   ThreadScheduler    ShellRestart   StdDelay  │
//! │  (ConfigPort)      (DeferredRunner)   (SystemPort)   (DelayNs) │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │   ValveController · PipetteSequencer · Dispatcher      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  RpcEngine (JSON lines on stdin/stdout)                        │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use valvecontrol::adapters::hardware::PinBank;
use valvecontrol::adapters::log_sink::LogEventSink;
use valvecontrol::adapters::sim::SimulatedLines;
use valvecontrol::adapters::sysfs::SysfsPin;
use valvecontrol::adapters::system::ShellRestart;
use valvecontrol::adapters::time::StdDelay;
use valvecontrol::app::dispatch::Dispatcher;
use valvecontrol::app::ports::LinePort;
use valvecontrol::app::service::ValveController;
use valvecontrol::cli::Cli;
use valvecontrol::config::{HardwareBackend, SystemConfig};
use valvecontrol::rpc::engine::RpcEngine;
use valvecontrol::rpc::io_task;
use valvecontrol::scheduler::ThreadScheduler;

fn main() -> Result<()> {
    // ── 1. Arguments + logging ────────────────────────────────
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Application starting");

    // ── 2. Load config from file (or defaults) ────────────────
    let config = cli
        .load_config()
        .with_context(|| format!("loading {}", cli.config_path().display()))?;

    // ── 3. Line backend ───────────────────────────────────────
    let managed: Vec<_> = config.lines.iter().copied().chain(config.ready_line).collect();
    match config.hardware {
        HardwareBackend::Sysfs => {
            let root = Path::new(&config.gpio_root);
            let bank = PinBank::open_all(managed, |line| SysfsPin::open(root, line))
                .with_context(|| format!("exporting GPIO lines under {}", root.display()))?;
            run(config, bank)
        }
        HardwareBackend::Simulated => {
            warn!("Running on simulated lines; no valve will move");
            run(config, SimulatedLines::new(managed))
        }
    }
}

fn run<P: LinePort + 'static>(config: SystemConfig, port: P) -> Result<()> {
    // ── 4. Controller bring-up ────────────────────────────────
    let controller = Arc::new(
        ValveController::new(&config, port, LogEventSink::new()).context("valve table")?,
    );
    controller.start().context("startup")?;
    info!("Running version {}", valvecontrol::VERSION);

    // ── 5. Dispatcher + request front end ─────────────────────
    let scheduler = Arc::new(ThreadScheduler::new());
    let dispatcher = Dispatcher::new(
        &config,
        controller,
        StdDelay,
        scheduler.clone(),
        Arc::new(ShellRestart::new(config.restart_command.clone())),
    );
    let engine = RpcEngine::new(Arc::new(dispatcher), config.cpu_temperature_path.as_str());
    info!("Application ready");

    let served = io_task::serve(&engine, io::stdin().lock(), io::stdout().lock());

    // ── 6. Let accepted deferred actions run before exiting ───
    let pending = scheduler.pending();
    if pending > 0 {
        info!("Waiting for {} deferred action(s) before exit", pending);
    }
    scheduler.wait_idle();
    served.context("request loop")?;
    info!("Application stopping");
    Ok(())
}
