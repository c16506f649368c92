//! Mock hardware adapters for integration tests.
//!
//! Every mock is a cheap handle over shared state, so a test keeps one
//! clone for assertions while the controller owns the other.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use valvecontrol::app::dispatch::Dispatcher;
use valvecontrol::app::events::AppEvent;
use valvecontrol::app::ports::{
    DeferredAction, DeferredRunner, EventSink, Level, LinePort, SystemPort,
};
use valvecontrol::app::service::ValveController;
use valvecontrol::config::SystemConfig;
use valvecontrol::error::{LineError, ScheduleError};
use valvecontrol::pins::LineId;
use valvecontrol::registry::ValveId;

// ── MockLines ─────────────────────────────────────────────────

#[derive(Default)]
struct LineBank {
    levels: HashMap<LineId, Level>,
    writes: Vec<(LineId, Level)>,
    failing: HashSet<LineId>,
}

/// Shared in-memory lines that record every write.
#[derive(Clone, Default)]
pub struct MockLines {
    bank: Arc<Mutex<LineBank>>,
}

#[allow(dead_code)]
impl MockLines {
    /// Lines start high so tests can tell that bring-up drove them low.
    pub fn new(lines: impl IntoIterator<Item = LineId>) -> Self {
        let bank = LineBank {
            levels: lines.into_iter().map(|l| (l, Level::High)).collect(),
            ..LineBank::default()
        };
        Self {
            bank: Arc::new(Mutex::new(bank)),
        }
    }

    pub fn all_low(lines: impl IntoIterator<Item = LineId>) -> Self {
        let mock = Self::new(lines);
        for level in mock.bank.lock().unwrap().levels.values_mut() {
            *level = Level::Low;
        }
        mock
    }

    pub fn level_of(&self, line: LineId) -> Level {
        self.bank.lock().unwrap().levels[&line]
    }

    pub fn is_high(&self, line: LineId) -> bool {
        self.level_of(line).is_high()
    }

    /// Change a level behind the controller's back.
    pub fn force(&self, line: LineId, level: Level) {
        self.bank.lock().unwrap().levels.insert(line, level);
    }

    /// Make every later access to `line` fail with an I/O error.
    pub fn fail(&self, line: LineId) {
        self.bank.lock().unwrap().failing.insert(line);
    }

    pub fn writes(&self) -> Vec<(LineId, Level)> {
        self.bank.lock().unwrap().writes.clone()
    }

    pub fn high_lines(&self) -> Vec<LineId> {
        let mut high: Vec<_> = self
            .bank
            .lock()
            .unwrap()
            .levels
            .iter()
            .filter(|(_, level)| level.is_high())
            .map(|(&line, _)| line)
            .collect();
        high.sort_unstable();
        high
    }
}

impl LinePort for MockLines {
    fn set_level(&mut self, line: LineId, level: Level) -> Result<(), LineError> {
        let mut bank = self.bank.lock().unwrap();
        if bank.failing.contains(&line) {
            return Err(LineError::Io(line));
        }
        let slot = bank
            .levels
            .get_mut(&line)
            .ok_or(LineError::Unavailable(line))?;
        *slot = level;
        bank.writes.push((line, level));
        Ok(())
    }

    fn level(&mut self, line: LineId) -> Result<Level, LineError> {
        let bank = self.bank.lock().unwrap();
        if bank.failing.contains(&line) {
            return Err(LineError::Io(line));
        }
        bank.levels
            .get(&line)
            .copied()
            .ok_or(LineError::Unavailable(line))
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<AppEvent>>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn events(&self) -> Vec<AppEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// ── RecordingRunner ───────────────────────────────────────────

/// Holds scheduled actions until the test fires them.
#[derive(Default)]
pub struct RecordingRunner {
    scheduled: Mutex<Vec<(&'static str, Duration, DeferredAction)>>,
}

#[allow(dead_code)]
impl RecordingRunner {
    pub fn scheduled(&self) -> Vec<(&'static str, Duration)> {
        self.scheduled
            .lock()
            .unwrap()
            .iter()
            .map(|(label, delay, _)| (*label, *delay))
            .collect()
    }

    /// Run every pending action, as if all delays had elapsed.
    pub fn fire_all(&self) {
        let pending = std::mem::take(&mut *self.scheduled.lock().unwrap());
        for (_, _, action) in pending {
            action();
        }
    }
}

impl DeferredRunner for RecordingRunner {
    fn schedule_once(
        &self,
        label: &'static str,
        delay: Duration,
        action: DeferredAction,
    ) -> Result<(), ScheduleError> {
        self.scheduled.lock().unwrap().push((label, delay, action));
        Ok(())
    }
}

/// A runner whose timer context can never be created.
pub struct BrokenRunner;

impl DeferredRunner for BrokenRunner {
    fn schedule_once(
        &self,
        _label: &'static str,
        _delay: Duration,
        _action: DeferredAction,
    ) -> Result<(), ScheduleError> {
        Err(ScheduleError::SpawnFailed)
    }
}

// ── RecordingSystem ───────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSystem {
    restarts: AtomicUsize,
}

#[allow(dead_code)]
impl RecordingSystem {
    pub fn restarts(&self) -> usize {
        self.restarts.load(Ordering::SeqCst)
    }
}

impl SystemPort for RecordingSystem {
    fn restart(&self) {
        self.restarts.fetch_add(1, Ordering::SeqCst);
    }
}

// ── SamplingDelay ─────────────────────────────────────────────

/// Delay that returns at once but snapshots the high lines each time it
/// is asked to wait.
#[derive(Clone)]
pub struct SamplingDelay {
    lines: MockLines,
    samples: Arc<Mutex<Vec<(u32, Vec<LineId>)>>>,
}

#[allow(dead_code)]
impl SamplingDelay {
    pub fn new(lines: MockLines) -> Self {
        Self {
            lines,
            samples: Arc::default(),
        }
    }

    /// `(requested ms, high lines at that moment)` for every wait.
    pub fn samples(&self) -> Vec<(u32, Vec<LineId>)> {
        self.samples.lock().unwrap().clone()
    }
}

impl DelayNs for SamplingDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        let high = self.lines.high_lines();
        self.samples.lock().unwrap().push((ms, high));
    }
}

// ── Rigs ──────────────────────────────────────────────────────

pub type MockController = ValveController<MockLines, RecordingSink>;
pub type MockDispatcher = Dispatcher<MockLines, RecordingSink, SamplingDelay>;

/// Controller plus handles on its mocks.
pub struct Rig {
    pub config: SystemConfig,
    pub ctl: Arc<MockController>,
    pub lines: MockLines,
    pub events: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    /// Controller over `config`, not yet started.
    pub fn new(config: SystemConfig) -> Self {
        let lines = MockLines::new(config.lines.iter().copied().chain(config.ready_line));
        let events = RecordingSink::default();
        let ctl = ValveController::new(&config, lines.clone(), events.clone()).unwrap();
        Self {
            config,
            ctl: Arc::new(ctl),
            lines,
            events,
        }
    }

    /// The reference installation, started.
    pub fn started() -> Self {
        let rig = Self::new(SystemConfig::default());
        rig.ctl.start().unwrap();
        rig
    }

    pub fn line(&self, id: ValveId) -> LineId {
        self.ctl.registry().get(id).unwrap().line
    }

    pub fn is_open(&self, id: ValveId) -> bool {
        self.lines.is_high(self.line(id))
    }
}

/// Dispatcher over a started reference rig, with recording mocks.
pub struct DispatchRig {
    pub rig: Rig,
    pub dispatcher: MockDispatcher,
    pub delay: SamplingDelay,
    pub runner: Arc<RecordingRunner>,
    pub system: Arc<RecordingSystem>,
}

#[allow(dead_code)]
impl DispatchRig {
    pub fn new(config: SystemConfig) -> Self {
        let rig = Rig::new(config);
        rig.ctl.start().unwrap();

        let delay = SamplingDelay::new(rig.lines.clone());
        let runner = Arc::new(RecordingRunner::default());
        let system = Arc::new(RecordingSystem::default());
        let dispatcher = Dispatcher::new(
            &rig.config,
            Arc::clone(&rig.ctl),
            delay.clone(),
            runner.clone(),
            system.clone(),
        );
        Self {
            rig,
            dispatcher,
            delay,
            runner,
            system,
        }
    }

    pub fn reference() -> Self {
        Self::new(SystemConfig::default())
    }
}
