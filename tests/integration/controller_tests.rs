//! Integration tests for the controller: bring-up, interlock, bulk close,
//! and status reads against recording mock lines.

use valvecontrol::app::events::AppEvent;
use valvecontrol::app::ports::Level;
use valvecontrol::app::status::{LineState, ValveStatus};
use valvecontrol::config::{SystemConfig, ValveConfig};
use valvecontrol::error::{Error, LineError, ValveError};

use crate::mock_hw::Rig;

const READY: u32 = 12;
const SPARE: u32 = 20;

// ── Startup ──────────────────────────────────────────────────

#[test]
fn startup_drives_every_line_low_then_raises_ready() {
    let rig = Rig::new(SystemConfig::default());
    assert!(rig.lines.is_high(23), "mock lines start high");

    rig.ctl.start().unwrap();

    assert_eq!(rig.lines.high_lines(), vec![READY]);

    // The ready line goes high last, after every managed line went low.
    let writes = rig.lines.writes();
    assert_eq!(writes.last(), Some(&(READY, Level::High)));
    for &line in &rig.config.lines {
        assert!(writes.contains(&(line, Level::Low)), "line {line} not driven low");
    }
    assert!(writes.contains(&(READY, Level::Low)));

    let events = rig.events.events();
    assert_eq!(events.first(), Some(&AppEvent::Started { lines: 13 }));
    assert_eq!(
        events.last(),
        Some(&AppEvent::Ready {
            version: valvecontrol::VERSION
        })
    );
}

#[test]
fn startup_failure_never_raises_ready() {
    let rig = Rig::new(SystemConfig::default());
    rig.lines.fail(17);

    assert_eq!(rig.ctl.start(), Err(Error::Init(LineError::Io(17))));
    assert!(!rig.lines.writes().contains(&(READY, Level::High)));
    assert_eq!(
        rig.events
            .count(|e| matches!(e, AppEvent::Ready { .. } | AppEvent::Started { .. })),
        0
    );
}

#[test]
fn startup_without_ready_line() {
    let mut cfg = SystemConfig::default();
    cfg.ready_line = None;
    let rig = Rig::new(cfg);

    rig.ctl.start().unwrap();
    assert!(rig.lines.high_lines().is_empty());
}

// ── Interlock ────────────────────────────────────────────────

#[test]
fn open_refused_while_partner_open() {
    let rig = Rig::started();
    rig.ctl.open(2).unwrap();

    assert_eq!(
        rig.ctl.open(1),
        Err(ValveError::InterlockViolation {
            valve: 1,
            excluded: 2
        })
    );
    assert!(!rig.is_open(1));
    assert!(rig.is_open(2));
    assert_eq!(
        rig.events.count(|e| *e
            == AppEvent::InterlockRefused {
                valve: 1,
                excluded: 2
            }),
        1
    );
}

#[test]
fn refused_open_leaves_level_unchanged() {
    let rig = Rig::started();
    rig.ctl.open(1).unwrap();
    // Partner raised externally, e.g. by a manual override.
    rig.lines.force(rig.line(2), Level::High);
    let writes_before = rig.lines.writes().len();

    assert!(rig.ctl.open(1).is_err());
    assert!(rig.is_open(1), "valve 1 was open and must stay open");
    assert_eq!(rig.lines.writes().len(), writes_before, "no line written");
}

#[test]
fn open_succeeds_once_partner_closed() {
    let rig = Rig::started();
    rig.ctl.open(3).unwrap();
    assert!(rig.ctl.open(4).is_err());

    rig.ctl.close(3).unwrap();
    rig.ctl.open(4).unwrap();
    assert!(rig.is_open(4));
    assert!(!rig.is_open(3));
}

#[test]
fn hub_relation_is_one_directional() {
    let rig = Rig::started();

    // 6 depends on hub 5, but 5 excludes 8, not 6.
    rig.ctl.open(6).unwrap();
    rig.ctl.open(5).unwrap();
    assert!(rig.is_open(5) && rig.is_open(6));

    // With 5 open, every valve that excludes 5 is held shut.
    for id in [6, 7, 8, 10, 11, 12, 13] {
        rig.ctl.close(id).unwrap();
        assert!(
            matches!(rig.ctl.open(id), Err(ValveError::InterlockViolation { excluded: 5, .. })),
            "valve {id}"
        );
    }

    // 5 and 8 exclude each other.
    rig.ctl.close(5).unwrap();
    rig.ctl.open(8).unwrap();
    assert_eq!(
        rig.ctl.open(5),
        Err(ValveError::InterlockViolation {
            valve: 5,
            excluded: 8
        })
    );
}

#[test]
fn close_always_succeeds() {
    let rig = Rig::started();
    rig.ctl.open(2).unwrap();
    rig.lines.force(rig.line(1), Level::High);

    rig.ctl.close(1).unwrap();
    assert!(!rig.is_open(1));
    // Closing an already closed valve is fine too.
    rig.ctl.close(1).unwrap();
    rig.ctl.close(2).unwrap();
    assert!(!rig.is_open(2));
}

#[test]
fn unknown_valve_is_rejected_without_line_access() {
    let rig = Rig::started();
    let writes_before = rig.lines.writes().len();

    assert_eq!(rig.ctl.open(9), Err(ValveError::UnknownValve(9)));
    assert_eq!(rig.ctl.close(99), Err(ValveError::UnknownValve(99)));
    assert_eq!(rig.ctl.state(0), Err(ValveError::UnknownValve(0)));
    assert_eq!(rig.lines.writes().len(), writes_before);
}

#[test]
fn line_failure_surfaces_as_line_error() {
    let rig = Rig::started();
    rig.lines.fail(rig.line(2));

    assert_eq!(
        rig.ctl.open(1),
        Err(ValveError::Line(LineError::Io(rig.line(2))))
    );
    assert!(!rig.is_open(1));
}

// ── Bulk close ───────────────────────────────────────────────

#[test]
fn close_all_drives_every_managed_line_low() {
    let rig = Rig::started();
    for id in [1, 3, 6, 5] {
        rig.ctl.open(id).unwrap();
    }
    rig.lines.force(SPARE, Level::High);

    rig.ctl.close_all().unwrap();

    for &line in &rig.config.lines {
        assert_eq!(rig.lines.level_of(line), Level::Low, "line {line}");
    }
    assert!(rig.lines.is_high(READY), "ready line is not a managed line");
    assert_eq!(rig.events.count(|e| *e == AppEvent::AllClosed), 1);
}

// ── Status ───────────────────────────────────────────────────

#[test]
fn status_list_reads_live_levels_in_registry_order() {
    let rig = Rig::started();
    rig.ctl.open(1).unwrap();
    // A level changed outside the controller is reported as-is.
    rig.lines.force(rig.line(7), Level::High);

    let list = rig.ctl.status_list().unwrap();
    let ids: Vec<_> = list.iter().map(|s| s.valve).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7, 8, 10, 11, 12, 13]);
    assert_eq!(
        list[0],
        ValveStatus {
            valve: 1,
            status: LineState::Open
        }
    );
    assert_eq!(list[6].status, LineState::Open);
    assert_eq!(
        list.iter().filter(|s| s.status == LineState::Open).count(),
        2
    );
}

#[test]
fn internal_valves_are_hidden_from_status() {
    let mut cfg = SystemConfig::default();
    cfg.valves.push(ValveConfig {
        id: 0,
        line: SPARE,
        description: "vent".to_string(),
        excluded: 5,
    });
    let rig = Rig::new(cfg);
    rig.ctl.start().unwrap();
    rig.ctl.open(0).unwrap();

    assert!(rig.ctl.status_list().unwrap().iter().all(|s| s.valve > 0));
    let display = rig.ctl.http_status_list().unwrap();
    assert_eq!(display.len(), 12);
    assert_eq!(display[0].description, "4He pipette input");
    assert_eq!(rig.ctl.state(0), Ok(LineState::Open));
}

#[test]
fn status_read_failure_is_reported() {
    let rig = Rig::started();
    rig.lines.fail(rig.line(4));
    assert_eq!(rig.ctl.status_list(), Err(LineError::Io(rig.line(4))));
}

#[test]
fn display_report_carries_version_and_temperature() {
    let rig = Rig::started();
    let report = rig.ctl.display_report(Some(47.5)).unwrap();
    assert_eq!(report.version, valvecontrol::VERSION);
    assert_eq!(report.cpu_temperature_c, Some(47.5));
    assert_eq!(report.valves.len(), 12);
}
