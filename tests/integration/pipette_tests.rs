//! Integration tests for pipette sequences.
//!
//! The sampling delay snapshots the high lines at the moment the sequencer
//! waits, which is when a transfer is most exposed.

use valvecontrol::app::events::{AppEvent, PipetteOperation};
use valvecontrol::app::ports::Level;
use valvecontrol::pins::LineId;
use valvecontrol::sequencer::PipetteSequencer;

use crate::mock_hw::{DispatchRig, Rig, SamplingDelay};

const READY: LineId = 12;

/// Replay `writes`, starting with both lines closed,
/// and report whether the two lines were ever high together.
fn ever_both_open(writes: &[(LineId, Level)], a: LineId, b: LineId) -> bool {
    let (mut a_high, mut b_high) = (false, false);
    for &(line, level) in writes {
        if line == a {
            a_high = level.is_high();
        } else if line == b {
            b_high = level.is_high();
        }
        if a_high && b_high {
            return true;
        }
    }
    false
}

#[test]
fn load_closes_output_then_opens_input() {
    let d = DispatchRig::reference();
    let (input, output) = (d.rig.line(1), d.rig.line(2));
    let from = d.rig.lines.writes().len();

    d.dispatcher.dispatch("pipette1", "load");

    assert!(d.rig.is_open(1));
    assert!(!d.rig.is_open(2));

    let writes = d.rig.lines.writes()[from..].to_vec();
    assert_eq!(writes, vec![(output, Level::Low), (input, Level::High)]);
    assert!(!ever_both_open(&writes, input, output));

    // One settle of the configured length, with neither end open.
    assert_eq!(d.delay.samples(), vec![(1000, vec![READY])]);
}

#[test]
fn load_from_unloaded_state_never_has_both_open() {
    let d = DispatchRig::reference();
    d.dispatcher.dispatch("pipette2", "unload");
    assert!(d.rig.is_open(3), "3He output open after unload");
    let from = d.rig.lines.writes().len();

    d.dispatcher.dispatch("pipette2", "load");

    assert!(d.rig.is_open(4));
    assert!(!d.rig.is_open(3));
    let writes = d.rig.lines.writes()[from..].to_vec();
    assert!(!ever_both_open(&writes, d.rig.line(4), d.rig.line(3)));
    for (_, high) in d.delay.samples() {
        assert!(!(high.contains(&d.rig.line(3)) && high.contains(&d.rig.line(4))));
    }
}

#[test]
fn unload_closes_input_then_opens_output() {
    let d = DispatchRig::reference();
    d.dispatcher.dispatch("pipette1", "load");
    let from = d.rig.lines.writes().len();

    d.dispatcher.dispatch("pipette1", "unload");

    assert!(!d.rig.is_open(1));
    assert!(d.rig.is_open(2));
    assert_eq!(
        d.rig.lines.writes()[from..].to_vec(),
        vec![(d.rig.line(1), Level::Low), (d.rig.line(2), Level::High)]
    );
    assert_eq!(d.delay.samples()[1], (1000, vec![READY]));
}

#[test]
fn close_shuts_both_ends_without_settling() {
    let d = DispatchRig::reference();
    d.dispatcher.dispatch("pipette1", "load");
    let samples = d.delay.samples().len();

    d.dispatcher.dispatch("pipette1", "close");

    assert!(!d.rig.is_open(1));
    assert!(!d.rig.is_open(2));
    assert_eq!(d.delay.samples().len(), samples);
}

#[test]
fn failed_close_step_skips_open() {
    let d = DispatchRig::reference();
    d.rig.lines.fail(d.rig.line(2));

    d.dispatcher.dispatch("pipette1", "load");

    assert!(!d.rig.is_open(1));
    assert!(d.delay.samples().is_empty());
}

#[test]
fn sequence_start_is_reported() {
    let d = DispatchRig::reference();
    d.dispatcher.dispatch("pipette2", "unload");
    assert_eq!(
        d.rig.events.count(|e| *e
            == AppEvent::PipetteSequence {
                pipette: "3He".to_string(),
                operation: PipetteOperation::Unload,
            }),
        1
    );
}

#[test]
fn sequencer_runs_without_dispatcher() {
    let rig = Rig::started();
    let delay = SamplingDelay::new(rig.lines.clone());
    let seq = PipetteSequencer::new(250, delay.clone());
    assert_eq!(seq.settle_ms(), 250);

    let pipette = rig.ctl.registry().pipette(1).unwrap().clone();
    seq.load(&*rig.ctl, &pipette).unwrap();
    assert!(rig.is_open(1));
    seq.close_both(&*rig.ctl, &pipette).unwrap();
    assert!(!rig.is_open(1));

    assert_eq!(delay.samples(), vec![(250, vec![READY])]);
    assert!(seq.run(&*rig.ctl, 3, PipetteOperation::Load).is_err());
}

#[test]
fn each_sequence_is_reported_once_however_it_is_started() {
    let rig = Rig::started();
    let seq = PipetteSequencer::new(0, SamplingDelay::new(rig.lines.clone()));
    let pipette = rig.ctl.registry().pipette(1).unwrap().clone();

    seq.load(&*rig.ctl, &pipette).unwrap();
    seq.run(&*rig.ctl, 1, PipetteOperation::Load).unwrap();

    assert_eq!(
        rig.events.count(|e| matches!(
            e,
            AppEvent::PipetteSequence {
                operation: PipetteOperation::Load,
                ..
            }
        )),
        2
    );
}
