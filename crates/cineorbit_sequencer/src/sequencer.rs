// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback lifecycle over a block sequence.
//!
//! The sequencer owns at most one active run at a time. Starting a run
//! always supersedes the previous one (cancel-then-restart, never
//! queue-behind), overrides the rig's damping factor for the duration of
//! the run, and restores it exactly on completion, cancellation, or
//! teardown.

use crate::timeline::Timeline;
use cineorbit_motion::{BlockConfig, BlockContext, CameraRig, MotionBlock};
use uuid::Uuid;

/// Damping factor applied while a sequence animates. The timeline supplies
/// its own interpolation, so the rig's manual-input smoothing is bypassed.
pub const PLAYBACK_DAMPING: f64 = 1.0;

/// Unique identifier for one playback run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Create a new random run ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

/// State of the single in-flight run.
struct ActiveRun {
    id: RunId,
    timeline: Timeline,
    saved_damping: f64,
    paused: bool,
}

/// Sequential playback engine for an ordered block sequence.
///
/// Two distinct suspension semantics are kept deliberately: [`pause`]
/// freezes the in-flight run at its current position, while [`restart`]
/// begins a fresh run of the stored sequence from block zero.
///
/// [`pause`]: Sequencer::pause
/// [`restart`]: Sequencer::restart
#[derive(Default)]
pub struct Sequencer {
    sequence: Vec<BlockConfig>,
    run: Option<ActiveRun>,
    on_complete: Option<Box<dyn FnMut()>>,
}

impl Sequencer {
    /// Create an idle sequencer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the callback invoked exactly once when a run completes.
    /// Cancelled runs do not fire it.
    pub fn set_on_complete(&mut self, callback: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Start playing `sequence`, superseding any in-flight run.
    ///
    /// Configs whose id prefix matches no known block type are skipped
    /// without consuming timeline time.
    pub fn play(
        &mut self,
        sequence: Vec<BlockConfig>,
        rig: &mut dyn CameraRig,
        ctx: &BlockContext,
    ) {
        self.sequence = sequence;
        self.start_run(rig, ctx);
    }

    /// Begin a fresh run of the stored sequence from block zero.
    pub fn restart(&mut self, rig: &mut dyn CameraRig, ctx: &BlockContext) {
        self.start_run(rig, ctx);
    }

    fn start_run(&mut self, rig: &mut dyn CameraRig, ctx: &BlockContext) {
        self.cancel(rig);

        let blocks: Vec<MotionBlock> = self
            .sequence
            .iter()
            .filter_map(|config| {
                let block = MotionBlock::resolve(config, ctx);
                if block.is_none() {
                    tracing::warn!(id = %config.id, "skipping block with unknown type prefix");
                }
                block
            })
            .collect();

        let timeline = Timeline::new(blocks);
        let id = RunId::new();
        tracing::info!(
            run = %id.0,
            segments = timeline.segment_count(),
            total_seconds = timeline.total_duration(),
            "sequence run started"
        );

        let saved_damping = rig.damping();
        rig.set_damping(PLAYBACK_DAMPING);
        self.run = Some(ActiveRun {
            id,
            timeline,
            saved_damping,
            paused: false,
        });
    }

    /// Advance the active run by `dt` seconds of frame time.
    ///
    /// On completion the damping factor is restored first, then the
    /// completion callback fires.
    pub fn tick(&mut self, rig: &mut dyn CameraRig, dt: f64) {
        let finished = match &mut self.run {
            Some(run) if !run.paused => run.timeline.advance(rig, dt),
            _ => return,
        };
        if finished {
            if let Some(run) = self.run.take() {
                rig.set_damping(run.saved_damping);
                tracing::info!(run = %run.id.0, "sequence run completed");
            }
            if let Some(callback) = &mut self.on_complete {
                callback();
            }
        }
    }

    /// Freeze the in-flight run at its current position.
    pub fn pause(&mut self) {
        if let Some(run) = &mut self.run {
            run.paused = true;
        }
    }

    /// Resume a paused run from where it stopped.
    pub fn resume(&mut self) {
        if let Some(run) = &mut self.run {
            run.paused = false;
        }
    }

    /// Map the external "is playing" flag: `false` pauses in place, `true`
    /// resumes a paused run.
    pub fn set_playing(&mut self, playing: bool) {
        if playing {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Cancel any in-flight run and restore the damping factor.
    ///
    /// Safe to call unconditionally; this is also the teardown path. The
    /// completion callback does not fire for a cancelled run.
    pub fn cancel(&mut self, rig: &mut dyn CameraRig) {
        if let Some(run) = self.run.take() {
            rig.set_damping(run.saved_damping);
            tracing::info!(run = %run.id.0, "sequence run cancelled");
        }
    }

    /// Whether a run is in flight and not paused.
    pub fn is_playing(&self) -> bool {
        self.run.as_ref().is_some_and(|run| !run.paused)
    }

    /// The active run's timeline, for scrub-bar style progress display.
    pub fn timeline(&self) -> Option<&Timeline> {
        self.run.as_ref().map(|run| &run.timeline)
    }

    /// The sequence handed to the last `play` call.
    pub fn sequence(&self) -> &[BlockConfig] {
        &self.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cineorbit_motion::OrbitRig;
    use std::cell::Cell;
    use std::rc::Rc;

    fn dolly(delta: f64, duration: f64) -> BlockConfig {
        BlockConfig {
            id: "dolly-1".into(),
            duration: Some(duration),
            distance_delta: Some(delta),
            ..BlockConfig::default()
        }
    }

    fn finish(sequencer: &mut Sequencer, rig: &mut OrbitRig) {
        for _ in 0..1000 {
            if sequencer.timeline().is_none() {
                return;
            }
            sequencer.tick(rig, 0.05);
        }
        panic!("sequence did not finish");
    }

    #[test]
    fn test_unknown_blocks_are_skipped_without_consuming_time() {
        let mut rig = OrbitRig::perspective(50.0);
        let mut sequencer = Sequencer::new();
        let sequence = vec![
            dolly(1.0, 2.0),
            BlockConfig {
                id: "bogusType-1".into(),
                duration: Some(10.0),
                ..BlockConfig::default()
            },
            BlockConfig {
                id: "pan-1".into(),
                duration: Some(3.0),
                ..BlockConfig::default()
            },
        ];
        sequencer.play(sequence, &mut rig, &BlockContext::default());

        let timeline = sequencer.timeline().unwrap();
        assert_eq!(timeline.segment_count(), 2);
        assert_eq!(timeline.total_duration(), 5.0);
    }

    #[test]
    fn test_damping_restored_after_completion() {
        let mut rig = OrbitRig::perspective(50.0);
        rig.set_damping(0.07);
        let mut sequencer = Sequencer::new();
        sequencer.play(vec![dolly(1.0, 0.5)], &mut rig, &BlockContext::default());
        assert_eq!(rig.damping(), PLAYBACK_DAMPING);
        finish(&mut sequencer, &mut rig);
        assert_eq!(rig.damping(), 0.07);
    }

    #[test]
    fn test_damping_restored_after_cancel_mid_flight() {
        let mut rig = OrbitRig::perspective(50.0);
        rig.set_damping(0.07);
        let mut sequencer = Sequencer::new();
        sequencer.play(vec![dolly(1.0, 2.0)], &mut rig, &BlockContext::default());
        sequencer.tick(&mut rig, 0.5);
        sequencer.cancel(&mut rig);
        assert_eq!(rig.damping(), 0.07);
        assert!(!sequencer.is_playing());
    }

    #[test]
    fn test_damping_restored_after_teardown_while_paused() {
        let mut rig = OrbitRig::perspective(50.0);
        rig.set_damping(0.07);
        let mut sequencer = Sequencer::new();
        sequencer.play(vec![dolly(1.0, 2.0)], &mut rig, &BlockContext::default());
        sequencer.tick(&mut rig, 0.5);
        sequencer.pause();
        sequencer.cancel(&mut rig);
        assert_eq!(rig.damping(), 0.07);
    }

    #[test]
    fn test_completion_callback_fires_exactly_once() {
        let mut rig = OrbitRig::perspective(50.0);
        let mut sequencer = Sequencer::new();
        let count = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&count);
        sequencer.set_on_complete(move || seen.set(seen.get() + 1));

        sequencer.play(vec![dolly(1.0, 0.5)], &mut rig, &BlockContext::default());
        finish(&mut sequencer, &mut rig);
        // Extra ticks after completion must not re-fire the callback.
        sequencer.tick(&mut rig, 0.05);
        sequencer.tick(&mut rig, 0.05);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_callback_not_fired_for_cancelled_run() {
        let mut rig = OrbitRig::perspective(50.0);
        let mut sequencer = Sequencer::new();
        let count = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&count);
        sequencer.set_on_complete(move || seen.set(seen.get() + 1));

        sequencer.play(vec![dolly(1.0, 2.0)], &mut rig, &BlockContext::default());
        sequencer.tick(&mut rig, 0.5);
        sequencer.cancel(&mut rig);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_pause_freezes_and_resume_continues() {
        let mut rig = OrbitRig::perspective(50.0);
        rig.dolly_to(5.0, false);
        let mut sequencer = Sequencer::new();
        sequencer.play(vec![dolly(2.0, 1.0)], &mut rig, &BlockContext::default());

        sequencer.tick(&mut rig, 0.5);
        let frozen = rig.distance();
        sequencer.set_playing(false);
        sequencer.tick(&mut rig, 10.0);
        assert_eq!(rig.distance(), frozen);
        assert!(!sequencer.is_playing());

        sequencer.set_playing(true);
        finish(&mut sequencer, &mut rig);
        assert!((rig.distance() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_restart_begins_from_block_zero() {
        let mut rig = OrbitRig::perspective(50.0);
        rig.dolly_to(5.0, false);
        let mut sequencer = Sequencer::new();
        sequencer.play(vec![dolly(2.0, 1.0)], &mut rig, &BlockContext::default());
        sequencer.tick(&mut rig, 0.5);

        // Replay restarts rather than resumes: the fresh run captures the
        // rig where the aborted one left it.
        let mid = rig.distance();
        sequencer.restart(&mut rig, &BlockContext::default());
        let timeline = sequencer.timeline().unwrap();
        assert_eq!(timeline.elapsed(), 0.0);
        finish(&mut sequencer, &mut rig);
        assert!((rig.distance() - (mid + 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_new_play_supersedes_old_run() {
        let mut rig = OrbitRig::perspective(50.0);
        rig.set_damping(0.07);
        let mut sequencer = Sequencer::new();
        sequencer.play(vec![dolly(1.0, 5.0)], &mut rig, &BlockContext::default());
        sequencer.tick(&mut rig, 0.5);

        // The second play cancels the first; the saved damping value is the
        // caller's original, not the playback override.
        sequencer.play(vec![dolly(1.0, 0.5)], &mut rig, &BlockContext::default());
        finish(&mut sequencer, &mut rig);
        assert_eq!(rig.damping(), 0.07);
    }
}
