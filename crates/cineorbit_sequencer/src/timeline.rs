// SPDX-License-Identifier: MIT OR Apache-2.0
//! Gapless master timeline over an ordered list of motion blocks.
//!
//! The timeline is the deterministic progress engine: the host advances it
//! with elapsed frame time and the timeline fires each segment's start and
//! eased update hooks in order. There is no internal clock, which makes a
//! fake-clock test driver trivial — call [`Timeline::advance`] with whatever
//! steps you like.

use cineorbit_motion::{CameraRig, MotionBlock, RunState};

/// Lifecycle of one timeline segment.
#[derive(Debug)]
enum Phase {
    /// Not yet reached
    Pending,
    /// Started; holds the per-run record captured at start
    Active(RunState),
    /// Received its final `p = 1` update
    Done,
}

/// One block scheduled at a fixed offset on the master timeline.
#[derive(Debug)]
struct Segment {
    block: MotionBlock,
    offset: f64,
    phase: Phase,
}

/// An ordered, back-to-back schedule of motion blocks.
///
/// Segments run strictly sequentially: segment N+1's start hook fires only
/// after segment N has received its full-progress update, even when one
/// large `advance` step crosses several segments. That ordering is what
/// makes capturing "from" state at each block's start give visual
/// continuity across the whole sequence.
#[derive(Debug)]
pub struct Timeline {
    segments: Vec<Segment>,
    elapsed: f64,
    total: f64,
}

impl Timeline {
    /// Schedule `blocks` back to back, preserving order.
    pub fn new(blocks: Vec<MotionBlock>) -> Self {
        let mut offset = 0.0;
        let segments: Vec<Segment> = blocks
            .into_iter()
            .map(|block| {
                let segment = Segment {
                    offset,
                    phase: Phase::Pending,
                    block,
                };
                offset += segment.block.duration();
                segment
            })
            .collect();
        Self {
            segments,
            elapsed: 0.0,
            total: offset,
        }
    }

    /// Number of scheduled segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Sum of all segment durations, seconds.
    pub fn total_duration(&self) -> f64 {
        self.total
    }

    /// Time consumed so far, seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Overall progress in `[0, 1]` (linear time, not eased).
    pub fn progress(&self) -> f64 {
        if self.total > 0.0 {
            (self.elapsed / self.total).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Whether every segment has received its final update.
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.total
            && self
                .segments
                .iter()
                .all(|s| matches!(s.phase, Phase::Done))
    }

    /// Advance the timeline by `dt` seconds and apply every due hook to the
    /// rig, in order. Returns `true` once the timeline has finished.
    ///
    /// Within one call a segment crossed entirely still receives its start
    /// hook and an exact `p = 1` update before the next segment starts.
    pub fn advance(&mut self, rig: &mut dyn CameraRig, dt: f64) -> bool {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.total);

        for segment in &mut self.segments {
            if self.elapsed < segment.offset {
                break;
            }
            if matches!(segment.phase, Phase::Done) {
                continue;
            }
            if matches!(segment.phase, Phase::Pending) {
                tracing::debug!(id = segment.block.id(), "starting timeline segment");
                segment.phase = Phase::Active(segment.block.on_start(rig));
            }
            if let Phase::Active(state) = &mut segment.phase {
                let duration = segment.block.duration();
                let local = if duration > 0.0 {
                    ((self.elapsed - segment.offset) / duration).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                let progress = segment.block.easing().apply(local);
                segment.block.on_update(rig, state, progress);
                if self.elapsed >= segment.offset + duration {
                    segment.phase = Phase::Done;
                } else {
                    break;
                }
            }
        }

        self.is_finished()
    }
}
