// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sequential playback engine for CineOrbit.
//!
//! This crate composes motion blocks into one gapless animation run:
//! - Master timeline with strictly sequential, back-to-back segments
//! - Sequencer lifecycle: play, pause-in-place, restart, cancel/teardown
//! - Damping override and exact restoration around every run
//! - Versioned JSON sequence files with legacy-format import
//!
//! ## Architecture
//!
//! The timeline is advanced explicitly with frame delta time; there is no
//! internal clock or thread. Hosts call [`Sequencer::tick`] from their
//! render loop, and tests drive the same path with a fake clock.

pub mod file;
pub mod sequencer;
pub mod timeline;

pub use file::{export_sequence, import_sequence, ImportError, SequenceFile, SEQUENCE_FORMAT_VERSION};
pub use sequencer::{RunId, Sequencer, PLAYBACK_DAMPING};
pub use timeline::Timeline;
