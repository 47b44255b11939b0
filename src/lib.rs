//! Subterfuge - batched subtitle translation
//!
//! Parses SRT documents into cues, translates them in fixed-size batches
//! through a remote translation endpoint with per-cue fallback, and
//! extracts subtitle tracks from video containers via ffmpeg.

pub mod cli;
pub mod config;
pub mod workflow;
pub mod translate;
pub mod subtitle;
pub mod media;
pub mod output;
pub mod progress;
pub mod error;
