//! Sine tone generation for interval intonation training.
//!
//! [`sweep`] plans which tones to produce, [`audio`] synthesizes and encodes
//! them, and [`render`] ties the two together under a [`config::Config`].

pub mod audio;
pub mod config;
pub mod notes;
pub mod render;
pub mod sweep;
