//! Marker phrases and transition detection.
//!
//! - [`dictionary::MarkerDictionary`]: phrase → target mode configuration
//! - [`detector::ModeDetector`]: finds the mode signalled by a piece of text

pub mod detector;
pub mod dictionary;
