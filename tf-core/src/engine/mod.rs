//! Fan control engine modules
//!
//! Contains the hysteresis decision engine.

mod hysteresis;

pub use hysteresis::HysteresisController;
