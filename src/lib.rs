//! HeatGuard — closed-loop safety controller for a resistive heater.
//!
//! The library holds the pure control logic (state machine, health
//! monitor, sampling schedule, orchestration service) plus host adapters
//! for simulation and testing.  Hardware is reached only through the
//! port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fsm;
pub mod health;
pub mod scheduler;
pub mod sensors;
