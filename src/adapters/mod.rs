//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements            | Connects to                  |
//! |------------|-----------------------|------------------------------|
//! | `display`  | DisplayPort           | Status panel (log output)    |
//! | `log_sink` | EventSink             | `log` facade                 |
//! | `relay`    | ActuatorPort          | embedded-hal `OutputPin`     |
//! | `rig`      | all three device ports| Probe + heater + display     |
//! | `time`     | ClockPort, DelayNs    | `Instant` / virtual clock    |
//!
//! Probe sources (scripted and simulated) live in [`crate::sensors`].

pub mod display;
pub mod log_sink;
pub mod relay;
pub mod rig;
pub mod time;
