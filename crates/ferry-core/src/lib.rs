//! `ferry-core` — foundational types for the two-port ferry simulation.
//!
//! This crate is a dependency of every other `ferry-*` crate.  It has no
//! `ferry-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `VehicleId`, `TripId`                                 |
//! | [`port`]        | `Port`, `Direction`                                   |
//! | [`vehicle`]     | `VehicleClass`, `ClassSpec`                           |
//! | [`time`]        | `TimeScale`, `DelayRange`                             |
//! | [`rng`]         | `VehicleRng` (per-vehicle), `SimRng` (ferry/global)   |
//! | [`config`]      | `FerryConfig`, `StartPorts`, validation               |
//! | [`error`]       | `CoreError`, `ConfigError`, `CoreResult`              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required by `ferry-output`'s JSON log.                     |

pub mod config;
pub mod error;
pub mod ids;
pub mod port;
pub mod rng;
pub mod time;
pub mod vehicle;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{FerryConfig, StartPorts, VehicleSpec};
pub use error::{ConfigError, CoreError, CoreResult};
pub use ids::{TripId, VehicleId};
pub use port::{Direction, Port};
pub use rng::{SimRng, VehicleRng};
pub use time::{DelayRange, MAX_WALL_SECS, TimeScale};
pub use vehicle::{ClassSpec, VehicleClass};
