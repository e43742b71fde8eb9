//! `ferry-sim` — actor threads and the run loop for the ferry simulation.
//!
//! # Actors
//!
//! ```text
//! Sim::run
//!   ├─ ferry thread      dock → depart → cross → arrive, until halted at home
//!   ├─ vehicle threads   toll → queue → board → cross → dwell → … → complete
//!   └─ calling thread    drains the trip log and takes snapshots for the observer
//! ```
//!
//! The actors share nothing but the primitives in `ferry-dock`: the ferry
//! state, the toll plaza, the termination detector and the stop signal.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ferry_core::FerryConfig;
//! use ferry_sim::{NoopObserver, SimBuilder};
//!
//! let sim = SimBuilder::new(FerryConfig::default()).build()?;
//! let outcome = sim.run(&mut NoopObserver)?;
//! assert!(outcome.all_done());
//! ```

pub mod builder;
pub mod error;
pub mod ferry;
pub mod observer;
pub mod outcome;
pub mod sim;
pub mod vehicle;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use ferry::FerryExit;
pub use observer::{NoopObserver, SimObserver};
pub use outcome::{SimOutcome, SimSnapshot, VehicleReport};
pub use sim::Sim;
pub use vehicle::VehicleExit;
