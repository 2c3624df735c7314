//! Buff/status-effect lifecycle.
//!
//! Instances move `absent → active → expiring → absent`. [`BuffSet::grant`]
//! creates or refreshes, [`BuffSet::expire_due`] removes the instances whose
//! time is up and hands them back so the caller can subtract their deltas
//! from the live stats immediately.

mod clock;
mod instance;
mod set;

pub use clock::{Clock, ClockKind, ClockReading};
pub use instance::{Buff, BuffSpecial};
pub use set::{BuffSet, GrantOutcome};
