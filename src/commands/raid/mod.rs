//! The raid commands: `start`, `status` and the four combat actions.

pub mod logic;
pub mod run;

pub use logic::{Invoker, RaidCommand, Reply, execute};
