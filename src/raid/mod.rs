//! The raid engine: session record, turn resolution, persistence and rendering.

pub mod logic;
pub mod state;
pub mod store;
pub mod ui;

pub use logic::{Action, Actor, TurnError, TurnEvent};
pub use state::BattleSession;
pub use store::{ChatId, SessionStore, StoreError};
