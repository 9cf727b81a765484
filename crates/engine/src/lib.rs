// In crates/engine/src/lib.rs

pub mod bot;
pub mod reconciler;

pub use bot::{BarOutcome, Bot, DailySnapshot};
pub use reconciler::{Reconciliation, reconcile};
