//! Domain managers wrapping the persistence layer with entity-specific
//! invariants: assignment exclusivity, admin privilege checks, payout
//! accumulation, and short-id collision handling.

pub mod admins;
pub mod links;
pub mod tasks;
pub mod users;
