//! Persistence layer: tickets, the assignment ledger, calendar events, and
//! the priority queue view over all three.

pub mod assignments;
pub mod calendar;
pub mod queue;
pub mod tickets;
