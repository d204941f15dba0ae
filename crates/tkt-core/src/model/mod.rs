//! Domain types shared by the stores and the calling layer.

pub mod display_id;
pub mod ticket;
pub mod user;
