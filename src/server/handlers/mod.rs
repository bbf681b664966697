//! The protocol verb handlers.

pub mod question;
pub mod room;
