#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod bot;
pub mod error;
pub mod interaction;
pub mod platform;

#[cfg(test)]
mod fake;

pub use bot::{Bot, Followup, Inbound, Reply, DEFAULT_STAFF_CHANNEL};
pub use platform::{Delivery, Discord, Platform};
