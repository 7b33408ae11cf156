#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod action;
pub mod prompt;
pub mod quiz;
pub mod session;

pub use action::Action;
pub use quiz::{Input, Submission, Transition};
pub use session::Session;
