//! Flow module - question lists and the pure step transition.

mod questions;
mod transition;

pub use questions::question;
pub use transition::{advance, finish, Transition};
