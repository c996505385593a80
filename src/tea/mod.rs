//! The Elm Architecture (TEA) core of the task form.
//!
//! This module provides a clean separation of concerns:
//! - `FormModel`: Pure form state
//! - `Message`: Inputs to the update function
//! - `Command`: Outputs (side effects) from the update function
//! - `update`: Pure function that transforms state

pub mod command;
pub mod message;
pub mod model;
pub mod update;

pub use command::Command;
pub use message::Message;
pub use model::{ErrorView, FormModel, FormView, Phase};
pub use update::update;
