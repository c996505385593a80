pub mod catalog;
pub mod config;
pub mod error;
pub mod log;
pub mod merge;
pub mod selector;
pub mod task;
pub mod widgets;

// Runtime and coordinator
pub mod app;
pub mod fetch;
pub mod tea;

pub use app::{FormHandle, FormRuntime};
pub use catalog::{Node, NodeKey, OptionSchema, RawNode};
pub use error::{Error, Result};
pub use merge::MergedOption;
pub use task::{PriorTask, TaskConfig, TaskOptionValue};
