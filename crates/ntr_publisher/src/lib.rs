pub mod cli;
pub mod logging;
pub mod publisher;

pub use cli::{handle_command, HumanDuration, PublishArgs, PublishCommands};
pub use logging::{init_logging, Logger};
pub use publisher::{BatchPublisher, BatchReport, CategoryOutcome};

pub mod prelude {
    pub use super::publisher::{BatchPublisher, BatchReport};
    pub use ntr_core::{Article, Error, Result};
}
