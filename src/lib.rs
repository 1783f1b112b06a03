pub mod config;
pub mod error;
pub mod monitor;
pub mod parser;
pub mod storage;
pub mod telegram;

pub use config::Config;
pub use error::{NotifierError, Result};
pub use monitor::PollController;
