//! SmartCV library: resume and job description matching

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{Result, SmartCvError};
pub use processing::analyzer::{MatchEngine, MatchReport};
