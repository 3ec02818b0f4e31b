pub mod alert;
pub mod config;
pub mod error;
pub mod io;
pub mod lexicon;
pub mod paths;
pub mod pipeline;
pub mod sentiment;
pub mod session;
pub mod sink;
pub mod snapshot;
pub mod turn;
pub mod types;

pub use error::{Result, VigilError};
