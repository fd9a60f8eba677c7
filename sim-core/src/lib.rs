//! 食事する哲学者と reader-writer の両シミュレーションで共有する部品

mod cli;
mod console;
mod error;
mod pace;
mod workers;

pub use cli::{setup_logging, PaceArgs};
pub use console::Console;
pub use error::SimError;
pub use pace::Pace;
pub use workers::Workers;
