//! reader-writer 問題
//!
//! reader 同士は並行に読めるが、writer は reader とも他の writer とも
//! 排他的に書き込む。

mod access;
mod database;
mod semaphore;
mod simulation;
mod worker;

pub use access::{Holder, ResourceAccess};
pub use database::{Database, ReadGuard, Snapshot, WriteGuard};
pub use semaphore::Semaphore;
pub use simulation::{run, RwConfig, RwReport};
pub use worker::{Reader, Writer};
