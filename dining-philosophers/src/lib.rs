//! 食事する哲学者
//!
//! 1 つのロックで哲学者全員の状態を守り、両隣が食事中でないときだけ
//! 食事を許可する。フォーク 2 本の取得はロック内で一度に行われるので
//! デッドロックは起きない。

mod dinner;
mod philosopher;
mod table;

pub use dinner::{run, DinnerConfig, DinnerReport};
pub use philosopher::Philosopher;
pub use table::{Snapshot, State, Table};
