use std::fmt;
use std::sync::Mutex;

use crate::semaphore::Semaphore;

/// ResourceAccess を保持している主体
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Holder {
    None,
    /// 読み込み中の reader 全体
    Readers,
    Writer(usize),
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Holder::None => write!(f, "nobody"),
            Holder::Readers => write!(f, "readers"),
            Holder::Writer(id) => write!(f, "writer {id}"),
        }
    }
}

/// 共有資源への排他的アクセス権
///
/// 2 値セマフォに保持者の記録を加えたもの。保持者以外が解放しようとしたら
/// 不変条件違反として panic する。
pub struct ResourceAccess {
    sem: Semaphore,
    holder: Mutex<Holder>,
}

impl ResourceAccess {
    pub fn new() -> Self {
        ResourceAccess {
            sem: Semaphore::new(1),
            holder: Mutex::new(Holder::None),
        }
    }

    /// 空くまで待ってから `who` を保持者にする
    pub fn acquire(&self, who: Holder) {
        assert_ne!(who, Holder::None);
        self.sem.wait();

        let mut holder = self.holder.lock().expect("access lock poisoned");
        assert_eq!(
            *holder,
            Holder::None,
            "inconsistent: {who} acquired access held by {}",
            *holder
        );
        *holder = who;
        log::trace!("access acquired by {who}");
    }

    pub fn release(&self, who: Holder) {
        {
            let mut holder = self.holder.lock().expect("access lock poisoned");
            assert_eq!(
                *holder, who,
                "inconsistent: {who} released access held by {}",
                *holder
            );
            *holder = Holder::None;
        }
        self.sem.post();
        log::trace!("access released by {who}");
    }

    pub fn holder(&self) -> Holder {
        *self.holder.lock().expect("access lock poisoned")
    }
}

impl Default for ResourceAccess {
    fn default() -> Self {
        Self::new()
    }
}
