use std::thread;
use std::time::Duration;

/// 振る舞いを目で追えるようにするための待ち時間
///
/// 同期プロトコル自体には関与しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pace {
    /// think / eat / read / write と、その後の休憩
    pub phase: Duration,
    /// 卓の状態を表示する前後の待ち
    pub settle: Duration,
    /// 書き込み前に writer が考える時間
    pub pre_think: Duration,
}

impl Pace {
    pub const fn none() -> Self {
        Pace {
            phase: Duration::ZERO,
            settle: Duration::ZERO,
            pre_think: Duration::ZERO,
        }
    }

    pub fn from_millis(phase: u64, settle: u64, pre_think: u64) -> Self {
        Pace {
            phase: Duration::from_millis(phase),
            settle: Duration::from_millis(settle),
            pre_think: Duration::from_millis(pre_think),
        }
    }

    pub fn pause(d: Duration) {
        if !d.is_zero() {
            thread::sleep(d);
        }
    }

    pub fn phase(&self) {
        Self::pause(self.phase);
    }

    pub fn settle(&self) {
        Self::pause(self.settle);
    }

    pub fn pre_think(&self) {
        Self::pause(self.pre_think);
    }
}

impl Default for Pace {
    fn default() -> Self {
        Pace::from_millis(2000, 2000, 1000)
    }
}
