use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// スレッド間で共有する出力先
///
/// 1 回の `emit` は 1 つの論理メッセージで、複数行でも途中で他のスレッドの
/// 出力が割り込むことはない。
/// ロックの順序は常にコーディネータのロック → コンソールのロック。
pub struct Console {
    sink: Mutex<Sink>,
    warned: AtomicBool, // 書き込み失敗を一度だけ報告する
}

enum Sink {
    Stdout(io::Stdout),
    Capture(Vec<u8>),
}

impl Console {
    pub fn stdout() -> Self {
        Console {
            sink: Mutex::new(Sink::Stdout(io::stdout())),
            warned: AtomicBool::new(false),
        }
    }

    /// メモリ上のバッファに書き込む。テストで出力順を調べるのに使う
    pub fn capture() -> Self {
        Console {
            sink: Mutex::new(Sink::Capture(Vec::new())),
            warned: AtomicBool::new(false),
        }
    }

    pub fn emit(&self, message: &str) {
        // panic したワーカーがいても出力は続けられるようにする
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        let result = match &mut *sink {
            Sink::Stdout(out) => {
                let mut out = out.lock();
                writeln!(out, "{message}").and_then(|_| out.flush())
            }
            Sink::Capture(buf) => writeln!(buf, "{message}"),
        };

        if let Err(e) = result {
            if !self.warned.swap(true, Ordering::Relaxed) {
                log::warn!("console write failed: {e}");
            }
        }
    }

    /// これまでに書き込まれた行。stdout の場合は空
    pub fn lines(&self) -> Vec<String> {
        let sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        match &*sink {
            Sink::Stdout(_) => Vec::new(),
            Sink::Capture(buf) => String::from_utf8_lossy(buf)
                .lines()
                .map(str::to_owned)
                .collect(),
        }
    }
}

/// `format!` と同じ書式で 1 メッセージを出力する
#[macro_export]
macro_rules! emit {
    ($console: expr, $($arg: tt)*) => {
        $console.emit(&format!($($arg)*))
    };
}
