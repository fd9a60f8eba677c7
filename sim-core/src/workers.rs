use std::mem;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::SimError;

/// ワーカースレッドの集合
///
/// 不変条件違反で panic したワーカーがいると、他のワーカーは条件変数で
/// 待ったまま戻ってこない可能性がある。そのため join の前に終了通知を
/// チャネルで受け取り、最初の panic を見つけた時点でエラーを返す。
pub struct Workers<T> {
    handles: Vec<(String, JoinHandle<T>)>,
    tx: Sender<(String, bool)>,
    rx: Receiver<(String, bool)>,
}

// スレッド終了時 (panic 時も) に Drop で通知する
struct ExitNotice {
    worker: String,
    tx: Sender<(String, bool)>,
}

impl Drop for ExitNotice {
    fn drop(&mut self) {
        let worker = mem::take(&mut self.worker);
        let _ = self.tx.send((worker, thread::panicking()));
    }
}

impl<T: Send + 'static> Workers<T> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Workers {
            handles: Vec::new(),
            tx,
            rx,
        }
    }

    pub fn spawn<F>(&mut self, name: impl Into<String>, f: F) -> Result<(), SimError>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let name = name.into();
        let notice = ExitNotice {
            worker: name.clone(),
            tx: self.tx.clone(),
        };

        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                let _notice = notice;
                f()
            })
            .map_err(|source| SimError::Spawn {
                worker: name.clone(),
                source,
            })?;

        log::trace!("spawned {name}");
        self.handles.push((name, handle));
        Ok(())
    }

    /// 全ワーカーの終了を待ち、生成順に結果を返す
    pub fn join(self) -> Result<Vec<T>, SimError> {
        let Workers { handles, tx, rx } = self;
        drop(tx);

        for _ in 0..handles.len() {
            match rx.recv() {
                Ok((worker, true)) => return Err(SimError::WorkerPanicked { worker }),
                Ok((worker, false)) => log::trace!("{worker} finished"),
                Err(_) => break,
            }
        }

        let mut v = Vec::with_capacity(handles.len());
        for (worker, handle) in handles {
            match handle.join() {
                Ok(r) => v.push(r),
                Err(_) => return Err(SimError::WorkerPanicked { worker }),
            }
        }
        Ok(v)
    }
}

impl<T: Send + 'static> Default for Workers<T> {
    fn default() -> Self {
        Self::new()
    }
}
