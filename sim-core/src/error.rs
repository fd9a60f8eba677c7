use std::io;
use thiserror::Error;

/// シミュレーションを中断する致命的なエラー
///
/// コーディネータ内部の不変条件違反は panic で表し、ワーカーの join 時に
/// `WorkerPanicked` として報告される。
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to spawn {worker}: {source}")]
    Spawn {
        worker: String,
        #[source]
        source: io::Error,
    },

    #[error("{worker} panicked")]
    WorkerPanicked { worker: String },
}
