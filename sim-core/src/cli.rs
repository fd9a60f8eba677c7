use clap::Args;
use log::LevelFilter;

/// 両シミュレーション共通の引数
#[derive(Debug, Clone, Args)]
pub struct PaceArgs {
    /// Delay of each phase (think, eat, read, write, rest) in milliseconds
    #[arg(long, default_value_t = 2000)]
    pub delay_ms: u64,

    /// Enable debug diagnostics on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// 診断ログを stderr に出す。RUST_LOG が指定されていればそちらを優先する
pub fn setup_logging(verbose: bool) -> Result<(), log::SetLoggerError> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()?;

    log::debug!("logging initialized (verbose: {verbose})");
    Ok(())
}
