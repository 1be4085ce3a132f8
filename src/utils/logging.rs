use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

/// Initialize logging with timestamp, level, and message formatting.
///
/// Defaults to `Info` (`Debug` when `verbose`); `RUST_LOG` overrides both.
/// Format: `[YYYY-MM-DD HH:MM:SS] [LEVEL] message`
pub fn init_logger(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(level)
        .parse_env(Env::default())
        .init();
}
