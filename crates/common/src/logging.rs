//! Logging initialisation for host binaries and tests.

use log::LevelFilter;

/// Initialize stderr logging at the given level.
/// Should be called once at the start of main(); a second call returns the
/// `SetLoggerError` from the `log` facade.
pub fn init_logging(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] {}: {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
}
