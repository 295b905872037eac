use log::LevelFilter;

use crate::error::DemoError;

/// Channel capacity of the fast_log console appender.
const LOG_CHANNEL_LEN: usize = 100_000;

pub fn init(level: LevelFilter) -> Result<(), DemoError> {
    fast_log::init(
        fast_log::Config::new()
            .console()
            .level(level)
            .chan_len(Some(LOG_CHANNEL_LEN)),
    )
    .map_err(|e| DemoError::Logging(e.to_string()))?;
    Ok(())
}

/// Push anything still queued in the appender channel out to the console.
pub fn flush() {
    log::logger().flush();
}
