//! Per-server logging sink.

use std::fmt;
use std::sync::Arc;

use log::{Level, Log, Metadata, Record};

/// Forwards to whatever logger the host installed with the `log` facade.
struct GlobalLogger;

impl Log for GlobalLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level() && log::logger().enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            log::logger().log(record);
        }
    }

    fn flush(&self) {
        log::logger().flush();
    }
}

/// The logger a server instance writes to, with its own target name.
///
/// Handed to the server at construction and cloned into every connection
/// task.
#[derive(Clone)]
pub struct LogSink {
    target: String,
    logger: Arc<dyn Log>,
}

impl LogSink {
    /// Write to `logger` under `target`.
    pub fn new(target: impl Into<String>, logger: Arc<dyn Log>) -> Self {
        Self {
            target: target.into(),
            logger,
        }
    }

    /// Write to the process-wide `log` logger under the `tinyweb` target.
    pub fn global() -> Self {
        Self::new("tinyweb", Arc::new(GlobalLogger))
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        let metadata = Metadata::builder().level(level).target(&self.target).build();
        if !self.logger.enabled(&metadata) {
            return;
        }
        self.logger.log(
            &Record::builder()
                .metadata(metadata)
                .args(args)
                .module_path_static(Some(module_path!()))
                .build(),
        );
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::global()
    }
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSink").field("target", &self.target).finish_non_exhaustive()
    }
}
