//! Browser console logger for the `log` facade

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;
use web_sys::console;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format_line(record.target(), &record.args().to_string()));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug | Level::Trace => console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// `[module] message`, using the last segment of the target path
fn format_line(target: &str, message: &str) -> String {
    let module = target.rsplit("::").next().unwrap_or(target);
    format!("[{module}] {message}")
}

pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        assert_eq!(format_line("todo_core::store", "Loaded 3 lists"), "[store] Loaded 3 lists");
        assert_eq!(format_line("todo_lists_ui", "ready"), "[todo_lists_ui] ready");
    }
}
