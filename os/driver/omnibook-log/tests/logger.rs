use log::{Level, LevelFilter, Log, Record};
use omnibook_log::DriverLogger;
use std::fmt;
use std::sync::Mutex;

static LINES: Mutex<Vec<String>> = Mutex::new(Vec::new());

fn capture(line: fmt::Arguments<'_>) {
    LINES.lock().unwrap().push(line.to_string());
}

fn take_lines() -> Vec<String> {
    std::mem::take(&mut *LINES.lock().unwrap())
}

#[test]
fn formats_lines_and_filters_levels() {
    let logger = DriverLogger::new(LevelFilter::Info, capture);

    logger.log(
        &Record::builder()
            .args(format_args!("AC {}", "on-line"))
            .level(Level::Info)
            .target("omnibook::features::ac")
            .build(),
    );
    logger.log(
        &Record::builder()
            .args(format_args!("EC read at 0xa3"))
            .level(Level::Trace)
            .target("omnibook::backend::ec")
            .build(),
    );

    assert_eq!(
        take_lines(),
        ["omnibook: [INFO] omnibook::features::ac: AC on-line\n"]
    );
    assert_eq!(logger.max_level(), LevelFilter::Info);
}
