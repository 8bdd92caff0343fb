// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::thread;
use time::OffsetDateTime;
use time::macros::format_description;

/// Routes `log` records to `path`. The terminal owns stdout, so nothing is
/// echoed there. `Off` installs no logger and creates no file.
pub fn init(level: log::LevelFilter, path: &Path) -> Result<()> {
    if level == log::LevelFilter::Off {
        return Ok(());
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = fern::log_file(path).with_context(|| {
        format!(
            "open log file {} -- set [logging].file to a writable path",
            path.display()
        )
    })?;

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}][thread {}] {}",
                timestamp(OffsetDateTime::now_utc()),
                record.target(),
                record.level(),
                thread::current().name().unwrap_or("unnamed"),
                message
            ))
        })
        .level(level)
        .chain(file)
        .apply()
        .context("install logger")?;
    Ok(())
}

fn timestamp(now: OffsetDateTime) -> String {
    now.format(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    ))
    .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

#[cfg(test)]
mod tests {
    use super::{init, timestamp};
    use anyhow::Result;
    use time::macros::datetime;

    #[test]
    fn timestamps_are_utc_with_millis() {
        let now = datetime!(2026-03-14 09:26:53.589 UTC);
        assert_eq!(timestamp(now), "2026-03-14T09:26:53.589Z");
    }

    #[test]
    fn off_level_creates_no_log_file() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("nested").join("regform.log");
        init(log::LevelFilter::Off, &path)?;
        assert!(!path.exists());
        assert!(!path.parent().is_some_and(|dir| dir.exists()));
        Ok(())
    }
}
