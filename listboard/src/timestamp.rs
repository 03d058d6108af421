//! Local wall-clock timestamps as they appear in the snapshot files.
//!
//! Todos are stamped to the minute (`2025-01-31 09:15`), chat messages to the
//! second (`2025-01-31 09:15:42`).

use chrono::{Local, NaiveDateTime, Timelike};

pub const MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const SECOND_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time truncated to the minute.
pub fn now_to_minute() -> NaiveDateTime {
    let now = now_to_second();
    now.with_second(0).unwrap_or(now)
}

/// Current local time truncated to the second.
pub fn now_to_second() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

macro_rules! serde_format {
    ($name:ident, $format:expr) => {
        pub mod $name {
            use chrono::NaiveDateTime;
            use serde::{Deserialize, Deserializer, Serializer};

            pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.collect_str(&value.format($format))
            }

            pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                NaiveDateTime::parse_from_str(&raw, $format).map_err(serde::de::Error::custom)
            }
        }
    };
}

serde_format!(minutes, super::MINUTE_FORMAT);
serde_format!(seconds, super::SECOND_FORMAT);
