//! Typed scheduling options.
//!
//! Each option is parsed once from its raw configuration text; the scheduler
//! factory only ever sees these validated values.

use serde::{Deserialize, Serialize};

use crate::{CompileError, Result};

/// Tree-stable window, in seconds, for the default scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixedWindow(u64);

impl FixedWindow {
    /// Window used when the configured value is `0`.
    pub const DEFAULT_SECS: u64 = 600;

    /// Parse a raw timer value. `0` means the default window, anything
    /// below zero or non-numeric is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let value: i64 = raw
            .trim()
            .parse()
            .map_err(|_| CompileError::scheduler("default scheduler", raw))?;
        Self::from_secs(value).ok_or_else(|| CompileError::scheduler("default scheduler", raw))
    }

    pub fn from_secs(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self(Self::DEFAULT_SECS)),
            v if v < 1 => None,
            v => Some(Self(v as u64)),
        }
    }

    pub fn secs(&self) -> u64 {
        self.0
    }
}

/// Period, in minutes, of the periodic scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Period(u64);

impl Period {
    pub fn parse(raw: &str) -> Result<Self> {
        let minutes: i64 = raw
            .trim()
            .parse()
            .map_err(|_| CompileError::scheduler("periodic scheduler", raw))?;
        if minutes < 1 {
            return Err(CompileError::scheduler("periodic scheduler", raw));
        }
        Ok(Self(minutes as u64))
    }

    pub fn minutes(&self) -> u64 {
        self.0
    }

    pub fn secs(&self) -> u64 {
        self.0 * 60
    }
}

/// One field of a cron expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CronField {
    /// `*`
    Any,
    Value(u32),
}

impl std::fmt::Display for CronField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CronField::Any => write!(f, "*"),
            CronField::Value(v) => write!(f, "{}", v),
        }
    }
}

/// Five-field cron schedule: minute, hour, day of month, month, day of week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronSpec {
    pub minute: CronField,
    pub hour: CronField,
    pub day_of_month: CronField,
    pub month: CronField,
    pub day_of_week: CronField,
}

impl CronSpec {
    pub fn fields(&self) -> [CronField; 5] {
        [
            self.minute,
            self.hour,
            self.day_of_month,
            self.month,
            self.day_of_week,
        ]
    }
}

impl std::str::FromStr for CronSpec {
    type Err = CompileError;

    /// Tokens past the fifth are ignored.
    fn from_str(raw: &str) -> Result<Self> {
        let fields = raw
            .split_whitespace()
            .take(5)
            .map(|token| match token {
                "*" => Ok(CronField::Any),
                n => n
                    .parse()
                    .map(CronField::Value)
                    .map_err(|_| CompileError::scheduler("cron scheduler", raw)),
            })
            .collect::<Result<Vec<_>>>()?;

        match fields[..] {
            [minute, hour, day_of_month, month, day_of_week] => Ok(CronSpec {
                minute,
                hour,
                day_of_month,
                month,
                day_of_week,
            }),
            _ => Err(CompileError::scheduler("cron scheduler", raw)),
        }
    }
}

impl std::fmt::Display for CronSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.minute, self.hour, self.day_of_month, self.month, self.day_of_week
        )
    }
}
