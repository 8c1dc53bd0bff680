//! 生產日曆與 ISO 週標籤

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ISO 週標籤（例如 `2025-W47`）
///
/// 排序依照 (ISO 年, 週次)，因此 `BTreeMap<WeekLabel, _>` 會按時間順序迭代。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct WeekLabel {
    year: i32,
    week: u32,
}

impl WeekLabel {
    /// 由年份與週次建立（週次需介於 1-53）
    pub fn new(year: i32, week: u32) -> Option<Self> {
        if (1..=53).contains(&week) {
            Some(Self { year, week })
        } else {
            None
        }
    }

    /// 取得日期所屬的 ISO 週
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// ISO 年
    pub fn year(&self) -> i32 {
        self.year
    }

    /// ISO 週次
    pub fn week(&self) -> u32 {
        self.week
    }
}

impl fmt::Display for WeekLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

/// 週標籤解析錯誤
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("無效的週標籤: {0}")]
pub struct WeekLabelParseError(String);

impl FromStr for WeekLabel {
    type Err = WeekLabelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WeekLabelParseError(s.to_string());
        let (year, week) = s.trim().split_once("-W").ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let week = week.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, week).ok_or_else(invalid)
    }
}

impl From<WeekLabel> for String {
    fn from(label: WeekLabel) -> Self {
        label.to_string()
    }
}

impl TryFrom<String> for WeekLabel {
    type Error = WeekLabelParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// 下一個日曆日（排程不區分工作日，逐日順延）
///
/// 日期溢出時回傳 `None`，呼叫端應視為無法再順延。
pub fn next_day(date: NaiveDate) -> Option<NaiveDate> {
    date.succ_opt()
}
