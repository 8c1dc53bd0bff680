//! 生產中心模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;
use crate::{RecordKind, ValidationError};

/// 中心角色（主中心 / 次中心）
///
/// 角色只影響平手時的預設偏好與週比例的方向，不影響排程正確性。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CenterRole {
    Primary,
    Secondary,
}

impl CenterRole {
    /// 另一個中心
    pub fn other(self) -> Self {
        match self {
            CenterRole::Primary => CenterRole::Secondary,
            CenterRole::Secondary => CenterRole::Primary,
        }
    }
}

/// 依中心角色存放的一組值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerCenter<T> {
    pub primary: T,
    pub secondary: T,
}

impl<T> PerCenter<T> {
    pub fn new(primary: T, secondary: T) -> Self {
        Self { primary, secondary }
    }

    pub fn get(&self, role: CenterRole) -> &T {
        match role {
            CenterRole::Primary => &self.primary,
            CenterRole::Secondary => &self.secondary,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> PerCenter<U> {
        PerCenter {
            primary: f(&self.primary),
            secondary: f(&self.secondary),
        }
    }
}

/// 產能主檔紀錄（由匯入端提供，數值已正規化）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityRecord {
    /// 中心代碼
    pub center: String,

    /// 每日可用工時
    pub daily_hours: Option<Decimal>,
}

impl CapacityRecord {
    pub fn new(center: impl Into<String>, daily_hours: Decimal) -> Self {
        Self {
            center: center.into(),
            daily_hours: Some(daily_hours),
        }
    }
}

/// 生產中心
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CenterProfile {
    /// 正規化後的中心代碼
    pub code: String,

    /// 角色
    pub role: CenterRole,

    /// 每日產能（小時），0 表示該中心無法生產
    pub daily_capacity_hours: Decimal,
}

impl CenterProfile {
    /// 是否沒有任何產能
    pub fn has_no_capacity(&self) -> bool {
        self.daily_capacity_hours <= Decimal::ZERO
    }
}

/// 恰好兩個中心的名冊
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CenterRoster {
    centers: PerCenter<CenterProfile>,
}

impl CenterRoster {
    /// 由產能主檔建立中心名冊
    ///
    /// 同一中心有多筆紀錄時取最大工時。主中心為代碼以 `primary_suffix`
    /// 結尾的第一個中心（否則取第一個），次中心為以 `secondary_suffix`
    /// 結尾且非主中心的第一個中心（否則取最後一個）。
    pub fn from_records(
        records: &[CapacityRecord],
        config: &SchedulerConfig,
    ) -> Result<Self, ValidationError> {
        // 保留首次出現順序
        let mut codes: Vec<(String, Decimal)> = Vec::new();

        for record in records {
            let code = normalize_code(&record.center);
            if code.is_empty() {
                return Err(ValidationError::MissingField {
                    record: RecordKind::Capacity,
                    key: record.center.clone(),
                    field: "center",
                });
            }

            let hours = record.daily_hours.ok_or_else(|| ValidationError::MissingField {
                record: RecordKind::Capacity,
                key: code.clone(),
                field: "daily_hours",
            })?;

            if hours < Decimal::ZERO {
                return Err(ValidationError::InvalidValue {
                    record: RecordKind::Capacity,
                    key: code,
                    field: "daily_hours",
                    reason: format!("不可為負值 ({})", hours),
                });
            }

            match codes.iter_mut().find(|(c, _)| *c == code) {
                Some((_, existing)) => *existing = (*existing).max(hours),
                None => codes.push((code, hours)),
            }
        }

        if codes.len() != 2 {
            return Err(ValidationError::CenterCount(codes.len()));
        }

        let primary_idx = codes
            .iter()
            .position(|(c, _)| c.ends_with(&config.primary_suffix))
            .unwrap_or(0);

        let secondary_idx = codes
            .iter()
            .enumerate()
            .position(|(i, (c, _))| i != primary_idx && c.ends_with(&config.secondary_suffix))
            .unwrap_or(1 - primary_idx);

        let profile = |idx: usize, role: CenterRole| CenterProfile {
            code: codes[idx].0.clone(),
            role,
            daily_capacity_hours: codes[idx].1,
        };

        Ok(Self {
            centers: PerCenter::new(
                profile(primary_idx, CenterRole::Primary),
                profile(secondary_idx, CenterRole::Secondary),
            ),
        })
    }

    /// 依角色取得中心
    pub fn profile(&self, role: CenterRole) -> &CenterProfile {
        self.centers.get(role)
    }

    /// 依代碼查找角色
    pub fn role_of(&self, code: &str) -> Option<CenterRole> {
        let code = normalize_code(code);
        [CenterRole::Primary, CenterRole::Secondary]
            .into_iter()
            .find(|&role| self.centers.get(role).code == code)
    }

    /// 依角色取得中心代碼
    pub fn code(&self, role: CenterRole) -> &str {
        &self.centers.get(role).code
    }

    /// 每日基礎產能
    pub fn daily_capacity(&self, role: CenterRole) -> Decimal {
        self.centers.get(role).daily_capacity_hours
    }
}

/// 正規化中心代碼
pub fn normalize_code(code: &str) -> String {
    code.trim().to_string()
}
