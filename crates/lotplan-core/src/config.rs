//! 排程配置模型

use serde::{Deserialize, Serialize};

use crate::{PlanError, RecordKind, ValidationError};

/// 排程器參數配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// 每個批次最多順延的天數（安全上限，保證迴圈終止）
    pub max_day_advances: u32,

    /// 產出數量的小數位數
    pub quantity_scale: u32,

    /// 主中心代碼後綴
    pub primary_suffix: String,

    /// 次中心代碼後綴
    pub secondary_suffix: String,

    /// 週比例表未涵蓋的週，成本平手時使用的主中心機率（0-100）
    pub default_tie_break_pct: u8,
}

impl SchedulerConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self {
            max_day_advances: 365,
            quantity_scale: 2,
            primary_suffix: "833".to_string(),
            secondary_suffix: "184".to_string(),
            default_tie_break_pct: 50,
        }
    }

    /// 從 JSON 文件載入配置（缺少的欄位使用預設值）
    ///
    /// ```
    /// # use lotplan_core::SchedulerConfig;
    /// let config = SchedulerConfig::from_json_str(r#"{ "max_day_advances": 30 }"#).unwrap();
    /// assert_eq!(config.max_day_advances, 30);
    /// assert_eq!(config.quantity_scale, 2);
    /// ```
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| PlanError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置順延上限
    pub fn with_max_day_advances(mut self, days: u32) -> Self {
        self.max_day_advances = days;
        self
    }

    /// 建構器模式：設置數量小數位數
    pub fn with_quantity_scale(mut self, scale: u32) -> Self {
        self.quantity_scale = scale;
        self
    }

    /// 建構器模式：設置中心代碼後綴
    pub fn with_center_suffixes(
        mut self,
        primary: impl Into<String>,
        secondary: impl Into<String>,
    ) -> Self {
        self.primary_suffix = primary.into();
        self.secondary_suffix = secondary.into();
        self
    }

    /// 建構器模式：設置預設平手機率
    pub fn with_default_tie_break_pct(mut self, pct: u8) -> Self {
        self.default_tie_break_pct = pct;
        self
    }

    /// 檢查配置是否合法
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_tie_break_pct > 100 {
            return Err(ValidationError::InvalidValue {
                record: RecordKind::Config,
                key: "scheduler".to_string(),
                field: "default_tie_break_pct",
                reason: format!("{} 超出 0-100 範圍", self.default_tie_break_pct),
            });
        }

        // Decimal 最多 28 位小數
        if self.quantity_scale > 28 {
            return Err(ValidationError::InvalidValue {
                record: RecordKind::Config,
                key: "scheduler".to_string(),
                field: "quantity_scale",
                reason: format!("{} 超過 28 位", self.quantity_scale),
            });
        }

        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::new()
    }
}
