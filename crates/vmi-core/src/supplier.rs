//! 供應商模型

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 供應商
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    /// 供應商ID
    pub id: Uuid,

    /// 名稱
    pub name: String,

    /// 平均交期（天）
    pub average_lead_time_days: Option<u32>,

    /// 是否啟用（停用的供應商不可建立訂單）
    pub is_active: bool,
}

impl Supplier {
    /// 創建新的供應商
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            average_lead_time_days: None,
            is_active: true,
        }
    }

    /// 建構器模式：設置平均交期
    pub fn with_average_lead_time(mut self, days: u32) -> Self {
        self.average_lead_time_days = Some(days);
        self
    }

    /// 建構器模式：設置為停用
    pub fn as_inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}
