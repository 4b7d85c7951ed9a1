//! 稽核紀錄模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 操作者
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// 使用者ID
    pub id: Uuid,

    /// 電子郵件
    pub email: String,

    /// 角色
    pub role: String,
}

impl Actor {
    /// 創建新的操作者
    pub fn new(id: Uuid, email: String, role: String) -> Self {
        Self { id, email, role }
    }
}

/// 稽核紀錄
///
/// 每次成功的建立／更新／收貨之後寫入一筆；寫入失敗不影響
/// 主要操作的結果。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// 紀錄ID
    pub id: Uuid,

    /// 操作者
    pub actor: Actor,

    /// 動作（如「建立」「收貨」）
    pub action: String,

    /// 實體（如「訂單」「庫存」）
    pub entity: String,

    /// 說明
    pub details: String,

    /// 變更前快照
    pub before: Option<serde_json::Value>,

    /// 變更後快照
    pub after: Option<serde_json::Value>,

    /// 記錄時間
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    /// 創建新的稽核紀錄
    pub fn new(
        actor: Actor,
        action: String,
        entity: String,
        details: String,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor,
            action,
            entity,
            details,
            before: None,
            after: None,
            recorded_at,
        }
    }

    /// 建構器模式：設置變更前快照
    pub fn with_before(mut self, before: serde_json::Value) -> Self {
        self.before = Some(before);
        self
    }

    /// 建構器模式：設置變更後快照
    pub fn with_after(mut self, after: serde_json::Value) -> Self {
        self.after = Some(after);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_audit_entry() {
        let actor = Actor::new(
            Uuid::new_v4(),
            "gestor@example.com".to_string(),
            "admin".to_string(),
        );
        let entry = AuditEntry::new(
            actor,
            "建立".to_string(),
            "訂單".to_string(),
            "訂單 2025060001 已建立".to_string(),
            Utc::now(),
        )
        .with_after(serde_json::json!({ "numero": "2025060001" }));

        assert_eq!(entry.action, "建立");
        assert_eq!(entry.entity, "訂單");
        assert!(entry.before.is_none());
        assert!(entry.after.is_some());
    }
}
