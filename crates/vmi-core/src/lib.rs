//! # VMI Core
//!
//! 核心資料模型與類型定義

pub mod audit;
pub mod item;
pub mod numeric;
pub mod order;
pub mod supplier;

// Re-export 主要類型
pub use audit::{Actor, AuditEntry};
pub use item::StockItem;
pub use numeric::normalize;
pub use order::{Order, OrderLineItem, OrderStatus, OrderType};
pub use supplier::Supplier;

/// VMI 錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum VmiError {
    #[error("驗證失敗: {0}")]
    Validation(String),

    #[error("找不到供應商: {0}")]
    SupplierNotFound(String),

    #[error("供應商已停用: {0}")]
    SupplierInactive(String),

    #[error("找不到庫存項目: {0}")]
    ItemNotFound(String),

    #[error("外部協作者錯誤: {0}")]
    Dependency(String),

    #[error("其他錯誤: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, VmiError>;
