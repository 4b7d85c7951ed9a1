//! # VMI Store
//!
//! 外部協作者介面與訂單服務。持久層、稽核與時鐘都以介面注入，
//! 引擎把它們當黑盒使用；服務本身不保存任何跨呼叫狀態。

pub mod memory;
pub mod service;

// Re-export 主要類型
pub use memory::{FixedClock, MemoryAuditSink, MemoryStore};
pub use service::{AutomaticOrderOutcome, OrderDraft, OrderService};

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;
use vmi_core::{AuditEntry, Order, OrderLineItem, OrderStatus, Result, StockItem};

/// 訂單持久層協作者
///
/// 由外部儲存服務實作。底層不提供跨表交易；`createOrder` 的原子性
/// 由服務層以補償動作模擬（主檔 → 明細 → 失敗時刪主檔）。
/// 訂單序號在各自然月內的唯一性由實作方的約束把關。
pub trait OrderStore {
    /// 寫入訂單主檔，回傳其識別碼
    fn insert_order_header(&self, order: &Order) -> Result<Uuid>;

    /// 寫入訂單明細（需先有主檔識別碼）
    fn insert_order_line_items(&self, order_id: Uuid, lines: &[OrderLineItem]) -> Result<()>;

    /// 刪除訂單主檔（補償動作用）
    fn delete_order_header(&self, order_id: Uuid) -> Result<()>;

    /// 查詢指定前綴下字典序最大的訂單序號
    fn query_max_order_number_with_prefix(&self, prefix: &str) -> Result<Option<String>>;

    /// 讀取庫存項目
    fn fetch_stock_item(&self, id: Uuid) -> Result<Option<StockItem>>;

    /// 更新庫存項目
    fn update_stock_item(&self, item: &StockItem) -> Result<()>;

    /// 更新訂單狀態
    fn update_order_status(&self, order_id: Uuid, status: OrderStatus) -> Result<()>;
}

/// 稽核協作者
///
/// 在成功的建立／更新／收貨之後寫入；寫入失敗只記錄，不影響
/// 主要操作的成敗。
pub trait AuditSink {
    /// 寫入一筆稽核紀錄
    fn record(&self, entry: &AuditEntry) -> Result<()>;
}

/// 時鐘協作者：注入以便測試控制日期與毫秒讀數
pub trait Clock {
    /// 今天的日期
    fn today(&self) -> NaiveDate;

    /// 現在的時間
    fn now_utc(&self) -> DateTime<Utc>;

    /// 毫秒級時鐘讀數（序號降級時使用）
    fn epoch_millis(&self) -> i64 {
        self.now_utc().timestamp_millis()
    }
}

/// 系統時鐘
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
