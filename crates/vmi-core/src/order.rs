//! 訂單模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 訂單類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    /// 自動補貨
    Automatic,
    /// 手動建立
    Manual,
}

/// 訂單狀態（儲存值）
///
/// 「延遲中」不是儲存狀態：它由建立日、交期與當天日期即時推導，
/// 每次讀取重新計算。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// 開立中
    Open,
    /// 已核准
    Approved,
    /// 已收貨
    Received,
    /// 已收貨（收貨當下已延遲）
    ReceivedLate,
    /// 已結案
    Attended,
    /// 已取消
    Cancelled,
}

impl OrderStatus {
    /// 檢查是否為終結狀態（不再參與延遲判定）
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Received
                | OrderStatus::ReceivedLate
                | OrderStatus::Attended
                | OrderStatus::Cancelled
        )
    }

    /// 檢查是否為未結訂單
    pub fn is_open(&self) -> bool {
        matches!(self, OrderStatus::Open | OrderStatus::Approved)
    }
}

/// 訂單明細
///
/// 一筆明細屬於且僅屬於一張訂單；訂單擁有其明細，回滾訂單時
/// 明細一併移除。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineItem {
    /// 明細ID
    pub id: Uuid,

    /// 庫存項目ID
    pub stock_item_id: Uuid,

    /// 品名描述（下單當下的快照）
    pub description: String,

    /// 訂購數量
    pub quantity: Decimal,

    /// 單價
    pub unit_price: Decimal,

    /// 小計（數量 × 單價，建立時計算）
    pub subtotal: Decimal,
}

impl OrderLineItem {
    /// 創建新的訂單明細（小計由數量與單價計算，不接受外部值）
    pub fn new(
        stock_item_id: Uuid,
        description: String,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            stock_item_id,
            description,
            quantity,
            unit_price,
            subtotal: quantity * unit_price,
        }
    }
}

/// 訂單
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// 訂單ID
    pub id: Uuid,

    /// 訂單序號（YYYYMM + 四位流水號）
    pub number: String,

    /// 訂單類型
    pub order_type: OrderType,

    /// 狀態
    pub status: OrderStatus,

    /// 供應商ID
    pub supplier_id: Uuid,

    /// 供應商名稱（下單當下的快照）
    pub supplier_name: String,

    /// 建立日期
    pub created_on: NaiveDate,

    /// 備註
    pub notes: String,

    /// 總額（Σ 明細小計，建立時重新計算，不採信呼叫端數值）
    pub total_value: Decimal,

    /// 明細
    pub line_items: Vec<OrderLineItem>,

    /// 建立者
    pub created_by: Option<Uuid>,
}

impl Order {
    /// 創建新的訂單（狀態為開立中，無明細）
    pub fn new(
        number: String,
        order_type: OrderType,
        supplier_id: Uuid,
        supplier_name: String,
        created_on: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            number,
            order_type,
            status: OrderStatus::Open,
            supplier_id,
            supplier_name,
            created_on,
            notes: String::new(),
            total_value: Decimal::ZERO,
            line_items: Vec::new(),
            created_by: None,
        }
    }

    /// 建構器模式：設置備註
    pub fn with_notes(mut self, notes: String) -> Self {
        self.notes = notes;
        self
    }

    /// 建構器模式：設置建立者
    pub fn with_created_by(mut self, user_id: Uuid) -> Self {
        self.created_by = Some(user_id);
        self
    }

    /// 建構器模式：設置明細並重算總額
    pub fn with_line_items(mut self, line_items: Vec<OrderLineItem>) -> Self {
        self.line_items = line_items;
        self.recompute_total();
        self
    }

    /// 由明細重算總額
    pub fn recompute_total(&mut self) {
        self.total_value = self
            .line_items
            .iter()
            .map(|line| line.quantity * line.unit_price)
            .sum();
    }

    /// 檢查是否為自動補貨訂單
    pub fn is_automatic(&self) -> bool {
        self.order_type == OrderType::Automatic
    }
}
