//! 庫存項目模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::numeric::{lenient_decimal, normalize};

/// 庫存項目
///
/// 引擎只讀取庫存項目，維護（建立、編輯）由外部應用負責。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockItem {
    /// 項目ID
    pub id: Uuid,

    /// 項目代碼
    pub code: String,

    /// 品名描述
    pub description: String,

    /// 現有數量
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub quantity_on_hand: Decimal,

    /// 下限（0 表示未設定下限）
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub minimum_level: Decimal,

    /// 上限（0 表示未設定上限）
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub maximum_level: Decimal,

    /// 補貨批量（訂購量向上取整至此倍數；0 視為 1）
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub replenishment_lot_size: Decimal,

    /// 採購價
    pub purchase_price: Option<Decimal>,

    /// 單位成本
    pub unit_cost: Option<Decimal>,

    /// 供應商ID（無供應商者不納入自動補貨）
    pub supplier_id: Option<Uuid>,

    /// 是否啟用（停用者不納入自動補貨）
    pub is_active: bool,
}

impl StockItem {
    /// 創建新的庫存項目
    pub fn new(code: String, description: String, quantity_on_hand: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            code,
            description,
            quantity_on_hand,
            minimum_level: Decimal::ZERO,
            maximum_level: Decimal::ZERO,
            replenishment_lot_size: Decimal::ZERO,
            purchase_price: None,
            unit_cost: None,
            supplier_id: None,
            is_active: true,
        }
    }

    /// 建構器模式：設置上下限
    pub fn with_levels(mut self, minimum_level: Decimal, maximum_level: Decimal) -> Self {
        self.minimum_level = minimum_level;
        self.maximum_level = maximum_level;
        self
    }

    /// 建構器模式：設置補貨批量
    pub fn with_replenishment_lot(mut self, lot_size: Decimal) -> Self {
        self.replenishment_lot_size = lot_size;
        self
    }

    /// 建構器模式：設置採購價
    pub fn with_purchase_price(mut self, price: Decimal) -> Self {
        self.purchase_price = Some(price);
        self
    }

    /// 建構器模式：設置單位成本
    pub fn with_unit_cost(mut self, cost: Decimal) -> Self {
        self.unit_cost = Some(cost);
        self
    }

    /// 建構器模式：設置供應商
    pub fn with_supplier(mut self, supplier_id: Uuid) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    /// 建構器模式：設置為停用
    pub fn as_inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// 回傳數值欄位皆已正規化的副本（負值截斷為 0）
    pub fn normalized(&self) -> Self {
        let mut item = self.clone();
        item.quantity_on_hand = normalize(self.quantity_on_hand);
        item.minimum_level = normalize(self.minimum_level);
        item.maximum_level = normalize(self.maximum_level);
        item.replenishment_lot_size = normalize(self.replenishment_lot_size);
        item.purchase_price = self.purchase_price.map(normalize);
        item.unit_cost = self.unit_cost.map(normalize);
        item
    }

    /// 檢查是否設有下限且低於下限
    pub fn is_below_minimum(&self) -> bool {
        self.minimum_level > Decimal::ZERO && self.quantity_on_hand < self.minimum_level
    }

    /// 有效補貨批量（未設定或 0 視為 1）
    pub fn effective_lot_size(&self) -> Decimal {
        if self.replenishment_lot_size > Decimal::ZERO {
            self.replenishment_lot_size
        } else {
            Decimal::ONE
        }
    }
}
