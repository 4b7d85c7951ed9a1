//! 自動補貨計算

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vmi_core::{normalize, StockItem};

use crate::ReplenishmentPlan;

/// 低於下限且未設有效上限時的補貨目標倍率（1.5 倍下限）
const FLOOR_TARGET_FACTOR: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// 補貨原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplenishmentReason {
    /// 低於下限，優先脫離缺貨
    BelowMinimum,
    /// 補足至上限
    TopUpToMaximum,
}

/// 單價解析器
///
/// 單價由外部目錄提供；計算引擎本身不得捏造價格。
pub trait PriceResolver {
    /// 解析項目的單價
    fn resolve(&self, item: &StockItem) -> Decimal;
}

/// 以目錄上已登錄的價格解析：採購價優先，其次單位成本，皆缺為 0
pub struct RecordedPrice;

impl PriceResolver for RecordedPrice {
    fn resolve(&self, item: &StockItem) -> Decimal {
        item.purchase_price
            .or(item.unit_cost)
            .map(normalize)
            .unwrap_or(Decimal::ZERO)
    }
}

/// 補貨明細（每個需補貨的項目一筆）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplenishmentLine {
    /// 庫存項目ID
    pub stock_item_id: Uuid,

    /// 供應商ID
    pub supplier_id: Uuid,

    /// 品名描述
    pub description: String,

    /// 訂購數量（已按補貨批量向上取整）
    pub quantity_to_order: Decimal,

    /// 單價
    pub unit_price: Decimal,

    /// 補貨原因
    pub reason: ReplenishmentReason,
}

/// 自動補貨計算器
pub struct ReplenishmentPlanner;

impl ReplenishmentPlanner {
    /// 計算自動補貨計劃
    ///
    /// 只評估、不落單：產出的計劃交由呼叫端確認（可附備註）後再
    /// 建立訂單，本操作不得寫入任何持久資料。
    ///
    /// 資格條件：啟用中、設有供應商，且低於下限，或（設有下限且
    /// 現量介於下限與上限之間）。停用、無供應商的項目一律排除。
    pub fn plan(items: &[StockItem], resolver: &dyn PriceResolver) -> ReplenishmentPlan {
        let start_time = std::time::Instant::now();
        let mut lines = Vec::new();
        let mut eligible = 0usize;

        for raw in items {
            let item = raw.normalized();

            if !Self::is_eligible(&item) {
                continue;
            }
            eligible += 1;

            let (Some(supplier_id), Some(quantity)) =
                (item.supplier_id, Self::order_quantity(&item))
            else {
                continue;
            };

            let reason = if item.is_below_minimum() {
                ReplenishmentReason::BelowMinimum
            } else {
                ReplenishmentReason::TopUpToMaximum
            };

            lines.push(ReplenishmentLine {
                stock_item_id: item.id,
                supplier_id,
                description: item.description.clone(),
                quantity_to_order: quantity,
                unit_price: normalize(resolver.resolve(&item)),
                reason,
            });
        }

        tracing::info!(
            "補貨計算完成：評估 {} 項，符合資格 {} 項，產出明細 {} 筆",
            items.len(),
            eligible,
            lines.len()
        );

        ReplenishmentPlan {
            lines,
            evaluated: items.len(),
            eligible,
            calculation_time_ms: Some(start_time.elapsed().as_millis()),
        }
    }

    /// 補貨資格判定
    fn is_eligible(item: &StockItem) -> bool {
        if !item.is_active || item.supplier_id.is_none() {
            return false;
        }

        let below_minimum = item.is_below_minimum();
        // 「補足至上限」僅適用於同時設有下限的項目
        let top_up_to_maximum = item.minimum_level > Decimal::ZERO
            && item.maximum_level > Decimal::ZERO
            && item.quantity_on_hand >= item.minimum_level
            && item.quantity_on_hand < item.maximum_level;

        below_minimum || top_up_to_maximum
    }

    /// 計算訂購量（已按補貨批量向上取整）；不需補貨時為 None
    fn order_quantity(item: &StockItem) -> Option<Decimal> {
        let lot = item.effective_lot_size();
        let needed = Self::needed_quantity(item, lot);

        let mut quantity = Decimal::ZERO;
        if needed > Decimal::ZERO {
            quantity = ceil_to_multiple(needed, lot);
        }

        // 低於下限的項目不得被略過：取整後仍為 0 時至少補一個批量
        if quantity <= Decimal::ZERO && item.is_below_minimum() {
            quantity = lot;
        }

        (quantity > Decimal::ZERO).then_some(quantity)
    }

    /// 需求量
    ///
    /// 低於下限：補貨目標為上限（若上限大於下限），否則 1.5 倍下限；
    /// 目標已不高於現量（退化參數）時仍需至少一個批量脫離缺貨。
    /// 未低於下限：設有上限且未達上限時補足差額，否則不補。
    fn needed_quantity(item: &StockItem, lot: Decimal) -> Decimal {
        if item.is_below_minimum() {
            let target = if item.maximum_level > item.minimum_level {
                item.maximum_level
            } else {
                item.minimum_level * FLOOR_TARGET_FACTOR
            };
            let needed = (target - item.quantity_on_hand).max(Decimal::ZERO);
            if needed <= Decimal::ZERO {
                lot
            } else {
                needed
            }
        } else if item.maximum_level > Decimal::ZERO
            && item.quantity_on_hand < item.maximum_level
        {
            item.maximum_level - item.quantity_on_hand
        } else {
            Decimal::ZERO
        }
    }
}

/// 向上取整至批量的整數倍
fn ceil_to_multiple(value: Decimal, multiple: Decimal) -> Decimal {
    (value / multiple).ceil() * multiple
}
