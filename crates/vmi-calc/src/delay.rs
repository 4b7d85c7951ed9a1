//! 交期與延遲判定

use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use vmi_core::{Order, OrderStatus, StockItem, Supplier};

/// 顯示狀態：儲存狀態疊加即時推導的「延遲中」
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStatus {
    /// 依儲存狀態顯示
    Stored(OrderStatus),
    /// 未終結且已超過預期交期
    Late,
}

/// 延遲判定計算器
///
/// 延遲是推導值，不是儲存欄位：`today` 由呼叫端注入，每次讀取
/// 重新計算，不得快取。
pub struct DelayCalculator;

impl DelayCalculator {
    /// 解析一筆明細適用的交期天數
    ///
    /// 舊資料把補貨批量欄位同時當作交期天數使用（兩者單位並不
    /// 相同）；為相容保留：批量為正時優先採用，否則退回供應商的
    /// 平均交期。兩者皆缺時無法判定交期。
    pub fn resolve_lead_time_days(
        item: Option<&StockItem>,
        supplier: Option<&Supplier>,
    ) -> Option<u32> {
        if let Some(item) = item {
            if item.replenishment_lot_size > Decimal::ZERO {
                return item.replenishment_lot_size.to_u32();
            }
        }

        supplier
            .and_then(|supplier| supplier.average_lead_time_days)
            .filter(|days| *days > 0)
    }

    /// 判定訂單是否延遲
    ///
    /// 終結狀態（已收貨／已結案／已取消）不再判定。任一明細能解析
    /// 出交期且 `today` 晚於「建立日 + 交期」即視為延遲。
    pub fn is_late(
        order: &Order,
        items: &[StockItem],
        supplier: Option<&Supplier>,
        today: NaiveDate,
    ) -> bool {
        if order.status.is_terminal() {
            return false;
        }

        for line in &order.line_items {
            let item = items.iter().find(|item| item.id == line.stock_item_id);
            let Some(lead_time_days) = Self::resolve_lead_time_days(item, supplier) else {
                continue;
            };

            let expected_delivery = order.created_on + Duration::days(i64::from(lead_time_days));
            if today > expected_delivery {
                return true;
            }
        }

        false
    }

    /// 計算顯示狀態：未終結且延遲中顯示 Late，否則顯示儲存狀態
    pub fn display_status(
        order: &Order,
        items: &[StockItem],
        supplier: Option<&Supplier>,
        today: NaiveDate,
    ) -> DisplayStatus {
        if !order.status.is_terminal() && Self::is_late(order, items, supplier, today) {
            return DisplayStatus::Late;
        }
        DisplayStatus::Stored(order.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use vmi_core::{OrderLineItem, OrderType};

    fn order_with_line(created_on: NaiveDate, item: &StockItem) -> Order {
        Order::new(
            "2025060001".to_string(),
            OrderType::Manual,
            Uuid::new_v4(),
            "Fornecedor".to_string(),
            created_on,
        )
        .with_line_items(vec![OrderLineItem::new(
            item.id,
            item.description.clone(),
            Decimal::from(10),
            Decimal::from(2),
        )])
    }

    fn item_with_lot(lot: i64) -> StockItem {
        StockItem::new("IT-1".to_string(), "Item".to_string(), Decimal::from(5))
            .with_replenishment_lot(Decimal::from(lot))
    }

    #[test]
    fn test_lead_time_prefers_item_lot_days() {
        let item = item_with_lot(5);
        let supplier = Supplier::new("F".to_string()).with_average_lead_time(12);

        assert_eq!(
            DelayCalculator::resolve_lead_time_days(Some(&item), Some(&supplier)),
            Some(5)
        );
    }

    #[test]
    fn test_lead_time_falls_back_to_supplier() {
        let item = item_with_lot(0);
        let supplier = Supplier::new("F".to_string()).with_average_lead_time(12);

        assert_eq!(
            DelayCalculator::resolve_lead_time_days(Some(&item), Some(&supplier)),
            Some(12)
        );
        assert_eq!(DelayCalculator::resolve_lead_time_days(None, None), None);
    }

    #[test]
    fn test_late_depends_on_injected_today() {
        let item = item_with_lot(5);
        let created_on = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let order = order_with_line(created_on, &item);
        let items = vec![item];

        // 交期 5 天 → 預期 6/6；6/6 還不算延遲，6/7 起算
        let on_time = NaiveDate::from_ymd_opt(2025, 6, 6).unwrap();
        let late = NaiveDate::from_ymd_opt(2025, 6, 7).unwrap();

        assert!(!DelayCalculator::is_late(&order, &items, None, on_time));
        assert!(DelayCalculator::is_late(&order, &items, None, late));

        // 同一筆訂單、不同的 today：結果必須跟著改變（不可快取）
        assert_eq!(
            DelayCalculator::display_status(&order, &items, None, on_time),
            DisplayStatus::Stored(OrderStatus::Open)
        );
        assert_eq!(
            DelayCalculator::display_status(&order, &items, None, late),
            DisplayStatus::Late
        );
    }

    #[test]
    fn test_terminal_orders_are_never_late() {
        let item = item_with_lot(5);
        let created_on = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut order = order_with_line(created_on, &item);
        order.status = OrderStatus::Received;
        let items = vec![item];

        let far_future = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(!DelayCalculator::is_late(&order, &items, None, far_future));
        assert_eq!(
            DelayCalculator::display_status(&order, &items, None, far_future),
            DisplayStatus::Stored(OrderStatus::Received)
        );
    }

    #[test]
    fn test_no_resolvable_lead_time_is_never_late() {
        let item = item_with_lot(0);
        let created_on = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let order = order_with_line(created_on, &item);
        let items = vec![item];

        let far_future = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(!DelayCalculator::is_late(&order, &items, None, far_future));
    }
}
