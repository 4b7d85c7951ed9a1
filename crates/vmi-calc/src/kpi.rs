//! 營運指標彙總

use vmi_core::{Order, StockItem, Supplier};

/// 營運指標
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kpis {
    /// 項目總數
    pub total_items: usize,

    /// 現量不高於下限的項目數
    pub items_below_minimum: usize,

    /// 未結訂單數
    pub open_orders: usize,

    /// 供應商平均交期（天，四捨五入；未填交期者以 0 計入平均）
    pub average_lead_time_days: u32,
}

/// 指標計算器
pub struct KpiCalculator;

impl KpiCalculator {
    /// 彙總目錄、訂單與供應商的營運指標
    pub fn calculate(items: &[StockItem], orders: &[Order], suppliers: &[Supplier]) -> Kpis {
        let items_below_minimum = items
            .iter()
            .filter(|item| item.quantity_on_hand <= item.minimum_level)
            .count();

        let open_orders = orders
            .iter()
            .filter(|order| order.status.is_open())
            .count();

        let average_lead_time_days = if suppliers.is_empty() {
            0
        } else {
            let total: u32 = suppliers
                .iter()
                .filter_map(|supplier| supplier.average_lead_time_days)
                .sum();
            ((f64::from(total) / suppliers.len() as f64).round()) as u32
        };

        Kpis {
            total_items: items.len(),
            items_below_minimum,
            open_orders,
            average_lead_time_days,
        }
    }
}
