//! 訂單服務
//!
//! 建單、自動補貨批次與收貨流程。所有目錄與訂單資料經由參數或
//! 協作者取得，服務不保存跨呼叫狀態。

use rust_decimal::Decimal;
use vmi_calc::{
    DelayCalculator, DisplayStatus, OrderSequencer, ReplenishmentPlan, SequenceSource,
    SupplierGrouper,
};
use vmi_core::{
    Actor, AuditEntry, Order, OrderLineItem, OrderStatus, OrderType, Result, Supplier, VmiError,
};

use crate::{AuditSink, Clock, OrderStore};

/// 新訂單資料
///
/// 序號與總額由服務計算；呼叫端提供的總額一律不採信。
#[derive(Debug, Clone)]
pub struct OrderDraft {
    /// 訂單類型
    pub order_type: OrderType,

    /// 供應商
    pub supplier: Supplier,

    /// 備註
    pub notes: String,
}

/// 自動訂單批次結果
///
/// 各供應商分組各自獨立成敗：一組失敗不中止其餘分組。
#[derive(Debug)]
pub struct AutomaticOrderOutcome {
    /// 成功建立的訂單
    pub created: Vec<Order>,

    /// 失敗的分組（供應商名稱與原因）
    pub failures: Vec<(String, VmiError)>,

    /// 分組階段剔除的明細數（供應商缺失或停用）
    pub skipped_lines: usize,
}

impl AutomaticOrderOutcome {
    /// 成功筆數
    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    /// 失敗筆數
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

/// 訂單服務
pub struct OrderService<'a> {
    store: &'a dyn OrderStore,
    audit: &'a dyn AuditSink,
    clock: &'a dyn Clock,
    actor: Actor,
}

impl<'a> OrderService<'a> {
    /// 創建新的訂單服務
    pub fn new(
        store: &'a dyn OrderStore,
        audit: &'a dyn AuditSink,
        clock: &'a dyn Clock,
        actor: Actor,
    ) -> Self {
        Self {
            store,
            audit,
            clock,
            actor,
        }
    }

    /// 配置下一個訂單序號
    ///
    /// 序號查詢失敗時退回以時鐘讀數組成的序號，建單流程不因查詢
    /// 卡住；此時唯一性為機率性，來源標記為 ClockFallback 並記錄
    /// 警告，不偽裝成正常配號。
    fn allocate_order_number(&self) -> (String, SequenceSource) {
        let prefix = OrderSequencer::period_prefix(self.clock.today());

        match self.store.query_max_order_number_with_prefix(&prefix) {
            Ok(max_existing) => (
                OrderSequencer::next_order_number(&prefix, max_existing.as_deref()),
                SequenceSource::Sequential,
            ),
            Err(error) => {
                let number =
                    OrderSequencer::fallback_order_number(&prefix, self.clock.epoch_millis());
                tracing::warn!("訂單序號查詢失敗，改用時鐘序號 {}: {}", number, error);
                (number, SequenceSource::ClockFallback)
            }
        }
    }

    /// 建立訂單
    ///
    /// 驗證通過後才觸碰持久層。主檔先寫入取得識別碼，明細再寫入
    /// 引用該識別碼；明細寫入失敗時刪除主檔作為補償，呼叫端不會
    /// 觀察到只有主檔的訂單。補償動作本身失敗只記錄，不無限重試。
    pub fn create_order(&self, draft: OrderDraft, lines: Vec<OrderLineItem>) -> Result<Order> {
        self.validate(&draft, &lines)?;

        let (number, source) = self.allocate_order_number();

        // 小計與總額由數量 × 單價重算，不採信呼叫端數值
        let lines: Vec<OrderLineItem> = lines
            .into_iter()
            .map(|line| {
                OrderLineItem::new(
                    line.stock_item_id,
                    line.description,
                    line.quantity,
                    line.unit_price,
                )
            })
            .collect();

        let mut order = Order::new(
            number,
            draft.order_type,
            draft.supplier.id,
            draft.supplier.name.clone(),
            self.clock.today(),
        )
        .with_notes(draft.notes)
        .with_created_by(self.actor.id);
        order.line_items = lines;
        order.total_value = OrderSequencer::order_total(&order.line_items);

        // 主檔寫入取得識別碼；儲存層可能換發新識別碼
        let order_id = self.store.insert_order_header(&order)?;
        order.id = order_id;

        if let Err(error) = self.store.insert_order_line_items(order_id, &order.line_items) {
            // 補償：移除已寫入的主檔，避免殘留無明細的訂單
            if let Err(delete_error) = self.store.delete_order_header(order_id) {
                tracing::error!("補償刪除訂單主檔 {} 失敗: {}", order.number, delete_error);
            }
            return Err(error);
        }

        tracing::info!(
            "訂單 {} 已建立：{} 筆明細，總額 {}",
            order.number,
            order.line_items.len(),
            order.total_value
        );

        let details = match source {
            SequenceSource::Sequential => format!("訂單 {} 已建立", order.number),
            SequenceSource::ClockFallback => {
                format!("訂單 {} 已建立（序號為時鐘替代值）", order.number)
            }
        };
        self.record_audit(
            "建立",
            "訂單",
            details,
            None,
            serde_json::to_value(&order).ok(),
        );

        Ok(order)
    }

    /// 建立自動補貨訂單（每個供應商一張）
    ///
    /// 計劃明細先按供應商分組，再逐組建單；一組失敗不影響其餘
    /// 分組，成功與失敗筆數一併回報。
    pub fn create_automatic_orders(
        &self,
        plan: &ReplenishmentPlan,
        suppliers: &[Supplier],
        notes: &str,
    ) -> AutomaticOrderOutcome {
        let grouping = SupplierGrouper::group(&plan.lines, suppliers);

        let mut outcome = AutomaticOrderOutcome {
            created: Vec::new(),
            failures: Vec::new(),
            skipped_lines: grouping.skipped_lines(),
        };

        for group in grouping.groups {
            let lines: Vec<OrderLineItem> = group
                .lines
                .iter()
                .map(|line| {
                    OrderLineItem::new(
                        line.stock_item_id,
                        line.description.clone(),
                        line.quantity_to_order,
                        line.unit_price,
                    )
                })
                .collect();

            let draft = OrderDraft {
                order_type: OrderType::Automatic,
                supplier: group.supplier.clone(),
                notes: notes.to_string(),
            };

            match self.create_order(draft, lines) {
                Ok(order) => outcome.created.push(order),
                Err(error) => {
                    tracing::warn!(
                        "供應商 {} 的自動訂單建立失敗: {}",
                        group.supplier.name,
                        error
                    );
                    outcome.failures.push((group.supplier.name.clone(), error));
                }
            }
        }

        tracing::info!(
            "自動訂單處理完成：成功 {} 筆，失敗 {} 筆，剔除明細 {} 筆",
            outcome.created_count(),
            outcome.failure_count(),
            outcome.skipped_lines
        );

        outcome
    }

    /// 收貨
    ///
    /// 最終狀態以收貨當下的訂單狀態判定：當下已延遲 → ReceivedLate，
    /// 否則 Received。先判定、再回補庫存，不得在庫存異動後重新推導。
    pub fn mark_received(&self, order: &Order, supplier: Option<&Supplier>) -> Result<Order> {
        if order.status.is_terminal() {
            return Err(VmiError::Validation(format!(
                "訂單 {} 已是終結狀態，不可重複收貨",
                order.number
            )));
        }

        let mut items = Vec::new();
        for line in &order.line_items {
            if let Some(item) = self.store.fetch_stock_item(line.stock_item_id)? {
                items.push(item);
            }
        }

        let display = DelayCalculator::display_status(order, &items, supplier, self.clock.today());
        let final_status = if display == DisplayStatus::Late {
            OrderStatus::ReceivedLate
        } else {
            OrderStatus::Received
        };

        // 回補庫存：每筆明細把訂購量加回現量；目錄上已不存在的
        // 項目跳過
        for line in &order.line_items {
            let Some(item) = items.iter().find(|item| item.id == line.stock_item_id) else {
                continue;
            };
            let mut updated = item.clone();
            updated.quantity_on_hand =
                vmi_core::normalize(item.quantity_on_hand) + line.quantity;
            self.store.update_stock_item(&updated)?;
        }

        self.store.update_order_status(order.id, final_status)?;

        let mut received = order.clone();
        received.status = final_status;

        tracing::info!("訂單 {} 已收貨，狀態 {:?}", received.number, final_status);

        self.record_audit(
            "收貨",
            "訂單",
            format!("訂單 {} 已收貨，庫存已回補", received.number),
            serde_json::to_value(order.status).ok(),
            serde_json::to_value(final_status).ok(),
        );

        Ok(received)
    }

    /// 建單前驗證；任何失敗都在寫入前擋下
    fn validate(&self, draft: &OrderDraft, lines: &[OrderLineItem]) -> Result<()> {
        if !draft.supplier.is_active {
            return Err(VmiError::SupplierInactive(draft.supplier.name.clone()));
        }

        if lines.is_empty() {
            return Err(VmiError::Validation("訂單至少需要一筆明細".to_string()));
        }

        for line in lines {
            if line.quantity <= Decimal::ZERO {
                return Err(VmiError::Validation(format!(
                    "明細「{}」的數量必須大於零",
                    line.description
                )));
            }
            if line.unit_price < Decimal::ZERO {
                return Err(VmiError::Validation(format!(
                    "明細「{}」的單價不可為負",
                    line.description
                )));
            }
        }

        Ok(())
    }

    /// 寫入稽核紀錄；失敗只記錄警告，不影響主流程
    fn record_audit(
        &self,
        action: &str,
        entity: &str,
        details: String,
        before: Option<serde_json::Value>,
        after: Option<serde_json::Value>,
    ) {
        let mut entry = AuditEntry::new(
            self.actor.clone(),
            action.to_string(),
            entity.to_string(),
            details,
            self.clock.now_utc(),
        );
        entry.before = before;
        entry.after = after;

        if let Err(error) = self.audit.record(&entry) {
            tracing::warn!("稽核寫入失敗: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;
    use vmi_calc::{RecordedPrice, ReplenishmentPlanner};
    use vmi_core::StockItem;

    use crate::memory::{FixedClock, MemoryAuditSink, MemoryStore};

    fn actor() -> Actor {
        Actor::new(
            Uuid::new_v4(),
            "gestor@example.com".to_string(),
            "admin".to_string(),
        )
    }

    fn clock() -> FixedClock {
        FixedClock::new(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap())
    }

    fn draft(supplier: &Supplier) -> OrderDraft {
        OrderDraft {
            order_type: OrderType::Manual,
            supplier: supplier.clone(),
            notes: "Reposição de rotina".to_string(),
        }
    }

    fn line(quantity: i64, unit_price: i64) -> OrderLineItem {
        OrderLineItem::new(
            Uuid::new_v4(),
            "Item".to_string(),
            Decimal::from(quantity),
            Decimal::from(unit_price),
        )
    }

    #[test]
    fn test_create_order_computes_total_from_lines() {
        let store = MemoryStore::new();
        let audit = MemoryAuditSink::new();
        let clock = clock();
        let service = OrderService::new(&store, &audit, &clock, actor());
        let supplier = Supplier::new("Fornecedor".to_string());

        let mut lines = vec![line(10, 3), line(2, 7)];
        // 呼叫端竄改小計：建單時必須整個重算
        lines[0].subtotal = Decimal::from(9999);

        let order = service.create_order(draft(&supplier), lines).unwrap();

        assert_eq!(order.total_value, Decimal::from(44));
        assert_eq!(order.number, "2025060001");
        assert_eq!(order.status, OrderStatus::Open);
        assert_eq!(store.header_count(), 1);
    }

    #[test]
    fn test_order_numbers_increment_within_period() {
        let store = MemoryStore::new();
        let audit = MemoryAuditSink::new();
        let clock = clock();
        let service = OrderService::new(&store, &audit, &clock, actor());
        let supplier = Supplier::new("Fornecedor".to_string());

        let first = service.create_order(draft(&supplier), vec![line(1, 1)]).unwrap();
        let second = service.create_order(draft(&supplier), vec![line(1, 1)]).unwrap();

        assert_eq!(first.number, "2025060001");
        assert_eq!(second.number, "2025060002");
    }

    #[test]
    fn test_line_failure_rolls_back_header() {
        let store = MemoryStore::new();
        let audit = MemoryAuditSink::new();
        let clock = clock();
        let service = OrderService::new(&store, &audit, &clock, actor());
        let supplier = Supplier::new("Fornecedor".to_string());

        store.fail_next_line_insert();
        let result = service.create_order(draft(&supplier), vec![line(5, 2)]);

        assert!(matches!(result, Err(VmiError::Dependency(_))));
        // 不殘留只有主檔的訂單
        assert_eq!(store.header_count(), 0);
        // 失敗的操作不寫稽核
        assert!(audit.entries().is_empty());
    }

    #[test]
    fn test_number_query_failure_degrades_to_clock() {
        let store = MemoryStore::new();
        let audit = MemoryAuditSink::new();
        let clock = clock();
        let service = OrderService::new(&store, &audit, &clock, actor());
        let supplier = Supplier::new("Fornecedor".to_string());

        store.fail_number_query();
        let order = service.create_order(draft(&supplier), vec![line(5, 2)]).unwrap();

        let expected = OrderSequencer::fallback_order_number("202506", clock.epoch_millis());
        assert_eq!(order.number, expected);

        // 稽核說明標記了降級配號
        let entries = audit.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].details.contains("時鐘替代值"));
    }

    #[test]
    fn test_validation_rejects_before_any_write() {
        let store = MemoryStore::new();
        let audit = MemoryAuditSink::new();
        let clock = clock();
        let service = OrderService::new(&store, &audit, &clock, actor());

        let inactive = Supplier::new("Inativo".to_string()).as_inactive();
        let result = service.create_order(draft(&inactive), vec![line(5, 2)]);
        assert!(matches!(result, Err(VmiError::SupplierInactive(_))));

        let active = Supplier::new("Ativo".to_string());
        let result = service.create_order(draft(&active), vec![line(0, 2)]);
        assert!(matches!(result, Err(VmiError::Validation(_))));

        let result = service.create_order(draft(&active), vec![]);
        assert!(matches!(result, Err(VmiError::Validation(_))));

        assert_eq!(store.header_count(), 0);
    }

    #[test]
    fn test_audit_failure_does_not_block_creation() {
        let store = MemoryStore::new();
        let audit = MemoryAuditSink::new();
        let clock = clock();
        let service = OrderService::new(&store, &audit, &clock, actor());
        let supplier = Supplier::new("Fornecedor".to_string());

        audit.fail_next_record();
        let result = service.create_order(draft(&supplier), vec![line(5, 2)]);

        assert!(result.is_ok());
        assert_eq!(store.header_count(), 1);
    }

    #[test]
    fn test_automatic_orders_isolate_group_failures() {
        let store = MemoryStore::new();
        let audit = MemoryAuditSink::new();
        let clock = clock();
        let service = OrderService::new(&store, &audit, &clock, actor());

        let first = Supplier::new("Fornecedor A".to_string());
        let second = Supplier::new("Fornecedor B".to_string());

        let items = vec![
            StockItem::new("A-1".to_string(), "Item A".to_string(), Decimal::from(2))
                .with_levels(Decimal::from(10), Decimal::from(20))
                .with_purchase_price(Decimal::from(3))
                .with_supplier(first.id),
            StockItem::new("B-1".to_string(), "Item B".to_string(), Decimal::from(2))
                .with_levels(Decimal::from(10), Decimal::from(20))
                .with_purchase_price(Decimal::from(4))
                .with_supplier(second.id),
        ];

        let plan = ReplenishmentPlanner::plan(&items, &RecordedPrice);
        assert_eq!(plan.lines.len(), 2);

        // 第一組的明細寫入失敗；第二組必須照常建立
        store.fail_next_line_insert();
        let outcome = service.create_automatic_orders(
            &plan,
            &[first.clone(), second.clone()],
            "Reposição automática",
        );

        assert_eq!(outcome.created_count(), 1);
        assert_eq!(outcome.failure_count(), 1);
        assert_eq!(outcome.failures[0].0, first.name);
        assert_eq!(store.header_count(), 1);
    }

    #[test]
    fn test_mark_received_updates_stock_and_status() {
        let store = MemoryStore::new();
        let audit = MemoryAuditSink::new();
        let clock = clock();
        let service = OrderService::new(&store, &audit, &clock, actor());
        let supplier = Supplier::new("Fornecedor".to_string());

        let item = StockItem::new("IT-1".to_string(), "Item".to_string(), Decimal::from(4))
            .with_supplier(supplier.id);
        store.seed_item(item.clone());

        let order_line = OrderLineItem::new(
            item.id,
            item.description.clone(),
            Decimal::from(6),
            Decimal::from(2),
        );
        let order = service.create_order(draft(&supplier), vec![order_line]).unwrap();

        let received = service.mark_received(&order, Some(&supplier)).unwrap();

        assert_eq!(received.status, OrderStatus::Received);
        let updated = store.stock_item(item.id).unwrap();
        assert_eq!(updated.quantity_on_hand, Decimal::from(10));

        let stored = store.order(order.id).unwrap();
        assert_eq!(stored.status, OrderStatus::Received);
    }

    #[test]
    fn test_mark_received_flags_late_orders() {
        let store = MemoryStore::new();
        let audit = MemoryAuditSink::new();
        let clock = clock();
        let service = OrderService::new(&store, &audit, &clock, actor());
        let supplier = Supplier::new("Fornecedor".to_string()).with_average_lead_time(3);

        let item = StockItem::new("IT-1".to_string(), "Item".to_string(), Decimal::from(4))
            .with_supplier(supplier.id);
        store.seed_item(item.clone());

        let order_line = OrderLineItem::new(
            item.id,
            item.description.clone(),
            Decimal::from(6),
            Decimal::from(2),
        );
        let order = service.create_order(draft(&supplier), vec![order_line]).unwrap();

        // 交期 3 天，收貨時已超過預期交期 → 收貨（延遲）
        clock.set_today(NaiveDate::from_ymd_opt(2025, 6, 20).unwrap());
        let received = service.mark_received(&order, Some(&supplier)).unwrap();

        assert_eq!(received.status, OrderStatus::ReceivedLate);

        // 重複收貨被擋下，庫存不會再次回補
        let result = service.mark_received(&received, Some(&supplier));
        assert!(matches!(result, Err(VmiError::Validation(_))));
        let updated = store.stock_item(item.id).unwrap();
        assert_eq!(updated.quantity_on_hand, Decimal::from(10));
    }
}
