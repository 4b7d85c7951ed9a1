//! 記憶體儲存
//!
//! 測試與示範用的協作者實作。訂單序號的唯一性在這裡以寫入檢查
//! 模擬真實儲存層的約束：並發配號算出相同序號時，後寫入者失敗。

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;
use vmi_core::{AuditEntry, Order, OrderLineItem, OrderStatus, Result, StockItem, VmiError};

use crate::{AuditSink, Clock, OrderStore};

#[derive(Default)]
struct MemoryState {
    headers: HashMap<Uuid, Order>,
    lines: HashMap<Uuid, Vec<OrderLineItem>>,
    items: HashMap<Uuid, StockItem>,
    fail_next_line_insert: bool,
    fail_number_query: bool,
}

/// 記憶體訂單儲存
#[derive(Default)]
pub struct MemoryStore {
    state: RefCell<MemoryState>,
}

impl MemoryStore {
    /// 創建空的儲存
    pub fn new() -> Self {
        Self::default()
    }

    /// 寫入（或覆蓋）一筆庫存項目
    pub fn seed_item(&self, item: StockItem) {
        self.state.borrow_mut().items.insert(item.id, item);
    }

    /// 使下一次明細寫入失敗（測試補償動作用）
    pub fn fail_next_line_insert(&self) {
        self.state.borrow_mut().fail_next_line_insert = true;
    }

    /// 使下一次序號查詢失敗（測試降級配號用）
    pub fn fail_number_query(&self) {
        self.state.borrow_mut().fail_number_query = true;
    }

    /// 訂單主檔筆數
    pub fn header_count(&self) -> usize {
        self.state.borrow().headers.len()
    }

    /// 讀取訂單（含明細）
    pub fn order(&self, id: Uuid) -> Option<Order> {
        let state = self.state.borrow();
        let mut order = state.headers.get(&id).cloned()?;
        order.line_items = state.lines.get(&id).cloned().unwrap_or_default();
        Some(order)
    }

    /// 讀取庫存項目
    pub fn stock_item(&self, id: Uuid) -> Option<StockItem> {
        self.state.borrow().items.get(&id).cloned()
    }

    /// 所有訂單序號（排序後）
    pub fn order_numbers(&self) -> Vec<String> {
        let mut numbers: Vec<String> = self
            .state
            .borrow()
            .headers
            .values()
            .map(|order| order.number.clone())
            .collect();
        numbers.sort();
        numbers
    }
}

impl OrderStore for MemoryStore {
    fn insert_order_header(&self, order: &Order) -> Result<Uuid> {
        let mut state = self.state.borrow_mut();

        // 序號唯一性約束：同月重號時寫入失敗
        if state
            .headers
            .values()
            .any(|existing| existing.number == order.number)
        {
            return Err(VmiError::Dependency(format!(
                "訂單序號 {} 已存在",
                order.number
            )));
        }

        let mut header = order.clone();
        header.line_items = Vec::new();
        state.headers.insert(order.id, header);
        Ok(order.id)
    }

    fn insert_order_line_items(&self, order_id: Uuid, lines: &[OrderLineItem]) -> Result<()> {
        let mut state = self.state.borrow_mut();

        if state.fail_next_line_insert {
            state.fail_next_line_insert = false;
            return Err(VmiError::Dependency("明細寫入失敗（注入）".to_string()));
        }

        if !state.headers.contains_key(&order_id) {
            return Err(VmiError::Dependency(format!(
                "訂單主檔 {} 不存在",
                order_id
            )));
        }

        state.lines.insert(order_id, lines.to_vec());
        Ok(())
    }

    fn delete_order_header(&self, order_id: Uuid) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.headers.remove(&order_id);
        state.lines.remove(&order_id);
        Ok(())
    }

    fn query_max_order_number_with_prefix(&self, prefix: &str) -> Result<Option<String>> {
        let mut state = self.state.borrow_mut();

        if state.fail_number_query {
            state.fail_number_query = false;
            return Err(VmiError::Dependency("序號查詢失敗（注入）".to_string()));
        }

        Ok(state
            .headers
            .values()
            .map(|order| &order.number)
            .filter(|number| number.starts_with(prefix))
            .max()
            .cloned())
    }

    fn fetch_stock_item(&self, id: Uuid) -> Result<Option<StockItem>> {
        Ok(self.state.borrow().items.get(&id).cloned())
    }

    fn update_stock_item(&self, item: &StockItem) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.items.contains_key(&item.id) {
            return Err(VmiError::ItemNotFound(item.code.clone()));
        }
        state.items.insert(item.id, item.clone());
        Ok(())
    }

    fn update_order_status(&self, order_id: Uuid, status: OrderStatus) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let Some(header) = state.headers.get_mut(&order_id) else {
            return Err(VmiError::Dependency(format!(
                "訂單主檔 {} 不存在",
                order_id
            )));
        };
        header.status = status;
        Ok(())
    }
}

/// 記憶體稽核紀錄
#[derive(Default)]
pub struct MemoryAuditSink {
    entries: RefCell<Vec<AuditEntry>>,
    fail_next_record: Cell<bool>,
}

impl MemoryAuditSink {
    /// 創建空的稽核紀錄
    pub fn new() -> Self {
        Self::default()
    }

    /// 使下一次寫入失敗（驗證稽核不阻斷主流程用）
    pub fn fail_next_record(&self) {
        self.fail_next_record.set(true);
    }

    /// 讀取所有紀錄
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.borrow().clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, entry: &AuditEntry) -> Result<()> {
        if self.fail_next_record.take() {
            return Err(VmiError::Dependency("稽核寫入失敗（注入）".to_string()));
        }
        self.entries.borrow_mut().push(entry.clone());
        Ok(())
    }
}

/// 固定時鐘：日期可由測試撥動
pub struct FixedClock {
    today: Cell<NaiveDate>,
}

impl FixedClock {
    /// 創建固定在指定日期的時鐘
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Cell::new(today),
        }
    }

    /// 撥動時鐘至指定日期
    pub fn set_today(&self, today: NaiveDate) {
        self.today.set(today);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today.get()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        // 固定在當天中午，毫秒讀數隨日期決定
        self.today
            .get()
            .and_hms_opt(12, 0, 0)
            .expect("固定時鐘時刻無效")
            .and_utc()
    }
}
