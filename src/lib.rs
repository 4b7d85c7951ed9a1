//! # VMI Engine
//!
//! 補貨與訂單序號引擎：庫存狀態判定、自動補貨計劃、供應商分組、
//! 訂單序號配置與收貨流程。

pub use vmi_calc;
pub use vmi_core;
pub use vmi_store;

// Re-export 主要類型
pub use vmi_calc::{
    DelayCalculator, DisplayStatus, KpiCalculator, Kpis, OrderSequencer, PriceResolver,
    RecordedPrice, ReplenishmentPlan, ReplenishmentPlanner, SequenceSource, StockClassifier,
    StockStatus, SupplierGrouper,
};
pub use vmi_core::{
    Actor, AuditEntry, Order, OrderLineItem, OrderStatus, OrderType, StockItem, Supplier,
    VmiError,
};
pub use vmi_store::{
    AuditSink, Clock, FixedClock, MemoryAuditSink, MemoryStore, OrderDraft, OrderService,
    OrderStore, SystemClock,
};
