//! 訂單生命週期示範：建立 → 延遲 → 收貨

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use vmi::{
    Actor, DelayCalculator, DisplayStatus, FixedClock, MemoryAuditSink, MemoryStore, OrderDraft,
    OrderLineItem, OrderService, OrderType, StockItem, Supplier,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    println!("=== 訂單生命週期示範 ===\n");

    let supplier = Supplier::new("Metalúrgica Aurora".to_string()).with_average_lead_time(5);
    let item = StockItem::new(
        "VLV-001".to_string(),
        "Válvula de esfera".to_string(),
        Decimal::from(8),
    )
    .with_supplier(supplier.id);

    let store = MemoryStore::new();
    store.seed_item(item.clone());
    let audit = MemoryAuditSink::new();
    let clock = FixedClock::new(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
    let actor = Actor::new(
        uuid::Uuid::new_v4(),
        "gestor@example.com".to_string(),
        "admin".to_string(),
    );
    let service = OrderService::new(&store, &audit, &clock, actor);

    // 建立手動訂單
    let order = service.create_order(
        OrderDraft {
            order_type: OrderType::Manual,
            supplier: supplier.clone(),
            notes: "Pedido urgente".to_string(),
        },
        vec![OrderLineItem::new(
            item.id,
            item.description.clone(),
            Decimal::from(12),
            Decimal::new(1250, 2),
        )],
    )?;

    println!(
        "訂單 {} 已建立（{}），總額 {}",
        order.number, order.created_on, order.total_value
    );

    // 交期 5 天：6/7 前不算延遲
    let catalog = vec![item.clone()];
    for day in [7, 8, 12] {
        let today = NaiveDate::from_ymd_opt(2025, 6, day).unwrap();
        let display = DelayCalculator::display_status(&order, &catalog, Some(&supplier), today);
        let text = match display {
            DisplayStatus::Late => "延遲中".to_string(),
            DisplayStatus::Stored(status) => format!("{:?}", status),
        };
        println!("  {} 的顯示狀態：{}", today, text);
    }

    // 在 6/12 收貨：當下已延遲
    clock.set_today(NaiveDate::from_ymd_opt(2025, 6, 12).unwrap());
    let received = service.mark_received(&order, Some(&supplier))?;
    println!("\n收貨完成，狀態 {:?}", received.status);

    let updated = store.stock_item(item.id).expect("項目存在");
    println!("庫存回補：{} → {}", item.quantity_on_hand, updated.quantity_on_hand);

    println!("\n稽核軌跡:");
    for entry in audit.entries() {
        println!("  [{}] {}：{}", entry.recorded_at.date_naive(), entry.action, entry.details);
    }

    Ok(())
}
