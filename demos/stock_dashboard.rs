//! 庫存看板示範：狀態判定與營運指標

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use vmi::{
    KpiCalculator, Order, OrderStatus, OrderType, StockClassifier, StockItem, Supplier,
};

fn main() -> Result<()> {
    println!("=== 庫存看板示範 ===\n");

    let aurora = Supplier::new("Metalúrgica Aurora".to_string()).with_average_lead_time(7);
    let sul = Supplier::new("Distribuidora Sul".to_string()).with_average_lead_time(4);

    let catalog = vec![
        StockItem::new("VLV-001".to_string(), "Válvula de esfera".to_string(), Decimal::from(5))
            .with_levels(Decimal::from(10), Decimal::from(40))
            .with_supplier(aurora.id),
        StockItem::new("PAR-010".to_string(), "Parafuso M8".to_string(), Decimal::from(11))
            .with_levels(Decimal::from(10), Decimal::from(40))
            .with_supplier(sul.id),
        StockItem::new("TUB-044".to_string(), "Tubo galvanizado".to_string(), Decimal::from(30))
            .with_levels(Decimal::from(10), Decimal::from(40))
            .with_supplier(sul.id),
        StockItem::new("FLG-201".to_string(), "Flange roscada".to_string(), Decimal::from(55))
            .with_levels(Decimal::from(10), Decimal::from(40))
            .with_supplier(aurora.id),
    ];

    println!("庫存狀態:");
    for item in &catalog {
        let status = StockClassifier::classify_item(item);
        println!(
            "  - {} {}：現量 {:>3}，[{}] {}",
            item.code,
            item.description,
            item.quantity_on_hand,
            status.color(),
            status.label()
        );
    }

    // 看板上的未結訂單
    let mut open = Order::new(
        "2025060001".to_string(),
        OrderType::Automatic,
        aurora.id,
        aurora.name.clone(),
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
    );
    open.status = OrderStatus::Open;

    let mut done = Order::new(
        "2025050004".to_string(),
        OrderType::Manual,
        sul.id,
        sul.name.clone(),
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap(),
    );
    done.status = OrderStatus::Received;

    let kpis = KpiCalculator::calculate(&catalog, &[open, done], &[aurora, sul]);

    println!("\n營運指標:");
    println!("  項目總數         {}", kpis.total_items);
    println!("  低於下限         {}", kpis.items_below_minimum);
    println!("  未結訂單         {}", kpis.open_orders);
    println!("  平均交期（天）   {}", kpis.average_lead_time_days);

    Ok(())
}
