//! 自動補貨流程示範

use anyhow::Result;
use rand::Rng;
use rust_decimal::Decimal;
use vmi::{
    Actor, MemoryAuditSink, MemoryStore, OrderService, PriceResolver, ReplenishmentPlanner,
    StockClassifier, StockItem, Supplier, SystemClock,
};

/// 模擬單價：目錄沒有登錄價格時的展示用備援
///
/// 真實目錄沒價格的項目在展示資料裡仍要有個單價可看；引擎本身
/// 不捏造價格，備援放在呼叫端。
struct SimulatedPrice;

impl PriceResolver for SimulatedPrice {
    fn resolve(&self, item: &StockItem) -> Decimal {
        if let Some(price) = item.purchase_price {
            return price;
        }
        if let Some(cost) = item.unit_cost {
            return cost;
        }

        // 以代碼裡的數字推個穩定的假價格
        let digits: String = item
            .code
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        if let Ok(value) = digits.parse::<i64>() {
            return Decimal::from(value % 100) + Decimal::new(5, 1);
        }

        Decimal::from(rand::thread_rng().gen_range(5..25))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    println!("=== 自動補貨流程示範 ===\n");

    // 供應商
    let aurora = Supplier::new("Metalúrgica Aurora".to_string()).with_average_lead_time(7);
    let sul = Supplier::new("Distribuidora Sul".to_string()).with_average_lead_time(4);
    let suppliers = vec![aurora.clone(), sul.clone()];

    // 庫存目錄
    let catalog = vec![
        StockItem::new(
            "VLV-001".to_string(),
            "Válvula de esfera".to_string(),
            Decimal::from(80),
        )
        .with_levels(Decimal::from(100), Decimal::from(200))
        .with_replenishment_lot(Decimal::from(30))
        .with_purchase_price(Decimal::from(12))
        .with_supplier(aurora.id),
        StockItem::new(
            "PAR-010".to_string(),
            "Parafuso M8".to_string(),
            Decimal::from(15),
        )
        .with_levels(Decimal::from(10), Decimal::from(20))
        .with_supplier(sul.id),
        StockItem::new(
            "TUB-044".to_string(),
            "Tubo galvanizado".to_string(),
            Decimal::from(25),
        )
        .with_levels(Decimal::from(10), Decimal::from(20))
        .with_supplier(sul.id),
    ];

    println!("庫存狀態:");
    for item in &catalog {
        let status = StockClassifier::classify_item(item);
        println!(
            "  - {} {}：現量 {}，狀態 {}",
            item.code, item.description, item.quantity_on_hand, status
        );
    }

    // 計算補貨計劃（只評估，不落單）
    let plan = ReplenishmentPlanner::plan(&catalog, &SimulatedPrice);

    println!("\n補貨計劃（{} 筆明細）:", plan.lines.len());
    for line in &plan.lines {
        println!(
            "  - {}：訂購 {}，單價 {}（{:?}）",
            line.description, line.quantity_to_order, line.unit_price, line.reason
        );
    }

    // 確認後建單：每家供應商一張
    let store = MemoryStore::new();
    let audit = MemoryAuditSink::new();
    let clock = SystemClock;
    let actor = Actor::new(
        uuid::Uuid::new_v4(),
        "gestor@example.com".to_string(),
        "admin".to_string(),
    );
    let service = OrderService::new(&store, &audit, &clock, actor);

    let outcome = service.create_automatic_orders(&plan, &suppliers, "Gerado pela demonstração");

    println!(
        "\n建單結果：成功 {} 筆，失敗 {} 筆",
        outcome.created_count(),
        outcome.failure_count()
    );
    for order in &outcome.created {
        println!(
            "  - 訂單 {}（{}）：{} 筆明細，總額 {}",
            order.number,
            order.supplier_name,
            order.line_items.len(),
            order.total_value
        );
    }

    println!("\n稽核紀錄 {} 筆", audit.entries().len());

    Ok(())
}
