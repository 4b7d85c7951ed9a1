//! 供應商分組
//!
//! 補貨計劃按供應商切成訂單分組；供應商缺失或停用的明細被剔除，
//! 剔除數量回報給呼叫端。

use std::collections::HashMap;

use uuid::Uuid;
use vmi_core::Supplier;

use crate::replenishment::ReplenishmentLine;

/// 單一供應商的訂購分組
#[derive(Debug, Clone)]
pub struct SupplierOrderGroup {
    /// 供應商
    pub supplier: Supplier,

    /// 該供應商的補貨明細
    pub lines: Vec<ReplenishmentLine>,
}

/// 分組結果
#[derive(Debug, Clone)]
pub struct SupplierGrouping {
    /// 各供應商分組（依明細首次出現的順序）
    pub groups: Vec<SupplierOrderGroup>,

    /// 因找不到供應商而剔除的明細數
    pub skipped_missing_supplier: usize,

    /// 因供應商停用而剔除的明細數
    pub skipped_inactive_supplier: usize,
}

impl SupplierGrouping {
    /// 剔除的明細總數
    pub fn skipped_lines(&self) -> usize {
        self.skipped_missing_supplier + self.skipped_inactive_supplier
    }
}

/// 供應商分組計算器
pub struct SupplierGrouper;

impl SupplierGrouper {
    /// 將補貨明細依供應商分組
    pub fn group(lines: &[ReplenishmentLine], suppliers: &[Supplier]) -> SupplierGrouping {
        let supplier_map: HashMap<Uuid, &Supplier> =
            suppliers.iter().map(|supplier| (supplier.id, supplier)).collect();

        let mut groups: Vec<SupplierOrderGroup> = Vec::new();
        let mut index_by_supplier: HashMap<Uuid, usize> = HashMap::new();
        let mut skipped_missing_supplier = 0usize;
        let mut skipped_inactive_supplier = 0usize;

        for line in lines {
            let Some(supplier) = supplier_map.get(&line.supplier_id) else {
                skipped_missing_supplier += 1;
                continue;
            };
            if !supplier.is_active {
                skipped_inactive_supplier += 1;
                continue;
            }

            let index = *index_by_supplier.entry(supplier.id).or_insert_with(|| {
                groups.push(SupplierOrderGroup {
                    supplier: (*supplier).clone(),
                    lines: Vec::new(),
                });
                groups.len() - 1
            });
            groups[index].lines.push(line.clone());
        }

        SupplierGrouping {
            groups,
            skipped_missing_supplier,
            skipped_inactive_supplier,
        }
    }
}
