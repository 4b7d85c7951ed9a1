//! 訂單序號與金額

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use vmi_core::OrderLineItem;

/// 序號前綴長度（YYYYMM）
const PREFIX_LEN: usize = 6;

/// 流水號位數
const SEQUENCE_WIDTH: usize = 4;

/// 序號來源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceSource {
    /// 依期間內既有序號遞增
    Sequential,
    /// 序號查詢失敗，以時鐘讀數代替；唯一性轉為機率性
    ClockFallback,
}

/// 訂單序號產生器
///
/// 並發呼叫可能算出相同的下一個序號；唯一性由儲存層的約束把關，
/// 這裡只負責盡力而為的遞增計算。
pub struct OrderSequencer;

impl OrderSequencer {
    /// 期間序號前綴（YYYYMM，月份補零）
    pub fn period_prefix(date: NaiveDate) -> String {
        format!("{:04}{:02}", date.year(), date.month())
    }

    /// 產生期間內下一個序號
    ///
    /// `max_existing` 為該前綴下字典序最大的既有序號；期間內沒有
    /// 任何序號時由 0001 起算。既有序號的流水部分無法解析時同樣
    /// 由 0001 重新起算。
    pub fn next_order_number(prefix: &str, max_existing: Option<&str>) -> String {
        let next_sequence = max_existing
            .and_then(|number| number.get(PREFIX_LEN..))
            .and_then(|sequence| sequence.parse::<u32>().ok())
            .map(|sequence| sequence + 1)
            .unwrap_or(1);

        format!("{}{:0width$}", prefix, next_sequence, width = SEQUENCE_WIDTH)
    }

    /// 查詢失敗時的替代序號：前綴 + 時鐘毫秒讀數的末四位
    pub fn fallback_order_number(prefix: &str, epoch_millis: i64) -> String {
        format!("{}{:04}", prefix, epoch_millis.rem_euclid(10_000))
    }

    /// 訂單總額 = Σ 數量 × 單價（一律由明細重算，不採信呼叫端總額）
    pub fn order_total(lines: &[OrderLineItem]) -> Decimal {
        lines
            .iter()
            .map(|line| line.quantity * line.unit_price)
            .sum()
    }
}
