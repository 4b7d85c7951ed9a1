//! 庫存狀態判定

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vmi_core::{normalize, StockItem};

/// 正常區間的最低四分位，落入此帶視為接近補貨點
const LOWER_QUARTILE: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// 庫存狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    /// 低於下限
    Critical,
    /// 接近補貨點，或參數無法歸類需人工檢視
    Attention,
    /// 正常
    Normal,
    /// 高於上限
    Excess,
}

impl StockStatus {
    /// 顯示標籤
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::Critical => "Critical",
            StockStatus::Attention => "Attention",
            StockStatus::Normal => "Normal",
            StockStatus::Excess => "Excess",
        }
    }

    /// 顯示顏色代碼
    pub fn color(&self) -> &'static str {
        match self {
            StockStatus::Critical => "red",
            StockStatus::Attention => "yellow",
            StockStatus::Normal => "green",
            StockStatus::Excess => "purple",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 庫存狀態計算器
pub struct StockClassifier;

impl StockClassifier {
    /// 判定庫存狀態
    ///
    /// 規則依序評估，先符合者先決：低於下限 → Critical；高於上限 →
    /// Excess；介於上下限之間且落在正常區間的最低四分位 → Attention；
    /// 其餘依上下限的定義情形判為 Normal；無法歸類時回傳 Attention。
    /// 輸入先經邊界正規化（負值截斷為 0），對所有數值輸入皆可判定，
    /// 不產生錯誤。
    pub fn classify(
        quantity_on_hand: Decimal,
        minimum_level: Decimal,
        maximum_level: Decimal,
    ) -> StockStatus {
        let current = normalize(quantity_on_hand);
        let min = normalize(minimum_level);
        let max = normalize(maximum_level);

        if min > Decimal::ZERO && current < min {
            return StockStatus::Critical;
        }

        if max > Decimal::ZERO && current > max {
            return StockStatus::Excess;
        }

        // 上下限皆有定義且 current 落在 [min, max]
        if min > Decimal::ZERO && max > Decimal::ZERO && current >= min && current <= max {
            let range = max - min;
            if range > Decimal::ZERO && current < min + range * LOWER_QUARTILE {
                return StockStatus::Attention;
            }
            return StockStatus::Normal;
        }

        // 僅定義下限
        if min > Decimal::ZERO && max <= Decimal::ZERO && current >= min {
            return StockStatus::Normal;
        }

        // 僅定義上限
        if max > Decimal::ZERO && min <= Decimal::ZERO && current <= max {
            return StockStatus::Normal;
        }

        // 上下限皆未設定，或零庫存且未設下限
        if (min <= Decimal::ZERO && max <= Decimal::ZERO)
            || (current == Decimal::ZERO && min == Decimal::ZERO)
        {
            return StockStatus::Normal;
        }

        if current > Decimal::ZERO && (max <= Decimal::ZERO || current <= max) {
            return StockStatus::Normal;
        }

        // 無法歸類：參數組合異常，提示人工檢視
        StockStatus::Attention
    }

    /// 直接以庫存項目判定
    pub fn classify_item(item: &StockItem) -> StockStatus {
        Self::classify(
            item.quantity_on_hand,
            item.minimum_level,
            item.maximum_level,
        )
    }
}
