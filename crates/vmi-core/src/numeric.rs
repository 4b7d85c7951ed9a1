//! 數值正規化
//!
//! 外部資料來源的數值欄位可能缺失、為負或無法解析。進入計算的
//! 數值一律先經過這裡的邊界正規化：缺失或無法解析視為 0，負數
//! 截斷為 0。這是既定的輸入政策，集中在模型邊界處理，不散落在
//! 各運算內部。

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

/// 將負數截斷為 0
pub fn normalize(value: Decimal) -> Decimal {
    if value < Decimal::ZERO {
        Decimal::ZERO
    } else {
        value
    }
}

/// 寬鬆數值反序列化
///
/// 接受數字或數字字串；null、缺漏或解析失敗一律視為 0。
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(Decimal),
        Text(String),
        Nothing(()),
    }

    Ok(match Raw::deserialize(deserializer) {
        Ok(Raw::Number(value)) => normalize(value),
        Ok(Raw::Text(text)) => normalize(text.trim().parse().unwrap_or(Decimal::ZERO)),
        Ok(Raw::Nothing(())) | Err(_) => Decimal::ZERO,
    })
}
