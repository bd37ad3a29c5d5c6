//! 單位正規化與換算

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 正規化後的計量單位
///
/// 未知的單位字串保留原樣（小寫、去除空白），視為獨立的正規單位。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Unit {
    /// 公克
    Gram,
    /// 公斤
    Kilogram,
    /// 毫升
    Millilitre,
    /// 公升
    Litre,
    /// 件（unité）
    Piece,
    /// 其他單位（原樣保留）
    Other(String),
}

impl Unit {
    /// 解析並正規化單位字串
    pub fn parse(raw: &str) -> Self {
        let cleaned = raw.trim().to_lowercase();
        match cleaned.as_str() {
            "g" | "gr" | "gram" | "grams" | "gramme" | "grammes" => Unit::Gram,
            "kg" | "kgs" | "kilo" | "kilos" | "kilogram" | "kilograms" | "kilogramme"
            | "kilogrammes" => Unit::Kilogram,
            "ml" | "millilitre" | "millilitres" | "milliliter" | "milliliters" => {
                Unit::Millilitre
            }
            "l" | "litre" | "litres" | "liter" | "liters" => Unit::Litre,
            "unité" | "unités" | "unite" | "unites" | "unit" | "units" | "u" | "pc" | "pcs"
            | "pièce" | "pièces" | "piece" | "pieces" => Unit::Piece,
            _ => Unit::Other(cleaned),
        }
    }

    /// 正規單位標籤
    pub fn as_str(&self) -> &str {
        match self {
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Millilitre => "ml",
            Unit::Litre => "L",
            Unit::Piece => "unité",
            Unit::Other(label) => label.as_str(),
        }
    }

    /// 換算數量到目標單位
    ///
    /// 僅支援 g↔kg 與 ml↔L；其他不同單位組合回傳 `None`，
    /// 呼叫端必須把 `None` 當成該行的資料缺口，而不是數量 0。
    pub fn convert(&self, quantity: Decimal, to: &Unit) -> Option<Decimal> {
        let thousand = Decimal::from(1000);
        match (self, to) {
            (from, to) if from == to => Some(quantity),
            (Unit::Gram, Unit::Kilogram) | (Unit::Millilitre, Unit::Litre) => {
                Some(quantity / thousand)
            }
            (Unit::Kilogram, Unit::Gram) | (Unit::Litre, Unit::Millilitre) => {
                Some(quantity * thousand)
            }
            _ => None,
        }
    }

    /// 檢查兩個單位是否可互相換算
    pub fn is_compatible_with(&self, other: &Unit) -> bool {
        self.convert(Decimal::ONE, other).is_some()
    }
}

impl From<&str> for Unit {
    fn from(raw: &str) -> Self {
        Unit::parse(raw)
    }
}

impl From<String> for Unit {
    fn from(raw: String) -> Self {
        Unit::parse(&raw)
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.as_str().to_string()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 正規化單位字串
pub fn normalize(raw: &str) -> Unit {
    Unit::parse(raw)
}

/// 以字串單位換算數量
pub fn convert(quantity: Decimal, from: &str, to: &str) -> Option<Decimal> {
    Unit::parse(from).convert(quantity, &Unit::parse(to))
}
