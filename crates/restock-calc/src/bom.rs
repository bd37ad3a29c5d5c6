//! BOM 展開：產品需求 → 原料需求

use restock_core::{DataGap, DataGapKind, Ingredient, RecipeLine};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// 展開結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BomExplosion {
    /// 原料需求量（原料正規單位）
    pub needs: BTreeMap<String, Decimal>,

    /// 被略過的配方行與缺少配方的產品
    pub gaps: Vec<DataGap>,
}

/// BOM 展開器
pub struct BomExploder;

impl BomExploder {
    /// 將產品需求展開為原料需求
    ///
    /// 每個有需求的配方行貢獻 `demand * quantity_needed`，
    /// 並換算到原料的正規單位後累加。無法換算的配方行會被略過並記錄為資料缺口，
    /// 其餘配方行照常計算。沒有任何配方行貢獻的原料不會出現在結果中。
    pub fn explode(
        demand: &BTreeMap<String, Decimal>,
        recipes: &[RecipeLine],
        ingredients: &HashMap<String, Ingredient>,
    ) -> BomExplosion {
        let mut explosion = BomExplosion::default();
        let mut products_with_recipe: BTreeSet<&str> = BTreeSet::new();

        for line in recipes {
            let Some(product_demand) = demand.get(&line.product_id) else {
                continue;
            };
            products_with_recipe.insert(line.product_id.as_str());

            let Some(ingredient) = ingredients.get(&line.ingredient_id) else {
                tracing::warn!(
                    "配方 {} 引用未知原料 {}，略過",
                    line.product_id,
                    line.ingredient_id
                );
                explosion.gaps.push(DataGap::new(
                    DataGapKind::UnknownIngredient,
                    line.ingredient_id.clone(),
                    format!("recipe for product {} references an unknown ingredient", line.product_id),
                ));
                continue;
            };

            let line_need = *product_demand * line.quantity_needed;
            let line_unit = line.unit.as_ref().unwrap_or(&ingredient.unit);

            let Some(converted) = line_unit.convert(line_need, &ingredient.unit) else {
                tracing::warn!(
                    "配方 {} → {}：無法將 {} 換算為 {}，略過",
                    line.product_id,
                    line.ingredient_id,
                    line_unit,
                    ingredient.unit
                );
                explosion.gaps.push(DataGap::new(
                    DataGapKind::UnitConversion,
                    line.ingredient_id.clone(),
                    format!(
                        "recipe for product {} uses {} but the ingredient is stocked in {}",
                        line.product_id, line_unit, ingredient.unit
                    ),
                ));
                continue;
            };

            tracing::debug!(
                "BOM 展開: {} → {} (數量: {} {})",
                line.product_id,
                line.ingredient_id,
                converted,
                ingredient.unit
            );

            *explosion
                .needs
                .entry(line.ingredient_id.clone())
                .or_insert(Decimal::ZERO) += converted;
        }

        for product_id in demand.keys() {
            if !products_with_recipe.contains(product_id.as_str()) {
                explosion.gaps.push(DataGap::new(
                    DataGapKind::MissingRecipe,
                    product_id.clone(),
                    "product has recent sales but no recipe",
                ));
            }
        }

        explosion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> HashMap<String, Ingredient> {
        [
            Ingredient::new("BEEF".to_string(), "Bœuf".to_string(), "kg"),
            Ingredient::new("BUN".to_string(), "Pain".to_string(), "unité"),
            Ingredient::new("MILK".to_string(), "Lait".to_string(), "L"),
        ]
        .into_iter()
        .map(|i| (i.id.clone(), i))
        .collect()
    }

    fn demand(entries: &[(&str, i64)]) -> BTreeMap<String, Decimal> {
        entries
            .iter()
            .map(|(id, qty)| (id.to_string(), Decimal::from(*qty)))
            .collect()
    }

    #[test]
    fn test_explode_with_unit_conversion() {
        let recipes = vec![
            RecipeLine::new("BURGER".to_string(), "BEEF".to_string(), Decimal::from(150))
                .with_unit("g"),
            RecipeLine::new("BURGER".to_string(), "BUN".to_string(), Decimal::ONE),
            RecipeLine::new("SHAKE".to_string(), "MILK".to_string(), Decimal::from(300))
                .with_unit("ml"),
        ];

        let result = BomExploder::explode(&demand(&[("BURGER", 100), ("SHAKE", 10)]), &recipes, &catalog());

        assert!(result.gaps.is_empty());
        assert_eq!(result.needs["BEEF"], Decimal::from(15));
        assert_eq!(result.needs["BUN"], Decimal::from(100));
        assert_eq!(result.needs["MILK"], Decimal::from(3));
    }

    #[test]
    fn test_shared_ingredient_accumulates() {
        let recipes = vec![
            RecipeLine::new("BURGER".to_string(), "BEEF".to_string(), Decimal::new(2, 1)),
            RecipeLine::new("CHILI".to_string(), "BEEF".to_string(), Decimal::from(100))
                .with_unit("grammes"),
        ];

        let result = BomExploder::explode(&demand(&[("BURGER", 10), ("CHILI", 5)]), &recipes, &catalog());

        assert_eq!(result.needs["BEEF"], Decimal::new(25, 1));
    }

    #[test]
    fn test_failed_conversion_is_reported_not_dropped() {
        let recipes = vec![
            RecipeLine::new("BURGER".to_string(), "BEEF".to_string(), Decimal::ONE).with_unit("L"),
            RecipeLine::new("BURGER".to_string(), "BUN".to_string(), Decimal::ONE),
        ];

        let result = BomExploder::explode(&demand(&[("BURGER", 4)]), &recipes, &catalog());

        assert!(!result.needs.contains_key("BEEF"));
        assert_eq!(result.needs["BUN"], Decimal::from(4));
        assert_eq!(result.gaps.len(), 1);
        assert_eq!(result.gaps[0].kind, DataGapKind::UnitConversion);
        assert_eq!(result.gaps[0].subject, "BEEF");
    }

    #[test]
    fn test_missing_recipe_and_unknown_ingredient() {
        let recipes = vec![RecipeLine::new("BURGER".to_string(), "CHEESE".to_string(), Decimal::ONE)];

        let result = BomExploder::explode(&demand(&[("BURGER", 4), ("FRIES", 9)]), &recipes, &catalog());

        assert!(result.needs.is_empty());
        let kinds: Vec<_> = result.gaps.iter().map(|g| g.kind).collect();
        assert_eq!(kinds, vec![DataGapKind::UnknownIngredient, DataGapKind::MissingRecipe]);
        assert_eq!(result.gaps[1].subject, "FRIES");
    }

    #[test]
    fn test_lines_without_demand_are_ignored() {
        let recipes = vec![RecipeLine::new("SHAKE".to_string(), "MILK".to_string(), Decimal::ONE)];

        let result = BomExploder::explode(&demand(&[("BURGER", 4)]), &recipes, &catalog());

        assert!(result.needs.is_empty());
        assert!(!result.needs.contains_key("MILK"));
    }
}
