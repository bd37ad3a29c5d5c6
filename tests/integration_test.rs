//! 集成測試：透過呼叫介面與記憶體儲存驗證完整流程

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use restock::restock_calc::ImpactBasis;
use restock::restock_core::*;
use restock::{in_memory_engine, DataSink, DataSource, InMemoryStore, RecommendationOutcome, RestockEngine};
use rstest::rstest;
use rust_decimal::Decimal;

// 2025-11-17（星期一）
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 17, 9, 0, 0).unwrap()
}

fn day(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, m, d).unwrap()
}

fn beef() -> Ingredient {
    Ingredient::new("BEEF".to_string(), "Bœuf haché".to_string(), "kg")
        .with_cost_per_unit(Decimal::new(1250, 2))
        .with_supplier("Metro".to_string())
}

fn bun() -> Ingredient {
    Ingredient::new("BUN".to_string(), "Pain burger".to_string(), "unités")
        .with_cost_per_unit(Decimal::new(30, 2))
}

fn inventory(ingredient_id: &str, stock: i64, min: i64) -> InventorySnapshot {
    InventorySnapshot::new(
        "R-PARIS".to_string(),
        ingredient_id.to_string(),
        Decimal::from(stock),
        Decimal::from(min),
    )
    .with_last_updated(now())
}

fn burger_sales(total: i64) -> Vec<SalesRecord> {
    // 回溯 7 天內兩筆銷售
    let first = total * 3 / 5;
    vec![
        SalesRecord::new("R-PARIS".to_string(), "BURGER".to_string(), Decimal::from(first), day(11, 12)),
        SalesRecord::new(
            "R-PARIS".to_string(),
            "BURGER".to_string(),
            Decimal::from(total - first),
            day(11, 15),
        ),
    ]
}

/// 兩家同組織餐廳 + 一家其他組織餐廳；牛肉配方 0.2 kg / 份
fn engine_with(ingredients: Vec<Ingredient>) -> RestockEngine<InMemoryStore> {
    engine_with_config(EngineConfig::default(), ingredients)
}

fn engine_with_config(config: EngineConfig, ingredients: Vec<Ingredient>) -> RestockEngine<InMemoryStore> {
    let engine = in_memory_engine(config).unwrap().with_fixed_now(now());
    let store = engine.store();

    for (id, org) in [("R-PARIS", "ORG-1"), ("R-LYON", "ORG-1"), ("R-BERLIN", "ORG-2")] {
        store
            .add_restaurant(Restaurant::new(id.to_string(), org.to_string(), format!("Restaurant {id}")))
            .unwrap();
    }
    for ingredient in ingredients {
        store.add_ingredient(ingredient).unwrap();
    }
    store
        .add_recipe_line(
            RecipeLine::new("BURGER".to_string(), "BEEF".to_string(), Decimal::new(2, 1)).with_unit("kg"),
        )
        .unwrap();
    engine
}

fn order_data(outcome: &RecommendationOutcome) -> &OrderRecommendationData {
    match outcome.recommendation().map(|r| &r.data) {
        Some(RecommendationData::Order(order)) => order,
        other => panic!("expected an order recommendation, got {other:?}"),
    }
}

fn open_of_type(alerts: &[Alert], alert_type: AlertType) -> Vec<&Alert> {
    alerts.iter().filter(|a| a.alert_type == alert_type && a.is_open()).collect()
}

#[test]
fn test_scenario_1_zero_stock_is_critical_shortage() {
    restock::logging::init_test();
    let engine = engine_with(vec![beef()]);
    engine.store().upsert_inventory(inventory("BEEF", 0, 10)).unwrap();

    let alerts = engine.evaluate_alerts("R-PARIS").unwrap();

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].alert_type, AlertType::Shortage);
    assert_eq!(alerts[0].severity, Severity::Critical);
    assert_eq!(alerts[0].subject.ingredient_id(), Some("BEEF"));
    assert_eq!(alerts[0].quantity_gap, Decimal::from(10));
    assert_eq!(alerts[0].unit, Some(Unit::Kilogram));
}

#[test]
fn test_scenario_2_order_without_pack_size() {
    let engine = engine_with(vec![beef()]);
    engine.store().add_sales(burger_sales(100)).unwrap();
    engine.store().upsert_inventory(inventory("BEEF", 5, 10)).unwrap();

    let outcome = engine
        .generate_order_recommendation("R-PARIS", Some(Decimal::new(1, 1)), 7)
        .unwrap();

    let order = order_data(&outcome);
    assert_eq!(order.lines.len(), 1);
    let line = &order.lines[0];
    assert_eq!(line.needed_quantity, Decimal::from(20));
    assert_eq!(line.gross_need, Decimal::from(22));
    assert_eq!(line.quantity_to_order, Decimal::from(17));
    assert_eq!(line.number_of_packs, None);
    assert_eq!(line.supplier_name.as_deref(), Some("Metro"));
    assert_eq!(order.estimated_order_cost, Decimal::new(2125, 1));
    assert_eq!(order.estimated_savings, Decimal::new(1875, 1));

    let recommendation = outcome.recommendation().unwrap();
    assert_eq!(recommendation.priority, Priority::High);
    assert_eq!(recommendation.status, RecommendationStatus::Pending);
    assert_eq!(recommendation.recommendation_type(), RecommendationType::Order);
    // 已寫入儲存
    assert_eq!(
        engine.store().recommendation(recommendation.id).unwrap().as_ref(),
        Some(recommendation)
    );
}

#[rstest]
#[case(Decimal::ZERO, 15)]
#[case(Decimal::new(1, 1), 17)]
#[case(Decimal::new(25, 2), 20)]
fn test_shrink_is_a_per_call_parameter(#[case] shrink: Decimal, #[case] expected: i64) {
    let engine = engine_with(vec![beef()]);
    engine.store().add_sales(burger_sales(100)).unwrap();
    engine.store().upsert_inventory(inventory("BEEF", 5, 10)).unwrap();

    let outcome = engine
        .generate_order_recommendation("R-PARIS", Some(shrink), 7)
        .unwrap();

    let order = order_data(&outcome);
    assert_eq!(order.shrink_pct, shrink);
    assert_eq!(order.lines[0].quantity_to_order, Decimal::from(expected));
}

#[test]
fn test_scenario_3_order_rounds_up_to_packs() {
    let engine = engine_with(vec![beef().with_pack_size(Decimal::from(5))]);
    engine.store().add_sales(burger_sales(100)).unwrap();
    engine.store().upsert_inventory(inventory("BEEF", 5, 10)).unwrap();

    let outcome = engine
        .generate_order_recommendation("R-PARIS", Some(Decimal::new(1, 1)), 7)
        .unwrap();

    let line = &order_data(&outcome).lines[0];
    assert_eq!(line.number_of_packs, Some(4));
    assert_eq!(line.quantity_to_order, Decimal::from(20));
    assert_eq!(line.pack_size, Some(Decimal::from(5)));
}

#[test]
fn test_scenario_4_overstock_alert_and_exclusion() {
    let engine = engine_with(vec![beef(), bun()]);
    let store = engine.store();
    store
        .add_recipe_line(RecipeLine::new("BURGER".to_string(), "BUN".to_string(), Decimal::ONE))
        .unwrap();
    // 需求 200 kg 牛肉，遠高於現有庫存
    store.add_sales(burger_sales(1000)).unwrap();
    store
        .upsert_inventory(inventory("BEEF", 80, 10).with_max_threshold(Decimal::from(50)))
        .unwrap();
    store.upsert_inventory(inventory("BUN", 0, 0)).unwrap();

    let alerts = engine.evaluate_alerts("R-PARIS").unwrap();
    let overstock = open_of_type(&alerts, AlertType::Overstock);
    assert_eq!(overstock.len(), 1);
    assert_eq!(overstock[0].severity, Severity::Medium);

    let outcome = engine.generate_order_recommendation("R-PARIS", None, 7).unwrap();
    let order = order_data(&outcome);

    assert!(order.lines.iter().all(|l| l.ingredient_id != "BEEF"));
    assert_eq!(order.lines.len(), 1);
    assert_eq!(order.lines[0].ingredient_id, "BUN");
    assert_eq!(order.overstocked.len(), 1);
    assert_eq!(order.overstocked[0].ingredient_id, "BEEF");
    assert_eq!(order.overstocked[0].needed_quantity, Decimal::from(200));
}

#[test]
fn test_scenario_5_no_recent_sales() {
    let engine = engine_with(vec![beef()]);
    // 只有回溯期間外的銷售
    engine
        .store()
        .add_sales(vec![SalesRecord::new(
            "R-PARIS".to_string(),
            "BURGER".to_string(),
            Decimal::from(50),
            day(10, 1),
        )])
        .unwrap();

    let outcome = engine.generate_order_recommendation("R-PARIS", None, 7).unwrap();

    assert!(!outcome.is_generated());
    assert_eq!(outcome.reason(), Some(NoRecommendationReason::NoRecentSales));
    match outcome {
        RecommendationOutcome::NotGenerated(none) => assert_eq!(none.message(), "no recent sales"),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(engine.store().recommendations("R-PARIS").unwrap().is_empty());
}

#[test]
fn test_no_recipes_and_sufficient_stock_reasons() {
    let engine = engine_with(vec![beef()]);
    let store = engine.store();
    store
        .add_sales(vec![SalesRecord::new(
            "R-PARIS".to_string(),
            "FRIES".to_string(),
            Decimal::from(30),
            day(11, 16),
        )])
        .unwrap();

    let outcome = engine.generate_order_recommendation("R-PARIS", None, 7).unwrap();
    assert_eq!(outcome.reason(), Some(NoRecommendationReason::NoRecipesWithRecentSales));
    match &outcome {
        RecommendationOutcome::NotGenerated(none) => {
            assert_eq!(none.data_gaps.len(), 1);
            assert_eq!(none.data_gaps[0].kind, DataGapKind::MissingRecipe);
            assert_eq!(none.data_gaps[0].subject, "FRIES");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    store.add_sales(burger_sales(100)).unwrap();
    store.upsert_inventory(inventory("BEEF", 500, 10)).unwrap();

    let outcome = engine.generate_order_recommendation("R-PARIS", None, 7).unwrap();
    assert_eq!(outcome.reason(), Some(NoRecommendationReason::StockAlreadySufficient));
}

#[test]
fn test_unit_mismatch_is_reported_alongside_partial_result() {
    let engine = engine_with(vec![beef(), bun()]);
    let store = engine.store();
    store
        .add_recipe_line(
            RecipeLine::new("BURGER".to_string(), "BUN".to_string(), Decimal::ONE).with_unit("L"),
        )
        .unwrap();
    store.add_sales(burger_sales(100)).unwrap();

    let outcome = engine.generate_order_recommendation("R-PARIS", None, 7).unwrap();
    let order = order_data(&outcome);

    assert_eq!(order.lines.len(), 1);
    assert_eq!(order.lines[0].ingredient_id, "BEEF");
    let kinds: Vec<_> = order.data_gaps.iter().map(|g| g.kind).collect();
    assert!(kinds.contains(&DataGapKind::UnitConversion));
    // 牛肉沒有庫存紀錄
    assert!(kinds.contains(&DataGapKind::MissingInventory));
}

#[test]
fn test_caller_contract_errors() {
    let engine = engine_with(vec![beef()]);

    let err = engine.generate_order_recommendation("R-PARIS", None, 0).unwrap_err();
    assert!(matches!(err, EngineError::InvalidWindow(0)));
    assert!(err.is_caller_contract());

    let err = engine.generate_order_recommendation("R-NOWHERE", None, 7).unwrap_err();
    assert!(matches!(err, EngineError::UnknownRestaurant(_)));

    let err = engine
        .generate_order_recommendation("R-PARIS", Some(Decimal::from(-1)), 7)
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidShrink(_)));

    assert!(matches!(
        engine.evaluate_alerts("R-NOWHERE"),
        Err(EngineError::UnknownRestaurant(_))
    ));
    assert!(matches!(
        engine.compute_executive_metrics("ORG-1", Some("R-BERLIN")),
        Err(EngineError::RestaurantOutsideOrganization { .. })
    ));
}

#[test]
fn test_alert_evaluation_is_idempotent() {
    let engine = engine_with(vec![beef(), bun()]);
    let store = engine.store();
    store.upsert_inventory(inventory("BEEF", 2, 10)).unwrap();
    store
        .upsert_inventory(inventory("BUN", 500, 50).with_max_threshold(Decimal::from(100)))
        .unwrap();

    let first = engine.evaluate_alerts("R-PARIS").unwrap();
    let second = engine.evaluate_alerts("R-PARIS").unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
    assert_eq!(store.alerts("R-PARIS").unwrap().len(), 2);
}

#[test]
fn test_alert_resolution_keeps_history() {
    let engine = engine_with(vec![beef()]);
    let store = engine.store();
    store.upsert_inventory(inventory("BEEF", 0, 10)).unwrap();
    let opened = engine.evaluate_alerts("R-PARIS").unwrap();

    store.upsert_inventory(inventory("BEEF", 7, 10)).unwrap();
    let updated = engine.evaluate_alerts("R-PARIS").unwrap();
    assert_eq!(updated[0].id, opened[0].id);
    assert_eq!(updated[0].severity, Severity::Medium);

    store.upsert_inventory(inventory("BEEF", 15, 10)).unwrap();
    assert!(engine.evaluate_alerts("R-PARIS").unwrap().is_empty());

    let history = store.alerts("R-PARIS").unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].resolved);
}

#[test]
fn test_accepting_order_updates_stock_and_resolves_shortage() {
    let engine = engine_with(vec![beef()]);
    let store = engine.store();
    store.add_sales(burger_sales(100)).unwrap();
    store.upsert_inventory(inventory("BEEF", 5, 10)).unwrap();

    let shortages = engine.evaluate_alerts("R-PARIS").unwrap();
    assert_eq!(open_of_type(&shortages, AlertType::Shortage).len(), 1);

    let outcome = engine
        .generate_order_recommendation("R-PARIS", Some(Decimal::new(1, 1)), 7)
        .unwrap();
    let id = outcome.recommendation().unwrap().id;

    let accepted = engine.accept_recommendation(id).unwrap();
    assert_eq!(accepted.status, RecommendationStatus::Accepted);
    assert_eq!(accepted.updated_at, now());

    let beef = store.inventory_of("R-PARIS", "BEEF").unwrap().unwrap();
    assert_eq!(beef.current_stock, Decimal::from(22));
    assert!(engine.evaluate_alerts("R-PARIS").unwrap().is_empty());
    assert!(!store.is_dirty("R-PARIS").unwrap());

    let err = engine.accept_recommendation(id).unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition { .. }));
    assert!(matches!(
        engine.dismiss_recommendation(uuid_not_stored()),
        Err(EngineError::RecommendationNotFound(_))
    ));
}

fn uuid_not_stored() -> uuid::Uuid {
    uuid::Uuid::nil()
}

#[test]
fn test_dismissed_recommendation_has_no_write_back() {
    let engine = engine_with(vec![beef()]);
    let store = engine.store();
    store.add_sales(burger_sales(100)).unwrap();
    store.upsert_inventory(inventory("BEEF", 5, 10)).unwrap();

    let outcome = engine.generate_order_recommendation("R-PARIS", None, 7).unwrap();
    let id = outcome.recommendation().unwrap().id;

    let dismissed = engine.dismiss_recommendation(id).unwrap();
    assert_eq!(dismissed.status, RecommendationStatus::Dismissed);
    assert_eq!(
        store.inventory_of("R-PARIS", "BEEF").unwrap().unwrap().current_stock,
        Decimal::from(5)
    );
    assert!(engine.accept_recommendation(id).is_err());
}

#[test]
fn test_staffing_recommendation_and_understaffing_lifecycle() {
    let engine = engine_with(vec![beef()]);
    let store = engine.store();
    // 星期五
    let target = day(11, 21);
    store
        .add_sales(vec![
            SalesRecord::new("R-PARIS".to_string(), "BURGER".to_string(), Decimal::from(80), day(11, 14))
                .with_sale_hour(12),
            SalesRecord::new("R-PARIS".to_string(), "BURGER".to_string(), Decimal::from(40), day(11, 14))
                .with_sale_hour(19),
        ])
        .unwrap();
    store
        .upsert_planned_staffing(&[PlannedStaffing::new(
            "R-PARIS".to_string(),
            target,
            StaffingSlot::Lunch,
            1,
        )])
        .unwrap();

    let alerts = engine.evaluate_alerts("R-PARIS").unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].alert_type, AlertType::Understaffing);
    assert_eq!(alerts[0].severity, Severity::High);
    assert_eq!(
        alerts[0].subject,
        AlertSubject::Slot {
            date: target,
            slot: StaffingSlot::Lunch
        }
    );

    let outcome = engine.generate_staffing_recommendation("R-PARIS", target).unwrap();
    let recommendation = outcome.recommendation().unwrap().clone();
    assert_eq!(recommendation.priority, Priority::High);
    let RecommendationData::Staffing(staffing) = &recommendation.data else {
        panic!("expected a staffing recommendation");
    };
    assert_eq!(staffing.slots.len(), 4);
    let lunch = staffing.slots.iter().find(|s| s.slot == StaffingSlot::Lunch).unwrap();
    assert_eq!(lunch.recommended_count, 4);
    assert_eq!(lunch.planned_count, Some(1));

    engine.accept_recommendation(recommendation.id).unwrap();

    let planned = store.planned_staffing("R-PARIS").unwrap();
    assert_eq!(planned.len(), 4);
    assert!(engine.evaluate_alerts("R-PARIS").unwrap().is_empty());
}

#[test]
fn test_past_staffing_alerts_resolve_when_the_clock_moves_on() {
    let engine = engine_with(vec![beef()]);
    let target = day(11, 21);
    engine
        .store()
        .add_sales(vec![
            SalesRecord::new("R-PARIS".to_string(), "BURGER".to_string(), Decimal::from(80), day(11, 14))
                .with_sale_hour(12),
        ])
        .unwrap();
    engine
        .store()
        .upsert_planned_staffing(&[PlannedStaffing::new(
            "R-PARIS".to_string(),
            target,
            StaffingSlot::Lunch,
            1,
        )])
        .unwrap();

    let alerts = engine.evaluate_alerts("R-PARIS").unwrap();
    assert_eq!(open_of_type(&alerts, AlertType::Understaffing).len(), 1);
    let opened = engine.compute_executive_metrics("ORG-1", Some("R-PARIS")).unwrap();
    assert_eq!(opened.high_risk_alerts, 1);

    let later = Utc.with_ymd_and_hms(2025, 12, 20, 9, 0, 0).unwrap();
    let engine = engine.with_fixed_now(later);

    assert!(engine.evaluate_alerts("R-PARIS").unwrap().is_empty());
    let stored = engine.store().alerts("R-PARIS").unwrap();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].resolved);
    assert_eq!(stored[0].updated_at, later);

    let summary = engine.compute_executive_metrics("ORG-1", Some("R-PARIS")).unwrap();
    assert_eq!(summary.open_alerts, 0);
    assert_eq!(summary.high_risk_alerts, 0);
    assert_eq!(summary.high_risk_exposure.amount, Decimal::ZERO);
}

#[test]
fn test_staffing_without_history() {
    let engine = engine_with(vec![beef()]);

    let outcome = engine.generate_staffing_recommendation("R-LYON", day(11, 21)).unwrap();

    assert_eq!(outcome.reason(), Some(NoRecommendationReason::NoStaffingHistory));
}

#[test]
fn test_evaluate_dirty_restaurants() {
    let engine = engine_with(vec![beef()]);
    let store = engine.store();
    store.upsert_inventory(inventory("BEEF", 0, 10)).unwrap();
    store
        .upsert_inventory(InventorySnapshot::new(
            "R-LYON".to_string(),
            "BEEF".to_string(),
            Decimal::from(50),
            Decimal::from(10),
        ))
        .unwrap();

    let result = engine.evaluate_dirty().unwrap();

    let evaluated = &result.evaluated;
    assert_eq!(evaluated.keys().cloned().collect::<Vec<_>>(), vec!["R-LYON", "R-PARIS"]);
    assert_eq!(evaluated["R-PARIS"].len(), 1);
    assert!(evaluated["R-LYON"].is_empty());
    assert!(result.failed.is_empty());
    assert!(engine.evaluate_dirty().unwrap().is_empty());
}

#[test]
fn test_evaluate_dirty_keeps_going_past_a_failing_restaurant() {
    let engine = engine_with(vec![beef()]);
    // R-AAA 未註冊，排序在 R-PARIS 之前
    engine
        .store()
        .upsert_inventory(InventorySnapshot::new(
            "R-AAA".to_string(),
            "BEEF".to_string(),
            Decimal::ZERO,
            Decimal::from(10),
        ))
        .unwrap();
    engine.store().upsert_inventory(inventory("BEEF", 0, 10)).unwrap();

    let result = engine.evaluate_dirty().unwrap();

    assert_eq!(result.evaluated.keys().cloned().collect::<Vec<_>>(), vec!["R-PARIS"]);
    assert_eq!(open_of_type(&result.evaluated["R-PARIS"], AlertType::Shortage).len(), 1);
    assert!(matches!(
        result.failed.get("R-AAA"),
        Some(EngineError::UnknownRestaurant(id)) if id == "R-AAA"
    ));
    assert!(!engine.store().is_dirty("R-PARIS").unwrap());
    assert!(engine.store().is_dirty("R-AAA").unwrap());
    assert_eq!(engine.store().alerts("R-PARIS").unwrap().len(), 1);

    let retry = engine.evaluate_dirty().unwrap();
    assert!(retry.evaluated.is_empty());
    assert_eq!(retry.failed.keys().cloned().collect::<Vec<_>>(), vec!["R-AAA"]);
}

#[test]
fn test_executive_metrics() {
    let engine = engine_with(vec![beef()]);
    let store = engine.store();
    store.add_sales(burger_sales(100)).unwrap();
    store.upsert_inventory(inventory("BEEF", 5, 10)).unwrap();

    // 上個月已接受、無成本資料的建議：啟發式 500 €
    let last_month = now() - Duration::days(30);
    let mut previous = Recommendation::new(
        "R-LYON".to_string(),
        RecommendationData::Staffing(StaffingRecommendationData {
            target_date: day(10, 20),
            slots: Vec::new(),
            history_days: 1,
            data_gaps: Vec::new(),
        }),
        Priority::Low,
        last_month,
    );
    previous.accept(last_month).unwrap();
    store.save_recommendation(&previous).unwrap();

    let outcome = engine
        .generate_order_recommendation("R-PARIS", Some(Decimal::new(1, 1)), 7)
        .unwrap();
    engine
        .accept_recommendation(outcome.recommendation().unwrap().id)
        .unwrap();
    store
        .upsert_inventory(inventory("BEEF", 0, 10).with_max_threshold(Decimal::from(40)))
        .unwrap();
    engine.evaluate_alerts("R-PARIS").unwrap();

    let summary = engine.compute_executive_metrics("ORG-1", None).unwrap();

    assert_eq!(summary.accepted_recommendations, 1);
    assert_eq!(summary.estimated_savings.amount, Decimal::new(1875, 1));
    assert_eq!(summary.estimated_savings.basis, ImpactBasis::Computed);
    assert_eq!(summary.previous_accepted_recommendations, 1);
    assert_eq!(summary.previous_savings.basis, ImpactBasis::Heuristic);
    // (187.5 - 500) / 500 = -62.5%
    assert_eq!(summary.savings_change_pct, Some(Decimal::new(-625, 1)));
    assert_eq!(summary.open_alerts, 1);
    assert_eq!(summary.high_risk_alerts, 1);
    // 10 kg × 12.50 €
    assert_eq!(summary.high_risk_exposure.amount, Decimal::from(125));

    let paris = engine.compute_executive_metrics("ORG-1", Some("R-PARIS")).unwrap();
    assert_eq!(paris.restaurant_id.as_deref(), Some("R-PARIS"));
    assert_eq!(paris.previous_accepted_recommendations, 0);
    assert_eq!(paris.savings_change_pct, None);
}

#[test]
fn test_config_from_json_drives_horizon() {
    let config = EngineConfig::from_json_str(r#"{ "forecast_horizon_days": 14 }"#).unwrap();
    let engine = RestockEngine::new(InMemoryStore::new(), config)
        .unwrap()
        .with_fixed_now(now());
    let store = engine.store();
    store
        .add_restaurant(Restaurant::new("R-PARIS".to_string(), "ORG-1".to_string(), "Paris".to_string()))
        .unwrap();
    store.add_ingredient(beef()).unwrap();
    store
        .add_recipe_line(RecipeLine::new("BURGER".to_string(), "BEEF".to_string(), Decimal::from(200)).with_unit("g"))
        .unwrap();
    store.add_sales(burger_sales(100)).unwrap();

    let outcome = engine
        .generate_order_recommendation("R-PARIS", Some(Decimal::ZERO), 7)
        .unwrap();

    let order = order_data(&outcome);
    assert_eq!(order.horizon_days, 14);
    assert_eq!(order.lines[0].needed_quantity, Decimal::from(40));
    assert_eq!(order.lines[0].quantity_to_order, Decimal::from(40));
}

#[test]
fn test_requested_window_is_clamped_to_configured_maximum() {
    let engine = engine_with_config(EngineConfig::default().with_max_window_days(7), vec![beef()]);
    let store = engine.store();
    store.add_sales(burger_sales(100)).unwrap();
    // 超出 7 天上限，不應計入
    store
        .add_sales(vec![SalesRecord::new(
            "R-PARIS".to_string(),
            "BURGER".to_string(),
            Decimal::from(300),
            day(11, 1),
        )])
        .unwrap();
    store.upsert_inventory(inventory("BEEF", 0, 10)).unwrap();

    let outcome = engine
        .generate_order_recommendation("R-PARIS", Some(Decimal::ZERO), 30)
        .unwrap();

    let order = order_data(&outcome);
    assert_eq!(order.window_days, 7);
    // 100 份 / 7 天 × 7 天 × 0.2 kg
    assert_eq!(order.lines[0].needed_quantity, Decimal::from(20));
    assert_eq!(order.lines[0].quantity_to_order, Decimal::from(20));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = EngineConfig::default().with_forecast_horizon_days(0);
    assert!(matches!(
        RestockEngine::new(InMemoryStore::new(), config),
        Err(EngineError::InvalidConfig(_))
    ));
}
