use std::rc::Rc;

use contracts::domain::a001_product::Product;
use contracts::domain::a008_hero_slide::HeroSlide;
use contracts::domain::common::EntityId;
use contracts::shared::errors::{GatewayError, GatewayErrorKind};
use serde_json::json;

use super::*;
use crate::shared::gateway::{GatewayOp, MemoryGateway};

fn product(id: i64, name: &str) -> Product {
    let mut p = Product::new(name, 10.0);
    p.id = Some(id);
    p
}

fn slide(id: i64, title: &str, sort_order: u32) -> HeroSlide {
    HeroSlide {
        id: Some(id),
        title: title.to_string(),
        subtitle: String::new(),
        image_url: format!("/img/{}.jpg", id),
        link_url: None,
        is_active: true,
        sort_order,
    }
}

fn controller_for<E: Entity>(rows: Vec<E>) -> (Rc<MemoryGateway<E>>, Controller<E>) {
    let gateway = Rc::new(MemoryGateway::seeded(rows));
    let dyn_gateway: Rc<dyn Gateway<E>> = gateway.clone();
    (gateway, Controller::new(dyn_gateway))
}

async fn loaded_products(rows: Vec<Product>) -> (Rc<MemoryGateway<Product>>, Controller<Product>) {
    let (gateway, controller) = controller_for(rows);
    controller.load().await.unwrap();
    (gateway, controller)
}

fn patch_of(value: serde_json::Value) -> Patch {
    value.as_object().cloned().unwrap()
}

fn names(controller: &Controller<Product>) -> Vec<String> {
    controller.snapshot().into_iter().map(|p| p.name).collect()
}

fn sorted(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort();
    ids
}

// ============================================================================
// load
// ============================================================================

#[tokio::test]
async fn test_load_replaces_collection() {
    let (_, controller) = controller_for(vec![product(1, "Axolotl"), product(2, "Gecko")]);
    assert!(controller.is_empty());

    controller.load().await.unwrap();

    assert_eq!(controller.ids(), vec![1, 2]);
    assert_eq!(controller.status(), CollectionStatus::Clean);
    assert!(controller.revision() > 0);
}

#[tokio::test]
async fn test_concurrent_loads_share_one_request() {
    let (gateway, controller) = controller_for(vec![product(1, "Axolotl")]);

    let (a, b, status) = futures::join!(controller.load(), controller.load(), async {
        controller.status()
    });

    assert!(a.is_ok() && b.is_ok());
    assert_eq!(status, CollectionStatus::Reconciling);
    assert_eq!(gateway.call_count(GatewayOp::List), 1);
    assert_eq!(controller.len(), 1);
    assert_eq!(controller.status(), CollectionStatus::Clean);
}

#[tokio::test]
async fn test_failed_load_keeps_collection() {
    let (gateway, controller) = loaded_products(vec![product(1, "Axolotl")]).await;
    gateway.fail_next(GatewayOp::List, GatewayError::network("offline"));

    let err = controller.reload().await.unwrap_err();

    assert_eq!(err.gateway_kind(), Some(GatewayErrorKind::Network));
    assert_eq!(controller.ids(), vec![1]);
    assert_eq!(controller.last_error(), Some(err));
    controller.clear_error();
    assert!(controller.last_error().is_none());
}

#[tokio::test]
async fn test_load_orders_by_sort_order() {
    let (_, controller) = controller_for(vec![slide(1, "a", 3), slide(2, "b", 1), slide(3, "c", 2)]);
    controller.load().await.unwrap();
    assert_eq!(controller.ids(), vec![2, 3, 1]);
}

// ============================================================================
// create
// ============================================================================

#[tokio::test]
async fn test_create_appends_stored_entity() {
    let (gateway, controller) = loaded_products(vec![product(1, "Axolotl")]).await;

    let created = controller.create(Product::new("Gecko", 12.5)).await.unwrap();

    let id = created.id.unwrap();
    assert!(!id.is_temporary());
    assert_eq!(controller.ids(), vec![1, id]);
    assert_eq!(names(&controller), vec!["Axolotl", "Gecko"]);
    assert_eq!(gateway.rows().len(), 2);
    assert_eq!(controller.status(), CollectionStatus::Clean);
}

#[tokio::test]
async fn test_create_is_visible_before_confirmation() {
    let (_, controller) = loaded_products(vec![]).await;

    let (result, (seen, status, pending)) = futures::join!(
        controller.create(Product::new("Gecko", 12.5)),
        async { (controller.snapshot(), controller.status(), controller.pending()) }
    );

    result.unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].id.unwrap().is_temporary());
    assert_eq!(status, CollectionStatus::Dirty);
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].kind, MutationKind::Create);
    assert!(controller.pending().is_empty());
}

#[tokio::test]
async fn test_failed_create_removes_placeholder() {
    let (gateway, controller) = loaded_products(vec![product(1, "Axolotl")]).await;
    gateway.fail_next(GatewayOp::Create, GatewayError::server("boom"));

    let err = controller.create(Product::new("Gecko", 12.5)).await.unwrap_err();

    assert_eq!(err.gateway_kind(), Some(GatewayErrorKind::Server));
    assert_eq!(controller.ids(), vec![1]);
    assert!(controller.last_error().is_some());
}

#[tokio::test]
async fn test_invalid_create_never_reaches_gateway() {
    let (gateway, controller) = loaded_products(vec![]).await;

    let err = controller.create(Product::new("  ", -1.0)).await.unwrap_err();

    let fields = err.as_validation().unwrap();
    assert!(fields.contains("name"));
    assert!(fields.contains("price"));
    assert_eq!(gateway.call_count(GatewayOp::Create), 0);
    assert!(controller.is_empty());
}

#[tokio::test]
async fn test_identical_concurrent_creates_get_distinct_ids() {
    let (gateway, controller) = loaded_products(vec![]).await;
    let draft = Product::new("Gecko", 12.5);

    let (a, b) = futures::join!(controller.create(draft.clone()), controller.create(draft));

    let (a, b) = (a.unwrap().id.unwrap(), b.unwrap().id.unwrap());
    assert_ne!(a, b);
    assert_eq!(sorted(controller.ids()), sorted(vec![a, b]));
    assert_eq!(gateway.rows().len(), 2);
}

// ============================================================================
// update / toggle
// ============================================================================

#[tokio::test]
async fn test_update_merges_patch() {
    let (gateway, controller) = loaded_products(vec![product(1, "Axolotl")]).await;

    let stored = controller
        .update(&1, patch_of(json!({ "name": "Blue axolotl", "price": 30.0 })))
        .await
        .unwrap();

    assert_eq!(stored.name, "Blue axolotl");
    assert_eq!(controller.get(&1).unwrap().price, 30.0);
    assert_eq!(gateway.rows()[0].name, "Blue axolotl");
}

#[tokio::test]
async fn test_failed_update_restores_snapshot() {
    let (gateway, controller) = loaded_products(vec![product(1, "Axolotl")]).await;
    gateway.fail_next(GatewayOp::Update, GatewayError::timeout("slow"));

    let (result, optimistic) = futures::join!(
        controller.update(&1, patch_of(json!({ "name": "Renamed" }))),
        async { controller.get(&1).map(|p| p.name) }
    );

    assert_eq!(result.unwrap_err().gateway_kind(), Some(GatewayErrorKind::Timeout));
    assert_eq!(optimistic.as_deref(), Some("Renamed"));
    assert_eq!(controller.get(&1).unwrap().name, "Axolotl");
}

#[tokio::test]
async fn test_update_of_unknown_id_is_conflict() {
    let (gateway, controller) = loaded_products(vec![product(1, "Axolotl")]).await;

    let err = controller
        .update(&42, patch_of(json!({ "name": "Ghost" })))
        .await
        .unwrap_err();

    assert_eq!(err.gateway_kind(), Some(GatewayErrorKind::Conflict));
    assert_eq!(gateway.call_count(GatewayOp::Update), 0);
}

#[tokio::test]
async fn test_update_blanking_required_field_is_rejected() {
    let (gateway, controller) = loaded_products(vec![product(1, "Axolotl")]).await;

    let err = controller
        .update(&1, patch_of(json!({ "name": "" })))
        .await
        .unwrap_err();

    assert!(err.as_validation().unwrap().contains("name"));
    assert_eq!(controller.get(&1).unwrap().name, "Axolotl");
    assert_eq!(gateway.call_count(GatewayOp::Update), 0);
}

#[tokio::test]
async fn test_toggle_flips_boolean_field() {
    let (gateway, controller) = loaded_products(vec![product(1, "Axolotl")]).await;

    controller.toggle(&1, "isActive").await.unwrap();
    assert!(!controller.get(&1).unwrap().is_active);
    assert!(!gateway.rows()[0].is_active);

    controller.toggle(&1, "isActive").await.unwrap();
    assert!(controller.get(&1).unwrap().is_active);
}

#[tokio::test]
async fn test_toggle_of_non_boolean_field_is_rejected() {
    let (_, controller) = loaded_products(vec![product(1, "Axolotl")]).await;

    let err = controller.toggle(&1, "name").await.unwrap_err();

    assert!(err.as_validation().unwrap().contains("name"));
}

// ============================================================================
// delete
// ============================================================================

#[tokio::test]
async fn test_delete_removes_entity() {
    let (gateway, controller) =
        loaded_products(vec![product(1, "A"), product(2, "B"), product(3, "C")]).await;

    controller.delete(&2).await.unwrap();

    assert_eq!(controller.ids(), vec![1, 3]);
    assert_eq!(gateway.rows().len(), 2);
}

#[tokio::test]
async fn test_failed_delete_restores_original_position() {
    let (gateway, controller) =
        loaded_products(vec![product(1, "A"), product(2, "B"), product(3, "C")]).await;
    gateway.fail_next(GatewayOp::Delete, GatewayError::server("locked"));

    let (result, during) = futures::join!(controller.delete(&2), async { controller.ids() });

    assert!(result.is_err());
    assert_eq!(during, vec![1, 3]);
    assert_eq!(names(&controller), vec!["A", "B", "C"]);
}

// ============================================================================
// reorder
// ============================================================================

#[tokio::test]
async fn test_reorder_assigns_dense_sort_orders() {
    let (gateway, controller) =
        controller_for(vec![slide(1, "a", 1), slide(2, "b", 2), slide(3, "c", 3)]);
    controller.load().await.unwrap();

    controller.reorder(&[3, 1, 2]).await.unwrap();

    let orders: Vec<(i64, u32)> = controller
        .snapshot()
        .iter()
        .map(|s| (s.id.unwrap(), s.sort_order))
        .collect();
    assert_eq!(orders, vec![(3, 1), (1, 2), (2, 3)]);
    let stored: Vec<i64> = gateway.rows().iter().map(|s| s.id.unwrap()).collect();
    assert_eq!(stored, vec![3, 1, 2]);
}

#[tokio::test]
async fn test_failed_reorder_restores_previous_order() {
    let (gateway, controller) =
        controller_for(vec![slide(1, "a", 1), slide(2, "b", 2), slide(3, "c", 3)]);
    controller.load().await.unwrap();
    let before = controller.snapshot();
    gateway.fail_next(GatewayOp::Reorder, GatewayError::network("offline"));

    assert!(controller.reorder(&[2, 3, 1]).await.is_err());

    assert_eq!(controller.snapshot(), before);
}

#[tokio::test]
async fn test_reorder_requires_permutation() {
    let (gateway, controller) =
        controller_for(vec![slide(1, "a", 1), slide(2, "b", 2), slide(3, "c", 3)]);
    controller.load().await.unwrap();

    for order in [vec![1, 2], vec![1, 1, 2], vec![1, 2, 9]] {
        let err = controller.reorder(&order).await.unwrap_err();
        assert!(err.as_validation().unwrap().contains("order"));
    }
    assert_eq!(gateway.call_count(GatewayOp::Reorder), 0);
}

// ============================================================================
// ordering of overlapping mutations
// ============================================================================

#[tokio::test]
async fn test_mutations_of_same_id_run_in_call_order() {
    let (gateway, controller) = loaded_products(vec![product(1, "Axolotl")]).await;

    let (update, delete) = futures::join!(
        controller.update(&1, patch_of(json!({ "name": "Renamed" }))),
        controller.delete(&1)
    );

    assert_eq!(update.unwrap().name, "Renamed");
    delete.unwrap();
    assert_eq!(
        gateway.calls(),
        vec![GatewayOp::List, GatewayOp::Update, GatewayOp::Delete]
    );
    assert!(!controller.contains(&1));
}

#[tokio::test]
async fn test_update_queued_behind_delete_is_conflict() {
    let (gateway, controller) = loaded_products(vec![product(1, "Axolotl")]).await;

    let (delete, update) = futures::join!(
        controller.delete(&1),
        controller.update(&1, patch_of(json!({ "name": "Renamed" })))
    );

    delete.unwrap();
    assert_eq!(
        update.unwrap_err().gateway_kind(),
        Some(GatewayErrorKind::Conflict)
    );
    assert_eq!(gateway.call_count(GatewayOp::Update), 0);
}

#[tokio::test]
async fn test_update_queued_behind_create_targets_stored_id() {
    let (gateway, controller) = loaded_products(vec![]).await;
    let temporary = <i64 as EntityId>::temporary(0);

    let (created, updated) = futures::join!(
        controller.create(Product::new("Gecko", 12.5)),
        controller.update(&temporary, patch_of(json!({ "price": 15.0 })))
    );

    let id = created.unwrap().id.unwrap();
    let updated = updated.unwrap();
    assert_eq!(updated.id, Some(id));
    assert_eq!(updated.price, 15.0);
    assert_eq!(gateway.rows()[0].price, 15.0);
    assert_eq!(controller.get(&temporary).map(|p| p.id), Some(Some(id)));
}

#[tokio::test]
async fn test_id_set_matches_store_after_mixed_outcomes() {
    let (gateway, controller) =
        loaded_products(vec![product(1, "A"), product(2, "B"), product(3, "C")]).await;
    gateway.fail_next(GatewayOp::Delete, GatewayError::server("locked"));

    let _ = futures::join!(
        controller.delete(&1),
        controller.delete(&2),
        controller.create(Product::new("D", 1.0)),
        controller.update(&3, patch_of(json!({ "name": "C2" })))
    );

    let stored: Vec<i64> = gateway.rows().iter().filter_map(|p| p.id).collect();
    assert_eq!(sorted(controller.ids()), sorted(stored));
    assert_eq!(controller.get(&1).unwrap().name, "A");
}

#[tokio::test]
async fn test_load_during_delete_keeps_delete() {
    let (gateway, controller) =
        loaded_products(vec![product(1, "A"), product(2, "B"), product(3, "C")]).await;

    let (load, delete) = futures::join!(controller.load(), controller.delete(&2));

    load.unwrap();
    delete.unwrap();
    let stored: Vec<i64> = gateway.rows().iter().filter_map(|p| p.id).collect();
    assert_eq!(stored, vec![1, 3]);
    assert_eq!(controller.ids(), vec![1, 3]);
}

#[tokio::test]
async fn test_failed_delete_during_load_is_not_duplicated() {
    let (gateway, controller) =
        loaded_products(vec![product(1, "A"), product(2, "B"), product(3, "C")]).await;
    gateway.fail_next(GatewayOp::Delete, GatewayError::server("locked"));

    let (load, delete) = futures::join!(controller.load(), controller.delete(&2));

    load.unwrap();
    assert!(delete.is_err());
    assert_eq!(controller.ids(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_reorder_while_create_in_flight() {
    let (gateway, controller) = controller_for(vec![slide(1, "a", 1), slide(2, "b", 2)]);
    controller.load().await.unwrap();
    let mut draft = slide(0, "c", 0);
    draft.id = None;

    let (created, reordered) = futures::join!(controller.create(draft), controller.reorder(&[2, 1]));

    let id = created.unwrap().id.unwrap();
    reordered.unwrap();
    assert_eq!(controller.ids(), vec![2, 1, id]);
    let stored: Vec<i64> = gateway.rows().iter().filter_map(|s| s.id).collect();
    assert_eq!(stored, vec![2, 1, id]);
}

#[tokio::test]
async fn test_reorder_lists_saved_ids_only() {
    let (gateway, controller) = controller_for(vec![slide(1, "a", 1), slide(2, "b", 2)]);
    controller.load().await.unwrap();
    let mut draft = slide(0, "c", 0);
    draft.id = None;
    let temporary = <i64 as EntityId>::temporary(0);

    let order = [2, 1, temporary];
    let (created, reordered) =
        futures::join!(controller.create(draft), controller.reorder(&order));

    created.unwrap();
    assert!(reordered.unwrap_err().as_validation().unwrap().contains("order"));
    assert_eq!(gateway.call_count(GatewayOp::Reorder), 0);
}

// ============================================================================
// notifications
// ============================================================================

#[tokio::test]
async fn test_subscribers_see_revisions() {
    let (_, controller) = loaded_products(vec![product(1, "Axolotl")]).await;
    let mut rx = controller.subscribe();
    assert!(!rx.has_changed().unwrap());

    controller.toggle(&1, "isAvailable").await.unwrap();

    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), controller.revision());
}
