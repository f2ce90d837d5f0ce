mod common;

use common::harness;
use storewright_client::{PageObject, Screen, badge_count, fixtures::products};

#[tokio::test]
async fn concurrent_scenarios_keep_separate_carts() {
    let h = harness().await;
    let (first, second) = tokio::join!(h.authenticated(), h.authenticated());
    let (first_inventory, second_inventory) = (first.inventory(), second.inventory());

    let (added, badge) = tokio::join!(
        first_inventory.add_item_to_cart(products::BACKPACK),
        second_inventory.get_cart_item_count(),
    );
    added.unwrap();
    assert_eq!(badge.unwrap(), None);

    second_inventory.add_item_to_cart(products::ONESIE).await.unwrap();
    second_inventory.add_item_to_cart(products::BIKE_LIGHT).await.unwrap();

    let first_badge = first_inventory.get_cart_item_count().await.unwrap();
    let second_badge = second_inventory.get_cart_item_count().await.unwrap();
    assert_eq!(badge_count(first_badge.as_deref()).unwrap(), 1);
    assert_eq!(badge_count(second_badge.as_deref()).unwrap(), 2);
    assert!(!first_inventory.is_item_in_cart(products::ONESIE).await.unwrap());

    let opened_later = h.authenticated().await;
    assert_eq!(opened_later.inventory().get_cart_item_count().await.unwrap(), None);
    assert_eq!(
        first_inventory.get_cart_item_count().await.unwrap().as_deref(),
        Some("1")
    );
}

#[tokio::test]
async fn logout_in_one_scenario_keeps_the_other_signed_in() {
    let h = harness().await;
    let (leaving, staying) = tokio::join!(h.authenticated(), h.authenticated());

    assert_eq!(leaving.inventory().logout().await.unwrap(), Screen::Login);
    assert!(leaving.login().is_login_form_visible().await.unwrap());

    let inventory = staying.inventory();
    inventory.open().await.unwrap();
    assert_eq!(staying.current_screen().await.unwrap(), Screen::Inventory);
    inventory.add_item_to_cart(products::FLEECE_JACKET).await.unwrap();
    assert_eq!(inventory.get_cart_item_count().await.unwrap().as_deref(), Some("1"));

    leaving.finish().await.unwrap();
    staying.finish().await.unwrap();
}
