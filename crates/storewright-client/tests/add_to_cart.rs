mod common;

use common::harness;
use storewright_client::{
    CartMutation, PageObject, Screen, badge_count, fixtures::products,
};

#[tokio::test]
async fn each_product_can_be_added_on_its_own() {
    let h = harness().await;
    for product in products::ALL {
        let scenario = h.authenticated().await;
        let inventory = scenario.inventory();

        assert_eq!(
            inventory.add_item_to_cart(product).await.unwrap(),
            CartMutation::Applied
        );
        assert_eq!(
            inventory.get_cart_item_count().await.unwrap().as_deref(),
            Some("1")
        );
        assert!(inventory.is_item_in_cart(product).await.unwrap());

        assert_eq!(inventory.go_to_cart().await.unwrap(), Screen::Cart);
        let cart = scenario.cart();
        cart.verify_page_loaded().await.unwrap();
        assert!(cart.is_item_in_cart(product).await.unwrap());
        assert_eq!(cart.get_cart_item_count().await.unwrap(), 1);
        scenario.finish().await.unwrap();
    }
}

#[tokio::test]
async fn cart_holds_exactly_what_was_added_in_any_order() {
    let h = harness().await;
    let orders = [
        [products::BACKPACK, products::BIKE_LIGHT, products::BOLT_T_SHIRT],
        [products::BOLT_T_SHIRT, products::BACKPACK, products::BIKE_LIGHT],
    ];

    for order in orders {
        let scenario = h.authenticated().await;
        let inventory = scenario.inventory();
        for product in order {
            inventory.add_item_to_cart(product).await.unwrap();
        }
        let badge = inventory.get_cart_item_count().await.unwrap();
        assert_eq!(badge_count(badge.as_deref()).unwrap(), 3);

        inventory.go_to_cart().await.unwrap();
        let lines = scenario.cart().get_cart_lines().await.unwrap();
        assert_eq!(lines.len(), 3);
        let shown = scenario.cart().get_cart_item_names().await.unwrap();
        assert!(lines.same_items_as(&shown), "missing/unexpected: {:?}", lines.diff(&shown));
        for product in order {
            assert!(lines.contains(product));
        }
    }
}

#[tokio::test]
async fn adding_twice_changes_nothing() {
    let h = harness().await;
    let scenario = h.authenticated().await;
    let inventory = scenario.inventory();

    inventory.add_item_to_cart(products::ONESIE).await.unwrap();
    assert_eq!(
        inventory.add_item_to_cart(products::ONESIE).await.unwrap(),
        CartMutation::NoOp
    );
    assert_eq!(
        inventory.get_cart_item_count().await.unwrap().as_deref(),
        Some("1")
    );
}

#[tokio::test]
async fn whole_catalog_fits_in_the_cart() {
    let h = harness().await;
    let scenario = h.authenticated().await;
    let inventory = scenario.inventory();

    for product in products::ALL {
        inventory.add_item_to_cart(product).await.unwrap();
    }
    assert_eq!(
        inventory.get_cart_item_count().await.unwrap().as_deref(),
        Some("6")
    );

    inventory.go_to_cart().await.unwrap();
    let shown = scenario.cart().get_cart_item_names().await.unwrap();
    assert_eq!(shown.len(), products::ALL.len());
    for product in products::ALL {
        assert!(shown.iter().any(|name| name == product));
    }
}
