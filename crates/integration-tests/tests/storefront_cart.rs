//! Integration tests for the shopping cart.
//!
//! Prerequisites:
//! - A running `PostgreSQL` database with migrations applied
//! - A seeded menu (cargo run -p savory-cli -- seed menu)
//! - The storefront server running (cargo run -p savory-storefront)
//!
//! Run with: cargo test -p savory-integration-tests -- --ignored

use reqwest::{Client, StatusCode};

use savory_integration_tests::{client, storefront_base_url};

fn location(resp: &reqwest::Response) -> &str {
    resp.headers()
        .get("location")
        .expect("Missing Location header")
        .to_str()
        .expect("Location header is not valid UTF-8")
}

/// Test helper: Scrape the first add-to-cart link off the menu page.
///
/// Returns `None` when the menu is empty so tests can skip instead of fail.
async fn first_meal_path(client: &Client) -> Option<String> {
    let base_url = storefront_base_url();
    let resp = client
        .get(format!("{base_url}/"))
        .send()
        .await
        .expect("Failed to load home page");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body read failed");

    let needle = "/update-cart/";
    let start = body.find(needle)?;
    let rest = body.get(start + needle.len()..)?;
    let id: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if id.is_empty() {
        return None;
    }
    Some(format!("{needle}{id}"))
}

// ============================================================================
// Cart Page Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_cart_page_is_empty_for_new_visitor() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/shopping-cart"))
        .send()
        .await
        .expect("Failed to load cart page");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body read failed");
    assert!(body.contains("Your cart is empty"));
}

// ============================================================================
// Add Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and seeded menu"]
async fn test_add_meal_then_cart_shows_it() {
    let client = client();
    let base_url = storefront_base_url();

    let Some(path) = first_meal_path(&client).await else {
        return; // Menu not seeded in this environment
    };

    let resp = client
        .get(format!("{base_url}{path}"))
        .send()
        .await
        .expect("Failed to add meal");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let resp = client
        .get(format!("{base_url}/shopping-cart"))
        .send()
        .await
        .expect("Failed to load cart page");

    let body = resp.text().await.expect("body read failed");
    assert!(
        body.contains("cart-table"),
        "Expected a non-empty cart after adding a meal"
    );
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_add_unknown_meal_flashes_notice() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/update-cart/999999"))
        .send()
        .await
        .expect("Failed to request cart add");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(
        location(&resp).starts_with("/?notice="),
        "Expected a menu redirect with a notice, got: {}",
        location(&resp)
    );
}

// ============================================================================
// Quantity Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and seeded menu"]
async fn test_update_quantity_to_zero_removes_line() {
    let client = client();
    let base_url = storefront_base_url();

    let Some(path) = first_meal_path(&client).await else {
        return; // Menu not seeded in this environment
    };
    let meal_id = path.trim_start_matches("/update-cart/").to_string();

    client
        .get(format!("{base_url}{path}"))
        .send()
        .await
        .expect("Failed to add meal");

    let resp = client
        .post(format!("{base_url}/update-quantity/{meal_id}"))
        .form(&[(format!("quantity-{meal_id}"), "0")])
        .send()
        .await
        .expect("Failed to update quantity");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/shopping-cart");

    let resp = client
        .get(format!("{base_url}/shopping-cart"))
        .send()
        .await
        .expect("Failed to load cart page");

    let body = resp.text().await.expect("body read failed");
    assert!(
        body.contains("Your cart is empty"),
        "Expected an empty cart after zeroing the only line"
    );
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_update_quantity_rejects_garbage() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .post(format!("{base_url}/update-quantity/1"))
        .form(&[("quantity-1", "three")])
        .send()
        .await
        .expect("Failed to submit quantity update");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(
        location(&resp).starts_with("/shopping-cart?notice="),
        "Expected a cart redirect with a notice, got: {}",
        location(&resp)
    );
}

// ============================================================================
// Remove Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_remove_is_a_noop_on_missing_cart() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/update-quantity/1"))
        .send()
        .await
        .expect("Failed to request removal");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/shopping-cart");
}
