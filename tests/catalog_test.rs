mod common;

use common::{product_base, TestApp};
use marketplace_core::{
    entities::{product, Product},
    errors::ServiceError,
    services::UpdateProductInput,
    slug,
};
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

#[tokio::test]
async fn create_product_populates_expected_slug() {
    let app = TestApp::new().await;
    let category_id = app.seed_category("Clothing").await;

    let product = app
        .services()
        .catalog
        .create_product(product_base(
            "7891000100103",
            "Men's T-Shirt! (Blue)",
            dec!(49.9),
            category_id,
        ))
        .await
        .expect("create product");

    assert_eq!(product.slug, "mens-t-shirt-blue");
    assert_eq!(product.barcode, "7891000100103");
}

#[tokio::test]
async fn same_title_gets_disambiguated_slug() {
    let app = TestApp::new().await;
    let category_id = app.seed_category("Clothing").await;
    let catalog = &app.services().catalog;

    let first = catalog
        .create_product(product_base(
            "1000000000001",
            "Men's T-Shirt! (Blue)",
            dec!(49.9),
            category_id,
        ))
        .await
        .expect("create first product");

    let second = catalog
        .create_product(product_base(
            "1000000000002",
            "Men's T-Shirt! (Blue)",
            dec!(49.9),
            category_id,
        ))
        .await
        .expect("create second product");

    assert_eq!(first.slug, "mens-t-shirt-blue");
    assert_ne!(first.slug, second.slug);

    let suffix = second
        .slug
        .strip_prefix("mens-t-shirt-blue-")
        .expect("second slug keeps the normalized base as prefix");
    assert_eq!(suffix.len(), slug::TOKEN_LEN);
    assert!(suffix
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
}

#[tokio::test]
async fn punctuation_only_title_falls_back_to_valid_slug() {
    let app = TestApp::new().await;
    let category_id = app.seed_category("Misc").await;

    let product = app
        .services()
        .catalog
        .create_product(product_base("2000000000001", "!!! ???", dec!(1.5), category_id))
        .await
        .expect("create product with punctuation-only title");

    assert_eq!(product.slug, slug::FALLBACK_BASE);
}

#[tokio::test]
async fn ensure_slug_never_overwrites_an_existing_slug() {
    let app = TestApp::new().await;
    let catalog = &app.services().catalog;

    let kept = catalog
        .ensure_slug(Some("already-there"), "Completely Different Title")
        .await
        .expect("ensure_slug with existing value");
    assert_eq!(kept, "already-there");

    let generated = catalog
        .ensure_slug(None, "Fresh Title")
        .await
        .expect("ensure_slug without existing value");
    assert_eq!(generated, "fresh-title");
}

#[tokio::test]
async fn concurrent_same_title_creations_get_distinct_slugs() {
    let app = TestApp::new().await;
    let category_id = app.seed_category("Clothing").await;
    let catalog = app.services().catalog.clone();

    let a = catalog.create_product(product_base(
        "3000000000001",
        "Red Shirt",
        dec!(29.9),
        category_id,
    ));
    let b = catalog.create_product(product_base(
        "3000000000002",
        "Red Shirt",
        dec!(29.9),
        category_id,
    ));

    let (a, b) = tokio::join!(a, b);
    let a = a.expect("first concurrent creation succeeds");
    let b = b.expect("second concurrent creation succeeds");

    assert_ne!(a.slug, b.slug);
    assert!(a.slug.starts_with("red-shirt"));
    assert!(b.slug.starts_with("red-shirt"));
}

#[tokio::test]
async fn resolve_product_by_slug_roundtrips() {
    let app = TestApp::new().await;
    let category_id = app.seed_category("Grocery").await;
    let catalog = &app.services().catalog;

    let created = catalog
        .create_product(product_base(
            "4000000000001",
            "Condensed Milk",
            dec!(5.99),
            category_id,
        ))
        .await
        .expect("create product");

    let resolved = catalog
        .get_product_by_slug("condensed-milk")
        .await
        .expect("resolve by slug");
    assert_eq!(resolved.barcode, created.barcode);

    match catalog.get_product_by_slug("no-such-slug").await {
        Err(ServiceError::NotFound(msg)) => assert!(msg.contains("no-such-slug")),
        other => panic!("Expected NotFound, got {:?}", other.map(|p| p.slug)),
    }
}

#[tokio::test]
async fn barcode_over_twenty_characters_is_rejected() {
    let app = TestApp::new().await;
    let category_id = app.seed_category("Misc").await;

    let result = app
        .services()
        .catalog
        .create_product(product_base(
            "123456789012345678901",
            "Oversized Barcode",
            dec!(1.0),
            category_id,
        ))
        .await;

    match result {
        Err(ServiceError::Validation(msg)) => assert!(msg.contains("barcode")),
        other => panic!("Expected Validation error, got {:?}", other.map(|p| p.barcode)),
    }
}

#[tokio::test]
async fn price_precision_boundaries() {
    let app = TestApp::new().await;
    let category_id = app.seed_category("Misc").await;
    let catalog = &app.services().catalog;

    // Nine significant digits: rejected.
    let result = catalog
        .create_product(product_base(
            "5000000000001",
            "Too Expensive",
            dec!(1234567.89),
            category_id,
        ))
        .await;
    match result {
        Err(ServiceError::Validation(msg)) => assert!(msg.contains("price")),
        other => panic!("Expected Validation error, got {:?}", other.map(|p| p.price)),
    }

    // Eight digits, three fractional: accepted.
    let product = catalog
        .create_product(product_base(
            "5000000000002",
            "Exactly Eight Digits",
            dec!(12345.678),
            category_id,
        ))
        .await
        .expect("price at the boundary is accepted");
    assert_eq!(product.price, dec!(12345.678));
}

#[tokio::test]
async fn missing_category_is_a_validation_error() {
    let app = TestApp::new().await;

    let result = app
        .services()
        .catalog
        .create_product(product_base(
            "6000000000001",
            "Orphan Product",
            dec!(9.99),
            uuid::Uuid::new_v4(),
        ))
        .await;

    match result {
        Err(ServiceError::Validation(msg)) => assert!(msg.contains("category")),
        other => panic!("Expected Validation error, got {:?}", other.map(|p| p.barcode)),
    }
}

#[tokio::test]
async fn duplicate_barcode_is_a_conflict() {
    let app = TestApp::new().await;
    let category_id = app.seed_category("Misc").await;
    let catalog = &app.services().catalog;

    catalog
        .create_product(product_base("7000000000001", "First", dec!(1.0), category_id))
        .await
        .expect("create first product");

    let result = catalog
        .create_product(product_base(
            "7000000000001",
            "Second With Same Barcode",
            dec!(2.0),
            category_id,
        ))
        .await;

    match result {
        Err(ServiceError::Conflict(msg)) => assert!(msg.contains("7000000000001")),
        other => panic!("Expected Conflict, got {:?}", other.map(|p| p.barcode)),
    }
}

#[tokio::test]
async fn deleting_a_category_cascades_to_its_products() {
    let app = TestApp::new().await;
    let category_id = app.seed_category("Doomed").await;
    let catalog = &app.services().catalog;

    catalog
        .create_product(product_base(
            "8000000000001",
            "Doomed Product",
            dec!(3.0),
            category_id,
        ))
        .await
        .expect("create product");

    catalog
        .delete_category(category_id)
        .await
        .expect("delete category");

    match catalog.get_product("8000000000001").await {
        Err(ServiceError::NotFound(_)) => {}
        other => panic!("Expected product to be gone, got {:?}", other.map(|p| p.barcode)),
    }

    let remaining = Product::find()
        .filter(product::Column::CategoryId.eq(category_id))
        .count(&*app.state.db)
        .await
        .expect("count products");
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn update_product_keeps_the_slug_stable() {
    let app = TestApp::new().await;
    let category_id = app.seed_category("Stable").await;
    let catalog = &app.services().catalog;

    let created = catalog
        .create_product(product_base(
            "9000000000001",
            "Original Title",
            dec!(10.0),
            category_id,
        ))
        .await
        .expect("create product");
    assert_eq!(created.slug, "original-title");

    let updated = catalog
        .update_product(
            "9000000000001",
            UpdateProductInput {
                title: Some("Renamed Completely".to_string()),
                price: Some(dec!(12.5)),
                ..Default::default()
            },
        )
        .await
        .expect("update product");

    assert_eq!(updated.title, "Renamed Completely");
    assert_eq!(updated.price, dec!(12.5));
    assert_eq!(updated.slug, "original-title");
}

#[tokio::test]
async fn search_products_filters_by_category() {
    let app = TestApp::new().await;
    let clothing = app.seed_category("Clothing").await;
    let grocery = app.seed_category("Grocery").await;
    let catalog = &app.services().catalog;

    catalog
        .create_product(product_base("1100000000001", "Blue Jeans", dec!(89.9), clothing))
        .await
        .expect("create product");
    catalog
        .create_product(product_base("1100000000002", "Green Tea", dec!(4.2), grocery))
        .await
        .expect("create product");

    let result = catalog
        .search_products(marketplace_core::services::ProductSearchQuery {
            search: None,
            category_id: Some(clothing),
            limit: None,
            offset: None,
        })
        .await
        .expect("search products");

    assert_eq!(result.total, 1);
    assert_eq!(result.products[0].barcode, "1100000000001");
}
