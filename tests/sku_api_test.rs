mod common;

use axum::http::Method;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{json, Value};

use common::{response_json, TestApp};
use sku_api::entities::sku;

fn sku_payload(category: &str, upc: Option<&str>, name: &str) -> Value {
    json!({
        "upc": upc,
        "name": name,
        "description": "Premium pressure treated lumber suitable for outdoor use",
        "brand": "WeatherShield",
        "category": category,
        "subcategory": "PRESSURE_TREATED",
        "price": "8.99",
        "cost": "5.50",
        "unit_of_measure": "EACH",
        "quantity_per_unit": 1,
        "weight": "12.5",
        "dimensions": { "length": "96.0", "width": "3.5", "height": "1.5" },
        "tags": ["outdoor", "treated", "lumber"],
        "attributes": { "treatment_type": "ACQ", "grade": "#2" }
    })
}

#[tokio::test]
async fn create_generates_sequential_codes_and_enforces_upc_uniqueness() {
    let app = TestApp::new().await;

    // First SKU for the LBR prefix gets sequence 1
    let response = app
        .request(
            Method::POST,
            "/api/v1/skus",
            Some(sku_payload("LBR", Some("012345678901"), "2x4x8 Lumber")),
        )
        .await;
    assert_eq!(response.status(), 201);
    let created = response_json(response).await;
    assert_eq!(created["sku_code"], "THD-LBR-0000001");
    assert_eq!(created["status"], "ACTIVE");
    assert_eq!(created["version"], 0);

    // Same UPC again is a conflict
    let response = app
        .request(
            Method::POST,
            "/api/v1/skus",
            Some(sku_payload("LBR", Some("012345678901"), "2x6x8 Lumber")),
        )
        .await;
    assert_eq!(response.status(), 409);
    let body = response_json(response).await;
    assert!(
        body["message"].as_str().unwrap().contains("012345678901"),
        "{body}"
    );

    // Different UPC continues the sequence
    let response = app
        .request(
            Method::POST,
            "/api/v1/skus",
            Some(sku_payload("LBR", Some("012345678902"), "2x6x8 Lumber")),
        )
        .await;
    assert_eq!(response.status(), 201);
    let second = response_json(response).await;
    assert_eq!(second["sku_code"], "THD-LBR-0000002");

    // A different category starts its own namespace
    let response = app
        .request(
            Method::POST,
            "/api/v1/skus",
            Some(sku_payload("PLB", None, "Copper Pipe")),
        )
        .await;
    assert_eq!(response.status(), 201);
    let plumbing = response_json(response).await;
    assert_eq!(plumbing["sku_code"], "THD-PLB-0000001");
}

#[tokio::test]
async fn null_upc_never_conflicts() {
    let app = TestApp::new().await;

    for name in ["Widget A", "Widget B"] {
        let response = app
            .request(
                Method::POST,
                "/api/v1/skus",
                Some(sku_payload("HRD", None, name)),
            )
            .await;
        assert_eq!(response.status(), 201);
    }
}

#[tokio::test]
async fn rejects_invalid_input() {
    let app = TestApp::new().await;

    // Bad category
    let response = app
        .request(
            Method::POST,
            "/api/v1/skus",
            Some(sku_payload("lumber", None, "Bad Category")),
        )
        .await;
    assert_eq!(response.status(), 400);

    // Bad UPC
    let response = app
        .request(
            Method::POST,
            "/api/v1/skus",
            Some(sku_payload("LBR", Some("123"), "Bad UPC")),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn lookup_by_id_code_and_upc() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/skus",
            Some(sku_payload("ELC", Some("099999999999"), "Romex Wire")),
        )
        .await;
    let created = response_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .request(Method::GET, &format!("/api/v1/skus/{id}"), None)
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(response_json(response).await["name"], "Romex Wire");

    let response = app
        .request(Method::GET, "/api/v1/skus/code/THD-ELC-0000001", None)
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request(Method::GET, "/api/v1/skus/upc/099999999999", None)
        .await;
    assert_eq!(response.status(), 200);

    // Unknown keys are 404 with the key in the message
    let response = app
        .request(Method::GET, "/api/v1/skus/code/THD-ELC-9999999", None)
        .await;
    assert_eq!(response.status(), 404);
    let body = response_json(response).await;
    assert!(
        body["message"].as_str().unwrap().contains("THD-ELC-9999999"),
        "{body}"
    );
}

#[tokio::test]
async fn list_filters_and_search() {
    let app = TestApp::new().await;

    for (category, upc, name) in [
        ("LBR", Some("000000000001"), "2x4 Stud"),
        ("LBR", Some("000000000002"), "Plywood Sheet"),
        ("PNT", Some("000000000003"), "Interior Paint"),
    ] {
        let response = app
            .request(
                Method::POST,
                "/api/v1/skus",
                Some(sku_payload(category, upc, name)),
            )
            .await;
        assert_eq!(response.status(), 201);
    }

    // Category filter constrains the listing
    let response = app
        .request(Method::GET, "/api/v1/skus?category=LBR", None)
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["pagination"]["total"], 2);
    for item in body["data"].as_array().unwrap() {
        assert_eq!(item["category"], "LBR");
    }

    // No filters matches everything
    let response = app.request(Method::GET, "/api/v1/skus", None).await;
    let body = response_json(response).await;
    assert_eq!(body["pagination"]["total"], 3);

    // Price range is inclusive; all seeded SKUs cost 8.99
    let response = app
        .request(
            Method::GET,
            "/api/v1/skus?min_price=5&max_price=50",
            None,
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["pagination"]["total"], 3);

    let response = app
        .request(Method::GET, "/api/v1/skus?min_price=10", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["pagination"]["total"], 0);

    // Free-text search is case-insensitive over name/description
    let response = app
        .request(Method::GET, "/api/v1/skus/search?query=plywood", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["name"], "Plywood Sheet");

    // Tag match
    let response = app
        .request(Method::GET, "/api/v1/skus/search?tags=outdoor", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["pagination"]["total"], 3);
}

#[tokio::test]
async fn update_preserves_code_and_guards_upc() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/skus",
            Some(sku_payload("FLR", Some("111111111111"), "Oak Plank")),
        )
        .await;
    assert_eq!(response.status(), 201);
    let second = response_json(
        app.request(
            Method::POST,
            "/api/v1/skus",
            Some(sku_payload("FLR", Some("222222222222"), "Maple Plank")),
        )
        .await,
    )
    .await;
    let second_id = second["id"].as_str().unwrap().to_string();

    // Full update keeping its own UPC succeeds
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/skus/{second_id}"),
            Some(sku_payload("FLR", Some("222222222222"), "Maple Plank Select")),
        )
        .await;
    assert_eq!(response.status(), 200);
    let updated = response_json(response).await;
    assert_eq!(updated["name"], "Maple Plank Select");
    assert_eq!(updated["sku_code"], second["sku_code"]);
    assert_eq!(updated["version"], 1);

    // Stealing another record's UPC is a conflict
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/skus/{second_id}"),
            Some(sku_payload("FLR", Some("111111111111"), "Maple Plank")),
        )
        .await;
    assert_eq!(response.status(), 409);

    // Partial update touches only supplied fields
    let response = app
        .request(
            Method::PATCH,
            &format!("/api/v1/skus/{second_id}"),
            Some(json!({ "price": "12.5" })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let patched = response_json(response).await;
    assert_eq!(patched["price"], "12.5");
    assert_eq!(patched["name"], "Maple Plank Select");
    assert_eq!(patched["upc"], "222222222222");

    // Re-sending its own UPC through PATCH is fine too
    let response = app
        .request(
            Method::PATCH,
            &format!("/api/v1/skus/{second_id}"),
            Some(json!({ "upc": "222222222222" })),
        )
        .await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn soft_delete_keeps_record_retrievable() {
    let app = TestApp::new().await;

    let created = response_json(
        app.request(
            Method::POST,
            "/api/v1/skus",
            Some(sku_payload("GAR", Some("333333333333"), "Garden Hose")),
        )
        .await,
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .request(Method::DELETE, &format!("/api/v1/skus/{id}"), None)
        .await;
    assert_eq!(response.status(), 204);

    // Still retrievable by id, code, and UPC; only the status changed
    let response = app
        .request(Method::GET, &format!("/api/v1/skus/{id}"), None)
        .await;
    assert_eq!(response.status(), 200);
    let fetched = response_json(response).await;
    assert_eq!(fetched["status"], "DISCONTINUED");
    assert_eq!(fetched["name"], "Garden Hose");
    assert_eq!(fetched["upc"], "333333333333");
    assert_eq!(fetched["sku_code"], created["sku_code"]);

    let response = app
        .request(Method::GET, "/api/v1/skus/upc/333333333333", None)
        .await;
    assert_eq!(response.status(), 200);

    // A discontinued record still blocks its UPC
    let response = app
        .request(
            Method::POST,
            "/api/v1/skus",
            Some(sku_payload("GAR", Some("333333333333"), "Another Hose")),
        )
        .await;
    assert_eq!(response.status(), 409);

    // Deleting an unknown id is a 404
    let response = app
        .request(
            Method::DELETE,
            "/api/v1/skus/00000000-0000-0000-0000-000000000000",
            None,
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn batch_create_is_all_or_nothing() {
    let app = TestApp::new().await;

    // Seed a SKU whose UPC the batch will collide with
    let response = app
        .request(
            Method::POST,
            "/api/v1/skus",
            Some(sku_payload("TOL", Some("444444444444"), "Claw Hammer")),
        )
        .await;
    assert_eq!(response.status(), 201);

    let batch = json!({
        "skus": [
            sku_payload("TOL", Some("555555555555"), "Screwdriver"),
            sku_payload("TOL", Some("666666666666"), "Tape Measure"),
            sku_payload("TOL", None, "Utility Knife"),
            sku_payload("TOL", Some("444444444444"), "Duplicate Hammer"),
        ]
    });
    let response = app.request(Method::POST, "/api/v1/skus/batch", Some(batch)).await;
    assert_eq!(response.status(), 409);

    // Nothing from the failed batch was persisted
    let count = sku::Entity::find()
        .filter(sku::Column::Category.eq("TOL"))
        .count(app.state.db.as_ref())
        .await
        .unwrap();
    assert_eq!(count, 1);

    // A clean batch succeeds wholesale
    let batch = json!({
        "skus": [
            sku_payload("TOL", Some("555555555555"), "Screwdriver"),
            sku_payload("TOL", Some("666666666666"), "Tape Measure"),
        ]
    });
    let response = app.request(Method::POST, "/api/v1/skus/batch", Some(batch)).await;
    assert_eq!(response.status(), 201);
    let created = response_json(response).await;
    assert_eq!(created.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn batch_rejects_intra_batch_duplicate_upcs() {
    let app = TestApp::new().await;

    let batch = json!({
        "skus": [
            sku_payload("KIT", Some("777777777777"), "Faucet"),
            sku_payload("KIT", Some("777777777777"), "Another Faucet"),
        ]
    });
    let response = app.request(Method::POST, "/api/v1/skus/batch", Some(batch)).await;
    assert_eq!(response.status(), 409);

    let count = sku::Entity::find()
        .count(app.state.db.as_ref())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn health_endpoints_respond() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None).await;
    assert_eq!(response.status(), 200);

    let response = app.request(Method::GET, "/health/ready", None).await;
    assert_eq!(response.status(), 200);
}
