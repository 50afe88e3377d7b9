use super::*;
use shared::domain::BeerRecord;

async fn memory_store() -> Storage {
    Storage::open("sqlite::memory:").await.expect("db")
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = memory_store().await;
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn unseeded_store_reports_absent_and_loads_empty() {
    let storage = memory_store().await;
    assert_eq!(storage.get().await.expect("get"), None);
    assert!(storage.load().await.expect("load").is_empty());
}

#[tokio::test]
async fn seed_writes_starter_dataset_in_order() {
    let storage = memory_store().await;
    storage.seed().await.expect("seed");

    let loaded = storage.load().await.expect("load");
    assert_eq!(loaded, starter_collection());
}

#[tokio::test]
async fn replace_round_trips_empty_strings_and_unicode() {
    let storage = memory_store().await;
    let collection = vec![
        BeerRecord::new(""),
        BeerRecord::new("Kölsch ☀")
            .with_field("", "")
            .with_field("notes", "🍺 crisp, 4.8% ABV")
            .with_field("notes", "second value for a duplicate key"),
        BeerRecord::new("No fields").with_style("Lager"),
    ];

    storage.replace(&collection).await.expect("replace");
    assert_eq!(storage.load().await.expect("load"), collection);
}

#[tokio::test]
async fn replace_twice_matches_replace_once() {
    let storage = memory_store().await;
    let collection = vec![BeerRecord::new("Twice").with_field("info", "x")];

    storage.replace(&collection).await.expect("first");
    let after_once = storage.kv().get(BEERS_KEY).await.expect("raw");
    storage.replace(&collection).await.expect("second");
    let after_twice = storage.kv().get(BEERS_KEY).await.expect("raw");

    assert_eq!(after_once, after_twice);
}

#[tokio::test]
async fn last_write_wins_without_merge() {
    let storage = memory_store().await;
    storage.seed().await.expect("seed");

    let first = vec![BeerRecord::new("First").with_field("info", "a")];
    let second = vec![BeerRecord::new("Second")];
    storage.replace(&first).await.expect("first");
    storage.replace(&second).await.expect("second");

    assert_eq!(storage.load().await.expect("load"), second);
}

#[tokio::test]
async fn malformed_stored_value_is_an_error() {
    let storage = memory_store().await;
    storage
        .kv()
        .set(BEERS_KEY, "{not json")
        .await
        .expect("raw write");

    let err = storage.load().await.expect_err("should fail");
    assert!(err.to_string().contains("not a beer collection"));
}

#[tokio::test]
async fn persisted_value_is_a_json_array() {
    let storage = memory_store().await;
    storage
        .replace(&vec![BeerRecord::new("Raw").with_field("k", "v")])
        .await
        .expect("replace");

    let raw = storage
        .kv()
        .get(BEERS_KEY)
        .await
        .expect("raw")
        .expect("present");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(
        value,
        serde_json::json!([{ "name": "Raw", "fields": [{ "key": "k", "value": "v" }] }])
    );
}
