use super::*;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use shared::{
    domain::BeerRecord,
    error::{ApiException, ErrorCode},
    protocol::{SEEDED_MESSAGE, UPDATED_MESSAGE},
    starter::starter_collection,
};
use storage::Storage;
use tokio::net::TcpListener;

async fn serve(app: Router) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

/// Minimal beer endpoint backed by an in-memory store.
pub(crate) async fn spawn_beer_server() -> Result<(String, Storage)> {
    async fn get_beers(State(storage): State<Storage>) -> Json<BeersResponse> {
        Json(BeersResponse {
            beers: storage.get().await.expect("get"),
        })
    }
    async fn seed_beers(State(storage): State<Storage>) -> Json<MessageResponse> {
        storage.seed().await.expect("seed");
        Json(MessageResponse::new(SEEDED_MESSAGE))
    }
    async fn put_beers(
        State(storage): State<Storage>,
        Json(collection): Json<Collection>,
    ) -> Json<MessageResponse> {
        storage.replace(&collection).await.expect("replace");
        Json(MessageResponse::new(UPDATED_MESSAGE))
    }

    let storage = Storage::open("sqlite::memory:").await?;
    let app = Router::new()
        .route(
            BEERS_ROUTE,
            get(get_beers).post(seed_beers).put(put_beers),
        )
        .with_state(storage.clone());
    Ok((serve(app).await?, storage))
}

/// Endpoint whose every call fails with an internal error.
pub(crate) async fn spawn_failing_server() -> Result<String> {
    async fn fail() -> (StatusCode, Json<ApiError>) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new(ErrorCode::Internal, "store unavailable")),
        )
    }
    let app = Router::new().route(BEERS_ROUTE, get(fail).post(fail).put(fail));
    serve(app).await
}

#[test]
fn rejects_non_http_server_url() {
    assert!(BeerMenuClient::new("ftp://example.com").is_err());
    assert!(BeerMenuClient::new("not a url").is_err());
}

#[test]
fn beers_url_points_at_api_route() {
    let client = BeerMenuClient::new("http://127.0.0.1:8080").expect("client");
    assert_eq!(client.beers_url().as_str(), "http://127.0.0.1:8080/api/beers");
}

#[tokio::test]
async fn unseeded_server_fetches_none_and_loads_empty() {
    let (server_url, _storage) = spawn_beer_server().await.expect("spawn server");
    let client = BeerMenuClient::new(&server_url).expect("client");

    assert_eq!(client.fetch().await.expect("fetch"), None);
    assert!(client.load().await.expect("load").is_empty());
}

#[tokio::test]
async fn seed_then_load_returns_starter_menu_in_order() {
    let (server_url, _storage) = spawn_beer_server().await.expect("spawn server");
    let client = BeerMenuClient::new(&server_url).expect("client");

    client.seed().await.expect("seed");
    assert_eq!(client.load().await.expect("load"), starter_collection());
}

#[tokio::test]
async fn replace_of_loaded_collection_round_trips() {
    let (server_url, storage) = spawn_beer_server().await.expect("spawn server");
    let client = BeerMenuClient::new(&server_url).expect("client");
    storage
        .replace(&vec![
            BeerRecord::new("Ünïcödé 🍻").with_field("", ""),
            BeerRecord::new(""),
        ])
        .await
        .expect("prime");

    let loaded = client.load().await.expect("load");
    client.replace(&loaded).await.expect("replace");
    assert_eq!(client.load().await.expect("reload"), loaded);
}

#[tokio::test]
async fn second_replace_wins() {
    let (server_url, storage) = spawn_beer_server().await.expect("spawn server");
    let client = BeerMenuClient::new(&server_url).expect("client");

    let first = vec![BeerRecord::new("First").with_field("info", "1")];
    let second = vec![BeerRecord::new("Second").with_field("metrics", "2")];
    client.replace(&first).await.expect("first");
    client.replace(&second).await.expect("second");

    assert_eq!(storage.load().await.expect("load"), second);
}

#[tokio::test]
async fn server_error_message_is_surfaced() {
    let server_url = spawn_failing_server().await.expect("spawn server");
    let client = BeerMenuClient::new(&server_url).expect("client");

    let err = client.replace(&Vec::new()).await.expect_err("should fail");
    let text = format!("{err:#}");
    assert!(text.contains("500"), "{text}");
    assert!(text.contains("store unavailable"), "{text}");
}

#[tokio::test]
async fn server_error_body_downcasts_to_api_exception() {
    let server_url = spawn_failing_server().await.expect("spawn server");
    let client = BeerMenuClient::new(&server_url).expect("client");

    for err in [
        client.fetch().await.expect_err("fetch should fail"),
        client.seed().await.expect_err("seed should fail"),
    ] {
        let api = err.downcast_ref::<ApiException>().expect("api exception");
        assert_eq!(api.code, ErrorCode::Internal);
        assert_eq!(api.message, "store unavailable");
    }
}

#[tokio::test]
async fn non_api_error_body_is_not_an_api_exception() {
    async fn teapot() -> (StatusCode, &'static str) {
        (StatusCode::IM_A_TEAPOT, "short and stout")
    }
    let server_url = serve(Router::new().route(BEERS_ROUTE, get(teapot)))
        .await
        .expect("spawn server");
    let client = BeerMenuClient::new(&server_url).expect("client");

    let err = client.fetch().await.expect_err("should fail");
    assert!(err.downcast_ref::<ApiException>().is_none());
    assert!(err.to_string().contains("short and stout"), "{err}");
}
