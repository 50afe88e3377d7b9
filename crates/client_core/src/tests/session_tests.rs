use super::*;
use crate::{
    form::Notice,
    tests::{spawn_beer_server, spawn_failing_server},
};
use shared::{
    domain::{BeerRecord, Field},
    starter::starter_collection,
};

#[tokio::test]
async fn open_loads_current_collection() {
    let (server_url, storage) = spawn_beer_server().await.expect("spawn server");
    storage.seed().await.expect("seed");

    let session = FormSession::open(BeerMenuClient::new(&server_url).expect("client"))
        .await
        .expect("open");
    assert_eq!(session.state().payload(), starter_collection());
}

#[tokio::test]
async fn build_from_empty_and_save() {
    let (server_url, storage) = spawn_beer_server().await.expect("spawn server");
    let client = BeerMenuClient::new(&server_url).expect("client");
    let mut session = FormSession::open(client.clone()).await.expect("open");
    assert!(session.state().records().is_empty());

    session.dispatch(FormAction::AddRecord);
    session.dispatch(FormAction::add_field(0));
    let field = session.state().records()[0].fields[0].id;
    session.dispatch(FormAction::SetFieldKey {
        record: 0,
        field,
        value: "info".into(),
    });
    session.dispatch(FormAction::SetFieldValue {
        record: 0,
        field,
        value: "x".into(),
    });

    assert!(session.save().await.expect("save"));
    assert!(!session.state().is_saving());
    assert_eq!(session.state().notice(), Some(&Notice::Saved));

    let expected = vec![BeerRecord {
        name: String::new(),
        style: None,
        fields: vec![Field::new("info", "x")],
    }];
    assert_eq!(client.load().await.expect("load"), expected);
    assert_eq!(storage.load().await.expect("storage"), expected);
}

#[tokio::test]
async fn save_is_refused_while_another_is_pending() {
    let (server_url, _storage) = spawn_beer_server().await.expect("spawn server");
    let mut session = FormSession::new(
        BeerMenuClient::new(&server_url).expect("client"),
        &starter_collection(),
    );

    let pending = session.start_save().expect("first save");
    assert!(session.state().is_saving());
    assert!(session.start_save().is_none());
    assert!(!session.save().await.expect("refused save"));

    session.dispatch(FormAction::RemoveRecord { record: 0 });
    assert_eq!(pending.payload().len(), 4);

    let done = pending.run().await;
    assert_eq!(done, FormAction::SaveSucceeded);
    session.dispatch(done);
    assert!(!session.state().is_saving());
    assert_eq!(session.state().records().len(), 3);
}

#[tokio::test]
async fn local_state_stays_authoritative_after_save() {
    let (server_url, storage) = spawn_beer_server().await.expect("spawn server");
    let mut session = FormSession::new(
        BeerMenuClient::new(&server_url).expect("client"),
        &vec![BeerRecord::new("Mine")],
    );
    session.save().await.expect("save");

    storage
        .replace(&vec![BeerRecord::new("Someone else")])
        .await
        .expect("concurrent writer");

    assert_eq!(session.state().records()[0].name, "Mine");
    session.save().await.expect("save again");
    assert_eq!(
        storage.load().await.expect("load"),
        vec![BeerRecord::new("Mine")]
    );
}

#[tokio::test]
async fn failed_save_reports_error_notice() {
    let server_url = spawn_failing_server().await.expect("spawn server");
    let mut session = FormSession::new(
        BeerMenuClient::new(&server_url).expect("client"),
        &starter_collection(),
    );

    assert!(session.save().await.is_err());
    assert!(!session.state().is_saving());
    let notice = session.state().notice().expect("notice");
    assert!(notice.is_error());
    assert!(notice.message().contains("store unavailable"));
}
