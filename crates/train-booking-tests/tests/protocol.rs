use eyre::Result;
use train_booking_core::{Occupancy, RequestKind, Section};
use train_booking_tests::TestCtxBuilder;
use util::{john, DESTINATION, ORIGIN};

mod util;

#[tokio::test]
#[ntest::timeout(20_000)]
async fn test_malformed_payloads() -> Result<()> {
    let ctx = TestCtxBuilder::from_env()?.build().await?;

    for kind in [
        RequestKind::Reserve,
        RequestKind::Lookup,
        RequestKind::ListBySection,
        RequestKind::Release,
        RequestKind::ReassignSeat,
    ] {
        let response = ctx.api.send_raw(kind, "not json").await?;
        assert_eq!(response.status()?, 400, "{kind:?} must reject garbage.");
        let response = ctx.api.send_raw(kind, "{}").await?;
        assert_eq!(response.status()?, 400, "{kind:?} must reject missing fields.");
    }

    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(20_000)]
async fn test_reassign_needs_a_real_seat() -> Result<()> {
    let ctx = TestCtxBuilder::from_env()?.build().await?;

    ctx.api.reserve(&john(), ORIGIN, DESTINATION).await?.result?;
    let unknown = ctx.api.reassign_seat(&john().contact, "C", 1).await?;
    assert_eq!(unknown.status()?, 400, "There is no section C.");
    let zero = ctx.api.reassign_seat(&john().contact, "B", 0).await?;
    assert_eq!(zero.status()?, 400, "There is no seat 0.");
    assert_eq!(
        ctx.api.lookup(&john().contact).await?.result?.assignment.section,
        Section::A
    );

    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(20_000)]
async fn test_wire_format() -> Result<()> {
    let ctx = TestCtxBuilder::from_env()?.build().await?;

    let payload = r#"{
        "passenger": {"firstName": "John", "lastName": "Doe", "contact": "john.doe@example.com"},
        "origin": "London",
        "destination": "France"
    }"#;
    let body = ctx.api.send_raw(RequestKind::Reserve, payload).await?.result?;
    let json: serde_json::Value = serde_json::from_str(&body)?;
    assert_eq!(json["section"], "A");
    assert_eq!(json["seat"], 1);
    assert_eq!(json["fare"], 20);
    assert_eq!(json["passenger"]["firstName"], "John");

    let body = ctx
        .api
        .send_raw(RequestKind::Release, r#"{"contact": "john.doe@example.com"}"#)
        .await?
        .result?;
    assert!(body.is_empty(), "A release answers with an empty success.");

    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(20_000)]
async fn test_occupancy_and_request_ids() -> Result<()> {
    let ctx = TestCtxBuilder::from_env()?.build().await?;

    ctx.api.reserve(&john(), ORIGIN, DESTINATION).await?.result?;
    let first = ctx.api.occupancy().await?;
    let second = ctx.api.occupancy().await?;
    assert_ne!(first.request_id, second.request_id);
    assert_eq!(
        first.result?,
        vec![
            Occupancy {
                section: Section::A,
                occupied: 1,
                capacity: 50
            },
            Occupancy {
                section: Section::B,
                occupied: 0,
                capacity: 50
            },
        ]
    );

    ctx.finish().await;
    Ok(())
}
