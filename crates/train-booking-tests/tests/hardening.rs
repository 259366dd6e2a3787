use eyre::Result;
use train_booking_core::Section;
use train_booking_tests::TestCtxBuilder;
use util::{contacts, fill, jane, john, numbered, occupied, DESTINATION, ORIGIN};

mod util;

/// Booking again inside the same section replaces the roster entry.
#[tokio::test]
#[ntest::timeout(20_000)]
async fn test_duplicate_reserve_same_section() -> Result<()> {
    let ctx = TestCtxBuilder::from_env()?.build().await?;

    ctx.api.reserve(&john(), ORIGIN, DESTINATION).await?.result?;
    ctx.api.reserve(&jane(), ORIGIN, DESTINATION).await?.result?;
    let again = ctx.api.reserve(&john(), "Paris", "Rome").await?.result?;
    assert_eq!(again.assignment.section, Section::A);
    assert_eq!(again.destination, "Rome", "The old booking is overwritten.");

    let listed = ctx.api.list_by_section("A").await?.result?;
    assert_eq!(
        contacts(&listed),
        vec![john().contact.as_str(), jane().contact.as_str()],
        "A passenger must not appear twice in a section."
    );
    assert_eq!(occupied(&ctx).await?, [2, 0]);
    assert_eq!(ctx.api.lookup(&john().contact).await?.result?, again);

    ctx.finish().await;
    Ok(())
}

/// Booking again after A filled up leaves the old A entry behind.
#[tokio::test]
#[ntest::timeout(20_000)]
async fn test_duplicate_reserve_other_section_leaks() -> Result<()> {
    let ctx = TestCtxBuilder::from_env()?.build().await?;

    fill(&ctx, 50).await?;
    let again = ctx
        .api
        .reserve(&numbered(0), ORIGIN, DESTINATION)
        .await?
        .result?;
    assert_eq!(again.assignment.section, Section::B);

    let in_a = ctx.api.list_by_section("A").await?.result?;
    let in_b = ctx.api.list_by_section("B").await?.result?;
    assert!(in_a.contains(&numbered(0)), "The stale A entry stays.");
    assert!(in_b.contains(&numbered(0)));
    assert_eq!(occupied(&ctx).await?, [50, 1]);

    // Releasing only frees the seat the booking currently points at.
    ctx.api.release(&numbered(0).contact).await?.result?;
    assert_eq!(occupied(&ctx).await?, [50, 0]);
    assert!(ctx
        .api
        .list_by_section("A")
        .await?
        .result?
        .contains(&numbered(0)));

    ctx.finish().await;
    Ok(())
}

/// A stale roster entry shows the details of the latest reservation.
#[tokio::test]
#[ntest::timeout(20_000)]
async fn test_stale_entry_shows_latest_details() -> Result<()> {
    let ctx = TestCtxBuilder::from_env()?.build().await?;

    fill(&ctx, 50).await?;
    let mut renamed = numbered(0);
    renamed.first_name = "Renamed".into();
    ctx.api.reserve(&renamed, ORIGIN, DESTINATION).await?.result?;

    let in_a = ctx.api.list_by_section("A").await?.result?;
    assert_eq!(in_a.len(), 50);
    assert!(in_a.contains(&renamed));
    assert!(!in_a.contains(&numbered(0)), "The old name must not be listed.");
    assert_eq!(ctx.api.list_by_section("B").await?.result?, vec![renamed]);

    ctx.finish().await;
    Ok(())
}

/// With duplicates rejected, a second booking changes nothing.
async fn duplicate_reserve_rejected(builder: TestCtxBuilder) -> Result<()> {
    let ctx = builder.reject_duplicates().build().await?;

    fill(&ctx, 50).await?;
    let before = ctx.api.lookup(&numbered(0).contact).await?.result?;

    let refused = ctx
        .api
        .reserve(&numbered(0), "Paris", "Rome")
        .await?;
    assert_eq!(refused.status()?, 409);
    assert_eq!(ctx.api.lookup(&numbered(0).contact).await?.result?, before);
    assert_eq!(occupied(&ctx).await?, [50, 0]);

    // Once released, the passenger may book again.
    ctx.api.release(&numbered(0).contact).await?.result?;
    ctx.api
        .reserve(&numbered(0), "Paris", "Rome")
        .await?
        .result?;

    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(20_000)]
async fn test_duplicate_reserve_rejected() -> Result<()> {
    duplicate_reserve_rejected(TestCtxBuilder::from_env()?).await
}

#[tokio::test]
#[ntest::timeout(20_000)]
async fn test_duplicate_reserve_rejected_serial() -> Result<()> {
    duplicate_reserve_rejected(TestCtxBuilder::from_env()?.serial()).await
}

/// Without validation, two passengers can end up on one seat and a section
/// can hold more passengers than seats.
#[tokio::test]
#[ntest::timeout(20_000)]
async fn test_unchecked_reassign_collides() -> Result<()> {
    let ctx = TestCtxBuilder::from_env()?.build().await?;

    fill(&ctx, 51).await?;
    let moved = ctx
        .api
        .reassign_seat(&numbered(1).contact, "A", 1)
        .await?
        .result?;
    assert_eq!(moved.assignment.seat, 1);
    assert_eq!(
        ctx.api.lookup(&numbered(0).contact).await?.result?.assignment,
        moved.assignment,
        "Both passengers hold A1."
    );

    ctx.api
        .reassign_seat(&numbered(50).contact, "A", 99)
        .await?
        .result?;
    assert_eq!(occupied(&ctx).await?, [51, 0]);

    ctx.finish().await;
    Ok(())
}

/// With validation, bad targets are refused and nothing moves.
async fn validated_reassign(builder: TestCtxBuilder) -> Result<()> {
    let ctx = builder.validate_reassign().build().await?;

    fill(&ctx, 51).await?;
    let before = ctx.api.lookup(&numbered(50).contact).await?.result?;

    let taken = ctx
        .api
        .reassign_seat(&numbered(50).contact, "A", 1)
        .await?;
    assert_eq!(taken.status()?, 409, "A1 is taken.");
    let out_of_range = ctx
        .api
        .reassign_seat(&numbered(50).contact, "B", 51)
        .await?;
    assert_eq!(out_of_range.status()?, 400, "B has no seat 51.");
    assert_eq!(ctx.api.lookup(&numbered(50).contact).await?.result?, before);
    assert_eq!(occupied(&ctx).await?, [50, 1]);

    let moved = ctx
        .api
        .reassign_seat(&numbered(50).contact, "B", 50)
        .await?
        .result?;
    assert_eq!(moved.assignment.seat, 50);

    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(20_000)]
async fn test_validated_reassign() -> Result<()> {
    validated_reassign(TestCtxBuilder::from_env()?).await
}

#[tokio::test]
#[ntest::timeout(20_000)]
async fn test_validated_reassign_serial() -> Result<()> {
    validated_reassign(TestCtxBuilder::from_env()?.serial()).await
}
