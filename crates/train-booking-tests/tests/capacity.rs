use std::collections::HashSet;

use eyre::Result;
use futures::future::join_all;
use train_booking_core::{SeatAssignment, Section};
use train_booking_tests::{random_passenger, TestCtxBuilder};
use util::{fill, numbered, occupied, DESTINATION, ORIGIN};

mod util;

/// Section A fills up in order, then B takes over.
async fn overflow_into_b(builder: TestCtxBuilder) -> Result<()> {
    let ctx = builder.build().await?;

    let bookings = fill(&ctx, 51).await?;
    for (i, booking) in bookings[..50].iter().enumerate() {
        assert_eq!(
            booking.assignment,
            SeatAssignment {
                section: Section::A,
                seat: i as u32 + 1
            },
            "Passenger {i} must sit in A in reservation order."
        );
    }
    assert_eq!(
        bookings[50].assignment,
        SeatAssignment {
            section: Section::B,
            seat: 1
        },
        "The 51st passenger must get seat B1."
    );
    assert_eq!(occupied(&ctx).await?, [50, 1]);

    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(20_000)]
async fn test_overflow_into_b() -> Result<()> {
    overflow_into_b(TestCtxBuilder::from_env()?).await
}

#[tokio::test]
#[ntest::timeout(20_000)]
async fn test_overflow_into_b_serial() -> Result<()> {
    overflow_into_b(TestCtxBuilder::from_env()?.serial()).await
}

/// A full train refuses the next passenger and stays as it was.
async fn full_train(builder: TestCtxBuilder) -> Result<()> {
    let ctx = builder.build().await?;

    fill(&ctx, 100).await?;
    assert_eq!(occupied(&ctx).await?, [50, 50]);

    let refused = ctx
        .api
        .reserve(&numbered(100), ORIGIN, DESTINATION)
        .await?;
    assert_eq!(refused.status()?, 409, "The 101st passenger must be refused.");
    assert_eq!(refused.result.unwrap_err().msg, "train is full");

    assert_eq!(occupied(&ctx).await?, [50, 50]);
    assert_eq!(ctx.api.lookup(&numbered(100).contact).await?.status()?, 404);
    assert_eq!(ctx.api.list_by_section("A").await?.result?.len(), 50);
    assert_eq!(ctx.api.list_by_section("B").await?.result?.len(), 50);

    // A released seat can be booked again.
    ctx.api.release(&numbered(7).contact).await?.result?;
    let booking = ctx
        .api
        .reserve(&numbered(100), ORIGIN, DESTINATION)
        .await?
        .result?;
    assert_eq!(booking.assignment.section, Section::A);
    assert_eq!(occupied(&ctx).await?, [50, 50]);

    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(20_000)]
async fn test_full_train() -> Result<()> {
    full_train(TestCtxBuilder::from_env()?).await
}

#[tokio::test]
#[ntest::timeout(20_000)]
async fn test_full_train_serial() -> Result<()> {
    full_train(TestCtxBuilder::from_env()?.serial()).await
}

/// Many passengers book at once: exactly 100 get a seat, no seat twice.
async fn concurrent_reservations(builder: TestCtxBuilder) -> Result<()> {
    let ctx = builder.with_dispatcher_threads(8).build().await?;

    let requests = (0..150).map(|_| {
        let api = ctx.api.clone();
        async move {
            let passenger = random_passenger();
            api.reserve(&passenger, ORIGIN, DESTINATION).await
        }
    });
    let responses = join_all(requests).await;

    let mut seats = HashSet::new();
    let mut refused = 0;
    for response in responses {
        let response = response?;
        match response.result {
            Ok(booking) => assert!(
                seats.insert(booking.assignment),
                "Seat {} was handed out twice.",
                booking.assignment
            ),
            Err(err) => {
                assert_eq!(err.status, 409, "Only a full train may refuse: {err}");
                refused += 1;
            }
        }
    }
    assert_eq!(seats.len(), 100, "Every seat must be handed out.");
    assert_eq!(refused, 50);
    assert_eq!(occupied(&ctx).await?, [50, 50]);

    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(30_000)]
async fn test_concurrent_reservations() -> Result<()> {
    concurrent_reservations(TestCtxBuilder::from_env()?).await
}

#[tokio::test]
#[ntest::timeout(30_000)]
async fn test_concurrent_reservations_serial() -> Result<()> {
    concurrent_reservations(TestCtxBuilder::from_env()?.serial()).await
}
