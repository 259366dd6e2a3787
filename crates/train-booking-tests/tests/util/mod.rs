use eyre::Result;
use train_booking_core::{Booking, Passenger, SEAT_CAPACITY};
use train_booking_tests::TestCtx;

pub const ORIGIN: &str = "London";
pub const DESTINATION: &str = "France";

#[allow(unused)]
pub fn john() -> Passenger {
    Passenger::new("John", "Doe", "john.doe@example.com")
}

#[allow(unused)]
pub fn jane() -> Passenger {
    Passenger::new("Jane", "Smith", "jane.smith@example.com")
}

/// The `i`th passenger of a numbered crowd
#[allow(unused)]
pub fn numbered(i: u32) -> Passenger {
    Passenger::new(format!("First{i}"), format!("Last{i}"), format!("p{i}@example.com"))
}

/// Reserves seats for `count` numbered passengers, in order.
#[allow(unused)]
pub async fn fill(ctx: &TestCtx, count: u32) -> Result<Vec<Booking>> {
    let mut bookings = Vec::with_capacity(count as usize);
    for i in 0..count {
        let booking = ctx
            .api
            .reserve(&numbered(i), ORIGIN, DESTINATION)
            .await?
            .result?;
        bookings.push(booking);
    }
    Ok(bookings)
}

/// Roster sizes of all sections, checked against their capacity.
#[allow(unused)]
pub async fn occupied(ctx: &TestCtx) -> Result<Vec<u32>> {
    let occupancy = ctx.api.occupancy().await?.result?;
    for section in &occupancy {
        assert_eq!(
            section.capacity, SEAT_CAPACITY,
            "Every section has {SEAT_CAPACITY} seats."
        );
    }
    Ok(occupancy.iter().map(|section| section.occupied).collect())
}

/// Contact addresses of `passengers`.
#[allow(unused)]
pub fn contacts(passengers: &[Passenger]) -> Vec<&str> {
    passengers
        .iter()
        .map(|passenger| passenger.contact.as_str())
        .collect()
}
