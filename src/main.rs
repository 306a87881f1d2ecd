use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use roombook::model::{BookingDate, Slot};
use roombook::{BookingEngine, BookingPolicy, Directory, SpaceRegistry};

/// Seeds a small building and walks through a booking lifecycle.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let admin = std::env::var("ROOMBOOK_ADMIN_EMAIL").unwrap_or_else(|_| "admin@office.local".into());
    let policy = BookingPolicy::from_env();
    info!("roombook starting");
    info!("  admin: {admin}");
    info!("  monthly quota: {} hours", policy.monthly_quota_hours);
    info!("  cancel cutoff: {} minutes", policy.cancel_cutoff.num_minutes());

    let directory = Arc::new(Directory::new());
    let spaces = Arc::new(SpaceRegistry::new(directory.clone()));
    let engine = BookingEngine::new(directory.clone(), spaces.clone(), policy);

    directory.register_admin(&admin, "Building Admin")?;
    directory.register_organization(&admin, "Acme", "555-0100", json!({ "floor": 1 }))?;
    directory.register_user(&admin, "alice@acme.test", "Alice", "Acme")?;
    spaces.create_floor(&admin, 1, 0)?;
    spaces.create_room(&admin, "A1", 1, 10, true, json!({}))?;
    spaces.create_room(&admin, "A2", 1, 20, false, json!({}))?;

    let date = BookingDate::parse("01-01-2030")?;
    let slot = Slot::new(9, 10)?;
    let booking = engine.book_room("alice@acme.test", "A1", slot, Some(date)).await?;
    info!("room {} booked for time slot {} on {}", booking.room, booking.slot, booking.date);

    if let Err(e) = engine.book_room("alice@acme.test", "A1", slot, Some(date)).await {
        warn!("second booking rejected: {e}");
    }
    if let Err(e) = engine.book_room(&admin, "A2", slot, Some(date)).await {
        warn!("admin booking rejected: {e}");
    }

    info!("Acme usage this month: {} hours", engine.monthly_usage("Acme").await);
    engine.cancel_room_booking("alice@acme.test", "A1", slot, Some(date)).await?;
    info!("booking for room A1 cancelled");
    info!("Acme usage this month: {} hours", engine.monthly_usage("Acme").await);
    info!("rooms with projector: {}", spaces.list_rooms(None, Some(true)).len());

    Ok(())
}
