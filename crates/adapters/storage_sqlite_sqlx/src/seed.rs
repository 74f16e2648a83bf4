//! Demo data for an empty database.
//!
//! Two floors, six rooms (one of them unnamed), a handful of devices covering
//! every capability combination, and a short measurement history for the
//! sensors.

use sqlx::SqlitePool;

use crate::error::StorageError;

const FLOORS: &[i64] = &[0, 1];

/// `(id, floor, name, size)`
const ROOMS: &[(i64, i64, Option<&str>, f64)] = &[
    (1, 0, Some("Kitchen"), 12.5),
    (2, 0, Some("Living Room"), 39.75),
    (3, 0, Some("Entrance"), 13.5),
    (4, 0, None, 6.3),
    (5, 1, Some("Master Bedroom"), 17.0),
    (6, 1, Some("Bathroom"), 9.25),
];

/// `(id, room, kind, category, supplier, model_name, unit, state)`
type DeviceRow = (
    &'static str,
    Option<i64>,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    Option<&'static str>,
    Option<f64>,
);

const DEVICES: &[DeviceRow] = &[
    ("A1", Some(1), "actuator", "Light Bulb", "Fritsch Group", "Alpha Ultra", None, None),
    ("L1", Some(3), "actuator", "Smart Lock", "MacGyver Inc", "Guardian 8", None, Some(1.0)),
    ("T1", Some(2), "sensor", "Temperature Sensor", "Moen Inc", "Elite Hyper", Some("°C"), None),
    ("S1", Some(6), "sensor", "Humidity Sensor", "Aetna", "Hygro 2", Some("%"), None),
    (
        "H1",
        Some(5),
        "actuator_sensor",
        "Heat Pump",
        "Hauck-Lebsack",
        "Zeta Lite",
        Some("°C"),
        Some(21.0),
    ),
    ("P1", Some(4), "plain", "Motion Hub", "Acme", "Relay One", None, None),
    ("U1", None, "plain", "Gateway", "Acme", "Bridge X", None, None),
];

/// `(device, ts, value, unit)`
const MEASUREMENTS: &[(&str, &str, f64, &str)] = &[
    ("T1", "2024-01-29T06:00:00.000000Z", 18.5, "°C"),
    ("T1", "2024-01-29T12:00:00.000000Z", 21.25, "°C"),
    ("T1", "2024-01-29T18:00:00.000000Z", 20.0, "°C"),
    ("S1", "2024-01-29T07:30:00.000000Z", 64.0, "%"),
];

/// Fill the database with the demo house if it has no floors yet.
///
/// Returns `true` when data was inserted. Everything is written in one
/// transaction.
///
/// # Errors
///
/// Returns [`StorageError`] if any insert fails; nothing is written then.
pub async fn seed_demo(pool: &SqlitePool) -> Result<bool, StorageError> {
    let (floors,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM floors")
        .fetch_one(pool)
        .await?;
    if floors > 0 {
        tracing::debug!(floors, "database already populated, skipping demo data");
        return Ok(false);
    }

    let mut tx = pool.begin().await?;

    for level in FLOORS {
        sqlx::query("INSERT INTO floors (level) VALUES (?)")
            .bind(level)
            .execute(&mut *tx)
            .await?;
    }

    for (id, floor, name, size) in ROOMS {
        sqlx::query("INSERT INTO rooms (id, floor, name, size) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(floor)
            .bind(name)
            .bind(size)
            .execute(&mut *tx)
            .await?;
    }

    for (id, room, kind, category, supplier, model_name, unit, state) in DEVICES {
        sqlx::query(
            "INSERT INTO devices (id, room, kind, category, supplier, model_name, unit, state) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(room)
        .bind(kind)
        .bind(category)
        .bind(supplier)
        .bind(model_name)
        .bind(unit)
        .bind(state)
        .execute(&mut *tx)
        .await?;
    }

    for (device, ts, value, unit) in MEASUREMENTS {
        sqlx::query("INSERT INTO measurements (device, ts, value, unit) VALUES (?, ?, ?, ?)")
            .bind(device)
            .bind(ts)
            .bind(value)
            .bind(unit)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    tracing::info!(
        floors = FLOORS.len(),
        rooms = ROOMS.len(),
        devices = DEVICES.len(),
        "seeded demo house"
    );
    Ok(true)
}
