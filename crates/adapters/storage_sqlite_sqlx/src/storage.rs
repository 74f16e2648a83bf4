//! `SQLite` implementation of [`StorageAdapter`].

use chrono::SecondsFormat;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use smarthouse_app::ports::{DeviceRecord, FloorRecord, RoomRecord, StorageAdapter};
use smarthouse_domain::error::SmartHouseError;
use smarthouse_domain::id::{DeviceId, RoomId};
use smarthouse_domain::measurement::Measurement;
use smarthouse_domain::time::{self, Timestamp};

use crate::error::StorageError;

/// Wrapper for converting database rows into port records without polluting
/// them with database concerns.
struct Wrapper<T>(T);

impl<'r> FromRow<'r, SqliteRow> for Wrapper<FloorRecord> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(FloorRecord {
            level: row.try_get("level")?,
        }))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper<RoomRecord> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        Ok(Self(RoomRecord {
            id: RoomId::new(id),
            floor: row.try_get("floor")?,
            name: row.try_get("name")?,
            size: row.try_get("size")?,
        }))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper<DeviceRecord> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let room: Option<i64> = row.try_get("room")?;
        Ok(Self(DeviceRecord {
            id: DeviceId::from(id),
            room: room.map(RoomId::new),
            kind: row.try_get("kind")?,
            model_name: row.try_get("model_name")?,
            supplier: row.try_get("supplier")?,
            device_type: row.try_get("category")?,
            unit: row.try_get("unit")?,
            state: row.try_get("state")?,
        }))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper<Measurement> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let device: String = row.try_get("device")?;
        let ts: String = row.try_get("ts")?;
        let timestamp = time::parse(&ts).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        Ok(Self(Measurement {
            device_id: DeviceId::from(device),
            value: row.try_get("value")?,
            timestamp,
            unit: row.try_get("unit")?,
        }))
    }
}

const SELECT_FLOORS: &str = "SELECT level FROM floors ORDER BY level";

const SELECT_ROOMS_BY_FLOOR: &str = "SELECT * FROM rooms WHERE floor = ? ORDER BY id";

const SELECT_ORPHAN_ROOMS: &str =
    "SELECT * FROM rooms WHERE floor NOT IN (SELECT level FROM floors) ORDER BY id";

const SELECT_DEVICES_BY_ROOM: &str = "SELECT * FROM devices WHERE room = ? ORDER BY rowid";

const SELECT_UNASSIGNED_DEVICES: &str = r"
    SELECT * FROM devices
    WHERE room IS NULL
       OR room NOT IN (SELECT r.id FROM rooms r JOIN floors f ON r.floor = f.level)
    ORDER BY rowid
";

const SELECT_LATEST_MEASUREMENT: &str = r"
    SELECT * FROM measurements
    WHERE device = ?
    ORDER BY julianday(ts) DESC, ts DESC
    LIMIT 1
";

const UPDATE_STATE: &str = "UPDATE devices SET state = ? WHERE id = ?";

const INSERT_MEASUREMENT: &str =
    "INSERT INTO measurements (device, ts, value, unit) VALUES (?, ?, ?, ?)";

/// Render a timestamp the way it is stored.
///
/// Rows written by other tools may use naive or offset-bearing text, so
/// reads order by `julianday(ts)` rather than by the raw string.
fn format_ts(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// `SQLite`-backed storage adapter.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Create a new adapter using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a sensor reading.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::Storage`] if the insert fails, including
    /// when the device does not exist or a reading with the same timestamp
    /// was already recorded.
    pub async fn insert_measurement(
        &self,
        measurement: &Measurement,
    ) -> Result<(), SmartHouseError> {
        sqlx::query(INSERT_MEASUREMENT)
            .bind(measurement.device_id.as_str())
            .bind(format_ts(&measurement.timestamp))
            .bind(measurement.value)
            .bind(measurement.unit.as_deref())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}

impl StorageAdapter for SqliteStorage {
    async fn fetch_floors(&self) -> Result<Vec<FloorRecord>, SmartHouseError> {
        let rows: Vec<Wrapper<FloorRecord>> = sqlx::query_as(SELECT_FLOORS)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn fetch_rooms(&self, floor_level: i64) -> Result<Vec<RoomRecord>, SmartHouseError> {
        let rows: Vec<Wrapper<RoomRecord>> = sqlx::query_as(SELECT_ROOMS_BY_FLOOR)
            .bind(floor_level)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn fetch_orphan_rooms(&self) -> Result<Vec<RoomRecord>, SmartHouseError> {
        let rows: Vec<Wrapper<RoomRecord>> = sqlx::query_as(SELECT_ORPHAN_ROOMS)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn fetch_devices(&self, room_id: RoomId) -> Result<Vec<DeviceRecord>, SmartHouseError> {
        let rows: Vec<Wrapper<DeviceRecord>> = sqlx::query_as(SELECT_DEVICES_BY_ROOM)
            .bind(room_id.get())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn fetch_unassigned_devices(&self) -> Result<Vec<DeviceRecord>, SmartHouseError> {
        let rows: Vec<Wrapper<DeviceRecord>> = sqlx::query_as(SELECT_UNASSIGNED_DEVICES)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn fetch_latest_measurement(
        &self,
        device_id: &DeviceId,
    ) -> Result<Option<Measurement>, SmartHouseError> {
        let row: Option<Wrapper<Measurement>> = sqlx::query_as(SELECT_LATEST_MEASUREMENT)
            .bind(device_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn write_actuator_state(
        &self,
        device_id: &DeviceId,
        state: Option<f64>,
    ) -> Result<bool, SmartHouseError> {
        let result = sqlx::query(UPDATE_STATE)
            .bind(state)
            .bind(device_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected() > 0)
    }
}
