use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;
use tutorsync_core::models::booking::BookingStatus;

const TABLES: [&str; 6] = [
    r#"
    CREATE TABLE IF NOT EXISTS counters (
        name VARCHAR(64) PRIMARY KEY,
        value BIGINT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS teachers (
        id BIGINT PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        regular_times BIGINT[] NOT NULL DEFAULT '{}',
        is_active BOOLEAN NOT NULL DEFAULT TRUE
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS calendars (
        id BIGINT PRIMARY KEY,
        teacher_id BIGINT NOT NULL REFERENCES teachers(id),
        start_time BIGINT NOT NULL,
        end_time BIGINT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT FALSE,
        external_id VARCHAR(255) NULL,
        CONSTRAINT calendars_natural_key UNIQUE (teacher_id, start_time, end_time),
        CONSTRAINT valid_time_range CHECK (end_time > start_time)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS regular_schedules (
        id BIGINT PRIMARY KEY,
        teacher_id BIGINT NOT NULL REFERENCES teachers(id),
        regular_start_time BIGINT NOT NULL,
        status VARCHAR(32) NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS absence_requests (
        id BIGINT PRIMARY KEY,
        teacher_id BIGINT NOT NULL REFERENCES teachers(id),
        start_time BIGINT NOT NULL,
        end_time BIGINT NOT NULL,
        status VARCHAR(32) NOT NULL,
        CONSTRAINT valid_time_range CHECK (end_time > start_time)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS bookings (
        id BIGINT PRIMARY KEY,
        teacher_id BIGINT NOT NULL REFERENCES teachers(id),
        student_id BIGINT NOT NULL,
        calendar_id BIGINT NOT NULL,
        start_time BIGINT NOT NULL,
        end_time BIGINT NOT NULL,
        status VARCHAR(32) NOT NULL,
        created_time BIGINT NOT NULL
    );
    "#,
];

const INDEXES: [&str; 7] = [
    "CREATE INDEX IF NOT EXISTS idx_calendars_teacher_start ON calendars(teacher_id, start_time)",
    "CREATE INDEX IF NOT EXISTS idx_calendars_active_start ON calendars(is_active, start_time)",
    "CREATE INDEX IF NOT EXISTS idx_teachers_regular_times ON teachers USING GIN (regular_times)",
    "CREATE INDEX IF NOT EXISTS idx_regular_schedules_teacher ON regular_schedules(teacher_id)",
    "CREATE INDEX IF NOT EXISTS idx_absence_requests_teacher ON absence_requests(teacher_id, start_time)",
    "CREATE INDEX IF NOT EXISTS idx_bookings_teacher_start ON bookings(teacher_id, start_time)",
    "CREATE INDEX IF NOT EXISTS idx_bookings_calendar ON bookings(calendar_id)",
];

/// At most one occupying booking per calendar slot.
fn occupying_booking_index() -> String {
    let released = BookingStatus::released()
        .iter()
        .map(|status| format!("'{}'", status.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS uq_bookings_occupying_calendar \
         ON bookings(calendar_id) WHERE status NOT IN ({})",
        released
    )
}

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    for statement in TABLES {
        sqlx::query(statement).execute(pool).await?;
    }

    for statement in INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    sqlx::query(&occupying_booking_index()).execute(pool).await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
