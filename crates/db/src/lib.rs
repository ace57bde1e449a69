pub mod memory;
pub mod models;
pub mod repositories;
pub mod schema;

use std::sync::Arc;

use eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

use memory::MemoryStore;
use repositories::{
    absence::AbsenceStore, booking::BookingStore, calendar::CalendarStore, counter::IdAllocator,
    regular_schedule::RegularScheduleStore, teacher::TeacherStore, PgStore,
};

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Handles to every store, shared by the services of one process.
#[derive(Clone)]
pub struct Stores {
    pub teachers: Arc<dyn TeacherStore>,
    pub calendars: Arc<dyn CalendarStore>,
    pub regular_schedules: Arc<dyn RegularScheduleStore>,
    pub absences: Arc<dyn AbsenceStore>,
    pub bookings: Arc<dyn BookingStore>,
    pub ids: Arc<dyn IdAllocator>,
}

impl Stores {
    /// Uses one value for every store.
    pub fn from_shared<S>(store: Arc<S>) -> Self
    where
        S: TeacherStore
            + CalendarStore
            + RegularScheduleStore
            + AbsenceStore
            + BookingStore
            + IdAllocator
            + 'static,
    {
        Self {
            teachers: store.clone(),
            calendars: store.clone(),
            regular_schedules: store.clone(),
            absences: store.clone(),
            bookings: store.clone(),
            ids: store,
        }
    }

    pub fn postgres(pool: DbPool) -> Self {
        Self::from_shared(Arc::new(PgStore::new(pool)))
    }

    pub fn memory() -> Self {
        Self::from_shared(Arc::new(MemoryStore::new()))
    }
}
