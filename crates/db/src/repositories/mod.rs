//! Store traits and their PostgreSQL implementation.
//!
//! Each entity owns one trait. `PgStore` implements all of them over a
//! single connection pool; `crate::memory::MemoryStore` implements them
//! in memory. The traits are `automock`ed so services can be tested
//! against failing stores.

pub mod absence;
pub mod booking;
pub mod calendar;
pub mod counter;
pub mod regular_schedule;
pub mod teacher;

use crate::DbPool;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}
