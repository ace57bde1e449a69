//! # Scheduling Services
//!
//! Business operations sitting between the HTTP handlers and the stores.
//! Every service borrows a [`ServiceContext`] and is cheap to construct per
//! request; none of them keeps state between calls.

pub mod absences;
pub mod availability;
pub mod bookings;
pub mod calendar;
pub mod slots;
pub mod teachers;

use std::sync::Arc;

use tutorsync_core::{
    policy::SchedulingPolicy,
    time::{Clock, Millis, SystemClock, WeekClock},
};
use tutorsync_db::Stores;

/// Everything a service needs: the stores, the policy and a clock.
#[derive(Clone)]
pub struct ServiceContext {
    pub stores: Stores,
    pub policy: SchedulingPolicy,
    pub clock: Arc<dyn Clock>,
}

impl ServiceContext {
    pub fn new(stores: Stores, policy: SchedulingPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            stores,
            policy,
            clock,
        }
    }

    /// Context backed by the system clock.
    pub fn with_system_clock(stores: Stores, policy: SchedulingPolicy) -> Self {
        Self::new(stores, policy, Arc::new(SystemClock))
    }

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    pub fn week_clock(&self) -> WeekClock {
        self.policy.week_clock()
    }
}
