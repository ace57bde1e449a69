pub mod absence;
pub mod availability;
pub mod booking;
pub mod calendar;
pub mod health;
pub mod teacher;
