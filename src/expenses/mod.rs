//! Meal expense tracking. The basic idea is:
//!  - Every calendar day has at most one [entities::DailyRecord] with the three meals of that day.
//!  - A meal costs a fixed price if it was had, nothing otherwise.
//!  - [repository::ExpenseRepository] loads the full list of records on every call and rewrites it
//!    on every change.
//!  - Weekly and monthly views are derived on request and never stored.

pub mod calendar;
pub mod entities;
pub mod repository;
pub mod schedule;
pub mod summary;
