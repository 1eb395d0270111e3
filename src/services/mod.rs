// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod daily_log;
pub mod dashboard;
pub mod dose;
pub mod profile;
pub mod progress;

pub use daily_log::DailyLogAggregator;
pub use dashboard::{Dashboard, DashboardService};
pub use dose::{CurrentDose, DoseScheduler};
pub use profile::ProfileService;
