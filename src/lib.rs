// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Monjaro UP: nutrition and treatment tracking for GLP-1 medication users
//!
//! This crate provides the backend API: onboarding and personalized targets,
//! daily nutrition and symptom logs, weekly dose cadence, and alerts.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::HealthStore;
use services::{DailyLogAggregator, DashboardService, DoseScheduler, ProfileService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn HealthStore>,
    pub profiles: ProfileService,
    pub daily_logs: DailyLogAggregator,
    pub doses: DoseScheduler,
    pub dashboard: DashboardService,
}

impl AppState {
    /// Wire every service to the same store.
    pub fn new(config: Config, store: Arc<dyn HealthStore>) -> Self {
        let profiles = ProfileService::new(store.clone());
        let daily_logs = DailyLogAggregator::new(store.clone());
        let doses = DoseScheduler::new(store.clone());
        let dashboard = DashboardService::new(profiles.clone(), daily_logs.clone(), doses.clone());

        Self {
            config,
            store,
            profiles,
            daily_logs,
            doses,
            dashboard,
        }
    }
}
