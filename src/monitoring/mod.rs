// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// src/monitoring/mod.rs - Main monitoring module

pub mod metrics;

pub use metrics::{ServiceMetrics, OUTCOME_CLIENT_ERROR, OUTCOME_OK, OUTCOME_SERVER_ERROR};
