// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Price-performance metrics.
//!
//! Joins measured performance with hourly instance cost. Pricing failures
//! never escape this module as panics or aborted runs: the fallible
//! operations return a [`MetricError`] and the summary decides to log it and
//! emit absent cells instead.

use perfsheet_core::{Cell, LookupError, PipelineConfig, PriceMetric, PricingLookup};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Errors that void a metric.
#[derive(Debug, Error)]
pub enum MetricError {
    /// The pricing lookup failed.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// No throughput value was available.
    #[error("No throughput values for {0}")]
    NoThroughput(String),

    /// A throughput cell is not a number.
    #[error("Invalid throughput value '{value}' for {instance}")]
    InvalidThroughput {
        /// Instance the value belongs to
        instance: String,
        /// Offending cell content
        value: String,
    },

    /// Cost is zero or negative.
    #[error("Non-positive hourly cost {cost} for {instance}")]
    NonPositiveCost {
        /// Instance the cost belongs to
        instance: String,
        /// Reported cost
        cost: f64,
    },
}

/// Result type for metric operations.
pub type Result<T> = std::result::Result<T, MetricError>;

/// Peak throughput, its hourly cost and their ratio for one instance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeakMetric {
    /// Highest throughput measured.
    pub peak_throughput: Option<f64>,
    /// Hourly cost of the instance.
    pub cost_per_hour: Option<f64>,
    /// `peak_throughput / cost_per_hour`.
    pub peak_efficiency: Option<f64>,
}

/// Price-performance of `avg_score` at `cost`.
///
/// Returns `0.0` when the cost is missing or not positive, which is how the
/// summaries report "no cost data".
///
/// ```
/// use perfsheet_benchmarks::pricing::price_performance;
///
/// assert_eq!(price_performance(100.0, Some(50.0)), 2.0);
/// assert_eq!(price_performance(100.0, Some(0.0)), 0.0);
/// assert_eq!(price_performance(100.0, None), 0.0);
/// ```
pub fn price_performance(avg_score: f64, cost: Option<f64>) -> f64 {
    PriceMetric::new(avg_score, cost).efficiency_or_zero()
}

/// Computes cost-based metrics with the configured provider, region and OS.
pub struct PricePerformanceCalculator<'a> {
    lookup: &'a dyn PricingLookup,
    config: &'a PipelineConfig,
}

impl<'a> PricePerformanceCalculator<'a> {
    /// Calculator asking `lookup` for prices.
    pub fn new(lookup: &'a dyn PricingLookup, config: &'a PipelineConfig) -> Self {
        Self { lookup, config }
    }

    /// Hourly cost of `instance`, or the lookup error.
    pub fn try_cost_per_hour(&self, instance: &str) -> std::result::Result<f64, LookupError> {
        self.lookup.hourly_cost(
            instance,
            &self.config.region,
            self.config.provider.as_str(),
            &self.config.os_type,
        )
    }

    /// Price metric of `instance` performing at `performance`.
    pub fn price_metric(&self, instance: &str, performance: f64) -> Result<PriceMetric> {
        let cost = self.try_cost_per_hour(instance)?;
        Ok(PriceMetric::new(performance, Some(cost)))
    }

    /// Like [`price_metric`](Self::price_metric), but a failed lookup is
    /// logged and leaves the cost absent.
    pub fn metric_or_absent(&self, instance: &str, performance: f64) -> PriceMetric {
        self.price_metric(instance, performance)
            .unwrap_or_else(|e| {
                warn!(instance, error = %e, "price metric unavailable");
                PriceMetric::new(performance, None)
            })
    }

    /// Peak efficiency of `instance` over its throughput cells.
    ///
    /// The first maximum wins on ties.
    pub fn try_peak_efficiency<'c>(
        &self,
        instance: &str,
        throughputs: impl IntoIterator<Item = &'c Cell>,
    ) -> Result<PeakMetric> {
        let mut peak: Option<f64> = None;
        for cell in throughputs {
            let value = cell.as_f64().ok_or_else(|| MetricError::InvalidThroughput {
                instance: instance.to_string(),
                value: cell.to_string(),
            })?;
            if peak.map_or(true, |p| value > p) {
                peak = Some(value);
            }
        }
        let peak = peak.ok_or_else(|| MetricError::NoThroughput(instance.to_string()))?;

        let cost = self.try_cost_per_hour(instance)?;
        if cost <= 0.0 {
            return Err(MetricError::NonPositiveCost {
                instance: instance.to_string(),
                cost,
            });
        }

        debug!(instance, peak, cost, "computed peak efficiency");
        Ok(PeakMetric {
            peak_throughput: Some(peak),
            cost_per_hour: Some(cost),
            peak_efficiency: Some(peak / cost),
        })
    }

    /// Peak efficiency of `instance`; any failure yields an all-absent metric.
    pub fn peak_efficiency<'c>(
        &self,
        instance: &str,
        throughputs: impl IntoIterator<Item = &'c Cell>,
    ) -> PeakMetric {
        self.try_peak_efficiency(instance, throughputs)
            .unwrap_or_else(|e| {
                error!(instance, error = %e, "error calculating peak efficiency");
                PeakMetric::default()
            })
    }
}
