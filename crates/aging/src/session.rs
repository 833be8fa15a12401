//! The current dataset and the aggregates memoized from it.
//!
//! One dataset is current at a time. Loading a new one bumps the version and
//! invalidates every cached aggregate of the previous version in the same
//! `&mut self` call, so a stale aggregate is never served after a reload.

use std::time::{Duration, Instant};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::cache::{AggregateCache, CacheKey};
use crate::classify::Classified;
use crate::columns::ColumnMapping;
use crate::error::AgingError;
use crate::model::{AreaAggregate, RawRow};
use crate::pipeline::{compute_aggregate, compute_records};
use crate::reconcile::subtract_revisited;
use crate::report::{build_report, AgingReport};
use crate::view::View;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of "now" for day counts. Local wall-clock time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    pub fn at_midnight(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Dataset {
    rows: Vec<RawRow>,
    source: String,
    version: u64,
    loaded_at: Instant,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetStatus {
    pub version: u64,
    pub source: String,
    pub rows: usize,
    pub age_secs: u64,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct DatasetSession<C: AggregateCache> {
    current: Option<Dataset>,
    last_version: u64,
    dataset_ttl: Option<Duration>,
    columns: ColumnMapping,
    clock: Box<dyn Clock>,
    cache: C,
}

impl<C: AggregateCache> DatasetSession<C> {
    pub fn new(columns: ColumnMapping, cache: C) -> Self {
        Self {
            current: None,
            last_version: 0,
            dataset_ttl: None,
            columns,
            clock: Box::new(SystemClock),
            cache,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Drop the dataset once it is older than `ttl`. `None` keeps it forever.
    pub fn with_dataset_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.dataset_ttl = ttl;
        self
    }

    pub fn columns(&self) -> &ColumnMapping {
        &self.columns
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Make `rows` the current dataset. Returns its version.
    pub fn load(&mut self, rows: Vec<RawRow>, source: impl Into<String>) -> u64 {
        self.drop_current();
        self.last_version += 1;
        let dataset = Dataset {
            rows,
            source: source.into(),
            version: self.last_version,
            loaded_at: Instant::now(),
        };
        tracing::info!(
            version = dataset.version,
            rows = dataset.rows.len(),
            source = %dataset.source,
            "dataset loaded"
        );
        self.current = Some(dataset);
        self.last_version
    }

    /// Forget the current dataset. Returns whether there was one.
    pub fn clear(&mut self) -> bool {
        self.drop_current()
    }

    pub fn status(&mut self) -> Option<DatasetStatus> {
        self.ensure_current().ok()?;
        self.current.as_ref().map(|d| DatasetStatus {
            version: d.version,
            source: d.source.clone(),
            rows: d.rows.len(),
            age_secs: d.loaded_at.elapsed().as_secs(),
        })
    }

    /// Classified records for `view`. Not memoized.
    pub fn records(&mut self, view: View) -> Result<Classified, AgingError> {
        self.ensure_current()?;
        let now = self.clock.now();
        compute_records(self.rows()?, view, &self.columns, now)
    }

    /// Per-area aggregate for `view`, served from cache when possible.
    pub fn aggregate(&mut self, view: View) -> Result<AreaAggregate, AgingError> {
        let version = self.ensure_current()?;
        self.aggregate_for(view, version)
    }

    /// Records, bucket totals and per-area counts computed at one instant.
    /// Bypasses the aggregate cache, whose entries may predate that instant.
    pub fn report(&mut self, view: View) -> Result<AgingReport, AgingError> {
        self.ensure_current()?;
        let now = self.clock.now();
        build_report(self.rows()?, view, &self.columns, now)
    }

    fn aggregate_for(&mut self, view: View, version: u64) -> Result<AreaAggregate, AgingError> {
        let key = CacheKey::new(view, version);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(view = %view, version, "aggregate cache hit");
            return Ok(hit);
        }

        let aggregate = match view {
            View::BelumRevisit => {
                let disconnected = self.aggregate_for(View::Disconnected, version)?;
                let revisit = self.aggregate_for(View::Revisit, version)?;
                subtract_revisited(&disconnected, &revisit)
            }
            View::Disconnected | View::Revisit => {
                let now = self.clock.now();
                compute_aggregate(self.rows()?, view, &self.columns, now)?
            }
        };

        self.cache.put(key, aggregate.clone());
        Ok(aggregate)
    }

    fn rows(&self) -> Result<&[RawRow], AgingError> {
        self.current
            .as_ref()
            .map(|d| d.rows.as_slice())
            .ok_or(AgingError::NoDatasetLoaded)
    }

    /// Current version, expiring the dataset first if it outlived its TTL.
    fn ensure_current(&mut self) -> Result<u64, AgingError> {
        let expired = match (&self.current, self.dataset_ttl) {
            (Some(d), Some(ttl)) => d.loaded_at.elapsed() >= ttl,
            _ => false,
        };
        if expired {
            tracing::info!("dataset expired");
            self.drop_current();
        }
        self.current
            .as_ref()
            .map(|d| d.version)
            .ok_or(AgingError::NoDatasetLoaded)
    }

    fn drop_current(&mut self) -> bool {
        match self.current.take() {
            Some(old) => {
                self.cache.invalidate(&CacheKey::all_for(old.version));
                tracing::info!(version = old.version, "dataset replaced; cached aggregates invalidated");
                true
            }
            None => false,
        }
    }
}
