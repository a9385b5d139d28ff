//! Training orchestration: trial (trip loop) and sweep drivers plus the
//! bundled observers.

pub mod observers;
pub mod sweep;
pub mod trial;

pub use observers::{MetricsObserver, MetricsSummary, ProgressObserver};
pub use sweep::{
    AxisReport, SweepAxis, SweepConfig, SweepDriver, SweepResult, ValueStats, axis_value,
};
pub use trial::{RunContext, TrialConfig, TrialResult, TrialRunner};
