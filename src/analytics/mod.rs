pub mod one_rep_max;
pub mod trend;

pub use one_rep_max::{OneRepMaxFormula, estimate_one_rep_max};
pub use trend::{
    LinearFit, OneRepMaxPoint, OverloadTrendAnalyzer, SetSample, TrendMetric, compute_trend,
    fit_line, one_rep_max_series, top_sets,
};
