use thiserror::Error;

/// Errors raised when building a [`LabelPlot`](crate::plot::LabelPlot).
#[derive(Debug, Error)]
pub enum LabelPlotError {
    /// The dataset does not hold complex events.
    #[error("Argument must be complex event dataset")]
    NotComplexEvent,
    /// The dataset cannot grow without bound.
    #[error("Argument must have unbounded maximum length (got {max_len})")]
    BoundedMaxShape { max_len: usize },
    /// `units` is `samples` but no `sampling_rate` attribute exists.
    #[error("Dataset units are samples but it has no sampling_rate attribute")]
    MissingSamplingRate,
    /// `sampling_rate` is zero, negative or not finite.
    #[error("Invalid sampling_rate {rate}")]
    InvalidSamplingRate { rate: f64 },
}
