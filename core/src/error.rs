use thiserror::Error;

/// Text measurement failures. None of these are fatal: widgets log a
/// warning and keep their prior geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    #[error("degenerate font size {0}")]
    DegenerateFontSize(f32),

    #[error("text layout produced a zero-width run for {0:?}")]
    ZeroWidthLayout(String)
}
