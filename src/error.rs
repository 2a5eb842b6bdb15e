/// Errors returned by the fallible engine operations.
///
/// Empty input is never an error: streak, trend and summary calculations
/// return zeroed results for it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("cycle length must be between 21 and 35 days, got {days}")]
    CycleLengthOutOfRange { days: u32 },

    #[error("period length must be between 3 and 8 days, got {days}")]
    PeriodLengthOutOfRange { days: u32 },

    #[error("period length {period} must be shorter than cycle length {cycle}")]
    PeriodNotShorterThanCycle { period: u32, cycle: u32 },

    #[error("invalid month index {month0} for year {year}")]
    InvalidMonth { year: i32, month0: u32 },

    #[error("{name} window must be between 1 and 3660 days, got {days}")]
    InvalidWindow { name: &'static str, days: i64 },

    #[error("date arithmetic left the supported calendar range")]
    DateOutOfRange,

    #[error("invalid settings: {0}")]
    Settings(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Settings(e.to_string())
    }
}
