//! Result type alias for trackplan

use super::errors::TrackplanError;

/// Result type alias for trackplan operations
///
/// # Examples
///
/// ```
/// use trackplan::domain::result::Result;
/// use trackplan::domain::errors::TrackplanError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(TrackplanError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, TrackplanError>;
