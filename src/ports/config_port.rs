//! Configuration access port trait.

use crate::domain::error::AccrueError;

/// Typed getters fall back to `default` when the key is absent and fail
/// with `ConfigInvalid` when it is present but malformed.
pub trait ConfigPort {
    fn sections(&self) -> Vec<String>;
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, AccrueError>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, AccrueError>;
}
