//! Result type alias for shell operations.

use super::shell_error::ShellError;

/// Type alias for Results using ShellError.
///
/// # Example
///
/// ```ignore
/// use cloudinv::error::ShellResult;
///
/// async fn fetch(api: &ApiClient) -> ShellResult<serde_json::Value> {
///     api.get("MyAPIGatewayAPI", "/", &[("function", "ec2")]).await
/// }
/// ```
pub type ShellResult<T> = Result<T, ShellError>;
