//! Terraform version constraints for the Honeycomb provider.

const OPERATORS: [char; 5] = ['=', '!', '>', '<', '~'];

/// Turns a provider version into a Terraform version constraint.
///
/// A bare version is pinned to its minor series with `~>`. Input that already
/// starts with a constraint operator is passed through, and blank input
/// yields a blank constraint.
///
/// ```rust
/// use honeycomb_plugin::render::version_constraint;
///
/// assert_eq!(version_constraint("0.18.1"), "~> 0.18.1");
/// assert_eq!(version_constraint(">= 0.20"), ">= 0.20");
/// assert_eq!(version_constraint(""), "");
/// ```
#[must_use]
pub fn version_constraint(version: &str) -> String {
    let trimmed = version.trim();
    if trimmed.is_empty() || trimmed.starts_with(OPERATORS) {
        trimmed.to_owned()
    } else {
        format!("~> {trimmed}")
    }
}
