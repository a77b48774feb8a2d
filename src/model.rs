//! Symbolic model tiers and their concrete identifiers.

const SONNET: &str = "claude-sonnet-4-5-20250929";
const OPUS: &str = "claude-opus-4-1-20250805";
const HAIKU: &str = "claude-3-5-haiku-20241022";

/// Resolve a symbolic model tier to a concrete model identifier.
///
/// Any other string passes through unchanged: it is treated as an
/// already-qualified model id for non-default providers.
pub fn resolve_model(name: &str) -> String {
    match name {
        "sonnet" => SONNET.to_string(),
        "opus" => OPUS.to_string(),
        "haiku" => HAIKU.to_string(),
        other => other.to_string(),
    }
}
