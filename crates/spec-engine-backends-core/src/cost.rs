//! Per-model price table.

use spec_engine_common_log::round_usd;

/// USD per million tokens as (input, output).
fn price_per_million(model: &str) -> (f64, f64) {
    match model {
        "gpt-5-mini" => (0.25, 2.0),
        "gpt-4o-mini" | "openai/gpt-4o-mini" => (0.15, 0.60),
        _ => (0.0, 0.0),
    }
}

/// Estimated cost of one call, rounded to 8 decimals. Unknown models cost 0.
pub fn estimate_cost_usd(model: &str, prompt_tokens: u64, completion_tokens: u64) -> f64 {
    let (input, output) = price_per_million(model);
    round_usd(
        prompt_tokens as f64 / 1_000_000.0 * input + completion_tokens as f64 / 1_000_000.0 * output,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_models() {
        assert_eq!(estimate_cost_usd("gpt-5-mini", 1_000_000, 1_000_000), 2.25);
        assert_eq!(estimate_cost_usd("gpt-4o-mini", 1000, 500), 0.00045);
        assert_eq!(
            estimate_cost_usd("openai/gpt-4o-mini", 1000, 500),
            estimate_cost_usd("gpt-4o-mini", 1000, 500)
        );
    }

    #[test]
    fn test_unknown_model_is_free() {
        assert_eq!(estimate_cost_usd("mystery", 10_000, 10_000), 0.0);
    }
}
