//! Pass 5: normalise `after <N> <unit>` triggers to nanoseconds.

use crate::error::{CoreError, CoreResult};
use crate::model::Statechart;

const NS_PER_MS: u128 = 1_000_000;
const NS_PER_S: u128 = 1_000_000_000;

/// Rewrites every `after <N> (ns|ms|s)` trigger (whitespace-insensitive
/// between tokens) to `after <N'> ns`. Triggers that don't match the grammar
/// pass through unchanged. An unrecognised unit after `after <N>` is a
/// structural/programming error.
pub(crate) fn normalise_time_units(sc: &mut Statechart) -> CoreResult<()> {
    for bucket in sc.transitions.values_mut() {
        for t in bucket.iter_mut() {
            let mut rewritten = Vec::with_capacity(t.spec.triggers.len());
            for trigger in &t.spec.triggers {
                rewritten.push(normalise_trigger(trigger)?);
            }
            rewritten.sort();
            rewritten.dedup();
            t.spec.triggers = rewritten;
        }
    }
    Ok(())
}

/// Parses a single trigger against the `after <N> <unit>` grammar, returning
/// it unchanged if it doesn't match at all (not every trigger is a timer).
fn normalise_trigger(trigger: &str) -> CoreResult<String> {
    let trimmed = trigger.trim();
    let Some(rest) = trimmed.strip_prefix("after") else {
        return Ok(trigger.to_string());
    };
    let rest = rest.trim_start();

    let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if digits_end == 0 {
        // "after" followed by something that isn't a number: not this grammar.
        return Ok(trigger.to_string());
    }

    let (num_str, unit_part) = rest.split_at(digits_end);
    let unit = unit_part.trim();

    let n: u128 = num_str
        .parse()
        .map_err(|_| CoreError::UnknownTimeUnit { unit: unit.to_string(), trigger: trigger.to_string() })?;

    let ns = match unit {
        "ns" => n,
        "ms" => n * NS_PER_MS,
        "s" => n * NS_PER_S,
        other => {
            return Err(CoreError::UnknownTimeUnit { unit: other.to_string(), trigger: trigger.to_string() });
        }
    };

    Ok(format!("after {ns} ns"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_milliseconds_and_seconds_to_nanoseconds() {
        assert_eq!(normalise_trigger("after 1 ms").unwrap(), "after 1000000 ns");
        assert_eq!(normalise_trigger("after 2 s").unwrap(), "after 2000000000 ns");
        assert_eq!(normalise_trigger("after 1000000 ns").unwrap(), "after 1000000 ns");
    }

    #[test]
    fn whitespace_insensitive_between_tokens() {
        assert_eq!(normalise_trigger("after   3    ms").unwrap(), "after 3000000 ns");
    }

    #[test]
    fn leaves_non_timer_triggers_untouched() {
        assert_eq!(normalise_trigger("operate").unwrap(), "operate");
    }

    #[test]
    fn rejects_unknown_units() {
        let err = normalise_trigger("after 5 minutes").unwrap_err();
        assert!(matches!(err, CoreError::UnknownTimeUnit { .. }));
    }
}
