// src/strategies/crossover.rs
use std::fmt;

/// Classification of the most recent transition between two series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossover {
    None,
    /// A was at or below B and is now strictly above it.
    Bullish,
    /// A was at or above B and is now strictly below it.
    Bearish,
}

impl fmt::Display for Crossover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Crossover::None => "NONE",
            Crossover::Bullish => "BULLISH",
            Crossover::Bearish => "BEARISH",
        };
        f.write_str(s)
    }
}

/// Edge-triggered crossover of `a` over `b`, judged on the last two samples only.
///
/// The two slices are aligned from their ends. Fewer than two trailing samples
/// in either series, or an undefined (NaN) sample among the four compared,
/// yields `Crossover::None`. A crossover that happened earlier than the last
/// tick is never reported.
pub fn detect(a: &[f64], b: &[f64]) -> Crossover {
    let (Some((a_prev, a_now)), Some((b_prev, b_now))) = (last_two(a), last_two(b)) else {
        return Crossover::None;
    };

    if a_prev <= b_prev && a_now > b_now {
        Crossover::Bullish
    } else if a_prev >= b_prev && a_now < b_now {
        Crossover::Bearish
    } else {
        Crossover::None
    }
}

fn last_two(series: &[f64]) -> Option<(f64, f64)> {
    match series {
        [.., prev, now] if !prev.is_nan() && !now.is_nan() => Some((*prev, *now)),
        _ => None,
    }
}
