use smallvec::SmallVec;

/// Tick list sized for typical axes without heap allocation.
pub type TickList<T> = SmallVec<[T; 16]>;

pub const DEFAULT_TICK_COUNT: usize = 5;

const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Nice step and bounds for `[start, stop]` split into roughly `count` intervals.
///
/// Returns `(i0, i1, increment)`. A negative increment means the step is
/// `1 / -increment`, which keeps fractional ticks exact.
fn tick_increment(start: f64, stop: f64, count: f64) -> Option<(f64, f64, f64)> {
    let step = (stop - start) / count.max(0.0);
    if !step.is_finite() || step <= 0.0 {
        return None;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i0, mut i1, increment);
    if power < 0.0 {
        increment = 10f64.powf(-power) / factor;
        i0 = (start * increment).round();
        i1 = (stop * increment).round();
        if i0 / increment < start {
            i0 += 1.0;
        }
        if i1 / increment > stop {
            i1 -= 1.0;
        }
        Some((i0, i1, -increment))
    } else {
        increment = 10f64.powf(power) * factor;
        i0 = (start / increment).round();
        i1 = (stop / increment).round();
        if i0 * increment < start {
            i0 += 1.0;
        }
        if i1 * increment > stop {
            i1 -= 1.0;
        }
        Some((i0, i1, increment))
    }
}

/// Step between nice ticks, positive for `start <= stop`.
#[must_use]
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let (low, high) = ordered(start, stop);
    match tick_increment(low, high, count as f64) {
        Some((_, _, increment)) if increment < 0.0 => 1.0 / -increment,
        Some((_, _, increment)) => increment,
        None => 0.0,
    }
}

/// Nice ticks covering `[start, stop]`, in the same direction as the input.
#[must_use]
pub fn linear_ticks(start: f64, stop: f64, count: usize) -> TickList<f64> {
    let mut ticks = TickList::new();
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return ticks;
    }
    if start == stop {
        ticks.push(start);
        return ticks;
    }

    let reverse = stop < start;
    let (low, high) = ordered(start, stop);
    let Some((i0, i1, increment)) = tick_increment(low, high, count as f64) else {
        return ticks;
    };
    if i1 < i0 {
        return ticks;
    }

    let n = (i1 - i0 + 1.0) as usize;
    for i in 0..n {
        let index = i0 + i as f64;
        let value = if increment < 0.0 {
            index / -increment
        } else {
            index * increment
        };
        ticks.push(value);
    }
    if reverse {
        ticks.reverse();
    }
    ticks
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_domain_ticks_by_fifths() {
        let ticks = linear_ticks(0.0, 1.0, 5);
        assert_eq!(ticks.as_slice(), &[0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn hundred_domain_ticks_by_twenties() {
        let ticks = linear_ticks(0.0, 100.0, 5);
        assert_eq!(ticks.as_slice(), &[0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    }

    #[test]
    fn reversed_domain_yields_descending_ticks() {
        let ticks = linear_ticks(10.0, 0.0, 5);
        assert_eq!(ticks.first().copied(), Some(10.0));
        assert_eq!(ticks.last().copied(), Some(0.0));
    }

    #[test]
    fn non_finite_or_zero_count_is_empty() {
        assert!(linear_ticks(0.0, f64::NAN, 5).is_empty());
        assert!(linear_ticks(0.0, 1.0, 0).is_empty());
    }
}
