use crate::core::scale::lerp;
use crate::render::AttrValue;

/// Maps eased progress in `[0, 1]` to an attribute value. `None` removes the
/// attribute.
pub type Interpolator = Box<dyn Fn(f64) -> Option<AttrValue>>;

#[must_use]
pub fn constant(value: AttrValue) -> Interpolator {
    Box::new(move |_| Some(value.clone()))
}

#[must_use]
pub fn interpolate_number(from: f64, to: f64) -> Interpolator {
    Box::new(move |t| Some(AttrValue::Number(lerp(from, to, t))))
}

/// Interpolates between two values of any kind.
///
/// Numbers lerp, strings interpolate their embedded numbers, and mixed kinds
/// jump to the target.
#[must_use]
pub fn interpolate_value(from: &AttrValue, to: &AttrValue) -> Interpolator {
    match (from, to) {
        (AttrValue::Number(from), AttrValue::Number(to)) => interpolate_number(*from, *to),
        (AttrValue::Text(from), AttrValue::Text(to)) => interpolate_string(from, to),
        _ => constant(to.clone()),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Number(f64),
}

/// Interpolates the numbers embedded in two strings.
///
/// The target's text structure is kept; its `n`-th number moves from the
/// source's `n`-th number. Numbers without a counterpart stay at the target.
#[must_use]
pub fn interpolate_string(from: &str, to: &str) -> Interpolator {
    let sources: Vec<f64> = split_numbers(from)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Number(value) => Some(value),
            Segment::Text(_) => None,
        })
        .collect();
    let target = split_numbers(to);

    let mut index = 0;
    let mut parts: Vec<(Segment, Option<f64>)> = Vec::with_capacity(target.len());
    for segment in target {
        match segment {
            Segment::Number(value) => {
                let source = sources.get(index).copied();
                index += 1;
                parts.push((Segment::Number(value), source));
            }
            text @ Segment::Text(_) => parts.push((text, None)),
        }
    }

    if parts
        .iter()
        .all(|(segment, source)| !matches!(segment, Segment::Number(_)) || source.is_none())
    {
        return constant(AttrValue::Text(to.to_owned()));
    }

    Box::new(move |t| {
        let mut out = String::new();
        for (segment, source) in &parts {
            match (segment, source) {
                (Segment::Text(text), _) => out.push_str(text),
                (Segment::Number(target), Some(source)) => {
                    out.push_str(&format_number(lerp(*source, *target, t)));
                }
                (Segment::Number(target), None) => out.push_str(&format_number(*target)),
            }
        }
        Some(AttrValue::Text(out))
    })
}

/// Path strings interpolate point by point when their commands line up.
#[must_use]
pub fn interpolate_path(from: &str, to: &str) -> Interpolator {
    interpolate_string(from, to)
}

fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    value.to_string()
}

fn split_numbers(input: &str) -> Vec<Segment> {
    let bytes = input.as_bytes();
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut cursor = 0;

    while cursor < bytes.len() {
        if let Some(end) = number_end(bytes, cursor) {
            if let Ok(value) = input[cursor..end].parse::<f64>() {
                if text_start < cursor {
                    segments.push(Segment::Text(input[text_start..cursor].to_owned()));
                }
                segments.push(Segment::Number(value));
                cursor = end;
                text_start = end;
                continue;
            }
        }
        cursor += 1;
    }
    if text_start < bytes.len() {
        segments.push(Segment::Text(input[text_start..].to_owned()));
    }
    segments
}

/// End of a number literal (`[-+]?(\d+\.?\d*|\.\d+)([eE][-+]?\d+)?`)
/// starting at `start`, if any.
fn number_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut cursor = start;
    if matches!(bytes.get(cursor), Some(b'-' | b'+')) {
        cursor += 1;
    }
    let int_start = cursor;
    while bytes.get(cursor).is_some_and(u8::is_ascii_digit) {
        cursor += 1;
    }
    let has_int = cursor > int_start;
    if bytes.get(cursor) == Some(&b'.') {
        let frac_start = cursor + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if has_int || frac_end > frac_start {
            cursor = frac_end;
        }
    }
    if !has_int && cursor == int_start {
        return None;
    }
    if matches!(bytes.get(cursor), Some(b'e' | b'E')) {
        let mut exp = cursor + 1;
        if matches!(bytes.get(exp), Some(b'-' | b'+')) {
            exp += 1;
        }
        let digits_start = exp;
        while bytes.get(exp).is_some_and(u8::is_ascii_digit) {
            exp += 1;
        }
        if exp > digits_start {
            cursor = exp;
        }
    }
    Some(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_points_move_between_shapes() {
        let interpolator = interpolate_path("M0,0L10,10", "M0,20L10,30");
        assert_eq!(
            interpolator(0.5),
            Some(AttrValue::Text("M0,10L10,20".to_owned()))
        );
        assert_eq!(
            interpolator(1.0),
            Some(AttrValue::Text("M0,20L10,30".to_owned()))
        );
    }

    #[test]
    fn unmatched_target_numbers_stay_put() {
        let interpolator = interpolate_string("translate(0)", "translate(10, 5)");
        assert_eq!(
            interpolator(0.5),
            Some(AttrValue::Text("translate(5, 5)".to_owned()))
        );
    }

    #[test]
    fn negative_and_exponent_numbers_are_recognised() {
        let segments = split_numbers("M-1.5e2,.5");
        assert_eq!(
            segments,
            vec![
                Segment::Text("M".to_owned()),
                Segment::Number(-150.0),
                Segment::Text(",".to_owned()),
                Segment::Number(0.5),
            ]
        );
    }

    #[test]
    fn mixed_kinds_jump_to_target() {
        let interpolator = interpolate_value(&AttrValue::Number(1.0), &AttrValue::from("auto"));
        assert_eq!(interpolator(0.0), Some(AttrValue::from("auto")));
    }
}
