/// Offset, in bar widths, of bar series `index` out of `count` placed side
/// by side. Offsets are centered on zero: three series get `-1`, `0` and `1`.
#[must_use]
pub fn bar_center_offset(index: usize, count: usize) -> f64 {
    if count <= 1 {
        return 0.0;
    }
    index as f64 - (count - 1) as f64 / 2.0
}

/// Left edge of a bar whose category sits at pixel `x_pixel`.
///
/// `spread` is the extra gap in pixels between neighbouring series.
#[must_use]
pub fn bar_x(x_pixel: f64, bar_width: f64, spread: f64, index: usize, count: usize) -> f64 {
    let center_offset = bar_center_offset(index, count);
    x_pixel + center_offset * bar_width + center_offset * spread - bar_width / 2.0
}
