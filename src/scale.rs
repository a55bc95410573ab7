use crate::aggregate::Series;

/// Shared axis extents for every series drawn together. One y-domain for the
/// whole view keeps simultaneously plotted lines visually comparable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartDomains {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl ChartDomains {
    pub fn contains(&self, point: (f64, f64)) -> bool {
        point.0 >= self.x[0]
            && point.0 <= self.x[1]
            && point.1 >= self.y[0]
            && point.1 <= self.y[1]
    }
}

const Y_TICK_TARGET: f64 = 4.0;

/// x-domain is the union of year extents across all series, falling back to
/// the filter's year range when nothing carries points so the axis stays
/// stable on empty results. y-domain is the union of value extents widened
/// to round tick-friendly numbers.
pub fn compute_domains(series: &[Series], fallback_years: (i32, i32)) -> ChartDomains {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for s in series {
        for &(x, y) in &s.points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }

    let x = if x_min.is_finite() {
        if x_min == x_max {
            // Single season: pad so the axis has width.
            [x_min - 0.5, x_max + 0.5]
        } else {
            [x_min, x_max]
        }
    } else {
        [f64::from(fallback_years.0), f64::from(fallback_years.1)]
    };

    let y = if y_min.is_finite() {
        nice_bounds(y_min, y_max)
    } else {
        [0.0, 1.0]
    };

    ChartDomains { x, y }
}

/// Widen [min, max] outward to multiples of a 1/2/5 step, the usual
/// tick-placement rounding.
pub fn nice_bounds(min: f64, max: f64) -> [f64; 2] {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    let span = max - min;
    if span < f64::EPSILON {
        return nice_bounds(min - 0.5, max + 0.5);
    }
    let step = nice_step(span / Y_TICK_TARGET);
    [(min / step).floor() * step, (max / step).ceil() * step]
}

fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let pow10 = 10f64.powf(raw.log10().floor());
    let frac = raw / pow10;
    let nice = if frac <= 1.0 {
        1.0
    } else if frac <= 2.0 {
        2.0
    } else if frac <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * pow10
}

/// Evenly spaced year labels for the x axis.
pub fn year_labels(bounds: [f64; 2], count: usize) -> Vec<String> {
    spaced(bounds, count)
        .into_iter()
        .map(|v| format!("{:.0}", v))
        .collect()
}

/// Evenly spaced value labels for the y axis.
pub fn value_labels(bounds: [f64; 2], count: usize) -> Vec<String> {
    spaced(bounds, count)
        .into_iter()
        .map(|v| format!("{:.1}", v))
        .collect()
}

fn spaced(bounds: [f64; 2], count: usize) -> Vec<f64> {
    let count = count.max(2);
    let span = bounds[1] - bounds[0];
    (0..count)
        .map(|i| bounds[0] + span * (i as f64) / ((count - 1) as f64))
        .collect()
}
