//! Linear scales mapping data values onto pixel extents.

/// Fallback y-domain when the data gives no usable maximum.
pub const FALLBACK_DOMAIN: (f64, f64) = (0.0, 1.0);

/// Maps a `[d0, d1]` domain linearly onto a `[r0, r1]` pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = if d1 == d0 { 0.5 } else { (value - d0) / (d1 - d0) };
        r0 + t * (r1 - r0)
    }

    /// Whether a pixel coordinate lies inside the range (either orientation).
    pub fn range_contains(&self, pixel: f64) -> bool {
        let (lo, hi) = self.range_bounds();
        (lo..=hi).contains(&pixel)
    }

    pub fn clamp_to_range(&self, pixel: f64) -> f64 {
        let (lo, hi) = self.range_bounds();
        pixel.clamp(lo, hi)
    }

    fn range_bounds(&self) -> (f64, f64) {
        let (r0, r1) = self.range;
        (r0.min(r1), r0.max(r1))
    }

    /// Round tick values covering the domain, stepping by 1, 2 or 5 times a power of ten.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (start, stop) = self.domain;
        let (start, stop) = (start.min(stop), start.max(stop));
        if !start.is_finite() || !stop.is_finite() || count == 0 {
            return Vec::new();
        }
        if start == stop {
            return vec![start];
        }

        let step = (stop - start) / count as f64;
        let power = step.log10().floor();
        let error = step / 10f64.powf(power);
        let factor = if error >= 50f64.sqrt() {
            10.0
        } else if error >= 10f64.sqrt() {
            5.0
        } else if error >= 2f64.sqrt() {
            2.0
        } else {
            1.0
        };

        if power >= 0.0 {
            let inc = factor * 10f64.powf(power);
            let i0 = (start / inc).ceil() as i64;
            let i1 = (stop / inc).floor() as i64;
            (i0..=i1).map(|i| i as f64 * inc).collect()
        } else {
            // Dividing by the inverse keeps decimal ticks exact (0.3, not 0.30000000000000004).
            let inv = 10f64.powf(-power) / factor;
            let i0 = (start * inv).ceil() as i64;
            let i1 = (stop * inv).floor() as i64;
            (i0..=i1).map(|i| i as f64 / inv).collect()
        }
    }
}

/// Y scale for a series: `[0, max * padding]` onto `[extent, 0]`, so larger values plot higher.
pub fn derive_scale(values: &[f64], pixel_extent: f64, padding_factor: f64) -> LinearScale {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    let padding = if padding_factor.is_finite() && padding_factor > 0.0 {
        padding_factor
    } else {
        1.0
    };
    let upper = max * padding;

    let domain = if upper.is_finite() && upper > 0.0 {
        (0.0, upper)
    } else {
        FALLBACK_DOMAIN
    };
    LinearScale::new(domain, (pixel_extent, 0.0))
}

/// Month axis, fixed to `[1, 12]` regardless of data.
pub fn month_scale(width: f64) -> LinearScale {
    LinearScale::new((1.0, 12.0), (0.0, width))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn padded_domain_upper_bound() {
        let y = derive_scale(&[190740.858, 36450.272], 280.0, 1.2);
        assert!(close(y.domain().1, 228889.0296));
        assert_eq!(y.domain().0, 0.0);
        assert!(close(y.apply(0.0), 280.0));
        assert!(close(y.apply(228889.0296), 0.0));
    }

    #[test]
    fn unpadded_maximum_maps_to_top() {
        let y = derive_scale(&[190740.858, 36450.272], 280.0, 1.0);
        assert!(close(y.apply(190740.858), 0.0));
        assert!(close(y.apply(0.0), 280.0));
    }

    #[test]
    fn degenerate_values_fall_back() {
        for values in [&[][..], &[0.0, 0.0][..], &[f64::NAN][..]] {
            let y = derive_scale(values, 100.0, 1.2);
            assert_eq!(y.domain(), FALLBACK_DOMAIN);
            assert!(y.apply(0.5).is_finite());
        }
    }

    #[test]
    fn month_scale_spans_width() {
        let x = month_scale(600.0);
        assert_eq!(x.apply(1.0), 0.0);
        assert_eq!(x.apply(12.0), 600.0);
        assert_eq!(x.apply(6.5), 300.0);
    }

    #[test]
    fn ticks_use_round_steps() {
        let y = LinearScale::new((0.0, 228889.0296), (280.0, 0.0));
        let ticks = y.ticks(10);
        assert_eq!(ticks.first(), Some(&0.0));
        assert_eq!(ticks[1], 20000.0);
        assert_eq!(ticks.last(), Some(&220000.0));

        let unit = LinearScale::new((0.0, 1.0), (100.0, 0.0));
        assert_eq!(unit.ticks(5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn clamp_handles_inverted_range() {
        let y = LinearScale::new((0.0, 10.0), (200.0, 0.0));
        assert!(y.range_contains(50.0));
        assert!(!y.range_contains(-1.0));
        assert_eq!(y.clamp_to_range(-30.0), 0.0);
        assert_eq!(y.clamp_to_range(230.0), 200.0);
    }
}
