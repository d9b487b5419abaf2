//! The single shared hover tooltip.

use crate::charts::format::month_name;
use crate::charts::MarkerDatum;
use kurbo::{Point, Vec2};

/// Tooltip offset from the pointer.
const POINTER_OFFSET: Vec2 = Vec2::new(12.0, -28.0);

/// One tooltip, updated in place on every hover.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tooltip {
    visible: bool,
    text: String,
    position: Point,
}

impl Tooltip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, datum: &MarkerDatum, pointer: Point) {
        self.text = describe(datum);
        self.position = pointer + POINTER_OFFSET;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

/// "March 2022" on the first line, "Deaths: 80424.85" on the second; the value is exact.
pub fn describe(datum: &MarkerDatum) -> String {
    let month = month_name(datum.month)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Month {}", datum.month));
    format!(
        "{} {}\n{}: {}",
        month,
        datum.year,
        datum.metric.label(),
        datum.value
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Metric;

    fn datum(month: u32, value: f64) -> MarkerDatum {
        MarkerDatum {
            metric: Metric::Deaths,
            year: 2021,
            month,
            value,
        }
    }

    #[test]
    fn describe_uses_month_name_and_exact_value() {
        assert_eq!(
            describe(&datum(1, 190740.85799999986)),
            "January 2021\nDeaths: 190740.85799999986"
        );
    }

    #[test]
    fn show_replaces_previous_content() {
        let mut tooltip = Tooltip::new();
        assert!(!tooltip.is_visible());

        tooltip.show(&datum(1, 1.0), Point::new(100.0, 100.0));
        tooltip.show(&datum(5, 2.5), Point::new(200.0, 50.0));
        assert!(tooltip.is_visible());
        assert_eq!(tooltip.text(), "May 2021\nDeaths: 2.5");
        assert_eq!(tooltip.position(), Point::new(212.0, 22.0));

        tooltip.hide();
        assert!(!tooltip.is_visible());
    }
}
