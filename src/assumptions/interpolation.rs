//! Year-indexed lookup with linear interpolation between known years
//!
//! Indicator datasets are sparse: a forecast may publish 2025, 2030, 2040 and
//! leave the years in between empty. Lookups clamp outside the published range
//! and interpolate linearly inside it.

use super::indicators::IndicatorSeries;

/// Index returned when a series cannot answer a lookup (+2.5%)
pub const DEFAULT_INDEX: f64 = 102.5;

/// Index value for `year`
///
/// - exact year → stored value
/// - before the first / after the last year → first / last value
/// - otherwise linear interpolation between the nearest known years
/// - empty series → [`DEFAULT_INDEX`]
pub fn index_for(year: i32, series: &IndicatorSeries) -> f64 {
    let points = series.points();

    if let Some(&value) = points.get(&year) {
        return value;
    }

    let (Some((&first_year, &first)), Some((&last_year, &last))) =
        (points.first_key_value(), points.last_key_value())
    else {
        log::trace!("Empty indicator series, using default index for {}", year);
        return DEFAULT_INDEX;
    };

    if year < first_year {
        return first;
    }
    if year > last_year {
        return last;
    }

    let lower = points.range(..year).next_back();
    let upper = points.range(year + 1..).next();

    match (lower, upper) {
        (Some((&lower_year, &lower_value)), Some((&upper_year, &upper_value))) => {
            let position = (year - lower_year) as f64 / (upper_year - lower_year) as f64;
            lower_value + (upper_value - lower_value) * position
        }
        _ => {
            log::debug!("No interpolation bracket for {}, using default index", year);
            DEFAULT_INDEX
        }
    }
}

/// Convert a 100-based index into a multiplicative growth factor (102.9 → 1.029)
pub fn growth_factor(index: f64) -> f64 {
    1.0 + (index - 100.0) / 100.0
}

/// Convert an annual rate (0.029) into a 100-based index (102.9)
pub fn rate_to_index(rate: f64) -> f64 {
    100.0 + rate * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn sample() -> IndicatorSeries {
        IndicatorSeries::from_points([(2020, 103.0), (2025, 105.0), (2035, 101.0)])
    }

    #[test]
    fn test_exact_and_clamped() {
        let series = sample();
        assert_eq!(index_for(2025, &series), 105.0);
        assert_eq!(index_for(1990, &series), 103.0);
        assert_eq!(index_for(2099, &series), 101.0);
    }

    #[test]
    fn test_linear_interpolation() {
        let series = sample();
        assert_relative_eq!(index_for(2022, &series), 103.8, epsilon = 1e-12);
        assert_relative_eq!(index_for(2030, &series), 103.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_series_defaults() {
        assert_eq!(index_for(2030, &IndicatorSeries::default()), DEFAULT_INDEX);
    }

    #[test]
    fn test_growth_factor() {
        assert_relative_eq!(growth_factor(102.9), 1.029, epsilon = 1e-12);
        assert_relative_eq!(growth_factor(rate_to_index(0.05)), 1.05, epsilon = 1e-12);
    }

    fn arb_series() -> impl Strategy<Value = Vec<(i32, f64)>> {
        prop::collection::btree_map(1990i32..2090, 90.0f64..115.0, 1..12)
            .prop_map(|m| m.into_iter().collect())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_exact_years_verbatim(points in arb_series()) {
            let series = IndicatorSeries::from_points(points.clone());
            for (year, value) in points {
                prop_assert_eq!(index_for(year, &series), value);
            }
        }

        #[test]
        fn prop_clamps_outside_range(points in arb_series(), offset in 1i32..50) {
            let series = IndicatorSeries::from_points(points.clone());
            let (first_year, first) = points[0];
            let (last_year, last) = points[points.len() - 1];
            prop_assert_eq!(index_for(first_year - offset, &series), first);
            prop_assert_eq!(index_for(last_year + offset, &series), last);
        }

        #[test]
        fn prop_interpolation_bounded_and_linear(points in arb_series()) {
            let series = IndicatorSeries::from_points(points.clone());
            for pair in points.windows(2) {
                let (y0, v0) = pair[0];
                let (y1, v1) = pair[1];
                let lo = v0.min(v1);
                let hi = v0.max(v1);
                let slope = (v1 - v0) / (y1 - y0) as f64;
                for year in (y0 + 1)..y1 {
                    let value = index_for(year, &series);
                    prop_assert!(value >= lo - 1e-9 && value <= hi + 1e-9);
                    let expected = v0 + slope * (year - y0) as f64;
                    prop_assert!((value - expected).abs() < 1e-9);
                }
            }
        }

        #[test]
        fn prop_deterministic(points in arb_series(), year in 1980i32..2100) {
            let series = IndicatorSeries::from_points(points);
            prop_assert_eq!(index_for(year, &series).to_bits(), index_for(year, &series).to_bits());
        }
    }
}
