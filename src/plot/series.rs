//! Chart data preparation.
//!
//! Everything here is pure so it can be tested without drawing anything.

use chrono::NaiveDate;

use crate::domain::RateRecord;

/// Label used in the ranking chart for rows without a credit type.
pub const UNLABELED: &str = "(no credit type)";

/// A record usable for charting: it has both a resolution date and a rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RatePoint {
    pub date: NaiveDate,
    pub rate: f64,
    pub label: Option<String>,
}

/// Rates of one credit type, in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRates {
    pub label: String,
    pub rates: Vec<f64>,
}

/// Drop records missing the resolution date or the rate.
pub fn chartable_points(records: &[RateRecord]) -> Vec<RatePoint> {
    records
        .iter()
        .filter_map(|r| {
            Some(RatePoint {
                date: r.fecha_resolucion?,
                rate: r.tasa_interes_ea?,
                label: r.tipo_credito_nombre.clone(),
            })
        })
        .collect()
}

/// `(date, rate)` pairs ordered by date. Same-day points keep table order.
pub fn history_series(points: &[RatePoint]) -> Vec<(NaiveDate, f64)> {
    let mut series: Vec<(NaiveDate, f64)> = points.iter().map(|p| (p.date, p.rate)).collect();
    series.sort_by_key(|(date, _)| *date);
    series
}

/// Group rates by credit type in first-appearance order. Unlabeled points are
/// left out.
pub fn rates_by_category(points: &[RatePoint]) -> Vec<CategoryRates> {
    let mut groups: Vec<CategoryRates> = Vec::new();
    for p in points {
        let Some(label) = p.label.as_deref() else { continue };
        match groups.iter_mut().find(|g| g.label == label) {
            Some(group) => group.rates.push(p.rate),
            None => groups.push(CategoryRates {
                label: label.to_string(),
                rates: vec![p.rate],
            }),
        }
    }
    groups
}

/// The `n` highest rates with their labels, highest first. Ties keep table
/// order.
pub fn top_rates(points: &[RatePoint], n: usize) -> Vec<(String, f64)> {
    let mut sorted: Vec<&RatePoint> = points.iter().collect();
    sorted.sort_by(|a, b| b.rate.partial_cmp(&a.rate).unwrap_or(std::cmp::Ordering::Equal));
    sorted
        .into_iter()
        .take(n)
        .map(|p| (p.label.clone().unwrap_or_else(|| UNLABELED.to_string()), p.rate))
        .collect()
}

/// `[min, max]` of `values` widened by 5% of the span (or ±1 for a flat set).
pub fn padded_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    let span = hi - lo;
    if span <= f64::EPSILON {
        return Some((lo - 1.0, hi + 1.0));
    }
    let pad = span * 0.05;
    Some((lo - pad, hi + pad))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: Option<(i32, u32, u32)>, rate: Option<f64>, label: Option<&str>) -> RateRecord {
        RateRecord {
            fecha_resolucion: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            tasa_interes_ea: rate,
            tipo_credito_nombre: label.map(str::to_string),
            ..RateRecord::default()
        }
    }

    fn points() -> Vec<RatePoint> {
        chartable_points(&[
            record(Some((2015, 3, 26)), Some(19.37), Some("Consumo")),
            record(Some((2014, 12, 22)), Some(19.21), Some("Consumo")),
            record(Some((2015, 3, 26)), Some(33.95), Some("Microcrédito")),
            record(Some((2015, 6, 30)), Some(19.26), None),
        ])
    }

    #[test]
    fn drops_rows_without_date_or_rate() {
        let kept = chartable_points(&[
            record(Some((2014, 12, 22)), Some(19.21), Some("Consumo")),
            record(None, Some(19.21), Some("Consumo")),
            record(Some((2014, 12, 22)), None, Some("Consumo")),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].rate, 19.21);
    }

    #[test]
    fn history_is_date_ordered() {
        let series = history_series(&points());
        let dates: Vec<String> = series.iter().map(|(d, _)| d.to_string()).collect();
        assert_eq!(dates, vec!["2014-12-22", "2015-03-26", "2015-03-26", "2015-06-30"]);
        // Stable for same-day points.
        assert_eq!(series[1].1, 19.37);
        assert_eq!(series[2].1, 33.95);
    }

    #[test]
    fn categories_in_first_appearance_order() {
        let groups = rates_by_category(&points());
        assert_eq!(
            groups,
            vec![
                CategoryRates {
                    label: "Consumo".into(),
                    rates: vec![19.37, 19.21],
                },
                CategoryRates {
                    label: "Microcrédito".into(),
                    rates: vec![33.95],
                },
            ]
        );
    }

    #[test]
    fn top_rates_highest_first_with_fallback_label() {
        let top = top_rates(&points(), 3);
        assert_eq!(
            top,
            vec![
                ("Microcrédito".to_string(), 33.95),
                ("Consumo".to_string(), 19.37),
                (UNLABELED.to_string(), 19.26),
            ]
        );
    }

    #[test]
    fn top_rates_with_fewer_points_than_requested() {
        assert_eq!(top_rates(&points(), 10).len(), 4);
        assert!(top_rates(&[], 5).is_empty());
    }

    #[test]
    fn padded_range_cases() {
        assert_eq!(padded_range(std::iter::empty()), None);
        assert_eq!(padded_range([5.0]), Some((4.0, 6.0)));
        let (lo, hi) = padded_range([10.0, 20.0]).unwrap();
        assert!((lo - 9.5).abs() < 1e-12 && (hi - 20.5).abs() < 1e-12);
    }
}
