// src/products/statistics.rs

//! Burned-area statistics formatting.
//!
//! The provider returns raw per-class summed areas; this module turns them
//! into the final table with per-class ratios plus the burned/total rollup
//! rows.

use std::collections::BTreeMap;

use anyhow::{Result, bail};

use crate::provider::ClassArea;

/// Severity class labels, indexed by class number 0..=4.
pub const SEVERITY_LABELS: [&str; 5] = [
    "Unburned",
    "Low Severity",
    "Moderate Severity",
    "High Severity",
    "Very High Severity",
];

/// dNBR thresholds separating the five severity classes.
pub const DNBR_SEVERITY_THRESHOLDS: [f64; 4] = [0.10, 0.27, 0.44, 0.66];

/// Label of the rollup row summing all classes above Unburned.
pub const TOTAL_BURNED_LABEL: &str = "Total Burned Area";
/// Label of the rollup row covering the whole region.
pub const TOTAL_LABEL: &str = "Total Area";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassBreakdown {
    pub area_ha: f64,
    pub ratio_percent: f64,
}

/// Final statistics table: one row per severity label, plus the two rollup
/// rows. Keyed by label for direct presentation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AreaStatistics {
    pub rows: BTreeMap<String, ClassBreakdown>,
}

impl AreaStatistics {
    pub fn total_area_ha(&self) -> f64 {
        self.rows.get(TOTAL_LABEL).map(|r| r.area_ha).unwrap_or(0.0)
    }

    pub fn burned_area_ha(&self) -> f64 {
        self.rows
            .get(TOTAL_BURNED_LABEL)
            .map(|r| r.area_ha)
            .unwrap_or(0.0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert raw grouped areas into the presentation table.
///
/// Class numbers must be in 0..=4; anything else means the classification
/// upstream produced a class we have no label for, which is a bug worth
/// failing on rather than inventing a label.
pub fn format_area_statistics(raw: &[ClassArea]) -> Result<AreaStatistics> {
    let total_area: f64 = raw.iter().map(|c| c.area_ha).sum();
    let burned_area: f64 = raw
        .iter()
        .filter(|c| c.class > 0)
        .map(|c| c.area_ha)
        .sum();

    let ratio = |area: f64| {
        if total_area > 0.0 {
            round2(area / total_area * 100.0)
        } else {
            0.0
        }
    };

    let mut rows = BTreeMap::new();
    for entry in raw {
        let Some(label) = SEVERITY_LABELS.get(entry.class as usize) else {
            bail!("unknown severity class {} in area statistics", entry.class);
        };
        rows.insert(
            (*label).to_string(),
            ClassBreakdown {
                area_ha: round2(entry.area_ha),
                ratio_percent: ratio(entry.area_ha),
            },
        );
    }

    rows.insert(
        TOTAL_BURNED_LABEL.to_string(),
        ClassBreakdown {
            area_ha: round2(burned_area),
            ratio_percent: ratio(burned_area),
        },
    );
    rows.insert(
        TOTAL_LABEL.to_string(),
        ClassBreakdown {
            area_ha: round2(total_area),
            ratio_percent: if total_area > 0.0 { 100.0 } else { 0.0 },
        },
    );

    Ok(AreaStatistics { rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(class: u8, area_ha: f64) -> ClassArea {
        ClassArea { class, area_ha }
    }

    #[test]
    fn formats_classes_with_ratios_and_rollups() {
        let stats = format_area_statistics(&[
            area(0, 600.0),
            area(1, 200.0),
            area(3, 150.0),
            area(4, 50.0),
        ])
        .unwrap();

        assert_eq!(stats.total_area_ha(), 1000.0);
        assert_eq!(stats.burned_area_ha(), 400.0);

        let low = &stats.rows["Low Severity"];
        assert_eq!(low.area_ha, 200.0);
        assert_eq!(low.ratio_percent, 20.0);

        let burned = &stats.rows[TOTAL_BURNED_LABEL];
        assert_eq!(burned.ratio_percent, 40.0);
        assert_eq!(stats.rows[TOTAL_LABEL].ratio_percent, 100.0);
    }

    #[test]
    fn ratios_are_rounded_to_two_decimals() {
        let stats = format_area_statistics(&[area(0, 1.0), area(2, 2.0)]).unwrap();
        assert_eq!(stats.rows["Moderate Severity"].ratio_percent, 66.67);
    }

    #[test]
    fn empty_input_yields_zero_rollups() {
        let stats = format_area_statistics(&[]).unwrap();
        assert_eq!(stats.total_area_ha(), 0.0);
        assert_eq!(stats.rows[TOTAL_LABEL].ratio_percent, 0.0);
    }

    #[test]
    fn unknown_class_is_rejected() {
        let err = format_area_statistics(&[area(9, 1.0)]).unwrap_err();
        assert!(err.to_string().contains("unknown severity class 9"));
    }
}
