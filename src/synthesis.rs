//! Seeded generation of the synthetic engagement table.
use crate::HeatmapError;
use polars::prelude::*;
use rand::prelude::*;
use std::ops::Range;

/// Number of rows in the synthetic table.
pub const N_ROWS: usize = 100;

pub const WEBSITE_VISITS: &str = "Website Visits";
pub const TIME_ON_SITE: &str = "Time on Site (min)";
pub const PURCHASES: &str = "Purchases";
pub const EMAILS_OPENED: &str = "Emails Opened";
pub const SUPPORT_TICKETS: &str = "Support Tickets";
pub const SOCIAL_MEDIA_LIKES: &str = "Social Media Likes";

/// A column of the table and the half-open range its raw values are drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub range: Range<i64>,
}

/// Columns in declaration order. The random stream is consumed in this order,
/// all rows of one column before the next.
pub const ENGAGEMENT_COLUMNS: [ColumnSpec; 6] = [
    ColumnSpec { name: WEBSITE_VISITS, range: 100..1000 },
    ColumnSpec { name: TIME_ON_SITE, range: 5..60 },
    ColumnSpec { name: PURCHASES, range: 0..15 },
    ColumnSpec { name: EMAILS_OPENED, range: 1..20 },
    ColumnSpec { name: SUPPORT_TICKETS, range: 0..5 },
    ColumnSpec { name: SOCIAL_MEDIA_LIKES, range: 10..500 },
];

/// Generates the 100 x 6 engagement table for `seed`.
///
/// After the uniform draws, two columns are rewritten to correlate with
/// others:
///
/// * `Time on Site (min) += Website Visits / 20`
/// * `Purchases += Time on Site (min) / 10`, using the adjusted time column
///
/// Both divisions are integer floor divisions on non-negative values.
pub fn generate_engagement_table(seed: u64) -> Result<DataFrame, HeatmapError> {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut columns: Vec<Vec<i64>> = ENGAGEMENT_COLUMNS
        .iter()
        .map(|spec| {
            (0..N_ROWS)
                .map(|_| rng.gen_range(spec.range.clone()))
                .collect()
        })
        .collect();

    // Indices follow ENGAGEMENT_COLUMNS.
    let visits = columns[0].clone();
    for (time, v) in columns[1].iter_mut().zip(&visits) {
        *time += v.div_euclid(20);
    }
    let time_on_site = columns[1].clone();
    for (purchases, t) in columns[2].iter_mut().zip(&time_on_site) {
        *purchases += t.div_euclid(10);
    }

    let series: Vec<Series> = ENGAGEMENT_COLUMNS
        .iter()
        .zip(columns)
        .map(|(spec, values)| Series::new(spec.name, values))
        .collect();
    Ok(DataFrame::new(series)?)
}
