//! Plain-text and JSON rendering of explorer state.

use crime_explorer::{CrimeExplorer, HoverCard, RegionFill, format_period};
use crime_explorer_models::{DetailKind, Period, SeriesSummary};
use serde::Serialize;

/// One region's line on the map listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRow {
    /// Region name.
    pub region: String,
    /// Total under the active filter, `None` if the region has no data.
    pub total: Option<u64>,
    /// Map fill.
    pub fill: RegionFill,
}

/// Map listing with its headline numbers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// Active category filter.
    pub category: String,
    /// Selected range label.
    pub range: Option<String>,
    /// Sum across all regions.
    pub total: u64,
    /// Smallest region total.
    pub min: u64,
    /// Largest region total.
    pub max: u64,
    /// Every known region, highest total first, regions without data last.
    pub regions: Vec<MapRow>,
}

/// Builds the map listing for the explorer's current state.
#[must_use]
pub fn map_view(explorer: &CrimeExplorer) -> MapView {
    let mut regions: Vec<MapRow> = explorer
        .available_regions()
        .iter()
        .map(|region| MapRow {
            region: region.clone(),
            total: explorer.aggregate(region).map(|a| a.total),
            fill: explorer.color_for(region),
        })
        .collect();
    regions.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.region.cmp(&b.region)));

    let scale = explorer.color_scale();
    MapView {
        category: explorer.category_filter().to_string(),
        range: explorer.period_range_label(),
        total: explorer.total_count(),
        min: scale.min,
        max: scale.max,
        regions,
    }
}

/// Prints the map listing as a table.
pub fn print_map(view: &MapView) {
    println!("Category:     {}", view.category);
    println!(
        "Time period:  {}",
        view.range.as_deref().unwrap_or("(no periods)")
    );
    println!("Total crimes: {}", view.total);
    println!("Scale:        {} – {}", view.min, view.max);
    println!();
    println!("{:<28} {:>10} {:>7}  FILL", "REGION", "TOTAL", "RATIO");
    println!("{}", "-".repeat(72));
    for row in &view.regions {
        let total = row
            .total
            .map_or_else(|| "no data".to_string(), |t| t.to_string());
        let ratio = row
            .fill
            .ratio()
            .map_or_else(|| "-".to_string(), |r| format!("{r:.3}"));
        println!(
            "{:<28} {:>10} {:>7}  {}",
            row.region,
            total,
            ratio,
            row.fill.color()
        );
    }
}

/// Pinned-panel content for one region.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDetail {
    /// Region name.
    pub region: String,
    /// Monthly counts, chronological.
    pub series: Vec<(Period, u64)>,
    /// Breakdown by category.
    pub by_category: Vec<(String, u64)>,
    /// Headline statistics.
    pub summary: SeriesSummary,
}

/// Builds the pinned-panel content for `region`, if it has data.
#[must_use]
pub fn region_detail(explorer: &CrimeExplorer, region: &str) -> Option<RegionDetail> {
    let aggregate = explorer.aggregate(region)?;
    let summary = explorer.series_summary(region)?;
    let mut by_category: Vec<(String, u64)> = aggregate
        .by_category
        .iter()
        .map(|(c, n)| (c.clone(), *n))
        .collect();
    by_category.sort_by(|a, b| b.1.cmp(&a.1));

    Some(RegionDetail {
        region: aggregate.name.clone(),
        series: aggregate
            .by_period
            .iter()
            .map(|(p, n)| (p.clone(), *n))
            .collect(),
        by_category,
        summary,
    })
}

/// Prints the pinned-panel content.
pub fn print_region(detail: &RegionDetail) {
    let summary = &detail.summary;
    println!("{}", detail.region);
    println!("Monthly crime breakdown · {} months", summary.periods);
    println!();
    println!("Total:      {}", summary.total);
    println!("Average:    {}", summary.average);
    if let Some(peak) = &summary.peak {
        println!(
            "Peak month: {} ({})",
            format_period(&peak.period),
            peak.count
        );
    }
    println!();

    let max = detail.series.iter().map(|(_, n)| *n).max().unwrap_or(0);
    for (period, count) in &detail.series {
        let marker = if summary.top_periods.contains(period) {
            '#'
        } else {
            '='
        };
        println!(
            "{:>9} {:>7} {}",
            format_period(period),
            count,
            bar(*count, max, marker)
        );
    }

    if !detail.by_category.is_empty() {
        println!();
        for (category, count) in &detail.by_category {
            println!("  {category:<32} {count:>7}");
        }
    }
}

/// Prints the detail view the current selection calls for.
pub fn print_detail_view(explorer: &CrimeExplorer) {
    if let Some(HoverCard::NoData(region)) = explorer.hover_card() {
        println!("{region}: no crime data available");
        return;
    }

    let target = explorer.detail_view_target();
    let Some(region) = target.region.as_deref() else {
        println!("(no detail view)");
        return;
    };

    match target.kind {
        DetailKind::Pinned => match region_detail(explorer, region) {
            Some(detail) => print_region(&detail),
            None => println!("{region} (pinned): no crime data available"),
        },
        DetailKind::Hover => {
            if let Some(HoverCard::Series(aggregate)) = explorer.hover_card() {
                println!("{} · {} total", aggregate.name, aggregate.total);
                let line: Vec<String> = aggregate
                    .by_period
                    .iter()
                    .map(|(p, n)| format!("{}: {n}", format_period(p)))
                    .collect();
                println!("  {}", line.join(", "));
            }
        }
        DetailKind::None => println!("(no detail view)"),
    }
}

/// Prints `value` as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn bar(value: u64, max: u64, marker: char) -> String {
    const WIDTH: f64 = 40.0;
    if max == 0 {
        return String::new();
    }
    let len = (value as f64 / max as f64 * WIDTH).round() as usize;
    std::iter::repeat_n(marker, len).collect()
}
