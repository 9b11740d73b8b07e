use crate::display::SummaryTableRow;
use crate::graph::{PriceTrend, RegionComparison};
use crate::view::{DashboardView, MapSection, Section};
use maud::{html, Markup, PreEscaped, DOCTYPE};

const CHART_WIDTH: f64 = 640.0;
const CHART_HEIGHT: f64 = 320.0;
const CHART_PAD: f64 = 40.0;
const LEGEND_SPACING: f64 = 90.0;
const SERIES_COLORS: &[&str] = &["#2563eb", "#dc2626", "#16a34a", "#9333ea", "#ea580c", "#0891b2"];

/// Standalone HTML page with every dashboard section.
pub fn render_dashboard_html(view: &DashboardView) -> String {
    html! {
        (DOCTYPE)
        html lang="ko" {
            head {
                meta charset="utf-8";
                title { (view.listing.name) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                h1 { (view.listing.name) }
                @for part in view.sections() {
                    section {
                        h2 { (part.title()) }
                        (render_section(view, *part))
                    }
                }
            }
        }
    }
    .into_string()
}

const STYLE: &str = "body{font-family:'Malgun Gothic','NanumGothic',sans-serif;margin:2rem;}\
table{border-collapse:collapse;}td,th{border:1px solid #ddd;padding:4px 8px;}\
.placeholder{color:#888;}.warning{color:#b45309;}";

fn placeholder(text: &str) -> Markup {
    html! { p class="placeholder" { (text) } }
}

fn render_section(view: &DashboardView, section: Section) -> Markup {
    match section {
        Section::Summary => summary(view),
        Section::Transactions => {
            if view.detail.transactions.is_empty() {
                placeholder("No transactions")
            } else {
                html! {
                    table {
                        thead { tr { th { "Contract date" } th { "Area (㎡)" } th { "Price" } } }
                        tbody {
                            @for record in &view.detail.transactions {
                                tr { td { (record.contract_date) } td { (record.area) } td { (record.price) } }
                            }
                        }
                    }
                }
            }
        }
        Section::PriceTrend => trend_chart(&view.trend),
        Section::RegionComparison => region_chart(&view.comparison),
        Section::Image => match &view.detail.image_url {
            Some(url) => html! { img src=(url) alt="Complex image" style="max-width:100%;"; },
            None => placeholder("No image"),
        },
        Section::Map => match &view.map {
            MapSection::NoAddress => placeholder("No address"),
            MapSection::Located { embed, .. } => html! { (PreEscaped(embed.html.clone())) },
            other => html! { p class="warning" { (other.warning().unwrap_or_default()) } },
        },
    }
}

fn summary(view: &DashboardView) -> Markup {
    let row = SummaryTableRow::from_detail(&view.listing, &view.detail);
    html! {
        table {
            tr { th { "Complex" } td { (row.name) } }
            tr { th { "Address" } td { (row.address) } }
            tr { th { "Per pyeong" } td { (row.price_per_area) } }
            tr { th { "1-month avg" } td { (row.monthly_average_price) } }
            tr { th { "Region prices" } td { (row.region_prices) } }
        }
    }
}

fn trend_chart(trend: &PriceTrend) -> Markup {
    let (Some((lo, hi)), Some((first, last))) = (trend.price_range(), trend.date_range()) else {
        return placeholder("No trend data");
    };
    let span_days = (last - first).num_days().max(1) as f64;
    let span_price = (hi - lo).max(1) as f64;
    let plot_w = CHART_WIDTH - 2.0 * CHART_PAD;
    let plot_h = CHART_HEIGHT - 2.0 * CHART_PAD;

    let lines: Vec<(String, Vec<(f64, f64)>, &str)> = trend
        .series
        .iter()
        .enumerate()
        .map(|(i, (area, points))| {
            let coords = points
                .iter()
                .map(|p| {
                    let x = CHART_PAD + (p.date - first).num_days() as f64 / span_days * plot_w;
                    let y = CHART_HEIGHT - CHART_PAD - (p.price - lo) as f64 / span_price * plot_h;
                    (x, y)
                })
                .collect();
            (format!("{}㎡", area), coords, SERIES_COLORS[i % SERIES_COLORS.len()])
        })
        .collect();

    html! {
        svg xmlns="http://www.w3.org/2000/svg" width=(CHART_WIDTH) height=(CHART_HEIGHT) {
            line x1=(CHART_PAD) y1=(CHART_HEIGHT - CHART_PAD) x2=(CHART_WIDTH - CHART_PAD) y2=(CHART_HEIGHT - CHART_PAD) stroke="#333" {}
            line x1=(CHART_PAD) y1=(CHART_PAD) x2=(CHART_PAD) y2=(CHART_HEIGHT - CHART_PAD) stroke="#333" {}
            text x=(CHART_PAD) y=(CHART_HEIGHT - 10.0) font-size="11" { (first.format("%Y.%m.%d").to_string()) }
            text x=(CHART_WIDTH - CHART_PAD) y=(CHART_HEIGHT - 10.0) font-size="11" text-anchor="end" { (last.format("%Y.%m.%d").to_string()) }
            text x="4" y=(CHART_PAD - 8.0) font-size="11" { (hi) "만원" }
            text x="4" y=(CHART_HEIGHT - CHART_PAD) font-size="11" { (lo) }
            @for (i, (label, coords, color)) in lines.iter().enumerate() {
                polyline points=(polyline_points(coords)) fill="none" stroke=(color) stroke-width="2" {}
                @for (x, y) in coords {
                    circle cx=(format!("{:.1}", x)) cy=(format!("{:.1}", y)) r="3" fill=(color) {}
                }
                // legend runs along the top, clear of the plot
                text x=(CHART_PAD + LEGEND_SPACING * i as f64) y="14" font-size="11" fill=(color) { (label) }
            }
        }
    }
}

fn polyline_points(coords: &[(f64, f64)]) -> String {
    coords
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn region_chart(comparison: &RegionComparison) -> Markup {
    if comparison.is_empty() {
        return placeholder("No region price data");
    }
    let max = comparison.max().max(1) as f64;
    html! {
        table {
            @for bar in &comparison.bars {
                tr {
                    th { (bar.region) }
                    td {
                        div style=(format!("background:#2563eb;height:14px;width:{:.0}px;", bar.man_won.max(0) as f64 / max * 400.0)) {}
                    }
                    td { (bar.man_won) "만원" }
                }
            }
        }
    }
}
