//! Three page PDF report: image, facts and tables, charts.
//!
//! Every report has exactly [`REPORT_PAGE_COUNT`] pages. Sections without data
//! leave their page (or part of it) blank instead of shifting later pages.

use crate::config::Settings;
use crate::graph::{PriceTrend, RegionComparison};
use crate::{AptError, Listing, ListingDetail, Result};
use image::{DynamicImage, GenericImageView};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rgb,
};
use rand::Rng;
use reqwest::Client;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const REPORT_PAGE_COUNT: usize = 3;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const IMAGE_X: f32 = 15.0;
const IMAGE_WIDTH: f32 = 180.0;
const IMAGE_DPI: f32 = 300.0;
const LINE_HEIGHT: f32 = 10.0;
const TEXT_LEFT: f32 = 10.0;
const TEXT_TOP: f32 = 280.0;
const TEXT_BOTTOM: f32 = 15.0;
const PT_PER_MM: f32 = 72.0 / 25.4;

const SERIES_COLORS: &[(f32, f32, f32)] = &[
    (0.15, 0.39, 0.92),
    (0.86, 0.15, 0.15),
    (0.09, 0.64, 0.29),
    (0.58, 0.20, 0.92),
    (0.92, 0.35, 0.05),
];

/// Data for one report. The image must already be downloaded.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub listing: &'a Listing,
    pub detail: &'a ListingDetail,
    pub image: Option<&'a DynamicImage>,
}

pub struct Report {
    doc: PdfDocumentReference,
    pages: Vec<PdfLayerReference>,
    hangul_font: bool,
}

impl Report {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// False when no font from the search list was found and Hangul text
    /// will not render.
    pub fn has_hangul_font(&self) -> bool {
        self.hangul_font
    }

    pub fn save(self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.doc
            .save(&mut writer)
            .map_err(|e| AptError::Pdf(e.to_string()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    font_path: Option<PathBuf>,
}

impl ReportBuilder {
    pub fn new(font_path: Option<PathBuf>) -> Self {
        Self { font_path }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.find_font())
    }

    /// `apt_detail_<8 hex>.pdf`
    pub fn file_name() -> String {
        format!("apt_detail_{:08x}.pdf", rand::thread_rng().gen::<u32>())
    }

    pub fn render(&self, input: &ReportInput<'_>) -> Result<Report> {
        let (doc, page1, layer1) =
            PdfDocument::new(&input.listing.name, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Image");
        let (font, hangul_font) = self.load_font(&doc)?;

        let image_page = doc.get_page(page1).get_layer(layer1);
        let (page2, layer2) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Details");
        let text_page = doc.get_page(page2).get_layer(layer2);
        let (page3, layer3) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Charts");
        let chart_page = doc.get_page(page3).get_layer(layer3);

        draw_image_page(&image_page, input.image);
        draw_text_page(&text_page, &font, input.listing, input.detail);
        draw_trend_chart(&chart_page, &font, &PriceTrend::from_transactions(&input.detail.transactions));
        draw_region_chart(&chart_page, &font, &RegionComparison::from_region_prices(&input.detail.region_prices));

        Ok(Report {
            doc,
            pages: vec![image_page, text_page, chart_page],
            hangul_font,
        })
    }

    /// Render and write the report into `output_dir`, returning its path.
    pub fn export(&self, input: &ReportInput<'_>, output_dir: &Path) -> Result<PathBuf> {
        let report = self.render(input)?;
        let path = output_dir.join(Self::file_name());
        report.save(&path)?;
        info!("Saved report to {}", path.display());
        Ok(path)
    }

    fn load_font(&self, doc: &PdfDocumentReference) -> Result<(IndirectFontRef, bool)> {
        if let Some(path) = &self.font_path {
            match File::open(path)
                .map_err(AptError::from)
                .and_then(|f| doc.add_external_font(f).map_err(|e| AptError::Pdf(e.to_string())))
            {
                Ok(font) => {
                    debug!("Using report font {}", path.display());
                    return Ok((font, true));
                }
                Err(e) => warn!("Could not load font {}: {}", path.display(), e),
            }
        } else {
            warn!("No Hangul font found; Korean text in the report will not render");
        }

        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AptError::Pdf(e.to_string()))?;
        Ok((font, false))
    }
}

/// Download an image for the report.
pub async fn fetch_image(client: &Client, url: &str) -> Result<DynamicImage> {
    info!("Fetching image {}", url);
    let bytes = client.get(url).send().await?.bytes().await?;
    Ok(image::load_from_memory(&bytes)?)
}

/// Placement of an image scaled to the report width, in millimetres from
/// the top edge: `(top, height)`.
pub fn image_placement(width_px: u32, height_px: u32) -> (f32, f32) {
    let height = height_px as f32 * (IMAGE_WIDTH / width_px.max(1) as f32);
    let top = if height < PAGE_HEIGHT {
        (PAGE_HEIGHT - height) / 2.0
    } else {
        10.0
    };
    (top, height)
}

fn draw_image_page(layer: &PdfLayerReference, image: Option<&DynamicImage>) {
    let Some(image) = image else {
        return;
    };
    let (width_px, height_px) = image.dimensions();
    let (top, height) = image_placement(width_px, height_px);

    let natural_width_mm = width_px.max(1) as f32 / IMAGE_DPI * 25.4;
    let scale = IMAGE_WIDTH / natural_width_mm;

    Image::from_dynamic_image(image).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(IMAGE_X)),
            translate_y: Some(Mm(PAGE_HEIGHT - top - height)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        },
    );
}

/// Lines written on the facts page, before any truncation.
pub fn text_page_lines(listing: &Listing, detail: &ListingDetail) -> Vec<(f32, String)> {
    let value = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
    let mut lines = vec![
        (14.0, format!("Complex: {}", listing.name)),
        (14.0, format!("Address: {}", value(&detail.address))),
        (14.0, format!("Per pyeong: {}", value(&detail.price_per_area))),
        (14.0, format!("1-month avg: {}", value(&detail.monthly_average_price))),
        (12.0, String::new()),
        (12.0, "Region prices".to_string()),
    ];
    lines.extend(
        detail
            .region_prices
            .iter()
            .map(|(region, price)| (12.0, format!("{}: {}", region, price))),
    );
    lines.push((12.0, String::new()));
    lines.push((12.0, "Transaction history".to_string()));
    lines.extend(detail.transactions.iter().map(|t| {
        (12.0, format!("{} | {} | {}", t.contract_date, t.area, t.price))
    }));
    lines
}

/// Cut `lines` to fit `capacity` rows. When something is left out the last
/// row becomes a `... N more lines` marker.
pub fn fit_text_lines(mut lines: Vec<(f32, String)>, capacity: usize) -> Vec<(f32, String)> {
    if lines.len() <= capacity || capacity == 0 {
        lines.truncate(capacity);
        return lines;
    }
    let hidden = lines.len() - (capacity - 1);
    lines.truncate(capacity - 1);
    lines.push((12.0, format!("... {} more lines", hidden)));
    warn!("Report text page truncated, {} lines left out", hidden);
    lines
}

fn text_page_capacity() -> usize {
    ((TEXT_TOP - TEXT_BOTTOM) / LINE_HEIGHT) as usize + 1
}

fn draw_text_page(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    listing: &Listing,
    detail: &ListingDetail,
) {
    let lines = fit_text_lines(text_page_lines(listing, detail), text_page_capacity());

    let mut y = TEXT_TOP;
    for (size, text) in &lines {
        if !text.is_empty() {
            layer.use_text(text.clone(), *size, Mm(TEXT_LEFT), Mm(y), font);
        }
        y -= LINE_HEIGHT;
    }
}

fn polyline(layer: &PdfLayerReference, points: &[(f32, f32)]) {
    let line = Line {
        points: points
            .iter()
            .map(|(x, y)| (Point::new(Mm(*x), Mm(*y)), false))
            .collect(),
        is_closed: false,
    };
    layer.add_line(line);
}

fn set_stroke(layer: &PdfLayerReference, (r, g, b): (f32, f32, f32), thickness_pt: f32) {
    layer.set_outline_color(Color::Rgb(Rgb::new(r, g, b, None)));
    layer.set_outline_thickness(thickness_pt);
}

/// Chart box in page coordinates (origin bottom left).
struct ChartArea {
    left: f32,
    bottom: f32,
    width: f32,
    height: f32,
}

impl ChartArea {
    fn draw_axes(&self, layer: &PdfLayerReference) {
        set_stroke(layer, (0.2, 0.2, 0.2), 0.8);
        polyline(
            layer,
            &[
                (self.left, self.bottom + self.height),
                (self.left, self.bottom),
                (self.left + self.width, self.bottom),
            ],
        );
    }
}

fn draw_trend_chart(layer: &PdfLayerReference, font: &IndirectFontRef, trend: &PriceTrend) {
    let (Some((lo, hi)), Some((first, last))) = (trend.price_range(), trend.date_range()) else {
        return;
    };
    // 20 mm from the top, 180 mm wide
    let area = ChartArea {
        left: 20.0,
        bottom: PAGE_HEIGHT - 20.0 - 100.0,
        width: 170.0,
        height: 90.0,
    };

    layer.use_text("Price trend by area (10k KRW)", 12.0, Mm(area.left), Mm(area.bottom + area.height + 4.0), font);
    area.draw_axes(layer);

    let span_days = (last - first).num_days().max(1) as f32;
    let span_price = (hi - lo).max(1) as f32;

    layer.use_text(hi.to_string(), 8.0, Mm(area.left), Mm(area.bottom + area.height + 0.5), font);
    layer.use_text(lo.to_string(), 8.0, Mm(area.left + 1.0), Mm(area.bottom + 1.0), font);
    layer.use_text(first.format("%Y.%m.%d").to_string(), 8.0, Mm(area.left), Mm(area.bottom - 5.0), font);
    layer.use_text(last.format("%Y.%m.%d").to_string(), 8.0, Mm(area.left + area.width - 16.0), Mm(area.bottom - 5.0), font);

    for (i, (label, points)) in trend.series.iter().enumerate() {
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        let coords: Vec<(f32, f32)> = points
            .iter()
            .map(|p| {
                let x = area.left + (p.date - first).num_days() as f32 / span_days * area.width;
                let y = area.bottom + (p.price - lo) as f32 / span_price * area.height;
                (x, y)
            })
            .collect();

        set_stroke(layer, color, 1.2);
        if coords.len() > 1 {
            polyline(layer, &coords);
        }
        // point markers
        for (x, y) in &coords {
            polyline(layer, &[(x - 0.8, *y), (x + 0.8, *y)]);
            polyline(layer, &[(*x, y - 0.8), (*x, y + 0.8)]);
        }

        let legend_y = area.bottom + area.height - 5.0 * (i as f32 + 1.0);
        polyline(layer, &[(area.left + area.width - 30.0, legend_y + 1.0), (area.left + area.width - 24.0, legend_y + 1.0)]);
        layer.use_text(format!("{} m2", label), 8.0, Mm(area.left + area.width - 22.0), Mm(legend_y), font);
    }
}

fn draw_region_chart(layer: &PdfLayerReference, font: &IndirectFontRef, comparison: &RegionComparison) {
    if comparison.is_empty() {
        return;
    }
    // 150 mm from the top
    let area = ChartArea {
        left: 20.0,
        bottom: PAGE_HEIGHT - 150.0 - 110.0,
        width: 170.0,
        height: 100.0,
    };

    layer.use_text("Region price per pyeong (10k KRW)", 12.0, Mm(area.left), Mm(area.bottom + area.height + 4.0), font);
    area.draw_axes(layer);

    let max = comparison.max().max(1) as f32;
    let slot = area.width / comparison.bars.len() as f32;
    let bar_width = slot * 0.6;

    for (i, bar) in comparison.bars.iter().enumerate() {
        let x = area.left + slot * (i as f32 + 0.5);
        let height = bar.man_won.max(0) as f32 / max * (area.height - 10.0);

        // a stroke as wide as the bar
        set_stroke(layer, SERIES_COLORS[0], bar_width * PT_PER_MM);
        polyline(layer, &[(x, area.bottom), (x, area.bottom + height)]);

        layer.use_text(bar.man_won.to_string(), 8.0, Mm(x - bar_width / 2.0), Mm(area.bottom + height + 1.5), font);
        layer.use_text(bar.region.clone(), 8.0, Mm(x - bar_width / 2.0), Mm(area.bottom - 5.0), font);
    }
}
