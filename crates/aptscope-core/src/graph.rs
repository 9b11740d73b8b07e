use crate::price::{parse_contract_date, price_to_num, region_price_man_won};
use crate::{RegionPrices, TransactionRecord};
use chrono::NaiveDate;
use rasciigraph::{plot, Config};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    /// Price in 만원 as produced by `price_to_num`.
    pub price: u64,
}

/// Transaction prices over time, one series per floor area.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceTrend {
    pub series: BTreeMap<String, Vec<PricePoint>>,
}

impl PriceTrend {
    pub fn from_transactions(transactions: &[TransactionRecord]) -> Self {
        let mut series: BTreeMap<String, Vec<PricePoint>> = BTreeMap::new();

        for record in transactions {
            let date = parse_contract_date(&record.contract_date);
            let price = price_to_num(&record.price);
            match (date, price) {
                (Some(date), Some(price)) => series
                    .entry(record.area.clone())
                    .or_default()
                    .push(PricePoint { date, price }),
                _ => debug!(
                    "Leaving {} / {} out of the trend chart",
                    record.contract_date, record.price
                ),
            }
        }

        for points in series.values_mut() {
            points.sort_by_key(|p| p.date);
        }

        Self { series }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn price_range(&self) -> Option<(u64, u64)> {
        let mut prices = self.series.values().flatten().map(|p| p.price);
        let first = prices.next()?;
        Some(prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.series.values().flatten().map(|p| p.date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    /// One ASCII graph per area, each headed by its area label.
    pub fn to_ascii_graph(&self, width: usize, height: usize) -> String {
        if self.series.is_empty() {
            return "No trend data".to_string();
        }

        let mut out = Vec::new();
        for (area, points) in &self.series {
            let mut prices: Vec<f64> = points.iter().map(|p| p.price as f64).collect();
            if prices.len() == 1 {
                prices.push(prices[0]);
            }

            let config = Config::default()
                .with_width(width as u32)
                .with_height(height as u32);

            out.push(format!("{}㎡ ({} deals)", area, points.len()));
            out.push(plot(prices, config));
        }
        out.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionBar {
    pub region: String,
    pub man_won: i64,
}

/// Region price-per-pyeong comparison, ready for a bar chart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionComparison {
    pub bars: Vec<RegionBar>,
}

impl RegionComparison {
    pub fn from_region_prices(prices: &RegionPrices) -> Self {
        let bars = prices
            .iter()
            .filter(|(_, text)| text.contains("만원") && !text.trim().is_empty())
            .filter_map(|(region, text)| match region_price_man_won(text) {
                Some(man_won) => Some(RegionBar {
                    region: region.to_string(),
                    man_won,
                }),
                None => {
                    warn!("Skipping unreadable region price for {}: {}", region, text);
                    None
                }
            })
            .collect();

        Self { bars }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn max(&self) -> i64 {
        self.bars.iter().map(|b| b.man_won).max().unwrap_or(0)
    }

    pub fn to_ascii_bars(&self, width: usize) -> String {
        if self.bars.is_empty() {
            return "No region price data".to_string();
        }

        let label_width = self
            .bars
            .iter()
            .map(|b| b.region.chars().count())
            .max()
            .unwrap_or(0);
        let max = self.max().max(1);

        self.bars
            .iter()
            .map(|bar| {
                let len = ((bar.man_won.max(0) as f64 / max as f64) * width as f64).round() as usize;
                let pad = label_width - bar.region.chars().count();
                format!(
                    "{}{} │{} {}만원",
                    bar.region,
                    " ".repeat(pad),
                    "█".repeat(len),
                    bar.man_won
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
