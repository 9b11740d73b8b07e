use aptscope_core::{
    price_to_num, Coordinates, DashboardView, Geocoder, Listing, PriceTrend, Result,
    TransactionRecord,
};
use aptscope_scrapers::hogangnono::{parse_detail, parse_search_results};
use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use std::time::Duration;
use tokio::runtime::Runtime;

struct StaticGeocoder;

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Option<Coordinates>> {
        Ok(Some(Coordinates {
            lat: 37.5079,
            lng: 126.9967,
        }))
    }
}

fn random_price(rng: &mut impl Rng) -> String {
    let eok = rng.gen_range(3..60);
    match rng.gen_range(0..3) {
        0 => format!("{}억", eok),
        _ => format!("{}억 {},{:03}", eok, rng.gen_range(1..10), rng.gen_range(0..1000)),
    }
}

fn generate_transactions(count: usize) -> Vec<TransactionRecord> {
    let mut rng = rand::thread_rng();
    let areas = ["59", "84", "114", "135"];
    (0..count)
        .map(|_| {
            TransactionRecord::new(
                format!(
                    "{:02}.{:02}.{:02}",
                    rng.gen_range(15..25),
                    rng.gen_range(1..13),
                    rng.gen_range(1..29)
                ),
                areas[rng.gen_range(0..areas.len())],
                random_price(&mut rng),
            )
        })
        .collect()
}

fn search_page(rows: usize) -> String {
    let mut html = String::from("<html><body><ul>");
    for i in 0..rows {
        html.push_str(&format!(
            r#"<li class="apt"><a href="/apt/{i:05x}">
                 <div class="label-container"><span class="label">단지 {i}</span></div>
                 <div class="desc"><span class="household">{}세대</span><span class="startDate">2010.03</span></div>
               </a></li>"#,
            100 + i
        ));
    }
    html.push_str("</ul></body></html>");
    html
}

fn detail_page(deals: &[TransactionRecord]) -> String {
    let mut html = String::from(
        r#"<html><body>
          <div class="text-sm font-semibold text-foreground">서울 서초구 반포동 20-43</div>
          <div class="price">38억 5,000</div>
          <div class="css-yd0hrq e8116ri5">
            <div class="css-yhe5ws e8116ri4">
              <div class="css-6cu8g1 e8116ri3"><span class="css-170k1nq ei9pga10">11,250만원</span></div>
              <div class="css-6cu8g1 e8116ri3"><span class="css-170k1nq ei9pga10">9,870만원</span></div>
            </div>
            <div class="css-yhe5ws e8116ri4">
              <span class="css-1ldqlku ei9pga10">이 아파트</span>
              <span class="css-1ldqlku ei9pga10">반포동</span>
            </div>
          </div>
          <table class="css-15gqjnx e1ea9ovl5"><tbody>"#,
    );
    for deal in deals {
        html.push_str(&format!(
            r#"<tr><td>{}</td><td>{}</td><td><span class="css-158icaa ebmi0c75">{}</span></td></tr>"#,
            deal.contract_date, deal.area, deal.price
        ));
    }
    html.push_str("</tbody></table></body></html>");
    html
}

fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");

    for size in [10, 100, 1000].iter() {
        let page = search_page(*size);
        group.bench_with_input(BenchmarkId::new("search_results", size), &page, |b, page| {
            b.iter(|| black_box(parse_search_results(page).unwrap()));
        });

        let page = detail_page(&generate_transactions(*size));
        group.bench_with_input(BenchmarkId::new("detail", size), &page, |b, page| {
            b.iter(|| black_box(parse_detail(page)));
        });
    }

    group.finish();
}

fn bench_prices(c: &mut Criterion) {
    let mut group = c.benchmark_group("prices");
    let deals = generate_transactions(1000);

    group.bench_function("price_to_num", |b| {
        b.iter(|| {
            for deal in &deals {
                black_box(price_to_num(&deal.price));
            }
        });
    });

    group.bench_function("trend", |b| {
        b.iter(|| black_box(PriceTrend::from_transactions(&deals).to_ascii_graph(40, 5)));
    });

    group.finish();
}

fn bench_concurrent_views(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("concurrent");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));

    for size in [10, 100].iter() {
        let detail = parse_detail(&detail_page(&generate_transactions(200)));
        group.bench_with_input(BenchmarkId::new("build_views", size), size, |b, &size| {
            b.to_async(&rt).iter(|| async {
                let views: Vec<_> = (0..size)
                    .map(|i| {
                        let listing = Listing {
                            name: format!("단지 {}", i),
                            ..Listing::default()
                        };
                        DashboardView::build(listing, detail.clone(), &StaticGeocoder, "js-key")
                    })
                    .collect();
                black_box(futures::future::join_all(views).await);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extraction, bench_prices, bench_concurrent_views);

criterion_main!(benches);
