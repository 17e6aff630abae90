use criterion::{black_box, criterion_group, criterion_main, Criterion};

// The window is not benchmarked; the per-scroll hot path is

use std::time::Duration;

use page_sync::config::EngineConfig;
use page_sync::page::{Dish, PageLayout, SectionLayout};
use page_sync::scroll_tracker::active_section;
use page_sync::timer::TimerQueue;
use page_sync::viewport::{IntersectionOptions, ViewportObserver};
use page_sync::PageController;

fn long_page(sections: usize) -> PageLayout {
    PageLayout {
        brand: "Bench".to_string(),
        sections: (0..sections)
            .map(|i| SectionLayout {
                id: format!("s{i}"),
                title: format!("Section {i}"),
                body: String::new(),
                min_height: Some(400.0),
                dishes: (0..3)
                    .map(|d| Dish {
                        name: format!("Dish {i}-{d}"),
                        price: "$1.00".to_string(),
                    })
                    .collect(),
                extra_dishes: Vec::new(),
            })
            .collect(),
        newsletter: false,
    }
}

fn benchmark_active_section(c: &mut Criterion) {
    c.bench_function("active_section_1000_sections", |b| {
        let keys: Vec<String> = (0..1000).map(|i| format!("s{i}")).collect();
        let tops: Vec<(&str, i32)> = keys
            .iter()
            .enumerate()
            .map(|(i, key)| (key.as_str(), i as i32 * 500))
            .collect();
        b.iter(|| black_box(active_section(tops.iter().copied(), black_box(250_000), 150)))
    });
}

fn benchmark_scroll_tick(c: &mut Criterion) {
    c.bench_function("scroll_tick_50_sections", |b| {
        let config = EngineConfig::default();
        let mut doc = long_page(50).build(1024.0, 720);
        let mut observer = ViewportObserver::new(IntersectionOptions::from(&config.reveal));
        let mut controller = PageController::new(config, &doc, &mut observer);
        let mut queue = TimerQueue::new();
        let mut now = Duration::ZERO;
        let mut position = 0;

        b.iter(|| {
            // Every call lands in a fresh window so the tick always runs
            now += Duration::from_millis(100);
            controller.run_due(&mut queue, now, &mut doc);
            position = (position + 997) % doc.max_scroll().max(1);
            doc.set_scroll_y(position);
            black_box(controller.on_scroll(&mut doc, &mut queue))
        })
    });
}

fn benchmark_intersection_poll(c: &mut Criterion) {
    c.bench_function("viewport_poll_150_cards", |b| {
        let config = EngineConfig::default();
        let mut doc = long_page(50).build(1024.0, 720);
        let mut observer = ViewportObserver::new(IntersectionOptions::from(&config.reveal));
        let _controller = PageController::new(config, &doc, &mut observer);
        let mut position = 0;

        b.iter(|| {
            position = (position + 613) % doc.max_scroll().max(1);
            doc.set_scroll_y(position);
            black_box(observer.poll(&doc))
        })
    });
}

criterion_group!(
    benches,
    benchmark_active_section,
    benchmark_scroll_tick,
    benchmark_intersection_poll
);
criterion_main!(benches);
