use criterion::{black_box, criterion_group, criterion_main, Criterion};

use badgesmith::{BadgeSpec, LocatorBuilder, LogoRegistry, Snippet};

/// Bench: plain locator, no logo
fn bench_build_plain(c: &mut Criterion) {
    let builder = LocatorBuilder::default();
    let logos = LogoRegistry::empty();
    let spec = BadgeSpec::new("build", "passing", "#4c1");

    c.bench_function("build_plain", |b| {
        b.iter(|| builder.build(black_box(&spec), &logos))
    });
}

/// Bench: whitespace-heavy text plus an inline logo
fn bench_build_with_logo(c: &mut Criterion) {
    let builder = LocatorBuilder::default();
    let logos = LogoRegistry::bundled();
    let spec = BadgeSpec::new("code   coverage", "97 % of   lines", "brightgreen").with_logo("watermelon");

    c.bench_function("build_with_logo", |b| {
        b.iter(|| builder.build(black_box(&spec), &logos))
    });
}

fn bench_snippets(c: &mut Criterion) {
    let locator = LocatorBuilder::default().build(
        &BadgeSpec::new("docs", "latest", "blue").with_logo("flag"),
        &LogoRegistry::bundled(),
    );

    c.bench_function("render_all_snippets", |b| {
        b.iter(|| {
            for kind in Snippet::ALL {
                black_box(locator.snippet(kind));
            }
        })
    });
}

criterion_group!(benches, bench_build_plain, bench_build_with_logo, bench_snippets);
criterion_main!(benches);
