use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use mindmark::{LayoutType, Size, apply_layout, parse, serialize};

fn outline_source(sections: usize, items_per_section: usize) -> String {
    let mut out = String::from("<!-- layout: radial -->\n");
    for section in 0..sections {
        out.push_str(&format!("# Section {section}\n"));
        for item in 0..items_per_section {
            out.push_str(&format!("- item {section}-{item} {{.tag}}\n"));
            out.push_str(&format!("  - detail {section}-{item}\n"));
        }
        if section + 1 < sections {
            out.push_str("\n---\n\n");
        }
    }
    out
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (sections, items) in [(2usize, 5usize), (8, 20), (24, 40)] {
        let name = format!("outline_{sections}x{items}");
        let input = outline_source(sections, items);
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, data| {
            b.iter(|| {
                let parsed = parse(black_box(data)).expect("parse failed");
                black_box(parsed.nodes.len());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for (sections, items) in [(2usize, 5usize), (8, 20), (24, 40)] {
        let name = format!("outline_{sections}x{items}");
        let parsed = parse(&outline_source(sections, items)).expect("parse failed");
        let nodes: Vec<_> = parsed
            .nodes
            .iter()
            .cloned()
            .map(|mut node| {
                node.measured_size = Some(Size {
                    width: 120.0,
                    height: 36.0,
                });
                node
            })
            .collect();
        for layout in [LayoutType::Radial, LayoutType::Horizontal] {
            group.bench_with_input(
                BenchmarkId::new(layout.as_str(), &name),
                &nodes,
                |b, nodes| {
                    b.iter(|| {
                        let placed =
                            apply_layout(black_box(nodes), &parsed.edges, layout).expect("layout");
                        black_box(placed.len());
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");
    for (sections, items) in [(2usize, 5usize), (8, 20), (24, 40)] {
        let name = format!("outline_{sections}x{items}");
        let parsed = parse(&outline_source(sections, items)).expect("parse failed");
        group.bench_with_input(BenchmarkId::from_parameter(name), &parsed, |b, parsed| {
            b.iter(|| {
                let text =
                    serialize(&parsed.nodes, &parsed.edges, parsed.layout).expect("serialize");
                black_box(text.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_parse, bench_layout, bench_serialize
);
criterion_main!(benches);
