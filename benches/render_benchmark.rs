//! Benchmarks for resumedoc segmentation and rendering.
//!
//! Run with: cargo bench
//!
//! Inputs are synthetic résumés with a configurable number of sections.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

const HEADERS: [&str; 6] = [
    "Experience",
    "Projects",
    "Skills",
    "Education",
    "Awards",
    "Volunteer",
];

/// Creates a synthetic résumé with the given number of sections.
fn create_test_resume(section_count: usize) -> String {
    let mut text = String::from("Jane Doe\njane@example.com\n+1 555 0100\n");

    for i in 0..section_count {
        text.push_str(HEADERS[i % HEADERS.len()]);
        text.push('\n');
        for j in 0..3 {
            text.push_str(&format!(
                "Role {} at Company {}: shipped features, reviewed designs and mentored engineers.\n",
                j, i
            ));
            text.push_str("Worked across storage, networking and build tooling.\n\n");
        }
    }

    text
}

/// Benchmark segmentation and model building.
fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    for section_count in [4, 16, 64].iter() {
        let text = create_test_resume(*section_count);

        group.bench_function(format!("{}_sections", section_count), |b| {
            b.iter(|| resumedoc::parse_text(black_box(&text)));
        });
    }

    group.finish();
}

/// Benchmark both renderers on the same model.
fn bench_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");
    let options = resumedoc::RenderOptions::default();

    for section_count in [4, 16].iter() {
        let doc = resumedoc::parse_text(&create_test_resume(*section_count));

        group.bench_function(format!("pdf_{}_sections", section_count), |b| {
            b.iter(|| resumedoc::render::to_pdf(black_box(&doc), &options).unwrap());
        });

        group.bench_function(format!("docx_{}_sections", section_count), |b| {
            b.iter(|| resumedoc::render::to_docx(black_box(&doc), &options).unwrap());
        });
    }

    group.finish();
}

/// Benchmark parallel batch conversion.
fn bench_batch(c: &mut Criterion) {
    let inputs: Vec<resumedoc::BatchInput> = (0..16)
        .map(|i| resumedoc::BatchInput::new(create_test_resume(8), format!("r{}.txt", i)))
        .collect();

    c.bench_function("batch_pdf_16", |b| {
        b.iter(|| resumedoc::convert_batch(black_box(&inputs), resumedoc::OutputFormat::Pdf));
    });
}

/// Benchmark format detection.
fn bench_format_detection(c: &mut Criterion) {
    let doc = resumedoc::parse_text(&create_test_resume(4));
    let pdf = resumedoc::render::to_pdf(&doc, &Default::default()).unwrap();
    let non_document = b"Not a document at all, just random text content";

    c.bench_function("detect_pdf", |b| {
        b.iter(|| resumedoc::detect_format(black_box(&pdf)).unwrap());
    });

    c.bench_function("detect_unknown", |b| {
        b.iter(|| resumedoc::detect_format(black_box(non_document)).is_err());
    });
}

criterion_group!(
    benches,
    bench_parsing,
    bench_rendering,
    bench_batch,
    bench_format_detection,
);
criterion_main!(benches);
