//! Benchmarks for the diary conversion pipeline.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use diaryconv::export::{Exporter, HtmlConfig, HtmlExporter, JsonExporter, Timezone};
use diaryconv::tree::parse_str;
use diaryconv::{ImageResolver, convert_str};

/// Build an export with `days` entries, each with a few images and comments.
fn synthetic_export(days: usize) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<diary>\n");
    for day in 0..days {
        xml.push_str(&format!(
            "<day><attributes tm=\"{}\"/><body>entry {day}\n<b>bold</b> text \
             https://img.example.com/{day}/a.jpg and https://img.example.com/{day}/b&lt;wbr /&gt;c.gif \
             <a href=\"https://example.com/{day}\">link</a> tail</body><comments>",
            1_200_000_000 + day * 86_400
        ));
        for n in 0..3 {
            xml.push_str(&format!(
                "<comment><username>user{n}</username><timestamp>{}</timestamp><body>comment {n}</body></comment>",
                1_200_000_100 + day * 86_400 + n
            ));
        }
        xml.push_str("</comments></day>\n");
    }
    xml.push_str("</diary>\n");
    xml
}

fn bench_parse(c: &mut Criterion) {
    let xml = synthetic_export(1000);
    c.bench_function("parse_tree", |b| {
        b.iter(|| parse_str(&xml).unwrap());
    });
}

fn bench_convert(c: &mut Criterion) {
    let xml = synthetic_export(1000);
    c.bench_function("convert", |b| {
        b.iter(|| convert_str(&xml, &ImageResolver::new()).unwrap());
    });
}

fn bench_export(c: &mut Criterion) {
    let diary = convert_str(&synthetic_export(1000), &ImageResolver::new()).unwrap();
    let html = HtmlExporter::with_config(HtmlConfig {
        timezone: Timezone::Utc,
    });

    c.bench_function("export_json", |b| {
        b.iter(|| JsonExporter::new().export_to_vec(&diary.posts, &diary.images).unwrap());
    });
    c.bench_function("export_html", |b| {
        b.iter(|| html.export_to_vec(&diary.posts, &diary.images).unwrap());
    });
}

criterion_group!(benches, bench_parse, bench_convert, bench_export);
criterion_main!(benches);
