use criterion::{Criterion, black_box, criterion_group, criterion_main};
use snap_core::{Image, Point2i};
use snap_cost::{CostFieldBuilder, CostParams, search_region};

fn build_disc_u8(width: usize, height: usize) -> Image<u8> {
    let cx = 0.5 * width as f32;
    let cy = 0.5 * height as f32;
    let r = 0.3 * width.min(height) as f32;

    let mut data = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            data[y * width + x] = if dx * dx + dy * dy <= r * r { 220 } else { 30 };
        }
    }

    Image::from_vec(width, height, data).expect("valid image")
}

fn bench_cost_field(c: &mut Criterion) {
    let img = build_disc_u8(1280, 1024);
    let params = CostParams::default();
    let region = search_region(Point2i::new(400, 300), Point2i::new(520, 380), 30);
    let mut builder = CostFieldBuilder::new();

    c.bench_function("cost_field_search_window_r30", |b| {
        b.iter(|| {
            let field = builder
                .build(black_box(&img), black_box(region), black_box(&params))
                .expect("field");
            black_box(field.region());
        });
    });
}

criterion_group!(benches, bench_cost_field);
criterion_main!(benches);
