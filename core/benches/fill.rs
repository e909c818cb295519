//! Fillrate benchmarks.

use divan::{Bencher, counter::ItemsCount};

use dosfire_core::prelude::*;
use dosfire_core::{geom::signed_area, util::pnm::save_ppm};

const SIZES: [f32; 5] = [4.0, 16.0, 64.0, 256.0, 1024.0];

/// Fractions of the buffer size; the second vertex is farther away.
const VERTS: [[f32; 3]; 3] = [[0.1, 0.1, 1.0], [0.9, 0.3, 3.0], [0.4, 0.9, 1.5]];

/// Returns a triangle spanning `sz` pixels of a 1024×1024 buffer.
fn tri(sz: f32, tex: &Bitmap) -> Tri<'_> {
    let [a, b, c] = VERTS.map(|[x, y, w]| {
        // Screen to NDC, then undo the perspective divide
        let (x, y) = (x * sz / 512.0 - 1.0, y * sz / 512.0 - 1.0);
        vec4(x * w, y * w, 0.0, w)
    });
    Tri::textured(
        [
            vertex(a, uv(0.0, 0.0)),
            vertex(b, uv(1.0, 0.0)),
            vertex(c, uv(0.0, 1.0)),
        ],
        0xCC,
        tex,
    )
}

fn area(sz: f32) -> usize {
    signed_area(VERTS.map(|[x, y, _]| [x * sz, y * sz])) as usize
}

fn bench(b: Bencher, sz: f32, opts: DrawOpts, name: &str) {
    let tex = Bitmap::checker(64, 64, 8, [0xFF, 0x33]);
    let mut buf = DrawBuffer::new(1024, 1024, Planes::ALL).with_opts(opts);

    b.with_inputs(|| tri(sz, &tex))
        .input_counter(move |_| ItemsCount::new(area(sz)))
        .bench_local_values(|tri| {
            buf.clear(Planes::DEPTH);
            draw_tri(&tri, &Mat4::identity(), &mut buf);
        });

    save_ppm(
        format!("benches_fill_{name}.ppm"),
        buf.color(),
        &Palette::grayscale(),
    )
    .unwrap();
}

#[divan::bench(args = SIZES)]
fn flat(b: Bencher, sz: f32) {
    let opts = DrawOpts { fill: FillMode::Flat, ..DrawOpts::default() };
    bench(b, sz, opts, "flat");
}

#[divan::bench(args = SIZES)]
fn flat_depth(b: Bencher, sz: f32) {
    let opts = DrawOpts {
        fill: FillMode::Flat,
        depth_func: DepthFunc::Less,
        ..DrawOpts::default()
    };
    bench(b, sz, opts, "flat_depth");
}

#[divan::bench(args = SIZES)]
fn affine(b: Bencher, sz: f32) {
    let opts = DrawOpts { fill: FillMode::Affine, ..DrawOpts::default() };
    bench(b, sz, opts, "affine");
}

#[divan::bench(args = SIZES)]
fn perspective(b: Bencher, sz: f32) {
    let opts = DrawOpts {
        fill: FillMode::Perspective,
        depth_func: DepthFunc::Less,
        ..DrawOpts::default()
    };
    bench(b, sz, opts, "perspective");
}

fn main() {
    divan::main()
}
