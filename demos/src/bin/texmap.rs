//! A texture-mapped quad swinging back and forth.
//!
//! Usage: `texmap [TEXTURE.BMP]`. Press `T` to compare perspective-correct
//! and affine texture mapping.

use std::{env, ops::ControlFlow::Continue};

use log::{LevelFilter, info};

use dos::prelude::*;
use dos::util::bmp::load_bmp;
use dos_front::{
    init_logger,
    minifb::{Key, Window},
};

fn main() {
    init_logger(LevelFilter::Info).expect("logger should be installed once");

    let tex = match env::args().nth(1) {
        Some(path) => load_bmp(&path)
            .unwrap_or_else(|e| panic!("could not load texture {path}: {e}")),
        None => Bitmap::from_fn(64, 64, |x, y| ((x ^ y) * 4) as u8)
            .with_palette(Palette::grayscale()),
    };

    let mut win = Window::builder()
        .title("dosfire//texmap")
        .palette(tex.palette().cloned().unwrap_or_default())
        .planes(Planes::COLOR)
        .build()
        .expect("should create window");

    let v = |x, y, s, t| vertex(pt3(x, y, 0.0), uv(s, t));
    let quad = [
        Tri::textured(
            [v(0.0, 0.0, 0.0, 0.0), v(40.0, 40.0, 1.0, 1.0), v(0.0, 40.0, 0.0, 1.0)],
            1,
            &tex,
        ),
        Tri::textured(
            [v(0.0, 0.0, 0.0, 0.0), v(40.0, 0.0, 1.0, 0.0), v(40.0, 40.0, 1.0, 1.0)],
            2,
            &tex,
        ),
    ];

    let (w, h) = win.dims;
    let cam = Camera::new(
        pt3(0.0, 0.0, 50.0),
        pt3(0.0, 0.0, 0.0),
        vec3(0.0, 1.0, 0.0),
    )
    .perspective(f32::to_radians(75.0), w as f32 / h as f32, 0.1..500.0);

    win.run(|frame| {
        let opts = &mut frame.buf.opts;
        if frame.win.key_pressed(Key::T) {
            opts.fill = match opts.fill {
                FillMode::Perspective => FillMode::Affine,
                _ => FillMode::Perspective,
            };
            info!("fill mode: {:?}", opts.fill);
        }
        let secs = frame.t.as_secs_f32();
        let model = translate(vec3(-20.0, -20.0, 0.0))
            .then(&rotate(vec3(0.0, 1.0, 0.0), 1.2 * secs.sin()))
            .then(&translate(vec3(0.0, 0.0, 20.0 * (0.7 * secs).sin())));

        draw_tris(&quad, &cam.mvp(&model), frame.buf);
        Continue(())
    })
    .expect("main loop should not fail");
}
