//! Rendering into offscreen draw buffers.
//!
//! A spinning triangle is drawn into four half-size render targets, each
//! cleared to a different color, which are then copied into the quadrants
//! of the screen.

use std::{ops::ControlFlow::Continue, time::SystemTime};

use log::{LevelFilter, info};

use dos::prelude::*;
use dos_front::{init_logger, minifb::Window};

fn main() {
    init_logger(LevelFilter::Info).expect("logger should be installed once");

    let mut win = Window::builder()
        .title("dosfire//rtargets")
        .planes(Planes::COLOR)
        .build()
        .expect("should create window");

    let (w, h) = win.dims;
    let (tw, th) = (w / 2, h / 2);
    let mut targets: Vec<_> = (1..=4u8)
        .map(|i| (i, DrawBuffer::new(tw, th, Planes::COLOR)))
        .collect();

    // Any color but the ones the targets are cleared to
    let seed = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0, |d| d.subsec_nanos());
    let color = 5 + (seed % 100) as u8;
    info!("triangle color is {color}");

    let v = |x, y| vertex(pt3(x, y, 0.0), uv(0.0, 0.0));
    let mut tri = Tri::flat(
        [v(-20.0, 20.0), v(0.0, -20.0), v(20.0, 20.0)],
        color,
    );

    let mvp = Camera::new(
        pt3(0.0, 0.0, 60.0),
        pt3(0.0, 0.0, 0.0),
        vec3(0.0, 1.0, 0.0),
    )
    .perspective(f32::to_radians(75.0), tw as f32 / th as f32, 0.1..500.0)
    .view_projection();

    let axes = [
        vec3(1.0, 0.0, 0.0),
        vec3(0.0, 1.0, 0.0),
        vec3(0.0, 0.0, 1.0),
    ];

    win.run(|frame| {
        let angle = 0.002 * frame.dt_ms() as f32;
        for v in &mut tri.verts {
            for axis in axes {
                v.pos = rotate_vec(v.pos, axis, angle);
            }
        }

        for (i, (bg, target)) in targets.iter_mut().enumerate() {
            target.clear_color(*bg);
            draw_tri(&tri, &mvp, target);

            let (x, y) = (i % 2 * tw, i / 2 * th);
            frame.buf.blit(target, x as i32, y as i32);
        }
        Continue(())
    })
    .expect("main loop should not fail");
}
