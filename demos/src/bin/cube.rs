//! A rotating textured cube.
//!
//! Usage: `cube [TEXTURE.BMP]`. Without an argument the cube is covered
//! with a checkerboard.
//!
//! Keys:
//! * `T`: toggle perspective-correct and affine texture mapping
//! * `W`: toggle wireframe
//! * `C`: toggle backface culling
//! * `D`: toggle depth testing
//! * `R`: toggle automatic rotation
//! * `Space`: cycle textured, depth values, and flat color views
//! * Arrows: rotate the cube
//! * `Esc`: quit
//!
//! The state of the toggles is printed in the top-left corner.

use std::{
    env,
    fmt::Write,
    ops::ControlFlow::{Break, Continue},
};

use log::{LevelFilter, error, info};

use dos::prelude::*;
use dos::util::bmp::load_bmp;
use dos_front::{
    init_logger,
    minifb::{Key, Window},
};

/// Half the edge length of the cube.
const CUBE_SIZE: f32 = 15.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum View {
    Textured,
    DepthValues,
    FlatColor,
}

impl View {
    fn next(self) -> Self {
        match self {
            Self::Textured => Self::DepthValues,
            Self::DepthValues => Self::FlatColor,
            Self::FlatColor => Self::Textured,
        }
    }
}

/// Returns a square of two triangles on the xy plane, facing positive z.
fn wall(color: u8, tex: &Bitmap) -> [Tri<'_>; 2] {
    let s = CUBE_SIZE;
    let v = |x, y, s, t| vertex(pt3(x, y, 0.0), uv(s, t));
    [
        Tri::textured(
            [v(-s, s, 0.0, 1.0), v(s, -s, 1.0, 0.0), v(-s, -s, 0.0, 0.0)],
            color,
            tex,
        ),
        Tri::textured(
            [v(-s, s, 0.0, 1.0), v(s, s, 1.0, 1.0), v(s, -s, 1.0, 0.0)],
            color,
            tex,
        ),
    ]
}

/// Returns a cube centered at the origin, each wall in its own color.
fn cube(tex: &Bitmap) -> Vec<Tri<'_>> {
    let s = CUBE_SIZE;
    let (x, y) = (vec3(1.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0));
    // Rotation in degrees, then translation
    let walls = [
        (x, -90.0, vec3(0.0, s, 0.0)),
        (x, 90.0, vec3(0.0, -s, 0.0)),
        (y, 180.0, vec3(0.0, 0.0, -s)),
        (y, 0.0, vec3(0.0, 0.0, s)),
        (y, 90.0, vec3(s, 0.0, 0.0)),
        (y, -90.0, vec3(-s, 0.0, 0.0)),
    ];
    walls
        .into_iter()
        .zip(1..)
        .flat_map(|((axis, deg, pos), color)| {
            let m = rotate(axis, f32::to_radians(deg)).then(&translate(pos));
            let mut tris = wall(color, tex);
            for v in verts_mut(&mut tris) {
                v.pos = m.apply(&v.pos);
            }
            tris
        })
        .collect()
}

fn rotate_all(tris: &mut [Tri], axis: Vec4, angle: f32) {
    let m = rotate(axis, angle);
    for v in verts_mut(tris) {
        v.pos = m.apply(&v.pos);
    }
}

fn status(view: View, opts: &DrawOpts) -> String {
    format!(
        "dosfire//cube  {view:?}  [T]ex: {:?}  [W]ire: {}  [C]ull: {:?}  [D]epth: {:?}",
        opts.fill, opts.wireframe, opts.face_cull, opts.depth_func
    )
}

/// Prints the state of the toggles in the top-left corner of `buf`.
fn draw_hud(buf: &mut DrawBuffer, font: &Font, tex_fill: FillMode) -> std::fmt::Result {
    let on_off = |b| if b { "ON" } else { "OFF" };
    let opts = buf.opts;
    let texmap = match tex_fill {
        FillMode::Affine => "Affine",
        _ => "Perspective",
    };
    let mut hud = buf.text(font, 1, 1, 15);
    writeln!(hud, "[T]exmapping: {texmap}")?;
    writeln!(hud, "[C]ulling BF: {}", on_off(opts.face_cull == FaceCull::Back))?;
    writeln!(hud, "[D]epth test: {}", on_off(opts.depth_func == DepthFunc::Less))?;
    write!(hud, "[W]ireframe : {}", on_off(opts.wireframe))
}

fn main() {
    init_logger(LevelFilter::Info).expect("logger should be installed once");

    let tex = match env::args().nth(1) {
        Some(path) => load_bmp(&path)
            .unwrap_or_else(|e| panic!("could not load texture {path}: {e}")),
        None => Bitmap::checker(64, 64, 8, [0xE0, 0x1F])
            .with_palette(Palette::rgb332()),
    };
    let tex_palette = tex.palette().cloned().unwrap_or_default();
    info!("texture is {}×{}", tex.width(), tex.height());

    let mut win = Window::builder()
        .title("dosfire//cube")
        .palette(tex_palette.clone())
        .build()
        .expect("should create window");

    win.opts = DrawOpts {
        fill: FillMode::Perspective,
        face_cull: FaceCull::Back,
        depth_func: DepthFunc::Less,
        ..DrawOpts::default()
    };
    win.imp.set_title(&status(View::Textured, &win.opts));

    let (w, h) = win.dims;
    let cam = Camera::new(
        pt3(0.0, 0.0, 60.0),
        pt3(0.0, 0.0, 0.0),
        vec3(0.0, 1.0, 0.0),
    )
    .perspective(f32::to_radians(75.0), w as f32 / h as f32, 0.1..500.0);
    let mvp = cam.view_projection();

    let font = Font::small();
    let mut cube = cube(&tex);
    let mut depth_vis = DrawBuffer::new(w, h, Planes::COLOR);
    let mut view = View::Textured;
    let mut tex_fill = FillMode::Perspective;
    let mut rotating = true;

    let (x, y) = (vec3(1.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0));

    win.run(|frame| {
        let dt = frame.dt_ms() as f32;
        let (win, buf) = (&mut *frame.win, &mut *frame.buf);

        if rotating {
            rotate_all(&mut cube, x, -0.001 * dt);
            rotate_all(&mut cube, y, -0.001 * dt);
        }
        for (key, axis, dir) in [
            (Key::Left, y, -1.0),
            (Key::Right, y, 1.0),
            (Key::Up, x, -1.0),
            (Key::Down, x, 1.0),
        ] {
            if win.key_down(key) {
                rotate_all(&mut cube, axis, dir * 0.002 * dt);
            }
        }

        let old = (view, buf.opts);
        let opts = &mut buf.opts;
        if win.key_pressed(Key::T) {
            tex_fill = match tex_fill {
                FillMode::Perspective => FillMode::Affine,
                _ => FillMode::Perspective,
            };
        }
        if win.key_pressed(Key::W) {
            opts.wireframe = !opts.wireframe;
        }
        if win.key_pressed(Key::C) {
            opts.face_cull = match opts.face_cull {
                FaceCull::None => FaceCull::Back,
                FaceCull::Back => FaceCull::None,
            };
        }
        if win.key_pressed(Key::D) && view != View::DepthValues {
            opts.depth_func = match opts.depth_func {
                DepthFunc::Always => DepthFunc::Less,
                DepthFunc::Less => DepthFunc::Always,
            };
        }
        if win.key_pressed(Key::R) {
            rotating = !rotating;
        }
        if win.key_pressed(Key::Space) {
            view = view.next();
            win.set_palette(match view {
                View::Textured => tex_palette.clone(),
                View::DepthValues => Palette::grayscale(),
                View::FlatColor => Palette::default(),
            });
            if view == View::DepthValues {
                opts.depth_func = DepthFunc::Less;
            }
        }
        opts.fill = match view {
            View::FlatColor => FillMode::Flat,
            _ => tex_fill,
        };
        if old != (view, *opts) {
            let status = status(view, opts);
            info!("{status}");
            win.imp.set_title(&status);
        }

        draw_tris(&cube, &mvp, buf);

        let hud = if view == View::DepthValues {
            buf.depth_to_color(&mut depth_vis);
            write!(depth_vis.text(&font, 1, 1, 48), "1/Z depth values")
        } else {
            draw_hud(buf, &font, tex_fill)
        };
        if let Err(e) = hud {
            error!("could not draw status text: {e}");
        }

        if view == View::DepthValues {
            if let Err(e) = win.present(&depth_vis) {
                error!("could not present depth values: {e}");
                return Break(());
            }
        }
        Continue(())
    })
    .expect("main loop should not fail");
}
