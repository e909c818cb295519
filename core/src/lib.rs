//! Core functionality of the `dosfire` project.
//!
//! `dosfire` is a software triangle rasterizer for palette-indexed,
//! frame-buffer-only displays in the style of the mode 13h era. It renders
//! camera-projected triangles into an in-memory [draw buffer][DrawBuffer]
//! with optional depth testing, backface culling, flat or textured fills,
//! and wireframe output.
//!
//! The entry point is [`render::draw_tri`], which takes one triangle, a
//! model-view-projection matrix, and a draw buffer.
//!
//! # Crate features
//!
//! * `std`:
//!   Makes available items requiring I/O, such as loading bitmaps from
//!   files and saving screenshots, and uses the floating-point functions
//!   of the standard library.
//!
//!   If this feature is disabled, the crate only depends on `alloc`.
//!
//! * `libm`:
//!   Provides software implementations of floating-point functions via the
//!   [libm](https://crates.io/crates/libm) crate.
//!
//! * `mm`:
//!   Provides fast approximate implementations of floating-point functions
//!   via the [micromath](https://crates.io/crates/micromath) crate.
//!
//! Each of the above also enables the `fp` feature, which makes available
//! the matrix constructors requiring trigonometric functions.
//!
//! All features are disabled by default.
//!
//! [DrawBuffer]: render::target::DrawBuffer

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;
extern crate core;

pub mod geom;
pub mod math;
pub mod render;
pub mod util;

pub mod prelude {
    #[cfg(feature = "fp")]
    pub use crate::math::mat::{look_at, perspective, rotate, rotate_vec};
    pub use crate::math::{
        Lerp,
        mat::{Mat4, scale, translate},
        vec::{Vec4, pt3, vec3, vec4},
    };

    pub use crate::geom::{Tri, Vertex, vertex, verts_mut};

    pub use crate::render::{
        cam::Camera,
        ctx::{DepthFunc, DrawOpts, FaceCull, FillMode},
        draw_tri, draw_tris,
        target::{DrawBuffer, Planes},
        tex::{Bitmap, TexCoord, uv},
        text::Font,
    };

    pub use crate::util::{buf::Buf2, palette::Palette};
}
