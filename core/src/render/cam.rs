//! Cameras and camera transforms.
//!
//! The rasterizer never sees a camera, only the model-view-projection
//! matrix composed from it with [`Camera::mvp`].

#[cfg(feature = "fp")]
use core::ops::Range;

use crate::math::{mat::Mat4, vec::Vec4};
#[cfg(feature = "fp")]
use crate::math::{look_at, perspective, vec::vec3};

/// A camera with a position, an orientation, and a projection.
///
/// `right` and `up` are unit vectors derived from the position, target,
/// and approximate up direction whenever the view is updated.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Camera {
    /// Position of the camera in world space.
    pub position: Vec4,
    /// The up direction of the camera in world space.
    pub up: Vec4,
    /// The right direction of the camera in world space.
    pub right: Vec4,
    /// The point the camera is looking at, in world space.
    pub target: Vec4,
    /// View-to-clip-space projection matrix.
    pub projection: Mat4,
    /// World-to-view-space matrix.
    pub view: Mat4,
}

impl Camera {
    /// Creates a camera at `position` looking at `target`, with `up` giving
    /// the approximate up direction.
    ///
    /// The projection is initially the identity; set it with
    /// [`perspective`][Self::perspective].
    #[cfg(feature = "fp")]
    pub fn new(position: Vec4, target: Vec4, up: Vec4) -> Self {
        let mut cam = Self {
            position,
            up,
            target,
            ..Self::default()
        };
        cam.update_view();
        cam
    }

    /// Sets up perspective projection with the vertical angle of view
    /// `fov_y` in radians, the viewport aspect ratio `aspect`, and the
    /// distances `near_far` of the near and far planes.
    ///
    /// # Panics
    /// If `near_far.start` is not positive or `near_far` is empty.
    #[cfg(feature = "fp")]
    pub fn perspective(mut self, fov_y: f32, aspect: f32, near_far: Range<f32>) -> Self {
        self.projection = perspective(fov_y, aspect, near_far);
        self
    }

    /// Moves the camera to `position`, keeping it aimed at its target.
    #[cfg(feature = "fp")]
    pub fn move_to(&mut self, position: Vec4) {
        self.position = position;
        self.update_view();
    }

    /// Aims the camera at `target`.
    #[cfg(feature = "fp")]
    pub fn look_at(&mut self, target: Vec4) {
        self.target = target;
        self.update_view();
    }

    /// Returns the composed view and projection matrix.
    pub fn view_projection(&self) -> Mat4 {
        self.view.then(&self.projection)
    }

    /// Returns the model-view-projection matrix for an object whose
    /// model-to-world transform is `model`.
    pub fn mvp(&self, model: &Mat4) -> Mat4 {
        model.then(&self.view_projection())
    }

    #[cfg(feature = "fp")]
    fn update_view(&mut self) {
        self.view = look_at(self.position, self.target, self.up);
        // look_at returns the transposed basis in its first three columns
        let [right, up] = [0, 1].map(|i| {
            let c = self.view.col(i);
            vec3(c.x(), c.y(), c.z())
        });
        self.right = right;
        self.up = up;
    }
}
