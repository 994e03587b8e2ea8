use glam::Vec2;

pub type Vector2D = Vec2;

pub trait VectorPolar {
    /// Point at `radius` from `center`, rotated `theta` radians from +x.
    fn from_polar(center: Self, radius: f32, theta: f32) -> Self;
}

impl VectorPolar for Vector2D {
    #[inline]
    fn from_polar(center: Self, radius: f32, theta: f32) -> Self {
        center + Vector2D::from_angle(theta) * radius
    }
}
