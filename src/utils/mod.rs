pub mod geometry;

use self::geometry::{Point, Size};

/// Clamps `value` into `[0, max]`, returning 0 when `max` is negative.
///
/// Unlike [`f64::clamp`], this doesn't panic for an inverted range: a window larger than its
/// container ends up at the top-left.
pub fn clamp_preferring_zero(value: f64, max: f64) -> f64 {
    f64::max(0., f64::min(value, max))
}

/// Position that centers `size` within `container`.
///
/// The result is negative when the window is larger than the container.
pub fn center_in_container(size: Size, container: Size) -> Point {
    (container.to_point() - size.to_point()).downscale(2.)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_inverted_range_prefers_zero() {
        assert_eq!(clamp_preferring_zero(50., -100.), 0.);
        assert_eq!(clamp_preferring_zero(-50., -100.), 0.);
    }

    #[test]
    fn clamp_regular_range() {
        assert_eq!(clamp_preferring_zero(-5., 100.), 0.);
        assert_eq!(clamp_preferring_zero(50., 100.), 50.);
        assert_eq!(clamp_preferring_zero(150., 100.), 100.);
    }

    #[test]
    fn center_larger_window() {
        let pos = center_in_container(Size::new(800., 600.), Size::new(400., 300.));
        assert_eq!(pos, Point::new(-200., -150.));
    }
}
