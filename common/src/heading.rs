use std::f32::consts::{PI, TAU};

/// One frame of planar motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub dx: f32,
    pub dz: f32,
    /// World yaw of the motion, in `(-PI, PI]`.
    pub heading: f32,
}

/// Normalise an angle into `(-PI, PI]`. Non-finite input is returned as is.
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return angle;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Absolute yaw of `to` as seen from `from`, both given as `(x, z)`.
///
/// Yaw 0 looks down +Z, positive yaw turns toward +X. When the two points
/// share the same horizontal position the result is 0 regardless of the
/// sign of the zero offsets.
pub fn yaw_toward(from: (f32, f32), to: (f32, f32)) -> f32 {
    let dx = to.0 - from.0;
    let dz = to.1 - from.1;
    if dx == 0.0 && dz == 0.0 {
        return 0.0;
    }
    dx.atan2(dz)
}

/// Rotate a local `direction` by `front_yaw` and scale it by `speed * dt`.
///
/// The heading is reported even when the step is empty so callers can keep
/// it around, but the delta is exactly `+0.0` in that case.
pub fn step(speed: f32, direction: (f32, f32), front_yaw: f32, dt: f32) -> Step {
    let heading = wrap_angle(direction.0.atan2(direction.1) + front_yaw);
    let distance = speed * dt;
    if distance == 0.0 || !distance.is_finite() {
        return Step {
            dx: 0.0,
            dz: 0.0,
            heading,
        };
    }
    let (sin, cos) = heading.sin_cos();
    Step {
        dx: distance * sin,
        dz: distance * cos,
        heading,
    }
}
