//! Movement domain: critically damped smoothing toward a target value.

/// Smallest smoothing time accepted; anything lower snaps almost instantly.
const MIN_SMOOTH_TIME: f32 = 1e-4;

/// Move `current` toward `target` along a critically damped spring.
///
/// `rate` carries the filter's derivative between calls and must be kept by
/// the caller. `max_rate` caps how fast the value may change per second.
/// The result never passes the target.
pub fn smooth_damp(
    current: f32,
    target: f32,
    rate: &mut f32,
    smooth_time: f32,
    max_rate: f32,
    dt: f32,
) -> f32 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    // Pade-style approximation of exp(-x)
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let max_change = max_rate.max(0.0) * smooth_time;
    let change = (current - target).clamp(-max_change, max_change);
    let clamped_target = current - change;

    let temp = (*rate + omega * change) * dt;
    *rate = (*rate - omega * temp) * decay;
    let mut output = clamped_target + (change + temp) * decay;

    if (target - current > 0.0) == (output > target) {
        output = target;
        *rate = 0.0;
    }

    output
}
