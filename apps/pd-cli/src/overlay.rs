//! Text overlay for a frame, as a renderer would print it beside the rod.

use pd_results::TrajectoryRecord;
use pd_sim::Projection;

pub fn frame_line(record: &TrajectoryRecord, length_m: f64, projection: &Projection) -> String {
    let (x, y) = projection.bob(length_m, record.theta_rad);
    format!(
        "time = {:.1}  theta = {:.3} rad  omega = {:.3} rad/s  bob = ({:.3}, {:.3})",
        record.time_s, record.theta_rad, record.omega_rad_s, x, y
    )
}
