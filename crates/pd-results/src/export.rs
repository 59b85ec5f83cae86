//! CSV export of stored trajectories.

use std::io::Write;

use crate::ResultsResult;
use crate::types::TrajectoryRecord;

pub const CSV_HEADER: &str = "time_s,theta_rad,omega_rad_s,energy_j";

/// Write `records` as CSV with a header row.
pub fn export_csv<W: Write>(records: &[TrajectoryRecord], mut out: W) -> ResultsResult<()> {
    writeln!(out, "{}", CSV_HEADER)?;
    for r in records {
        writeln!(
            out,
            "{},{},{},{}",
            r.time_s, r.theta_rad, r.omega_rad_s, r.energy_j
        )?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let records = [
            TrajectoryRecord {
                time_s: 0.0,
                theta_rad: 1.0,
                omega_rad_s: 0.0,
                energy_j: 2.5,
            },
            TrajectoryRecord {
                time_s: 0.5,
                theta_rad: -0.25,
                omega_rad_s: 1.5,
                energy_j: 2.0,
            },
        ];

        let mut buf = Vec::new();
        export_csv(&records, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "0,1,0,2.5");
        assert_eq!(lines[2], "0.5,-0.25,1.5,2");
    }

    #[test]
    fn empty_records_write_header_only() {
        let mut buf = Vec::new();
        export_csv(&[], &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), format!("{}\n", CSV_HEADER));
    }
}
