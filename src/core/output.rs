use crate::prelude::*;
use csv::Writer;
use std::path::Path;

/// Writes one `epoch,error` record per training epoch.
pub fn write_errors_to_csv<P: AsRef<Path>>(errors: &[f64], file_path: P) -> Result<()> {
    let mut wtr = Writer::from_path(file_path)?;

    wtr.write_record(["epoch", "error"])?;
    for (epoch, error) in errors.iter().enumerate() {
        wtr.write_record(&[epoch.to_string(), error.to_string()])?;
    }

    wtr.flush()?;
    Ok(())
}
