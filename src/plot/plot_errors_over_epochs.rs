use crate::error::{NNError, Result};
use plotters::prelude::*;
use std::path::Path;

fn plot_error<E: std::fmt::Display>(err: E) -> NNError {
    NNError::PlotError(err.to_string())
}

/// Draws the per-epoch training error on a log scale into a PNG file.
pub fn plot_errors_over_epochs<P: AsRef<Path>>(errors: &[f64], filename: P) -> Result<()> {
    if errors.is_empty() {
        return Err(NNError::EmptyDataset);
    }
    let root = BitMapBackend::new(filename.as_ref(), (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let epochs = errors.len();

    // Avoid log of zero or negative numbers
    let log_errors: Vec<f64> = errors
        .iter()
        .map(|&e| if e <= 0.0 { 1e-10 } else { e })
        .map(f64::log10)
        .collect();

    let y_min = log_errors.iter().cloned().fold(f64::INFINITY, f64::min).floor();
    let mut y_max = log_errors.iter().cloned().fold(f64::NEG_INFINITY, f64::max).ceil();
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }

    let mut chart = ChartBuilder::on(&root)
        .caption("Training Error over Epochs (Log Scale)", ("sans-serif", 30).into_font())
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..epochs, y_min..y_max)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("Epoch")
        .y_desc("Error (Log Scale)")
        .y_label_formatter(&|y| format!("1e{:.0}", y))
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(LineSeries::new(
            log_errors.iter().enumerate().map(|(epoch, &log_error)| (epoch, log_error)),
            &BLUE,
        ))
        .map_err(plot_error)?
        .label("Training Error")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    tracing::info!("Error plot has been saved as '{}'", filename.as_ref().display());

    Ok(())
}
