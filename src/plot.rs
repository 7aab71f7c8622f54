pub mod plot_errors_over_epochs;

pub use plot_errors_over_epochs::plot_errors_over_epochs;
