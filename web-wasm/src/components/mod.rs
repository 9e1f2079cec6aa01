pub mod alerts;
pub mod header;
pub mod progress_bar;
pub mod results_view;
pub mod upload_slot;
