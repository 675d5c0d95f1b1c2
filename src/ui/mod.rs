/// egui rendering: each function draws one region from state and the
/// views of the current pass.

pub mod dashboard;
pub mod kpi;
pub mod panels;
pub mod plot;
pub mod table;
