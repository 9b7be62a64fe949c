/// UI building blocks for the filter window
pub mod controls;
