pub mod coords;
pub mod pan_zoom;
pub mod plan;
