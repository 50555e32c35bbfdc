pub mod domain;
pub mod infrastructure;
pub mod motion_detector;
