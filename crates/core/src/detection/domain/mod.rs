pub mod detection_state;
pub mod rect_filter;
pub mod rect_type;
