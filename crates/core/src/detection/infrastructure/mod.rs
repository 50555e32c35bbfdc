pub mod annotator;
pub mod contour_tracer;
pub mod morphology;
