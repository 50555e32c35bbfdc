pub mod approximate_median_model;
pub mod frame_difference_model;
pub mod median_model;
pub mod model_factory;
pub mod static_model;
