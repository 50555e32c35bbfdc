pub mod background_model;
pub mod subtraction_method;
pub mod threshold;
