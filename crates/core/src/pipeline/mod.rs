pub mod detect_motion_use_case;
pub mod pipeline_logger;
pub mod reference_frame;
