pub mod box_blur;
pub mod high_pass;
