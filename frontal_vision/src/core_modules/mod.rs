pub mod ball_selector;
pub mod blob;
pub mod color_segmenter;
pub mod encoder;
pub mod geometry;
pub mod goal_selector;
pub mod lab_pixel;
