//! Watch face labels

pub mod format;
pub mod view;

pub use format::NO_EVENT;
pub use view::{Emphasis, FaceInputs, FaceView, StatusLabel};
