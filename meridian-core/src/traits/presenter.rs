//! Display presenter trait

use crate::face::FaceView;

/// Receives the formatted face once per tick
///
/// Layout, fonts and drawing are entirely up to the implementation.
pub trait Presenter {
    fn present(&mut self, view: &FaceView);
}
