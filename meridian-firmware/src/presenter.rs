//! Face output
//!
//! The board has no panel driver yet; frames go to the defmt log.
//! A frame identical to the previous one is skipped.

use defmt::*;

use meridian_core::face::FaceView;
use meridian_core::traits::Presenter;

/// Logs each distinct frame
pub struct LogPresenter {
    last: Option<FaceView>,
}

impl LogPresenter {
    pub const fn new() -> Self {
        Self { last: None }
    }
}

impl Presenter for LogPresenter {
    fn present(&mut self, view: &FaceView) {
        if self.last.as_ref() == Some(view) {
            return;
        }
        info!("{}", view);
        self.last = Some(view.clone());
    }
}
