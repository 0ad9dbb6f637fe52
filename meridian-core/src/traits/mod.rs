//! Collaborator traits
//!
//! These traits define the interface between the watch logic and the
//! board: the companion link it sends requests through and the presenter
//! that draws the face.

pub mod link;
pub mod presenter;

pub use link::CompanionLink;
pub use presenter::Presenter;
