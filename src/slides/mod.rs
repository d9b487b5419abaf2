//! Slides module - static slide definitions and navigation state

mod navigation;
mod registry;

pub use navigation::NavigationController;
pub use registry::{Annotation, RegistryError, Slide, SlideRegistry};
