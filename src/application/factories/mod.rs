mod formatter_factory;
mod presenter_factory;

pub use formatter_factory::{DocumentKind, FormatterFactory};
pub use presenter_factory::{PresenterFactory, PresenterType};
