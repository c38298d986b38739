pub mod build_service;
pub mod conversion_service;
pub mod style_service;
pub mod task_group;
pub mod walker_service;

pub use build_service::BuildService;
pub use conversion_service::ConversionTask;
pub use style_service::StyleService;
pub use task_group::TaskGroup;
pub use walker_service::TreeWalker;
