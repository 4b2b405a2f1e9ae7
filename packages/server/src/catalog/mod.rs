mod query;
mod taxonomy;
mod upload;

pub use query::{ResourceFilter, ResourceService, ResourceStats};
pub use taxonomy::{CourseTree, TaxonomyError, TaxonomyService, Upserted};
pub use upload::UploadPipeline;
