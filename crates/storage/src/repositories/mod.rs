pub mod catalog_repo;
pub mod features_repo;

pub use catalog_repo::CatalogRepository;
pub use features_repo::FeaturesRepository;
