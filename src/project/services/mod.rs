//! Application services for the project list.

mod catalog;

pub use catalog::{
    ProjectCatalogError, ProjectCatalogResult, ProjectCatalogService, ProjectRequest,
};
