pub mod dynamo;
pub mod filter;
pub mod http;
pub mod model;
pub mod repository;
pub mod service;
pub mod synonyms;

pub use filter::{CompanyPage, CompanyQuery, Pagination, SortField, SortOrder, UserStatusFilter};
pub use model::{Company, CompanyListing, CreateCompanyPayload, SetCompanyStatusPayload, UserCompanyStatus};
pub use repository::{CompanyRepository, CompanyStatusRepository};
pub use synonyms::{SynonymGroup, SynonymTable, OTHER_LABEL};
