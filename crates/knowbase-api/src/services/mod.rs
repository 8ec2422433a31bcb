//! Service layer for business logic.

pub mod article_service;

pub use article_service::ArticleService;
