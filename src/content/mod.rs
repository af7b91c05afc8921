//! Content module for bhub: articles, authors and categories.

pub mod article_repository;
pub mod category_repository;
pub mod types;

pub use article_repository::{ArticleRepository, AuthorRepository};
pub use category_repository::CategoryRepository;
pub use types::{slugify, Article, ArticleQuery, Author, Category, NewArticle, NewCategory};
