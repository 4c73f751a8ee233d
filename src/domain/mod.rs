pub mod article;
pub mod date;

pub use article::Article;
pub use date::reformat_publication_date;
