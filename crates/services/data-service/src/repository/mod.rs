pub mod documents;
pub mod relational;
