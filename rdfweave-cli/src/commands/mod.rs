pub mod convert;
pub mod syntaxes;
