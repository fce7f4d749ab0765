// docsift: section, keyword and similarity analytics for PDF text corpora.
//
// This is the library root. `analysis` holds the pure text pipeline; the
// other modules are the plumbing around it (page providers, history store,
// configuration, memo cache and output).

pub mod analysis;
pub mod cache;
pub mod config;
pub mod output;
pub mod pages;
pub mod store;
pub mod text;
