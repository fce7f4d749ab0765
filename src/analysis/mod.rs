// Document analyses: segmentation, header extraction, keyword search,
// co-occurrence, similarity and weighted scoring.
//
// Every function here is a pure transform of page text. Nothing reads files
// or keeps state between calls; memoization lives in `crate::cache`.

pub mod cooccurrence;
pub mod frequent;
pub mod headers;
pub mod heuristics;
pub mod keywords;
pub mod scoring;
pub mod segment;
pub mod similarity;
pub mod vectorize;

pub use cooccurrence::co_occurrence;
pub use headers::extract_headers;
pub use keywords::match_keywords;
pub use scoring::weighted_score;
pub use segment::segment;
pub use similarity::similar_sentences;
