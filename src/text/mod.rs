// Text preparation: turning raw page text into the sentences every
// analysis works on.

pub mod normalize;
pub mod stopwords;
