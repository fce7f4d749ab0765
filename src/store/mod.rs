// Document history: previously processed documents and their classes.
//
// Two flat JSON files back the store:
//   db.json     filename → pages
//   class.json  class name → filenames
// Both are read wholesale on open and overwritten wholesale on save. The
// store assumes a single writer.

pub mod history;

pub use history::History;
