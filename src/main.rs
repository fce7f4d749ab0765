use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use docsift::analysis::{
    co_occurrence, extract_headers, frequent, keywords, match_keywords, weighted_score,
};
use docsift::cache::AnalysisCache;
use docsift::config::Config;
use docsift::output::{csv, terminal};
use docsift::pages::load_pages;
use docsift::store::History;

/// docsift: section, keyword and similarity analytics for PDF documents.
///
/// Every command takes a DOCUMENT: a path to a PDF or form-feed separated
/// text file, or the name of a document saved with `docsift remember`.
#[derive(Parser)]
#[command(name = "docsift", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show page and section counts for a document
    Info {
        document: String,
    },

    /// List sections and the pages they cover
    Sections {
        document: String,
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Extract the header table (numbered and "Section" headers)
    Headers {
        document: String,
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Search for sentences containing any of the given terms
    Search {
        document: String,
        /// Terms to search for (case-insensitive)
        #[arg(required = true)]
        terms: Vec<String>,
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Requirement sentences (should / must / shall) with associated words
    Requirements {
        document: String,
        /// Associated words shown per term (default: 15)
        #[arg(long, default_value = "15")]
        limit: usize,
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Table and figure caption lines
    Captions {
        document: String,
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Sentences mentioning money
    Money {
        document: String,
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Most frequent distinctive words per section
    Words {
        document: String,
        /// Words per section (default: 10)
        #[arg(long, default_value = "10")]
        top: usize,
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Score sections against weighted terms, e.g. --term must=3 --term shall=2
    Score {
        document: String,
        #[arg(long = "term", value_parser = parse_weighted_term, required = true)]
        terms: Vec<(String, f64)>,
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Score sections by requirement words with the given coefficients
    RequirementsScore {
        document: String,
        #[arg(long, default_value = "1")]
        must: f64,
        #[arg(long, default_value = "1")]
        shall: f64,
        #[arg(long, default_value = "1")]
        should: f64,
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Find similar sentences between two documents
    Compare {
        document: String,
        other: String,
        /// Terms whose sentences are compared (default: should, shall)
        #[arg(long = "term")]
        terms: Vec<String>,
        /// Maximum cosine distance (default from DOCSIFT_SIMILARITY_THRESHOLD or 0.5)
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Save a document's pages to the history under a class
    Remember {
        path: PathBuf,
        /// Name to save under (default: the file name)
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "General")]
        class: String,
    },

    /// List saved documents by class
    History,
}

/// Everything a command needs: configuration, history and the memo cache.
struct Session {
    config: Config,
    history: History,
    cache: AnalysisCache,
}

impl Session {
    fn open() -> Result<Self> {
        let config = Config::load()?;
        let history = History::open(&config.history_path, &config.class_path)?;
        Ok(Self {
            config,
            history,
            cache: AnalysisCache::new(),
        })
    }

    /// Resolve a document reference: an existing file, else a saved name.
    fn pages(&self, document: &str) -> Result<Vec<String>> {
        let path = Path::new(document);
        if path.exists() {
            return load_pages(path);
        }
        match self.history.pages(document) {
            Some(pages) => {
                info!(name = document, "Loaded document from history");
                Ok(pages.to_vec())
            }
            None => anyhow::bail!(
                "'{document}' is neither a readable file nor a saved document.\n\
                 Run `docsift history` to list saved documents."
            ),
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("docsift=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut session = Session::open()?;

    match cli.command {
        Commands::Info { document } => {
            let pages = session.pages(&document)?;
            let segmentation = session.cache.segment(&pages);
            terminal::display_insights(&document, None, pages.len(), segmentation);
        }

        Commands::Sections {
            document,
            csv: csv_path,
        } => {
            let pages = session.pages(&document)?;
            let segmentation = session.cache.segment(&pages);
            terminal::display_sections(segmentation);
            export(csv_path.as_deref(), || csv::sections_table(segmentation))?;
        }

        Commands::Headers {
            document,
            csv: csv_path,
        } => {
            let pages = session.pages(&document)?;
            let headers = extract_headers(&pages);
            terminal::display_headers(&headers);
            export(csv_path.as_deref(), || csv::headers_table(&headers))?;
        }

        Commands::Search {
            document,
            terms,
            csv: csv_path,
        } => {
            let pages = session.pages(&document)?;
            let page_sections = session.cache.segment(&pages).page_sections.clone();
            let results = match_keywords(&pages, &terms, Some(&page_sections));
            terminal::display_term_hits(&results);
            export(csv_path.as_deref(), || csv::term_hits_table(&results))?;
        }

        Commands::Requirements {
            document,
            limit,
            csv: csv_path,
        } => {
            let pages = session.pages(&document)?;
            let page_sections = session.cache.segment(&pages).page_sections.clone();
            let results = match_keywords(&pages, &keywords::REQUIREMENT_TERMS, Some(&page_sections));

            println!("\n{}", "=== Requirement counts ===".bold());
            for result in &results {
                println!("  {:<8} {:>5}", result.term, result.hits.len());
            }

            for result in &results {
                println!("\n{}", format!("Section distribution: {}", result.term).underline());
                terminal::display_section_distribution(&result.hits);
            }
            terminal::display_term_hits(&results);

            let stopwords = session.config.stopwords()?;
            let associated = co_occurrence(&pages, &keywords::REQUIREMENT_TERMS, &stopwords);
            terminal::display_counts(&associated, limit);

            export(csv_path.as_deref(), || csv::term_hits_table(&results))?;
            if let Some(path) = &csv_path {
                csv::counts_table(&associated).write(&csv::companion_path(path, "words"))?;
            }
        }

        Commands::Captions {
            document,
            csv: csv_path,
        } => {
            let pages = session.pages(&document)?;
            let page_sections = session.cache.segment(&pages).page_sections.clone();
            let results = keywords::match_captions(&pages, Some(&page_sections));
            terminal::display_term_hits(&results);
            export(csv_path.as_deref(), || csv::term_hits_table(&results))?;
        }

        Commands::Money {
            document,
            csv: csv_path,
        } => {
            let pages = session.pages(&document)?;
            let page_sections = session.cache.segment(&pages).page_sections.clone();
            let hits = keywords::match_money(&pages, Some(&page_sections));
            println!("\n{}", format!("=== Money mentions - {} ===", hits.len()).bold());
            terminal::display_hits(&hits);
            export(csv_path.as_deref(), || csv::hits_table(&hits))?;
        }

        Commands::Words {
            document,
            top,
            csv: csv_path,
        } => {
            let pages = session.pages(&document)?;
            let results = frequent::frequent_words(&pages, top, frequent::DEFAULT_MAX_DF);
            terminal::display_section_words(&results);
            export(csv_path.as_deref(), || csv::section_words_table(&results))?;
        }

        Commands::Score {
            document,
            terms,
            csv: csv_path,
        } => {
            let pages = session.pages(&document)?;
            run_score(&mut session, &pages, &terms, csv_path.as_deref())?;
        }

        Commands::RequirementsScore {
            document,
            must,
            shall,
            should,
            csv: csv_path,
        } => {
            println!(
                "{}",
                format!("req_freq_ind_score = {must}(Must) + {shall}(Shall) + {should}(Should)")
                    .dimmed()
            );
            let pages = session.pages(&document)?;
            let terms = vec![
                ("must".to_string(), must),
                ("shall".to_string(), shall),
                ("should".to_string(), should),
            ];
            run_score(&mut session, &pages, &terms, csv_path.as_deref())?;
        }

        Commands::Compare {
            document,
            other,
            terms,
            threshold,
            csv: csv_path,
        } => {
            let threshold = match threshold {
                Some(t) => docsift::config::check_threshold(t)?,
                None => session.config.similarity_threshold,
            };
            let terms = if terms.is_empty() {
                vec!["should".to_string(), "shall".to_string()]
            } else {
                terms
            };

            let pages_a = session.pages(&document)?;
            let pages_b = session.pages(&other)?;

            let pb = ProgressBar::new(0);
            pb.set_style(
                ProgressStyle::default_bar().template("  Comparing [{bar:30}] {pos}/{len} ({eta})")?,
            );

            let results = session.cache.compare_documents(
                &pages_a,
                &pages_b,
                &terms,
                threshold,
                &mut |done, total| {
                    if pb.length() != Some(total) {
                        pb.set_length(total);
                    }
                    pb.set_position(done);
                },
            );
            pb.finish_and_clear();

            terminal::display_term_pairs(&results);
            export(csv_path.as_deref(), || csv::term_pairs_table(&results))?;
        }

        Commands::Remember { path, name, class } => {
            let name = match name {
                Some(n) => n,
                None => path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string)
                    .with_context(|| format!("Cannot derive a name from {}", path.display()))?,
            };
            let pages = load_pages(&path)?;
            let segmentation = session.cache.segment(&pages);
            terminal::display_insights(&name, Some(class.as_str()), pages.len(), segmentation);

            session.history.remember(&name, &class, pages);
            session.history.save()?;
            println!(
                "\n{}",
                format!("Saved as '{name}' in class '{class}'.").bold()
            );
        }

        Commands::History => {
            let classes = session.history.class_counts();
            if classes.is_empty() {
                println!("No saved documents. Run `docsift remember <file>` first.");
                return Ok(());
            }
            println!("\n{}", "=== Saved documents ===".bold());
            for (class, count) in classes {
                println!("  {} ({count})", class.bold());
                for file in session.history.files_in(class) {
                    println!("    {file}");
                }
            }
            println!(
                "\n  {}",
                format!("History: {}", session.config.history_path.display()).dimmed()
            );
        }
    }

    Ok(())
}

/// Weighted scoring with summary statistics, shared by both score commands.
fn run_score(
    session: &mut Session,
    pages: &[String],
    terms: &[(String, f64)],
    csv_path: Option<&Path>,
) -> Result<()> {
    let page_sections = &session.cache.segment(pages).page_sections;
    let report = weighted_score(pages, page_sections, terms);
    let summary = report.summary();
    terminal::display_score(&report, summary.as_ref());
    export(csv_path, || csv::score_table(&report, summary.as_ref()))?;
    if let Some(path) = csv_path {
        csv::score_breakdown_table(&report).write(&csv::companion_path(path, "terms"))?;
    }
    Ok(())
}

/// Write a table to `path` if one was requested.
fn export<F>(path: Option<&Path>, table: F) -> Result<()>
where
    F: FnOnce() -> csv::Table,
{
    if let Some(path) = path {
        table().write(path)?;
        println!("\n{}", format!("CSV saved to: {}", path.display()).bold());
    }
    Ok(())
}

/// Parse `word=weight` for `--term`.
fn parse_weighted_term(raw: &str) -> Result<(String, f64), String> {
    let (term, weight) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected WORD=WEIGHT, got '{raw}'"))?;
    let term = term.trim();
    if term.is_empty() {
        return Err(format!("empty term in '{raw}'"));
    }
    let weight: f64 = weight
        .trim()
        .parse()
        .map_err(|_| format!("weight in '{raw}' is not a number"))?;
    Ok((term.to_string(), weight))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weighted_term() {
        assert_eq!(parse_weighted_term("must=3"), Ok(("must".to_string(), 3.0)));
        assert_eq!(
            parse_weighted_term("ambient temperature=1.5"),
            Ok(("ambient temperature".to_string(), 1.5))
        );
        assert!(parse_weighted_term("must").is_err());
        assert!(parse_weighted_term("=2").is_err());
        assert!(parse_weighted_term("must=x").is_err());
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
