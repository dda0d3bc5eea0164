use clap::{Args, Parser, Subcommand};
use shelf::api::FilterCriteria;
use shelf::model::{Condition, MAX_RATING, MIN_RATING};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shelf", bin_name = "shelf", version)]
#[command(about = "Browse, search and lend the books of your personal library", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (diagnostics on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Seed catalog to load instead of the configured one
    #[arg(long, global = true, value_name = "PATH", help_heading = "Options")]
    pub seed: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true, help_heading = "Options")]
    pub no_color: bool,
}

/// One line typed into the session shell.
#[derive(Parser, Debug)]
#[command(name = "shelf", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every book in the catalog
    #[command(alias = "ls")]
    List,

    /// Search and filter the catalog
    #[command(alias = "filter", alias = "s")]
    Search(SearchArgs),

    /// Show the categories, subcategories, languages and tags in the catalog
    Facets,

    /// Show the full record and borrow history of one or more books
    #[command(alias = "v")]
    View {
        /// Book ids (e.g. 1 4 7)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Borrow one or more books
    #[command(alias = "b")]
    Borrow {
        /// Book ids (e.g. 1 4 7)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,

        /// Who is borrowing (defaults to the configured borrower)
        #[arg(long)]
        borrower: Option<String>,

        /// Condition of the copy at checkout: excellent, good, fair or poor
        #[arg(long, value_parser = parse_condition)]
        condition: Option<Condition>,

        /// Note to attach to the borrow record
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Return one or more borrowed books
    #[command(name = "return", alias = "r")]
    Return {
        /// Book ids (e.g. 1 4 7)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (borrower, condition, seed)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Start an interactive session over one catalog
    Shell,
}

#[derive(Args, Debug, Default, Clone)]
pub struct SearchArgs {
    /// Text matched against title, author and description
    #[arg(num_args = 0..)]
    pub query: Vec<String>,

    /// Only books in this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Only books in this subcategory
    #[arg(long)]
    pub subcategory: Option<String>,

    /// Only books in this language
    #[arg(short, long)]
    pub language: Option<String>,

    /// Minimum rating, 0 to 5
    #[arg(short = 'r', long, value_parser = parse_rating, default_value_t = 0.0)]
    pub min_rating: f64,

    /// Required tag; repeat for several (all must match)
    #[arg(short, long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
}

impl SearchArgs {
    pub fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new()
            .with_query(self.query.join(" "))
            .with_min_rating(self.min_rating)
            .with_tags(self.tags.iter().cloned());
        criteria.category = self.category.clone();
        criteria.subcategory = self.subcategory.clone();
        criteria.language = self.language.clone();
        criteria
    }
}

fn parse_condition(s: &str) -> Result<Condition, String> {
    s.parse()
}

fn parse_rating(s: &str) -> Result<f64, String> {
    let rating: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(format!(
            "rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        ));
    }
    Ok(rating)
}
