//! # Rendering
//!
//! Turns command results into terminal text. Every `render_*` function
//! returns a `String` so output can be tested without a terminal; the
//! handlers in `commands.rs` do the printing.
//!
//! Layout math (width, truncation, padding) is Unicode-aware via
//! `unicode-width`. Colors come from `colored` and honor `--no-color`.

use chrono::{DateTime, Utc};
use colored::*;
use shelf::api::{CmdMessage, Facets, MessageLevel};
use shelf::model::{Book, BorrowRecord};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
const MIN_LINE_WIDTH: usize = 60;
const ID_WIDTH: usize = 5;
const STATUS_WIDTH: usize = 10;
const RATING_WIDTH: usize = 6;
const DATE_FORMAT: &str = "%b %-d, %Y";
const BORROWED_MARKER: &str = "⇄";

pub const NO_BOOKS: &str = "No books in the catalog.";

/// Width of the attached terminal, or [`LINE_WIDTH`] when not a terminal.
pub fn terminal_width() -> usize {
    console::Term::stdout()
        .size_checked()
        .map(|(_, cols)| cols as usize)
        .unwrap_or(LINE_WIDTH)
        .max(MIN_LINE_WIDTH)
}

/// One line per book: id, "title by author", status, rating.
pub fn render_book_list(books: &[Book], width: usize) -> String {
    if books.is_empty() {
        return format!("{}\n", NO_BOOKS.dimmed());
    }

    let mut out = String::new();
    for book in books {
        let id = format!("{:>w$}. ", book.id.as_str(), w = ID_WIDTH - 2);
        let fixed = id.width() + STATUS_WIDTH + RATING_WIDTH + 2;
        let available = width.saturating_sub(fixed);

        let label = format!("{} by {}", book.title, book.author);
        let label = truncate_to_width(&label, available);
        let padding = " ".repeat(available.saturating_sub(label.width()));

        let status = if book.is_borrowed() {
            format!("{:>w$}", format!("{} out", BORROWED_MARKER), w = STATUS_WIDTH).yellow()
        } else {
            format!("{:>w$}", "available", w = STATUS_WIDTH).green()
        };
        let rating = format!("{:>w$}", format!("★ {:.1}", book.rating), w = RATING_WIDTH);

        out.push_str(&format!(
            "{}{}{}  {}{}\n",
            id.yellow(),
            label,
            padding,
            status,
            rating.dimmed()
        ));
    }
    out
}

/// Full record of each book, separated by a rule.
pub fn render_full_books(books: &[Book]) -> String {
    let mut out = String::new();
    for (i, book) in books.iter().enumerate() {
        if i > 0 {
            out.push_str("\n================================\n\n");
        }
        render_full_book(&mut out, book);
    }
    out
}

fn render_full_book(out: &mut String, book: &Book) {
    out.push_str(&format!(
        "{} {}\n",
        format!("{}.", book.id).yellow(),
        book.title.bold()
    ));
    out.push_str(&format!("{}\n", book.author));
    out.push_str(&format!(
        "{} / {}  {}\n",
        book.category,
        book.subcategory,
        format!("★ {:.1}", book.rating).dimmed()
    ));
    out.push_str("--------------------------------\n");
    if !book.description.is_empty() {
        out.push_str(&format!("{}\n\n", book.description));
    }
    out.push_str(&format!("ISBN:      {}\n", book.isbn));
    out.push_str(&format!("Location:  {}\n", book.location));
    if !book.tags.is_empty() {
        let tags: Vec<String> = book.tags.iter().map(|t| format!("#{}", t)).collect();
        out.push_str(&format!("Tags:      {}\n", tags.join(" ").cyan()));
    }
    out.push_str(&format!(
        "Published: {}   Pages: {}\nPublisher: {}   Language: {}\n",
        book.published_year, book.pages, book.publisher, book.language
    ));

    match book.current_loan() {
        Some(loan) => {
            out.push('\n');
            out.push_str(&format!("{}\n", format!("Borrowed by: {}", loan.borrower).yellow()));
            out.push_str(&format!(
                "Since: {} ({})\n",
                loan.borrow_date.format(DATE_FORMAT),
                format_time_ago(loan.borrow_date, Utc::now())
            ));
            if let Some(notes) = &loan.notes {
                out.push_str(&format!("{}\n", format!("Note: {}", notes).italic()));
            }
        }
        None => out.push_str(&format!("\n{}\n", "Available".green())),
    }

    if !book.borrow_history.is_empty() {
        out.push_str("\nHistory:\n");
        for record in &book.borrow_history {
            out.push_str(&format!("  {}\n", history_line(record)));
        }
    }
}

fn history_line(record: &BorrowRecord) -> String {
    let returned = record
        .return_date
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "(out)".to_string());
    let mut line = format!(
        "{} → {:<13} {} [{}]",
        record.borrow_date.format(DATE_FORMAT),
        returned,
        record.borrower,
        record.condition
    );
    if let Some(notes) = &record.notes {
        line.push_str(&format!(" {}", notes.dimmed()));
    }
    line
}

pub fn render_facets(facets: &Facets) -> String {
    let mut out = String::new();
    for (heading, values) in [
        ("Categories", &facets.categories),
        ("Subcategories", &facets.subcategories),
        ("Languages", &facets.languages),
        ("Tags", &facets.tags),
    ] {
        out.push_str(&format!("{}\n", format!("{}:", heading).bold()));
        if values.is_empty() {
            out.push_str(&format!("  {}\n", "(none)".dimmed()));
        } else {
            out.push_str(&format!("  {}\n", values.join(", ")));
        }
    }
    out
}

pub fn render_text_list(lines: &[String], empty_message: &str) -> String {
    if lines.is_empty() {
        return format!("{}\n", empty_message.dimmed());
    }
    lines.iter().map(|l| format!("{}\n", l)).collect()
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    messages.iter().map(render_message).collect()
}

fn render_message(message: &CmdMessage) -> String {
    let styled = match message.level {
        MessageLevel::Info => message.content.dimmed(),
        MessageLevel::Success => message.content.green(),
        MessageLevel::Warning => message.content.yellow(),
        MessageLevel::Error => message.content.red(),
    };
    format!("{}\n", styled)
}

/// Prints messages in order; errors go to stderr, everything else to stdout.
pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Error => eprint!("{}", render_message(message)),
            _ => print!("{}", render_message(message)),
        }
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    timeago::Formatter::new().convert(duration.to_std().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use shelf::model::{Checkout, Condition};

    fn plain() {
        colored::control::set_override(false);
    }

    fn dune() -> Book {
        serde_json::from_value(serde_json::json!({
            "id": "1", "title": "Dune", "author": "Frank Herbert", "cover": "",
            "category": "Fiction", "subcategory": "Science Fiction", "isbn": "978-0441172719",
            "publishedYear": 1965, "publisher": "Chilton Books",
            "description": "Desert planet.", "pages": 412, "language": "English",
            "rating": 4.5, "status": "available", "location": "Shelf A3",
            "tags": ["sci-fi", "classic"], "borrowHistory": []
        }))
        .unwrap()
    }

    #[test]
    fn list_line_shows_id_title_author_status_rating() {
        plain();
        let out = render_book_list(&[dune()], LINE_WIDTH);
        let line = out.lines().next().unwrap();
        assert!(line.starts_with("  1. Dune by Frank Herbert"));
        assert!(line.contains("available"));
        assert!(line.ends_with("★ 4.5"));
        assert_eq!(line.width(), LINE_WIDTH);
    }

    #[test]
    fn list_truncates_long_titles() {
        plain();
        let mut book = dune();
        book.title = "An Extraordinarily Long Title ".repeat(5);
        let out = render_book_list(&[book], MIN_LINE_WIDTH);
        let line = out.lines().next().unwrap();
        assert!(line.contains('…'));
        assert_eq!(line.width(), MIN_LINE_WIDTH);
    }

    #[test]
    fn empty_list_says_so() {
        plain();
        assert_eq!(render_book_list(&[], LINE_WIDTH), format!("{}\n", NO_BOOKS));
    }

    #[test]
    fn full_view_shows_current_loan() {
        plain();
        let since = Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap();
        let book = dune()
            .checked_out(
                &Checkout::new("Jane Smith")
                    .with_condition(Condition::Fair)
                    .with_notes(Some("book club".into())),
                since,
            )
            .unwrap();

        let out = render_full_books(&[book]);
        assert!(out.contains("Borrowed by: Jane Smith"));
        assert!(out.contains("Since: Mar 1, 2024"));
        assert!(out.contains("Note: book club"));
        assert!(out.contains("Mar 1, 2024 → (out)"));
        assert!(out.contains("[fair]"));
        assert!(out.contains("#sci-fi #classic"));
    }

    #[test]
    fn full_view_of_available_book() {
        plain();
        let out = render_full_books(&[dune(), dune()]);
        assert!(out.contains("Available"));
        assert!(!out.contains("Borrowed by"));
        assert!(!out.contains("History:"));
        assert_eq!(out.matches("================================").count(), 1);
    }

    #[test]
    fn facets_render_every_group() {
        plain();
        let facets = Facets {
            categories: vec!["Fiction".into()],
            subcategories: vec![],
            languages: vec!["English".into(), "French".into()],
            tags: vec!["sci-fi".into()],
        };
        let out = render_facets(&facets);
        assert!(out.contains("Categories:\n  Fiction\n"));
        assert!(out.contains("Subcategories:\n  (none)\n"));
        assert!(out.contains("Languages:\n  English, French\n"));
    }

    #[test]
    fn time_ago_is_relative() {
        let now = Utc::now();
        assert_eq!(format_time_ago(now - Duration::days(3), now), "3 days ago");
    }

    #[test]
    fn messages_render_one_per_line() {
        plain();
        let out = render_messages(&[CmdMessage::success("ok"), CmdMessage::error("bad")]);
        assert_eq!(out, "ok\nbad\n");
    }
}
