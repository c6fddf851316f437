//! Terminal rendering of transcripts and the session catalog

use crate::history::render::{
    HEADING_CLOSE, HEADING_OPEN, LINE_BREAK, STRONG_CLOSE, STRONG_OPEN,
};
use crate::history::{Message, Sender, SessionSummary, Transcript};
use colored::Colorize;
use prettytable::{format, Table};

/// Translate stored markup into terminal text
///
/// Headings become bold underlined text on their own line, emphasis becomes
/// bold, and line-break markers become newlines.
pub fn to_terminal(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix(HEADING_OPEN) {
            let (inner, tail) = split_closing(after, HEADING_CLOSE);
            out.push_str(&inner.bold().underline().to_string());
            out.push('\n');
            rest = tail;
        } else if let Some(after) = rest.strip_prefix(STRONG_OPEN) {
            let (inner, tail) = split_closing(after, STRONG_CLOSE);
            out.push_str(&inner.bold().to_string());
            rest = tail;
        } else if let Some(after) = rest.strip_prefix(LINE_BREAK) {
            out.push('\n');
            rest = after;
        } else {
            let next = rest
                .char_indices()
                .skip(1)
                .find(|(i, _)| rest[*i..].starts_with('<'))
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            out.push_str(&rest[..next]);
            rest = &rest[next..];
        }
    }

    out
}

fn split_closing<'a>(text: &'a str, closing: &str) -> (&'a str, &'a str) {
    match text.find(closing) {
        Some(end) => (&text[..end], &text[end + closing.len()..]),
        None => (text, ""),
    }
}

/// Print a single message with a sender label
pub fn print_message(message: &Message) {
    let time = message.timestamp.format("%H:%M");
    match message.sender {
        Sender::User => {
            println!("{} {}", format!("[{}] you:", time).cyan().bold(), message.content);
        }
        Sender::Bot => {
            let label = match (&message.intent, message.confidence) {
                (Some(intent), Some(confidence)) => {
                    format!("[{}] assistant ({}, {:.0}%):", time, intent, confidence * 100.0)
                }
                (Some(intent), None) => format!("[{}] assistant ({}):", time, intent),
                _ => format!("[{}] assistant:", time),
            };
            println!("{}", label.green().bold());
            println!("{}", to_terminal(&message.content));
        }
    }
}

/// Print a whole transcript under its title
pub fn print_transcript(transcript: &Transcript) {
    println!();
    println!("{}", transcript.title.bold());
    if !transcript.session_id.is_empty() {
        println!("{}", format!("session {}", transcript.session_id).dimmed());
    }
    println!();

    if transcript.is_empty() {
        println!("{}", "No messages yet.".yellow());
        return;
    }

    for message in &transcript.messages {
        print_message(message);
        println!();
    }
}

/// Print up to `limit` catalog entries as a table, marking the active session
pub fn print_catalog(catalog: &[SessionSummary], limit: usize, active: Option<&str>) {
    if catalog.is_empty() {
        println!("{}", "No conversation history found.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "".bold(),
        "ID".bold(),
        "Title".bold(),
        "Started".bold(),
        "Last Active".bold()
    ]);

    for session in catalog.iter().take(limit) {
        let marker = if active == Some(session.session_id.as_str()) {
            "*".green().bold()
        } else {
            "".normal()
        };
        let id_short: String = session.session_id.chars().take(8).collect();
        let title = session.display_title();
        let title = if title.chars().count() > 40 {
            format!("{}...", title.chars().take(37).collect::<String>())
        } else {
            title
        };
        let started = session.created_at.format("%Y-%m-%d %H:%M").to_string();
        let updated = session.last_activity().format("%Y-%m-%d %H:%M").to_string();

        table.add_row(prettytable::row![marker, id_short.cyan(), title, started, updated]);
    }

    println!("\nRecent Conversations:");
    table.printstd();
    if catalog.len() > limit {
        println!("({} more not shown)", catalog.len() - limit);
    }
    println!();
}
