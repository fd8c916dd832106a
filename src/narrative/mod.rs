//! AI narrative segmentation.
//!
//! The external narrative service returns one freeform text block.
//! This module splits it into an introduction, the numbered findings,
//! and a conclusion, using the "digits followed by a period" line
//! convention the service follows. Segmentation never fails: text with
//! no numbered structure degrades to a single intro.

use crate::models::NarrativeSections;

/// Split a narrative text block into intro / findings / conclusion.
pub fn segment(text: &str) -> NarrativeSections {
    let sections = split_sections(text);

    // No numbered structure anywhere: the whole text is the intro.
    if !sections.iter().any(|s| is_section_header(s)) {
        return NarrativeSections {
            intro: Some(text.to_string()),
            findings: Vec::new(),
            conclusion: None,
        };
    }

    let mut result = NarrativeSections::default();
    let mut sections = sections.into_iter().peekable();

    if let Some(first) = sections.peek() {
        if !is_section_header(first) {
            result.intro = sections.next();
        }
    }
    result.findings.extend(sections);

    // Line accumulation glues trailing prose onto the final numbered
    // finding; that trailing run is the conclusion.
    if let Some(last) = result.findings.last_mut() {
        if let Some(newline) = last.find('\n') {
            let tail = last[newline + 1..].trim_start_matches('\n').to_string();
            if !tail.trim().is_empty() {
                last.truncate(newline);
                result.conclusion = Some(tail);
            }
        }
    }

    result
}

/// Accumulate lines into sections; each header line starts a new one.
fn split_sections(text: &str) -> Vec<String> {
    let mut sections: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if is_section_header(line) {
            if !current.is_empty() {
                sections.push(current.join("\n"));
            }
            current = vec![line];
        } else {
            current.push(line);
        }
    }

    if !current.is_empty() {
        sections.push(current.join("\n"));
    }

    sections
}

/// True when the line (after leading whitespace) starts with one or
/// more digits followed by a period, e.g. "1." or "12.".
fn is_section_header(line: &str) -> bool {
    let trimmed = line.trim_start();
    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && trimmed[digits..].starts_with('.')
}
