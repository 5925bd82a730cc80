//! Resilient extended-M3U playlist parser
//!
//! Converts raw playlist text into an ordered sequence of [`PlaylistEntry`]
//! records. Catalog listing order follows playlist order, so source order is
//! preserved. Parsing never fails: malformed blocks degrade (an attributes
//! line with no title yields an entry with an empty title) and unusable
//! blocks are skipped, leaving the caller to decide whether an empty result
//! is an error condition.

use tracing::debug;

use crate::models::PlaylistEntry;

/// Parse extended-M3U content into entries, in source order
///
/// Empty or non-matching input yields an empty Vec, never an error.
pub fn parse_m3u(content: &str) -> Vec<PlaylistEntry> {
    let lines: Vec<&str> = content.lines().collect();
    let mut entries = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();

        if line.starts_with("#EXTINF") {
            let locator_line = lines.get(i + 1).map(|l| l.trim());
            if let Some(entry) = parse_entry(line, locator_line) {
                entries.push(entry);
                // Consume the locator line
                i += 2;
            } else {
                debug!("Skipping EXTINF block without usable locator at line {}", i + 1);
                // Re-examine the next line: it may start the next block
                i += 1;
            }
        } else {
            i += 1;
        }
    }

    entries
}

/// Parse one EXTINF attributes line plus its locator line
///
/// Format: `#EXTINF:duration tvg-logo="..." group-title="...",Title`.
/// A missing title yields an entry with an empty title; a blank or comment
/// locator line invalidates the whole pair.
fn parse_entry(extinf_line: &str, locator_line: Option<&str>) -> Option<PlaylistEntry> {
    let locator = match locator_line {
        Some(url) if !url.is_empty() && !url.starts_with('#') => url.to_string(),
        _ => return None,
    };

    let extinf_content = extinf_line.strip_prefix("#EXTINF:").unwrap_or(extinf_line);

    // The last comma separates the attribute section from the display title.
    // No comma at all means a malformed attributes line; keep the entry with
    // an empty title rather than dropping the block.
    let (attributes_part, title) = match extinf_content.rfind(',') {
        Some(comma_pos) => (
            &extinf_content[..comma_pos],
            extinf_content[comma_pos + 1..].trim().to_string(),
        ),
        None => (extinf_content, String::new()),
    };

    let mut group = None;
    let mut logo = None;

    for (key, value) in parse_attributes(attributes_part) {
        match key.as_str() {
            "tvg-logo" => logo = Some(value),
            "group-title" => group = Some(value),
            // Recognized but unused by the catalog shapes
            "tvg-id" | "tvg-name" => {}
            _ => {}
        }
    }

    Some(PlaylistEntry {
        title,
        group,
        logo,
        locator,
    })
}

/// Parse `key="value"` pairs from an EXTINF attribute section
///
/// Attributes may appear in any order. Regex-free state machine: quoted
/// values may contain spaces, backslash escapes the next character.
fn parse_attributes(attributes: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let mut current_key = String::new();
    let mut current_value = String::new();
    let mut in_quotes = false;
    let mut in_value = false;
    let mut escape_next = false;

    for ch in attributes.chars() {
        if escape_next {
            if in_value {
                current_value.push(ch);
            } else {
                current_key.push(ch);
            }
            escape_next = false;
            continue;
        }

        match ch {
            '\\' => escape_next = true,
            '"' => {
                if in_value {
                    in_quotes = !in_quotes;
                }
            }
            '=' if !in_quotes && !in_value => {
                in_value = true;
            }
            ' ' | '\t' if !in_quotes => {
                if in_value && !current_value.is_empty() {
                    attrs.push((
                        current_key.trim().to_string(),
                        current_value.trim_matches('"').to_string(),
                    ));
                    current_key.clear();
                    current_value.clear();
                    in_value = false;
                } else if !in_value {
                    // Separator between the duration field and the first
                    // attribute, or between attributes
                    current_key.clear();
                }
            }
            _ => {
                if in_value {
                    current_value.push(ch);
                } else {
                    current_key.push(ch);
                }
            }
        }
    }

    if in_value && !current_value.is_empty() {
        attrs.push((
            current_key.trim().to_string(),
            current_value.trim_matches('"').to_string(),
        ));
    }

    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entries_in_source_order() {
        let playlist = "#EXTM3U\n\
            #EXTINF:-1 tvg-logo=\"a.png\" group-title=\"News\",Channel A\n\
            http://src/a.m3u8\n\
            #EXTINF:-1,Channel B\n\
            http://src/b.m3u8\n\
            #EXTINF:-1 group-title=\"Sports\",Channel C\n\
            http://src/c.m3u8\n";

        let entries = parse_m3u(playlist);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].title, "Channel A");
        assert_eq!(entries[0].logo.as_deref(), Some("a.png"));
        assert_eq!(entries[0].group.as_deref(), Some("News"));
        assert_eq!(entries[0].locator, "http://src/a.m3u8");
        assert_eq!(entries[1].title, "Channel B");
        assert!(entries[1].group.is_none());
        assert_eq!(entries[2].title, "Channel C");
    }

    #[test]
    fn empty_input_yields_no_entries() {
        assert!(parse_m3u("").is_empty());
        assert!(parse_m3u("#EXTM3U\n").is_empty());
        assert!(parse_m3u("just some text\nwithout markers\n").is_empty());
    }

    #[test]
    fn missing_title_yields_empty_title_not_abort() {
        let playlist = "#EXTM3U\n\
            #EXTINF:-1 tvg-logo=\"x.png\"\n\
            http://src/untitled.m3u8\n\
            #EXTINF:-1,Titled\n\
            http://src/titled.m3u8\n";

        let entries = parse_m3u(playlist);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "");
        assert_eq!(entries[0].logo.as_deref(), Some("x.png"));
        assert_eq!(entries[1].title, "Titled");
    }

    #[test]
    fn attributes_parse_in_any_order() {
        let a = parse_m3u("#EXTINF:-1 tvg-logo=\"l.png\" group-title=\"G\",T\nhttp://u\n");
        let b = parse_m3u("#EXTINF:-1 group-title=\"G\" tvg-logo=\"l.png\",T\nhttp://u\n");
        assert_eq!(a, b);
        assert_eq!(a[0].logo.as_deref(), Some("l.png"));
        assert_eq!(a[0].group.as_deref(), Some("G"));
    }

    #[test]
    fn quoted_values_may_contain_spaces_and_commas() {
        let entries =
            parse_m3u("#EXTINF:-1 group-title=\"News, Weather\" tvg-id=\"ch.1\",Channel\nhttp://u\n");
        assert_eq!(entries[0].group.as_deref(), Some("News, Weather"));
        assert_eq!(entries[0].title, "Channel");
    }

    #[test]
    fn blank_or_comment_locator_invalidates_the_pair() {
        let playlist = "#EXTM3U\n\
            #EXTINF:-1,No Locator\n\
            \n\
            #EXTINF:-1,Comment Locator\n\
            #EXTVLCOPT:something\n\
            #EXTINF:-1,Good\n\
            http://src/good.m3u8\n";

        let entries = parse_m3u(playlist);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Good");
    }

    #[test]
    fn adjacent_extinf_blocks_do_not_swallow_the_next_entry() {
        let entries = parse_m3u("#EXTM3U\n#EXTINF:-1,Broken\n#EXTINF:-1,Next\nhttp://u\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Next");
    }

    #[test]
    fn trailing_extinf_without_locator_is_skipped() {
        let entries = parse_m3u("#EXTM3U\n#EXTINF:-1,Dangling\n");
        assert!(entries.is_empty());
    }
}
