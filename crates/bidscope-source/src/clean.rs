//! Cleanup of text pulled out of PDF text layers

/// Share of filler characters above which a line is treated as layout noise
const FILLER_RATIO: f64 = 0.6;

/// Normalize raw PDF text before chunking
///
/// - drops characters outside printable ASCII
/// - drops blank lines and lines made mostly of `.`, `-` and spaces
///   (dot leaders in tables of contents, horizontal rules); padding
///   around a short line such as a lone figure does not count
/// - drops standalone `Page N` markers
/// - collapses all whitespace runs to a single space
///
/// Numbers are kept: quantities and dollar amounts are what the
/// estimator needs.
///
/// # Examples
///
/// ```
/// use bidscope_source::clean_extracted_text;
///
/// let raw = "Bid Schedule\n--------------\nPage 2\nItem 1 ....  $4,500";
/// assert_eq!(clean_extracted_text(raw), "Bid Schedule Item 1 .... $4,500");
/// ```
pub fn clean_extracted_text(text: &str) -> String {
    let printable: String = text
        .chars()
        .filter(|c| c.is_ascii_graphic() || c.is_ascii_whitespace())
        .collect();

    let kept_lines: Vec<&str> = printable
        .lines()
        .filter(|line| !is_filler_line(line))
        .collect();

    let joined = kept_lines.join(" ");
    let words: Vec<&str> = joined.split_whitespace().collect();

    let mut cleaned = Vec::with_capacity(words.len());
    let mut i = 0;
    while i < words.len() {
        let is_page_marker = words[i].eq_ignore_ascii_case("page")
            && words
                .get(i + 1)
                .is_some_and(|next| next.chars().all(|c| c.is_ascii_digit()));
        if is_page_marker {
            i += 2;
            continue;
        }
        cleaned.push(words[i]);
        i += 1;
    }

    cleaned.join(" ")
}

/// Measured with padding removed and whitespace runs collapsed, so only
/// leaders and rules count against a line
fn is_filler_line(line: &str) -> bool {
    let normalized = line.split_whitespace().collect::<Vec<_>>().join(" ");
    let total = normalized.chars().count();
    if total == 0 {
        return true;
    }
    let filler = normalized
        .chars()
        .filter(|c| matches!(c, '.' | '-' | ' ' | '\t'))
        .count();
    filler as f64 / total as f64 > FILLER_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_dot_leaders_and_rules() {
        let raw = "Table of Contents\nIntroduction ..................... 3\n---------\nScope";
        assert_eq!(clean_extracted_text(raw), "Table of Contents Scope");
    }

    #[test]
    fn test_removes_page_markers_but_keeps_numbers() {
        let raw = "Page 12\nConcrete: 450 CY at $135\nPAGE 13";
        assert_eq!(clean_extracted_text(raw), "Concrete: 450 CY at $135");
    }

    #[test]
    fn test_page_word_without_number_is_kept() {
        assert_eq!(clean_extracted_text("see page three"), "see page three");
    }

    #[test]
    fn test_drops_non_ascii() {
        assert_eq!(clean_extracted_text("caf\u{e9} \u{2022} menu"), "caf menu");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(clean_extracted_text("  a \t\t b\n\n\nc  "), "a b c");
    }

    #[test]
    fn test_padded_figures_are_kept() {
        assert_eq!(clean_extracted_text("Total\n  450  \n\t$1,200\t"), "Total 450 $1,200");
    }

    #[test]
    fn test_padding_does_not_hide_a_rule() {
        assert_eq!(clean_extracted_text("Scope\n   ----------   \nWork"), "Scope Work");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_extracted_text(""), "");
        assert_eq!(clean_extracted_text("\n\n"), "");
    }
}
