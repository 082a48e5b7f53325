//! Shared layout helpers for help screens.

/// Indentation of every entry under a section heading.
pub(crate) const OFFSET: &str = "  ";

/// Gap between the widest left column and the description column.
pub(crate) const TAB_WIDTH: usize = 4;

/// Align the description column of `lines`.
///
/// Each line marks the start of its description with a single `\t`. The tab
/// is replaced with spaces so that every description starts `TAB_WIDTH`
/// columns after the rightmost tab position. Lines without a tab are left
/// untouched.
pub(crate) fn align_tabs(lines: &mut [String]) {
    let column = |s: &str| s.find('\t').map(|at| s[..at].chars().count());

    let Some(right) = lines.iter().filter_map(|s| column(s)).max() else {
        return;
    };

    for line in lines.iter_mut() {
        if let Some(at) = line.find('\t') {
            let cur = line[..at].chars().count();
            let pad = " ".repeat(right - cur + TAB_WIDTH);
            line.replace_range(at..at + 1, &pad);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_the_widest_column() {
        let mut lines = vec![
            "  -h, --help <flag>\tprint this help and exit".to_string(),
            "  -i <INT>\tan integer".to_string(),
            "  no description".to_string(),
        ];
        align_tabs(&mut lines);
        assert_eq!(lines[0], "  -h, --help <flag>    print this help and exit");
        assert_eq!(lines[1], "  -i <INT>             an integer");
        assert_eq!(lines[2], "  no description");
    }

    #[test]
    fn only_the_first_tab_is_a_separator() {
        let mut lines = vec!["  a\tb\tc".to_string()];
        align_tabs(&mut lines);
        assert_eq!(lines[0], "  a    b\tc");
    }

    #[test]
    fn no_tabs_is_a_no_op() {
        let mut lines = vec!["  a".to_string(), "  b".to_string()];
        align_tabs(&mut lines);
        assert_eq!(lines, vec!["  a".to_string(), "  b".to_string()]);
    }
}
