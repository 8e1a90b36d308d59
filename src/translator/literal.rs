use regex::Regex;
use std::sync::LazyLock;

static DOWN_LEVEL_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^@])('\w+\\[\w.]+')").expect("valid down-level logon name regex")
});

/// Mark `'DOMAIN\account'` literals as KQL verbatim strings (`@'...'`) so the
/// backslash is not read as an escape. Literals already marked are left alone.
pub fn escape_domain_literals(query: &str) -> String {
    DOWN_LEVEL_NAME_RE
        .replace_all(query, "${1}@${2}")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_down_level_logon_name() {
        assert_eq!(
            escape_domain_literals(r"SourceUserName == 'CONTOSO\jdoe'"),
            r"SourceUserName == @'CONTOSO\jdoe'"
        );
    }

    #[test]
    fn test_account_with_dots() {
        assert_eq!(
            escape_domain_literals(r"(SourceUserName != 'corp\first.last')"),
            r"(SourceUserName != @'corp\first.last')"
        );
    }

    #[test]
    fn test_already_verbatim_is_unchanged() {
        let query = r"SourceUserName == @'CONTOSO\jdoe'";
        assert_eq!(escape_domain_literals(query), query);
    }

    #[test]
    fn test_plain_literal_is_unchanged() {
        let query = "SourceUserName == 'jdoe'";
        assert_eq!(escape_domain_literals(query), query);
    }
}
