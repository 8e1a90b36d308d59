use regex::{Captures, Regex};
use std::sync::LazyLock;

static ADDR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\baddr (==|!=) '?((?:\d{1,3}\.){3}\d{1,3}(?:/\d{1,2})?)'?")
        .expect("valid addr regex")
});

/// Expand a bare `addr` comparison into source-or-destination form.
///
/// `addr == v` matches when either side equals `v`; `addr != v` is its
/// negation, so neither side may equal `v`. Both forms emit quoted literals.
pub fn expand_address(query: &str) -> String {
    ADDR_RE
        .replace_all(query, |caps: &Captures| {
            let value = &caps[2];
            if &caps[1] == "==" {
                format!("SourceIP == '{value}' or DestinationIP == '{value}'")
            } else {
                format!("not(SourceIP == '{value}' or DestinationIP == '{value}')")
            }
        })
        .into_owned()
}
