use regex::{Captures, Regex};
use std::sync::LazyLock;

static CIDR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(not\()?\b(SourceIP|DestinationIP) ([!=]=) '?((?:\d{1,3}\.){3}\d{1,3}/\d{1,2})'?",
    )
    .expect("valid cidr regex")
});

/// Rewrite `SourceIP`/`DestinationIP` comparisons against a CIDR range into
/// `ipv4_is_match` calls. A leading `not(` wrapper is carried over verbatim.
pub fn rewrite_cidr(query: &str) -> String {
    CIDR_RE
        .replace_all(query, |caps: &Captures| {
            let negation = caps.get(1).map_or("", |m| m.as_str());
            let field = &caps[2];
            let range = &caps[4];
            if &caps[3] == "!=" {
                format!("{negation}not(ipv4_is_match({field}, '{range}'))")
            } else {
                format!("{negation}ipv4_is_match({field}, '{range}')")
            }
        })
        .into_owned()
}
