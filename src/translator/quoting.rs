use regex::Regex;
use std::sync::LazyLock;

static BARE_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([!=]= )([^ ')]+)( ?\))").expect("valid bare value regex"));
static DOUBLED_QUOTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([!=]= )''([^']*)''").expect("valid doubled quotes regex"));
static PORT_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(Port [!=]= )'(\d+)'").expect("valid port value regex"));

/// Normalize right-hand-side quoting of `==`/`!=` comparisons.
///
/// Runs three steps in order: quote bare values that close a parenthesised
/// clause, unquote numeric `*Port` values, collapse doubled quotes around a
/// comparison value. An empty literal `''` is kept.
pub fn normalize_quotes(query: &str) -> String {
    let quoted = BARE_VALUE_RE.replace_all(query, "${1}'${2}'${3}");
    let ports = PORT_VALUE_RE.replace_all(&quoted, "${1}${2}");
    DOUBLED_QUOTES_RE
        .replace_all(&ports, "${1}'${2}'")
        .into_owned()
}
