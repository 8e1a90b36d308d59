use regex::{Captures, Regex};

/// Replace every match of `re`, building each replacement from that match's
/// own captures. The first error aborts the rewrite and is returned as-is.
pub fn try_replace_all<E>(
    re: &Regex,
    text: &str,
    mut replace: impl FnMut(&Captures) -> Result<String, E>,
) -> Result<String, E> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&text[last..whole.start()]);
        out.push_str(&replace(&caps)?);
        last = whole.end();
    }

    out.push_str(&text[last..]);
    Ok(out)
}
