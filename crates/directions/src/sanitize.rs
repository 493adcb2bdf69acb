//! Provider instructions arrive as HTML fragments. Clients get plain text.

const BLOCK_TAGS: [&str; 3] = ["div", "br", "p"];

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = entity.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}

/// Drops markup, decodes character references and collapses whitespace.
/// Block level tags become word breaks.
pub fn instruction_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(c) = rest.chars().next() {
        match c {
            '<' => match rest.find('>') {
                Some(end) => {
                    let name = rest[1..end]
                        .trim_start_matches('/')
                        .split(|c: char| c.is_whitespace() || c == '/')
                        .next()
                        .unwrap_or_default()
                        .to_ascii_lowercase();
                    if BLOCK_TAGS.contains(&name.as_str()) {
                        text.push(' ');
                    }
                    rest = &rest[end + 1..];
                }
                None => {
                    text.push_str(rest);
                    rest = "";
                }
            },
            '&' => {
                let decoded = rest
                    .find(';')
                    .filter(|end| *end <= 10)
                    .and_then(|end| decode_entity(&rest[1..end]).map(|c| (c, end)));
                match decoded {
                    Some((c, end)) => {
                        text.push(c);
                        rest = &rest[end + 1..];
                    }
                    None => {
                        text.push('&');
                        rest = &rest[1..];
                    }
                }
            }
            c => {
                text.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_inline_markup() {
        assert_eq!(
            instruction_text("Turn <b>right</b> onto <b>N26</b>"),
            "Turn right onto N26"
        );
    }

    #[test]
    fn block_tags_separate_words() {
        assert_eq!(
            instruction_text(
                "Turn <b>left</b><div style=\"font-size:0.9em\">Restricted usage road</div>"
            ),
            "Turn left Restricted usage road"
        );
        assert_eq!(instruction_text("a<br/>b"), "a b");
    }

    #[test]
    fn decodes_references() {
        assert_eq!(
            instruction_text("Walk past St. Mary&#39;s &amp; the &quot;gate&quot;"),
            "Walk past St. Mary's & the \"gate\""
        );
        assert_eq!(instruction_text("&#x2F;&nbsp;x"), "/ x");
    }

    #[test]
    fn leaves_stray_characters_alone() {
        assert_eq!(instruction_text("a & b < c"), "a & b < c");
        assert_eq!(instruction_text("&bogus; ok"), "&bogus; ok");
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(instruction_text("Head north"), "Head north");
        assert_eq!(instruction_text(""), "");
    }
}
