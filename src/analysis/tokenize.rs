/// A `"..."` span becomes one token without its quotes; there is no escaping.
pub(crate) fn tokenize(command: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut rest = command;

    while let Some(ch) = rest.chars().next() {
        if ch.is_whitespace() {
            rest = &rest[ch.len_utf8()..];
            continue;
        }

        if ch == '"' {
            let body = &rest[1..];
            match body.find('"') {
                Some(end) => {
                    tokens.push(body[..end].to_string());
                    rest = &body[end + 1..];
                }
                None => rest = body,
            }
            continue;
        }

        let end = rest
            .find(|c: char| c.is_whitespace() || c == '"')
            .unwrap_or(rest.len());
        tokens.push(rest[..end].to_string());
        rest = &rest[end..];
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(tokenize("ls  -la\t/tmp"), vec!["ls", "-la", "/tmp"]);
    }

    #[test]
    fn keeps_quoted_span_as_one_token() {
        assert_eq!(
            tokenize(r#"git commit -m "fix the build""#),
            vec!["git", "commit", "-m", "fix the build"]
        );
    }

    #[test]
    fn quote_ends_a_bare_word() {
        assert_eq!(tokenize(r#"echo foo"bar baz""#), vec!["echo", "foo", "bar baz"]);
    }

    #[test]
    fn unterminated_quote_is_permissive() {
        assert_eq!(tokenize(r#"echo "hello world"#), vec!["echo", "hello", "world"]);
    }

    #[test]
    fn empty_and_blank_input_yield_nothing() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
    }

    #[test]
    fn handles_multibyte_text() {
        assert_eq!(tokenize("echo \"héllo wörld\" ünï"), vec!["echo", "héllo wörld", "ünï"]);
    }
}
