/// Expands a bundled short-option cluster such as `-rf` into `-r`, `-f`.
pub(crate) fn expand_short_flags(token: &str) -> Vec<String> {
    if !is_short_cluster(token) {
        return vec![token.to_string()];
    }
    token.chars().skip(1).map(|ch| format!("-{ch}")).collect()
}

pub(crate) fn expand_tokens(tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .flat_map(|token| expand_short_flags(token))
        .collect()
}

pub(crate) fn is_short_cluster(token: &str) -> bool {
    token.starts_with('-') && !token.starts_with("--") && token.chars().count() > 2
}
