use std::path::Path;

use crate::analysis::is_short_cluster;

pub const NO_LOCAL_RULE: &str = "No safe automatic alternative available. Review command manually.";

pub(crate) fn local_alternative(tokens: &[String]) -> Option<String> {
    let head = locate_head(tokens)?;
    let (prefix, rest) = tokens.split_at(head);
    let (command, args) = rest.split_first()?;
    let has = |flag: &str| args.iter().any(|arg| arg == flag);

    match command.as_str() {
        "rm" if is_recursive_rm(args) => {
            if cfg!(target_os = "windows") {
                return Some(windows_remove(args));
            }
            Some(join(prefix, command, &interactive_rm_args(args)))
        }
        "chmod" if has("777") => {
            let args = args
                .iter()
                .map(|arg| if arg == "777" { "755".to_string() } else { arg.clone() })
                .collect::<Vec<_>>();
            Some(join(prefix, command, &args))
        }
        "git" if has("reset") && has("--hard") => Some("git restore --staged .".to_string()),
        "git" if has("clean") && (has("-fd") || has("-df") || (has("-f") && has("-d"))) => {
            Some("git clean -n".to_string())
        }
        "dd" => Some(r#"echo "Dangerous disk overwrite command blocked""#.to_string()),
        _ if command == "mkfs" || rest.iter().any(|token| token.starts_with("mkfs.")) => {
            Some(r#"echo "Filesystem format prevented""#.to_string())
        }
        _ => None,
    }
}

fn is_recursive_rm(args: &[String]) -> bool {
    args.iter().any(|arg| {
        arg == "--recursive"
            || (arg.starts_with('-')
                && !arg.starts_with("--")
                && (arg.contains('r') || arg.contains('R')))
    })
}

fn interactive_rm_args(args: &[String]) -> Vec<String> {
    let mut replaced = false;
    let mut rewritten = args
        .iter()
        .map(|arg| {
            if arg == "--force" {
                replaced = true;
                return "--interactive".to_string();
            }
            if (is_short_cluster(arg) || arg == "-f") && arg.contains('f') {
                replaced = true;
                return arg.replace('f', "i");
            }
            arg.clone()
        })
        .collect::<Vec<_>>();
    if !replaced {
        rewritten.insert(0, "-i".to_string());
    }
    rewritten
}

fn windows_remove(args: &[String]) -> String {
    let targets = args
        .iter()
        .filter(|arg| !arg.starts_with('-'))
        .collect::<Vec<_>>();
    let Some(first) = targets.first() else {
        return "echo 'Please specify a target directory'".to_string();
    };
    let quoted = targets
        .iter()
        .map(|target| format!("\"{target}\""))
        .collect::<Vec<_>>()
        .join(" ");
    if Path::new(first.as_str()).is_file() {
        format!("del /F /Q {quoted}")
    } else {
        format!("rmdir /S /Q {quoted}")
    }
}

fn join(prefix: &[String], command: &str, args: &[String]) -> String {
    prefix
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(command))
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Index of the real command after env assignments and wrappers like `sudo`.
fn locate_head(tokens: &[String]) -> Option<usize> {
    let mut index = 0usize;
    while index < tokens.len() && looks_like_assignment(&tokens[index]) {
        index += 1;
    }
    while index < tokens.len() && is_wrapper_command(&tokens[index]) {
        index += 1;
    }
    (index < tokens.len()).then_some(index)
}

fn looks_like_assignment(token: &str) -> bool {
    if token.starts_with('-') {
        return false;
    }
    let Some((name, _)) = token.split_once('=') else {
        return false;
    };
    !name.is_empty() && name.chars().all(|ch| ch == '_' || ch.is_ascii_alphanumeric())
}

fn is_wrapper_command(token: &str) -> bool {
    matches!(token, "sudo" | "env" | "nohup" | "time" | "nice")
}
