/// Expand a leading `~` to `$HOME`, then `$VAR` and `${VAR}` references.
/// Variables that aren't set are left as they are.
pub fn expand(raw: &str) -> String {
    shellexpand::full_with_context_no_errors(raw, home_dir, |var| std::env::var(var).ok())
        .into_owned()
}

fn home_dir() -> Option<String> {
    std::env::var("HOME").ok()
}
