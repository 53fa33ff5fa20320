use anyhow::Result;

use desc::RunDesc;

const DEFAULT_ACCOUNT: &str = "rrg-allen";
const DEFAULT_MEM_PER_CPU: &str = "14500m";

/// `account` from the description, or the group's default allocation.
pub fn account(desc: &RunDesc) -> Result<String> {
    match desc.get_opt_str(&["account"])? {
        Some(account) => Ok(account),
        None => {
            log::warn!(
                "No account found in run description YAML file, so assuming {DEFAULT_ACCOUNT}. \
                If sbatch complains you can specify a different account with a YAML line \
                like account: def-allen"
            );
            Ok(DEFAULT_ACCOUNT.to_owned())
        }
    }
}

/// `email` from the description, or `$USER@eoas.ubc.ca`.
pub fn email(desc: &RunDesc) -> Result<String> {
    match desc.get_opt_str(&["email"])? {
        Some(email) => Ok(email),
        None => {
            let user = std::env::var("USER").unwrap_or_default();
            Ok(format!("{user}@eoas.ubc.ca"))
        }
    }
}

pub fn mem_per_cpu(desc: &RunDesc) -> Result<String> {
    Ok(desc
        .get_opt_str(&["mem per cpu"])?
        .unwrap_or_else(|| DEFAULT_MEM_PER_CPU.to_owned()))
}
