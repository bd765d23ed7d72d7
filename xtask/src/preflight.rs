use anyhow::{bail, Result};

/// Tools the build shells out to, given whether the Boost bootstrap runs.
pub fn required_tools(use_cpprest: bool) -> Vec<&'static str> {
    let mut tools = vec!["cmake"];
    if use_cpprest {
        tools.push("git");
    }
    tools
}

/// Fail early, listing every required tool that is not on PATH.
pub fn check_tools(tools: &[&str]) -> Result<()> {
    let mut missing = Vec::new();
    for tool in tools {
        match which::which(tool) {
            Ok(path) => log::debug!("[ok] {tool}: {}", path.display()),
            Err(_) => {
                log::error!("[fail] missing `{tool}` in PATH");
                missing.push(*tool);
            }
        }
    }

    if !missing.is_empty() {
        bail!("required tools not found in PATH: {}", missing.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_only_with_bootstrap() {
        assert_eq!(required_tools(false), vec!["cmake"]);
        assert_eq!(required_tools(true), vec!["cmake", "git"]);
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let err = check_tools(&["definitely-not-a-real-tool-7f3a"]).unwrap_err();
        assert!(err.to_string().contains("definitely-not-a-real-tool-7f3a"));
    }

    #[test]
    fn test_no_tools_is_ok() {
        assert!(check_tools(&[]).is_ok());
    }
}
