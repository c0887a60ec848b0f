//! Shared utility functions

use std::process::Command;

/// Run a command and return Ok(()) on success, or error with stderr on failure
pub fn run_command(cmd: &str, args: &[&str]) -> Result<(), String> {
    let output = Command::new(cmd)
        .args(args)
        .output()
        .map_err(|e| format!("Failed to run {cmd}: {e}"))?;

    if !output.status.success() {
        return Err(format!(
            "{} failed: {}",
            cmd,
            String::from_utf8_lossy(&output.stderr)
        ));
    }
    Ok(())
}

/// Run a command and return its stdout on success
pub fn command_output(cmd: &str, args: &[&str]) -> Result<String, String> {
    let output = Command::new(cmd)
        .args(args)
        .output()
        .map_err(|e| format!("Failed to run {cmd}: {e}"))?;

    if !output.status.success() {
        return Err(format!(
            "{} failed: {}",
            cmd,
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Start a command without waiting for it. A detached thread reaps the child.
pub fn spawn_command(cmd: &str, args: &[&str]) -> Result<(), String> {
    let mut child = Command::new(cmd)
        .args(args)
        .spawn()
        .map_err(|e| format!("Failed to run {cmd}: {e}"))?;
    let cmd = cmd.to_string();
    std::thread::spawn(move || {
        if let Err(e) = child.wait() {
            log::debug!("Failed to reap {cmd}: {e}");
        }
    });
    Ok(())
}

/// Run a command line given as program plus arguments
pub fn run_argv(argv: &[String]) -> Result<(), String> {
    let Some((cmd, args)) = argv.split_first() else {
        return Err("Empty command".to_string());
    };
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    run_command(cmd, &args)
}
