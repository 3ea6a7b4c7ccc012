use crate::config::{create_sample_config, ensure_config_dir, get_config_file_path};
use crate::error::{HotwordError, Result};
use crate::rule::{Rule, RuleSet};
use std::fs;
use std::path::Path;

/// Split one config line into `(trigger, replacement)`.
///
/// Blank lines, `#` comments, lines without `=` and lines starting with `=`
/// yield `None`. Both sides are trimmed.
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    match line.find('=') {
        Some(i) if i > 0 => Some((line[..i].trim(), line[i + 1..].trim())),
        _ => None,
    }
}

/// Parse a whole rule file. Malformed lines are skipped, never errors.
pub fn parse_rules(content: &str) -> Vec<Rule> {
    let mut rules = Vec::new();

    for (number, line) in content.lines().enumerate() {
        let Some((trigger, replacement)) = parse_line(line) else {
            if !line.trim().is_empty() && !line.starts_with('#') {
                tracing::debug!(line = number + 1, "skipping malformed config line");
            }
            continue;
        };

        match Rule::new(trigger, replacement) {
            Ok(rule) => rules.push(rule),
            Err(e) => tracing::debug!(line = number + 1, error = %e, "skipping config line"),
        }
    }

    rules
}

/// Load the rules from the config directory, creating a sample file first
/// if none exists.
pub fn load_rules() -> Result<RuleSet> {
    ensure_config_dir()?;
    load_rules_from(&get_config_file_path())
}

pub fn load_rules_from(path: &Path) -> Result<RuleSet> {
    if !path.exists() {
        create_sample_config(path)?;
    }

    let content = fs::read_to_string(path)?;
    Ok(RuleSet::new(parse_rules(&content)))
}

fn validate_rule(trigger: &str, replacement: &str) -> Result<()> {
    let trimmed = trigger.trim();
    if trimmed.is_empty() {
        return Err(HotwordError::EmptyTrigger);
    }
    if trimmed != trigger {
        return Err(HotwordError::InvalidConfig(
            "trigger cannot start or end with whitespace".to_string(),
        ));
    }
    if trigger.starts_with('#') {
        return Err(HotwordError::InvalidConfig(
            "trigger cannot start with '#'".to_string(),
        ));
    }
    if trigger.contains('=') || trigger.contains('\n') || trigger.contains('\r') {
        return Err(HotwordError::InvalidConfig(
            "trigger cannot contain '=' or line breaks".to_string(),
        ));
    }
    if replacement.contains('\n') || replacement.contains('\r') {
        return Err(HotwordError::InvalidConfig(
            "replacement must fit on a single line".to_string(),
        ));
    }
    // parse_line trims, so padding would not survive a reload.
    if replacement.trim() != replacement {
        return Err(HotwordError::InvalidConfig(
            "replacement cannot start or end with whitespace".to_string(),
        ));
    }
    Ok(())
}

fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(path, content)?;
    Ok(())
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(HotwordError::ConfigNotFound(
            path.to_string_lossy().to_string(),
        ));
    }
    Ok(fs::read_to_string(path)?
        .lines()
        .map(str::to_string)
        .collect())
}

/// Add a new rule
pub fn add_rule(trigger: &str, replacement: &str) -> Result<()> {
    ensure_config_dir()?;
    add_rule_to(&get_config_file_path(), trigger, replacement)
}

pub fn add_rule_to(path: &Path, trigger: &str, replacement: &str) -> Result<()> {
    validate_rule(trigger, replacement)?;

    let mut lines = if path.exists() {
        read_lines(path)?
    } else {
        Vec::new()
    };
    lines.push(format!("{}={}", trigger, replacement));
    write_lines(path, &lines)
}

/// Delete every rule with the given trigger
pub fn delete_rule(trigger: &str) -> Result<()> {
    delete_rule_from(&get_config_file_path(), trigger)
}

pub fn delete_rule_from(path: &Path, trigger: &str) -> Result<()> {
    let mut lines = read_lines(path)?;
    let before = lines.len();
    lines.retain(|line| !matches!(parse_line(line), Some((t, _)) if t == trigger));

    if lines.len() == before {
        return Err(HotwordError::RuleNotFound(trigger.to_string()));
    }
    write_lines(path, &lines)
}

/// Update the replacement of every rule with the given trigger
pub fn update_rule(trigger: &str, replacement: &str) -> Result<()> {
    update_rule_in(&get_config_file_path(), trigger, replacement)
}

pub fn update_rule_in(path: &Path, trigger: &str, replacement: &str) -> Result<()> {
    validate_rule(trigger, replacement)?;

    let mut lines = read_lines(path)?;
    let mut updated = false;

    for line in &mut lines {
        if matches!(parse_line(line), Some((t, _)) if t == trigger) {
            *line = format!("{}={}", trigger, replacement);
            updated = true;
        }
    }

    if !updated {
        return Err(HotwordError::RuleNotFound(trigger.to_string()));
    }
    write_lines(path, &lines)
}

/// Rewrite the rule file unchanged so a running daemon picks it up again.
pub fn touch_config() -> Result<()> {
    touch_file(&get_config_file_path())
}

pub fn touch_file(path: &Path) -> Result<()> {
    let content = fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            HotwordError::ConfigNotFound(path.to_string_lossy().to_string())
        }
        _ => HotwordError::Io(e),
    })?;
    fs::write(path, content)?;
    Ok(())
}
