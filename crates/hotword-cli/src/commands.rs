use crate::cli::Commands;
use hotword_core::config::{ensure_config_dir, get_config_file_path};
use hotword_core::{
    add_rule, delete_rule, is_daemon_running, load_rules, touch_config, update_rule,
    HotwordError, Result, RuleSet,
};
use hotword_daemon::{
    daemon_status, daemon_worker_entry, open_path, start_daemon, stop_daemon,
    verify_process_running, WorkerOptions,
};
use std::collections::HashMap;

pub fn handle_command(command: Option<Commands>) -> Result<()> {
    match command {
        Some(command) => handle_subcommand(command),
        None => daemon_status(),
    }
}

fn handle_subcommand(command: Commands) -> Result<()> {
    match command {
        Commands::Add {
            trigger,
            replacement,
        } => add_rule(&trigger, &replacement).map(|_| println!("Rule added successfully")),
        Commands::Delete { trigger } => {
            delete_rule(&trigger).map(|_| println!("Rule deleted successfully"))
        }
        Commands::Update {
            trigger,
            replacement,
        } => update_rule(&trigger, &replacement).map(|_| println!("Rule updated successfully")),
        Commands::List => handle_list_command(),
        Commands::Start => start_daemon(),
        Commands::Stop => stop_daemon(),
        Commands::Status => daemon_status(),
        Commands::Reload => handle_reload_command(),
        Commands::Run { dry_run } => daemon_worker_entry(WorkerOptions { dry_run }),
        Commands::Open => handle_open_command(),
        Commands::DaemonWorker => daemon_worker_entry(WorkerOptions::default()),
    }
}

fn handle_list_command() -> Result<()> {
    let rules = load_rules()?;
    println!("Rules from {}", get_config_file_path().display());

    if rules.is_empty() {
        println!("No rules configured. Add one with: hotword add -t hw -r 'Hello, world!'");
        return Ok(());
    }

    print!("{}", format_rules(&rules));
    Ok(())
}

/// One line per rule, duplicated triggers flagged.
fn format_rules(rules: &RuleSet) -> String {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for rule in rules.iter() {
        *counts.entry(rule.trigger().to_string()).or_default() += 1;
    }

    let width = rules
        .iter()
        .map(|r| r.trigger().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for rule in rules.iter() {
        let trigger = rule.trigger().to_string();
        let padding = " ".repeat(width - rule.trigger().len());
        let marker = if counts[&trigger] > 1 {
            "  (duplicate trigger)"
        } else {
            ""
        };
        out.push_str(&format!(
            "  {}{}  →  {}{}\n",
            trigger,
            padding,
            rule.replacement(),
            marker
        ));
    }
    out
}

fn handle_reload_command() -> Result<()> {
    match is_daemon_running()? {
        Some(pid) if verify_process_running(pid) => {
            touch_config()?;
            println!("Reload requested; the daemon picks up config.txt within a second.");
            Ok(())
        }
        _ => Err(HotwordError::DaemonNotRunning),
    }
}

fn handle_open_command() -> Result<()> {
    let dir = ensure_config_dir()?;
    println!("Opening {}", dir.display());
    open_path(&dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_aligns_triggers_and_flags_duplicates() {
        let rules =
            RuleSet::from_pairs([("hw", "Hello, world!"), ("sig", "Regards"), ("hw", "Hi")])
                .unwrap();

        assert_eq!(
            format_rules(&rules),
            "  hw   →  Hello, world!  (duplicate trigger)\n\
             \x20 sig  →  Regards\n\
             \x20 hw   →  Hi  (duplicate trigger)\n"
        );
    }
}
