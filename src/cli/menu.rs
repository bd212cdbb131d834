//! Interactive menu shell.
//!
//! The shell owns all terminal I/O: it collects plain strings and integers,
//! re-prompts on malformed input, and maps menu selections to the canonical
//! priority/status forms before calling the registry. EOF on stdin ends the
//! session cleanly.

use std::io::{self, BufRead, IsTerminal, Write};

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};

use crate::audit::AuditLog;
use crate::error::{Error, Result};
use crate::registry::TaskRegistry;
use crate::task::{Priority, Status, Task};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Run the menu loop until the user picks exit or stdin closes.
pub fn run(registry: &mut TaskRegistry, audit: &AuditLog) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock().lines();

    loop {
        clear_screen();
        print_banner();
        print_menu();

        let Some(choice) = prompt_choice(&mut input, audit, "Select an option: ", 0, 5)? else {
            break;
        };

        match choice {
            0 => break,
            1 => add_task(registry, audit, &mut input)?,
            2 => find_task(registry, audit, &mut input)?,
            3 => list_by_priority(registry, audit, &mut input)?,
            4 => list_by_due_date(registry),
            5 => update_status(registry, audit, &mut input)?,
            _ => {}
        }

        if pause(&mut input)?.is_none() {
            break;
        }
    }

    Ok(())
}

fn clear_screen() {
    let mut stdout = io::stdout();
    if stdout.is_terminal() {
        let _ = execute!(stdout, Clear(ClearType::All), MoveTo(0, 0));
    }
}

fn print_banner() {
    println!("{}", "=".repeat(60));
    println!("{:^60}", "TASKDECK");
    println!("{}", "=".repeat(60));
    println!();
}

fn print_menu() {
    println!("1. Add a new task");
    println!("2. Find a task by id");
    println!("3. List tasks by priority");
    println!("4. List tasks by due date");
    println!("5. Update a task's status");
    println!("0. Exit");
    println!();
}

// =============================================================================
// Menu actions
// =============================================================================

fn add_task<I>(registry: &mut TaskRegistry, audit: &AuditLog, input: &mut I) -> Result<()>
where
    I: Iterator<Item = io::Result<String>>,
{
    let Some(title) = prompt_line(input, "Title: ")? else {
        return Ok(());
    };
    let Some(description) = prompt_line(input, "Description: ")? else {
        return Ok(());
    };
    let Some(priority) = prompt_priority(input, audit)? else {
        return Ok(());
    };
    let Some(due_at) = prompt_due_date(input, audit)? else {
        return Ok(());
    };

    match registry.create(title, description, priority.as_str(), due_at) {
        Ok(task) => {
            println!("\nTask created:");
            print_task(&task);
        }
        Err(err) => println!("Error: {}", err),
    }
    Ok(())
}

fn find_task<I>(registry: &TaskRegistry, audit: &AuditLog, input: &mut I) -> Result<()>
where
    I: Iterator<Item = io::Result<String>>,
{
    let Some(id) = prompt_number(input, audit, "Task id: ")? else {
        return Ok(());
    };

    match registry.find(id) {
        Ok(task) => print_task(&task),
        Err(Error::NotFound(_)) => println!("No task with id {}.", id),
        Err(err) => println!("Error: {}", err),
    }
    Ok(())
}

fn list_by_priority<I>(registry: &TaskRegistry, audit: &AuditLog, input: &mut I) -> Result<()>
where
    I: Iterator<Item = io::Result<String>>,
{
    println!("1. Low to high");
    println!("2. High to low");
    let Some(choice) = prompt_choice(input, audit, "Order: ", 1, 2)? else {
        return Ok(());
    };

    let tasks = registry.list_by_priority(choice == 1);
    if tasks.is_empty() {
        println!("No tasks registered.");
    } else {
        for task in &tasks {
            print_task(task);
        }
    }
    Ok(())
}

fn list_by_due_date(registry: &TaskRegistry) {
    let tasks = registry.list_by_due_date();
    if tasks.is_empty() {
        println!("No open tasks.");
    } else {
        println!("Open tasks, soonest due date first:");
        for task in &tasks {
            print_task(task);
        }
    }
}

fn update_status<I>(registry: &mut TaskRegistry, audit: &AuditLog, input: &mut I) -> Result<()>
where
    I: Iterator<Item = io::Result<String>>,
{
    let Some(id) = prompt_number(input, audit, "Task id: ")? else {
        return Ok(());
    };
    let Some(status) = prompt_status(input, audit)? else {
        return Ok(());
    };

    match registry.update_status(id, status.as_str()) {
        Ok(task) => {
            println!("\nStatus updated:");
            print_task(&task);
        }
        Err(Error::NotFound(_)) => println!("No task with id {}.", id),
        Err(err) => println!("Error: {}", err),
    }
    Ok(())
}

// =============================================================================
// Prompt helpers
// =============================================================================

/// Show `prompt` and read one trimmed line. `None` means stdin closed.
fn prompt_line<I>(input: &mut I, prompt: &str) -> Result<Option<String>>
where
    I: Iterator<Item = io::Result<String>>,
{
    print!("{}", prompt);
    io::stdout().flush()?;
    match input.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}

/// Read a number, re-prompting until one parses. Bad attempts go to the
/// error log.
fn prompt_number<I>(input: &mut I, audit: &AuditLog, prompt: &str) -> Result<Option<u64>>
where
    I: Iterator<Item = io::Result<String>>,
{
    loop {
        let Some(raw) = prompt_line(input, prompt)? else {
            return Ok(None);
        };
        match raw.parse::<u64>() {
            Ok(value) => return Ok(Some(value)),
            Err(_) => {
                audit.record_error(&format!("invalid input: {}", raw));
                println!("Enter a valid number.");
            }
        }
    }
}

/// Read a number within `low..=high`, re-prompting on out-of-range values.
fn prompt_choice<I>(
    input: &mut I,
    audit: &AuditLog,
    prompt: &str,
    low: u64,
    high: u64,
) -> Result<Option<u64>>
where
    I: Iterator<Item = io::Result<String>>,
{
    loop {
        let Some(value) = prompt_number(input, audit, prompt)? else {
            return Ok(None);
        };
        if (low..=high).contains(&value) {
            return Ok(Some(value));
        }
        println!("Enter a number between {} and {}.", low, high);
    }
}

fn prompt_priority<I>(input: &mut I, audit: &AuditLog) -> Result<Option<Priority>>
where
    I: Iterator<Item = io::Result<String>>,
{
    println!("1. High");
    println!("2. Medium");
    println!("3. Low");
    let Some(choice) = prompt_choice(input, audit, "Priority: ", 1, 3)? else {
        return Ok(None);
    };
    Ok(Some(match choice {
        1 => Priority::High,
        2 => Priority::Medium,
        _ => Priority::Low,
    }))
}

fn prompt_status<I>(input: &mut I, audit: &AuditLog) -> Result<Option<Status>>
where
    I: Iterator<Item = io::Result<String>>,
{
    println!("1. Pending");
    println!("2. In progress");
    println!("3. Completed");
    let Some(choice) = prompt_choice(input, audit, "Status: ", 1, 3)? else {
        return Ok(None);
    };
    Ok(Some(match choice {
        1 => Status::Pending,
        2 => Status::InProgress,
        _ => Status::Completed,
    }))
}

/// Read a local `YYYY-MM-DD HH:MM` timestamp, re-prompting while the text is
/// malformed or the moment is already in the past.
fn prompt_due_date<I>(input: &mut I, audit: &AuditLog) -> Result<Option<DateTime<Utc>>>
where
    I: Iterator<Item = io::Result<String>>,
{
    loop {
        let Some(raw) = prompt_line(input, "Due date (YYYY-MM-DD HH:MM): ")? else {
            return Ok(None);
        };

        let naive = match NaiveDateTime::parse_from_str(&raw, DATE_FORMAT) {
            Ok(naive) => naive,
            Err(_) => {
                audit.record_error(&format!("invalid date format: {}", raw));
                println!("Invalid format. Use YYYY-MM-DD HH:MM.");
                continue;
            }
        };

        let Some(local) = Local.from_local_datetime(&naive).earliest() else {
            println!("That local time does not exist. Pick another.");
            continue;
        };

        let due_at = local.with_timezone(&Utc);
        if due_at < Utc::now() {
            println!("The due date cannot be in the past.");
            continue;
        }
        return Ok(Some(due_at));
    }
}

fn pause<I>(input: &mut I) -> Result<Option<String>>
where
    I: Iterator<Item = io::Result<String>>,
{
    prompt_line(input, "\nPress Enter to continue...")
}

fn print_task(task: &Task) {
    println!("{}", "-".repeat(50));
    println!("ID: {}", task.id);
    println!("Title: {}", task.title);
    println!("Description: {}", task.description);
    println!("Priority: {}", task.priority.as_str());
    println!("Status: {}", task.status.as_str());
    println!(
        "Due: {}",
        task.due_at.with_timezone(&Local).format(DATE_FORMAT)
    );
    println!("{}", "-".repeat(50));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(lines: &[&str]) -> impl Iterator<Item = io::Result<String>> {
        lines
            .iter()
            .map(|line| Ok(line.to_string()))
            .collect::<Vec<_>>()
            .into_iter()
    }

    fn test_audit(dir: &tempfile::TempDir) -> AuditLog {
        AuditLog::new(dir.path().join("logs"))
    }

    #[test]
    fn number_prompt_retries_until_valid() {
        let dir = tempfile::tempdir().expect("tempdir");
        let audit = test_audit(&dir);
        let mut input = script(&["abc", "", "42"]);

        let value = prompt_number(&mut input, &audit, "> ").expect("prompt");
        assert_eq!(value, Some(42));

        let errors = std::fs::read_to_string(audit.error_log()).expect("error log");
        assert_eq!(errors.lines().count(), 2);
    }

    #[test]
    fn number_prompt_reports_eof() {
        let dir = tempfile::tempdir().expect("tempdir");
        let audit = test_audit(&dir);
        let mut input = script(&[]);

        let value = prompt_number(&mut input, &audit, "> ").expect("prompt");
        assert_eq!(value, None);
    }

    #[test]
    fn choice_prompt_rejects_out_of_range() {
        let dir = tempfile::tempdir().expect("tempdir");
        let audit = test_audit(&dir);
        let mut input = script(&["9", "2"]);

        let value = prompt_choice(&mut input, &audit, "> ", 0, 5).expect("prompt");
        assert_eq!(value, Some(2));
    }

    #[test]
    fn due_date_prompt_rejects_malformed_and_past_dates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let audit = test_audit(&dir);
        let future = (Local::now() + chrono::Duration::hours(2))
            .format(DATE_FORMAT)
            .to_string();
        let mut input = script(&["not a date", "2001-01-01 00:00", &future]);

        let value = prompt_due_date(&mut input, &audit)
            .expect("prompt")
            .expect("value");
        assert!(value > Utc::now());

        let errors = std::fs::read_to_string(audit.error_log()).expect("error log");
        assert!(errors.contains("invalid date format: not a date"));
    }

    #[test]
    fn priority_menu_maps_choices_to_canonical_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let audit = test_audit(&dir);

        let mut input = script(&["1"]);
        assert_eq!(
            prompt_priority(&mut input, &audit).expect("prompt"),
            Some(Priority::High)
        );

        let mut input = script(&["3"]);
        assert_eq!(
            prompt_priority(&mut input, &audit).expect("prompt"),
            Some(Priority::Low)
        );
    }

    #[test]
    fn status_menu_maps_choices_to_canonical_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let audit = test_audit(&dir);

        let mut input = script(&["2"]);
        assert_eq!(
            prompt_status(&mut input, &audit).expect("prompt"),
            Some(Status::InProgress)
        );
    }
}
