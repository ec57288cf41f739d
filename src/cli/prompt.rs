//! Interactive input for CLI commands.
//!
//! Commands only talk to the `Prompter` trait, so the same code runs
//! against a terminal (`TerminalPrompter`) or a scripted source.  All
//! answers are plain strings; password strength is never judged here.

use dialoguer::{Confirm, Input, Password, Select};
use zeroize::Zeroizing;

use crate::errors::{Result, SecureBoxError};

/// Environment variable that supplies the password non-interactively.
pub const PASSWORD_ENV: &str = "SECUREBOX_PASSWORD";

/// Blocking source of user input.
pub trait Prompter {
    /// Ask for a password with the given prompt text.
    fn password(&self, prompt: &str) -> Result<Zeroizing<String>>;

    /// Ask for the password again to confirm it.
    fn confirmation(&self) -> Result<Zeroizing<String>>;

    /// Ask for a new container's name and content.
    fn container_fields(&self) -> Result<(String, Zeroizing<String>)>;

    /// Ask for the name of an existing container.
    fn container_name(&self, action: &str) -> Result<String>;

    /// Ask for the content of container `name`.
    fn content(&self, name: &str) -> Result<Zeroizing<String>>;

    /// Yes/no question; `default` is used on plain Enter.
    fn confirm(&self, question: &str, default: bool) -> Result<bool>;

    /// Pick one of `items` and return its index.
    fn select(&self, prompt: &str, items: &[&str]) -> Result<usize>;

    /// Whether a human is answering (enables retries).
    fn is_interactive(&self) -> bool;
}

/// Prompts on the terminal via dialoguer, honoring `SECUREBOX_PASSWORD`.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    fn env_password() -> Option<Zeroizing<String>> {
        match std::env::var(PASSWORD_ENV) {
            Ok(pw) if !pw.is_empty() => Some(Zeroizing::new(pw)),
            _ => None,
        }
    }
}

impl Prompter for TerminalPrompter {
    fn password(&self, prompt: &str) -> Result<Zeroizing<String>> {
        if let Some(pw) = Self::env_password() {
            return Ok(pw);
        }
        let pw = Password::new()
            .with_prompt(prompt)
            .interact()
            .map_err(|e| SecureBoxError::CommandFailed(format!("password prompt: {e}")))?;
        Ok(Zeroizing::new(pw))
    }

    fn confirmation(&self) -> Result<Zeroizing<String>> {
        self.password("Confirm SecureBox password")
    }

    fn container_fields(&self) -> Result<(String, Zeroizing<String>)> {
        let name = self.container_name("create")?;
        let content = self.content(&name)?;
        Ok((name, content))
    }

    fn container_name(&self, action: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(format!("Container to {action}"))
            .interact_text()
            .map_err(|e| SecureBoxError::CommandFailed(format!("input prompt: {e}")))
    }

    fn content(&self, name: &str) -> Result<Zeroizing<String>> {
        let content = Password::new()
            .with_prompt(format!("Content for '{name}'"))
            .allow_empty_password(true)
            .interact()
            .map_err(|e| SecureBoxError::CommandFailed(format!("input prompt: {e}")))?;
        Ok(Zeroizing::new(content))
    }

    fn confirm(&self, question: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(question)
            .default(default)
            .interact()
            .map_err(|e| SecureBoxError::CommandFailed(format!("confirm prompt: {e}")))
    }

    fn select(&self, prompt: &str, items: &[&str]) -> Result<usize> {
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()
            .map_err(|e| SecureBoxError::CommandFailed(format!("menu: {e}")))
    }

    fn is_interactive(&self) -> bool {
        Self::env_password().is_none()
    }
}

/// Answers from a fixed script, for tests and automation.
///
/// Each call pops the next answer; running out is `UserCancelled`.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: std::cell::RefCell<std::collections::VecDeque<String>>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: std::cell::RefCell::new(answers.into_iter().map(Into::into).collect()),
        }
    }

    fn next(&self) -> Result<String> {
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or(SecureBoxError::UserCancelled)
    }
}

impl Prompter for ScriptedPrompter {
    fn password(&self, _prompt: &str) -> Result<Zeroizing<String>> {
        self.next().map(Zeroizing::new)
    }

    fn confirmation(&self) -> Result<Zeroizing<String>> {
        self.next().map(Zeroizing::new)
    }

    fn container_fields(&self) -> Result<(String, Zeroizing<String>)> {
        let name = self.next()?;
        let content = self.next()?;
        Ok((name, Zeroizing::new(content)))
    }

    fn container_name(&self, _action: &str) -> Result<String> {
        self.next()
    }

    fn content(&self, _name: &str) -> Result<Zeroizing<String>> {
        self.next().map(Zeroizing::new)
    }

    fn confirm(&self, _question: &str, _default: bool) -> Result<bool> {
        Ok(matches!(self.next()?.as_str(), "y" | "yes"))
    }

    /// The scripted answer is matched against item labels, ignoring case.
    fn select(&self, _prompt: &str, items: &[&str]) -> Result<usize> {
        let answer = self.next()?;
        items
            .iter()
            .position(|item| item.eq_ignore_ascii_case(&answer))
            .ok_or_else(|| SecureBoxError::CommandFailed(format!("no menu item '{answer}'")))
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_answers_come_in_order() {
        let p = ScriptedPrompter::new(["pw", "wifi", "ssid=home", "yes"]);
        assert_eq!(p.password("x").unwrap().as_str(), "pw");
        let (name, content) = p.container_fields().unwrap();
        assert_eq!(name, "wifi");
        assert_eq!(content.as_str(), "ssid=home");
        assert!(p.confirm("sure?", false).unwrap());
    }

    #[test]
    fn scripted_select_matches_labels() {
        let p = ScriptedPrompter::new(["view", "Nope"]);
        assert_eq!(p.select("menu", &["Create", "View"]).unwrap(), 1);
        assert!(p.select("menu", &["Create", "View"]).is_err());
    }

    #[test]
    fn running_out_is_cancel() {
        let p = ScriptedPrompter::new(Vec::<String>::new());
        assert!(matches!(p.password("x"), Err(SecureBoxError::UserCancelled)));
    }
}
