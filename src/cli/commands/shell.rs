//! `securebox shell` — interactive menu over an unlocked vault.
//!
//! The password is asked once; every mutation is saved before the menu
//! comes back.  A failed action prints its error and the loop goes on
//! with the store as it was before the action.

use crate::cli::output;
use crate::cli::prompt::Prompter;
use crate::cli::{unlock, Cli, Workspace};
use crate::errors::{Result, SecureBoxError};
use crate::vault::{ContainerStore, VaultContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Create,
    Edit,
    Delete,
    View,
    List,
    Exit,
}

impl MenuAction {
    const ALL: [MenuAction; 6] = [
        MenuAction::Create,
        MenuAction::Edit,
        MenuAction::Delete,
        MenuAction::View,
        MenuAction::List,
        MenuAction::Exit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuAction::Create => "Create",
            MenuAction::Edit => "Edit",
            MenuAction::Delete => "Delete",
            MenuAction::View => "View",
            MenuAction::List => "List",
            MenuAction::Exit => "Exit",
        }
    }
}

/// Execute the `shell` command.
pub fn execute(cli: &Cli, prompter: &dyn Prompter) -> Result<()> {
    let ws = Workspace::resolve(cli)?;
    let ctx = unlock(&ws, prompter)?;
    run_session(&ws, &ctx, prompter)
}

/// Menu loop for an already unlocked vault.
pub(crate) fn run_session(ws: &Workspace, ctx: &VaultContext, prompter: &dyn Prompter) -> Result<()> {
    let mut store = ctx.load()?;
    let labels: Vec<&str> = MenuAction::ALL.iter().map(|a| a.label()).collect();

    loop {
        let action = match prompter.select("SecureBox", &labels) {
            Ok(i) => MenuAction::ALL[i],
            Err(SecureBoxError::UserCancelled) => break,
            Err(e) => return Err(e),
        };

        if action == MenuAction::Exit {
            break;
        }

        match apply(action, ws, ctx, &mut store, prompter) {
            Ok(()) => {}
            Err(SecureBoxError::UserCancelled) => break,
            Err(e) => output::error(&e.to_string()),
        }
    }

    Ok(())
}

fn apply(
    action: MenuAction,
    ws: &Workspace,
    ctx: &VaultContext,
    store: &mut ContainerStore,
    prompter: &dyn Prompter,
) -> Result<()> {
    match action {
        MenuAction::Create => {
            let (name, content) = prompter.container_fields()?;
            commit(ctx, store, |next| next.create(&name, &content))?;
            ws.audit("create", Some(&name), Some("shell"));
            output::success(&format!("Container '{name}' saved"));
        }
        MenuAction::Edit => {
            let name = prompter.container_name("edit")?;
            if !store.contains(&name) {
                return Err(SecureBoxError::ContainerNotFound(name));
            }
            let content = prompter.content(&name)?;
            commit(ctx, store, |next| next.edit(&name, &content))?;
            ws.audit("edit", Some(&name), Some("shell"));
            output::success(&format!("Container '{name}' updated"));
        }
        MenuAction::Delete => {
            let name = prompter.container_name("delete")?;
            if !store.contains(&name) {
                return Err(SecureBoxError::ContainerNotFound(name));
            }
            if !prompter.confirm(&format!("Delete container '{name}'?"), false)? {
                output::info("Cancelled.");
                return Ok(());
            }
            commit(ctx, store, |next| next.delete(&name))?;
            ws.audit("delete", Some(&name), Some("shell"));
            output::success(&format!("Deleted container '{name}'"));
        }
        MenuAction::View => {
            let name = prompter.container_name("view")?;
            let content = store.view(&name)?;
            ws.audit("view", Some(&name), Some("shell"));
            println!("{content}");
        }
        MenuAction::List => {
            output::print_containers_table(&store.list_metadata());
        }
        MenuAction::Exit => {}
    }
    Ok(())
}

/// Apply `change` to a copy of `store`, save it, then swap it in.
///
/// `store` is untouched unless the save succeeds.
fn commit<F>(ctx: &VaultContext, store: &mut ContainerStore, change: F) -> Result<()>
where
    F: FnOnce(&mut ContainerStore) -> Result<()>,
{
    let mut next = store.clone();
    change(&mut next)?;
    ctx.save(&next)?;
    *store = next;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::prompt::ScriptedPrompter;
    use crate::config::Settings;
    use crate::crypto::kdf::MIN_ITERATIONS;
    use tempfile::TempDir;

    fn workspace(dir: &TempDir) -> (Workspace, VaultContext) {
        let settings = Settings {
            kdf_iterations: MIN_ITERATIONS,
            ..Settings::default()
        };
        let paths = settings.vault_paths(dir.path());
        let ws = Workspace {
            project_dir: dir.path().to_path_buf(),
            settings,
            paths,
        };
        let ctx = ws
            .verifier()
            .initialize("correct-horse", "correct-horse")
            .unwrap();
        (ws, ctx)
    }

    #[test]
    fn mutations_are_saved_before_exit() {
        let dir = TempDir::new().unwrap();
        let (ws, ctx) = workspace(&dir);

        let prompter = ScriptedPrompter::new([
            "create", "wifi", "ssid=home", //
            "create", "bank", "pin=1234", //
            "edit", "wifi", "ssid=office", //
            "delete", "bank", "y", //
            "exit",
        ]);
        run_session(&ws, &ctx, &prompter).unwrap();

        let store = ctx.load().unwrap();
        assert_eq!(store.list(), vec!["wifi".to_string()]);
        assert_eq!(store.view("wifi").unwrap(), "ssid=office");
    }

    #[test]
    fn failed_action_keeps_the_loop_running() {
        let dir = TempDir::new().unwrap();
        let (ws, ctx) = workspace(&dir);

        let prompter = ScriptedPrompter::new([
            "view", "missing", //
            "create", "notes", "hello", //
            "exit",
        ]);
        run_session(&ws, &ctx, &prompter).unwrap();

        assert!(ctx.load().unwrap().contains("notes"));
    }

    #[test]
    fn failed_save_leaves_store_unchanged() {
        let dir = TempDir::new().unwrap();
        let (ws, ctx) = workspace(&dir);
        let mut store = ctx.load().unwrap();
        store.create("wifi", "ssid=home").unwrap();

        // A directory where the vault file should be makes every save fail.
        std::fs::create_dir(ctx.paths().data()).unwrap();

        let prompter = ScriptedPrompter::new(["ghost", "boo"]);
        assert!(apply(MenuAction::Create, &ws, &ctx, &mut store, &prompter).is_err());
        assert!(!store.contains("ghost"));

        let prompter = ScriptedPrompter::new(["wifi", "ssid=evil"]);
        assert!(apply(MenuAction::Edit, &ws, &ctx, &mut store, &prompter).is_err());
        assert_eq!(store.view("wifi").unwrap(), "ssid=home");

        let prompter = ScriptedPrompter::new(["wifi", "y"]);
        assert!(apply(MenuAction::Delete, &ws, &ctx, &mut store, &prompter).is_err());
        assert!(store.contains("wifi"));
    }

    #[test]
    fn declined_delete_keeps_container() {
        let dir = TempDir::new().unwrap();
        let (ws, ctx) = workspace(&dir);

        let prompter = ScriptedPrompter::new([
            "create", "wifi", "x", //
            "delete", "wifi", "n",
        ]);
        run_session(&ws, &ctx, &prompter).unwrap();

        assert!(ctx.load().unwrap().contains("wifi"));
    }
}
