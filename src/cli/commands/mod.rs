//! One module per subcommand.

pub mod audit_cmd;
pub mod backup;
pub mod completions;
pub mod create;
pub mod delete;
pub mod edit;
pub mod init;
pub mod list;
pub mod restore;
pub mod shell;
pub mod verify;
pub mod view;
