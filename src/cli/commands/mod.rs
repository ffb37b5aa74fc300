//! One module per subcommand.  Each exposes `execute`.

pub mod add;
pub mod delete;
pub mod edit;
pub mod export;
pub mod generate;
pub mod group;
pub mod import_cmd;
pub mod init;
pub mod list;
pub mod show;
