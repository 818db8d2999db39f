mod check;
mod diff;
mod upgrade;

pub use check::cmd_check;
pub use diff::cmd_diff;
pub use upgrade::{UpgradeArgs, cmd_upgrade};
