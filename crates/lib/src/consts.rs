/// Name used for the binary and in user-facing messages.
pub const APP_NAME: &str = "teamsfx";

/// Documentation for the unified manifest and local env config layout.
pub const GUIDE_URL: &str = "https://aka.ms/teamsfx-unify-config-guide";

/// Environment variable that turns on the unified config layout.
pub const UNIFY_CONFIG_ENV: &str = "TEAMSFX_CONFIG_UNIFY";

/// Environment variable selecting message wording (`vscode` or `cli`).
pub const PLATFORM_ENV: &str = "TEAMSFX_PLATFORM";
