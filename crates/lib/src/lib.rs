//! teamsfx-lib: legacy project consolidation for Teams Toolkit projects.
//!
//! Projects created before the unified config layout keep separate local and
//! remote manifest templates plus a `localSettings.json` under `.fx`. This
//! crate upgrades such projects in place:
//! - `detect`: decide whether a project still uses the split layout
//! - `consent`: ask the user before touching anything
//! - `consolidate`: merge the templates, write the local env config and move
//!   replaced files into `.backup`, undoing everything on failure
//! - `report` / `ignore`: finalize a successful run

pub mod config;
pub mod consent;
pub mod consolidate;
pub mod consts;
pub mod detect;
pub mod ignore;
pub mod layout;
pub mod manifest_diff;
pub mod project;
pub mod report;
pub mod telemetry;
pub mod upgrade;
pub mod util;
