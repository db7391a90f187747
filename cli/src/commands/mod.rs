mod bp;
mod fluid;
mod helpers;
mod history;
mod log;
mod prefs;
mod record;
mod report;
mod search;
mod show;

pub(crate) use bp::cmd_bp;
pub(crate) use fluid::{cmd_fluid_add, cmd_fluid_clear, cmd_fluid_goal};
pub(crate) use history::cmd_history;
pub(crate) use log::cmd_log;
pub(crate) use prefs::{cmd_prefs_set, cmd_prefs_show};
pub(crate) use record::cmd_delete;
pub(crate) use report::cmd_report;
pub(crate) use search::cmd_search;
pub(crate) use show::cmd_show;
