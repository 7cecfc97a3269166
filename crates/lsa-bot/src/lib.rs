//! LSA bot: loads the weekly timetable workbook once, then posts upcoming
//! class announcements to per-zone Teams channels on a cron schedule.

pub mod announce;
pub mod config;
pub mod trigger;
