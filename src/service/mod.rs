pub mod approval;
pub mod day_aggregator;
pub mod period_stats;
pub mod request_workflow;
pub mod session_tracker;
pub mod team_calendar;
