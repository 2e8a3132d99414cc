pub mod directory;
pub mod holidays;
pub mod leave_ledger;
pub mod requests;
pub mod sessions;
