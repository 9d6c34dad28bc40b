pub mod error;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use error::{EntryError, RosterError};
pub use model::client::Client;
pub use model::entry::{EntryDraft, EntryPatch, EntryStatus, ShiftType, TimesheetEntry};
pub use model::rate_card::RateCard;
pub use model::staff::Staff;
pub use model::sync::SyncStatus;
pub use model::user::{Role, User};
pub use repository::{FileStore, KeyValueStore, MemoryStore, Storage, Theme};
pub use service::earnings::{compute_earnings, Earnings, Shift};
pub use service::entry_service::TimesheetService;
pub use service::merge::{merge, MergeOutcome};
pub use service::rates::resolve_rate;
pub use service::roster_service::{RosterService, StaffDraft, StaffPatch};
pub use service::sync_service::{pull, push, PullResult, PushResult, RemoteSnapshot, SyncPayload, SyncTransport};
pub use time::{parse_shift_date, shift_duration, ClockTime};
pub use usecase::timesheet_view::{totals, visible_entries, EntryFilter, EntryTotals, TimesheetView};
