//! Database model type aliases.
//!
//! Short names for the generated `entity` models used across repositories and services.

/// Family owning children and guardians.
pub type FamilyModel = entity::family::Model;

/// Guardian contact. `phone` is stored normalized, `notify_opt_in` gates `checkin` messages.
pub type GuardianModel = entity::guardian::Model;

/// Registered child, only `active` children can be checked in.
pub type ChildModel = entity::child::Model;

/// Scan token mapped to a child, at most one active row per token.
pub type ScanCodeModel = entity::scan_code::Model;

pub type ProgramModel = entity::program::Model;

/// Attendance row. Open while `checkout_at` is `None`, at most one open row per child.
pub type AttendanceModel = entity::attendance::Model;

/// Outbound guardian notification with delivery bookkeeping.
pub type QueuedMessageModel = entity::queued_message::Model;
