use uuid::Uuid;

/// Tours, shows and managers are keyed by server-generated UUIDs.
pub type TourId = Uuid;
pub type ShowId = Uuid;
pub type ManagerId = Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Manager assigned to a tour created without one.
pub const FALLBACK_MANAGER_ID: ManagerId = Uuid::from_u128(0xfec0a4d6_5830_4eb8_8024_272bd5d6d2bb);

/// Resolve the manager a new tour should be stored with.
///
/// A missing or nil manager id falls back to [`FALLBACK_MANAGER_ID`].
pub fn manager_or_fallback(manager_id: Option<ManagerId>) -> ManagerId {
    match manager_id {
        Some(id) if !id.is_nil() => id,
        _ => FALLBACK_MANAGER_ID,
    }
}
