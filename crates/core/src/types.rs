/// Ticket primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// User ids are issued by the identity provider and stored verbatim.
pub type UserId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar date without a time component (ticket deadlines).
pub type Date = chrono::NaiveDate;
