use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};

use crate::scoring::types::GameNumber;

#[derive(Debug, Clone)]
pub struct NewBowler {
    pub name: String,
    pub nickname: Option<String>,
    pub pin_code: Option<String>,
    pub avatar_color: String,
}

/// Partial update; `None` leaves the column as it is.
#[derive(Debug, Clone, Default)]
pub struct BowlerUpdate {
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub pin_code: Option<String>,
    pub avatar_color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewWeek {
    pub week_number: i32,
    pub bowling_date: Option<NaiveDate>,
}

impl rusqlite::types::ToSql for GameNumber {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_i32()))
    }
}

impl FromSql for GameNumber {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let number = i32::column_result(value)?;
        GameNumber::try_from(number).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
