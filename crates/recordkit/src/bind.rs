//! Positional parameter binding.
//!
//! The statement-execution layer supplies a [`StatementBinder`] (its prepared-statement handle);
//! [`fill_statement`] converts each [`Value`] into a [`BindValue`] and binds it by 1-based
//! position. Temporal values are normalized to a single timestamp form on the way:
//!
//! - `Date` binds as the timestamp at midnight of that day
//! - `Time` binds as that time of day on `1970-01-01`
//! - `Timestamp` binds unchanged

use crate::error::{DbError, DbResult};
use crate::value::Value;
use chrono::{NaiveDate, NaiveDateTime};

/// Canonical, bindable form of a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    Text(String),
    Timestamp(NaiveDateTime),
    Binary(Vec<u8>),
}

/// A prepared statement that accepts positional parameters.
pub trait StatementBinder {
    /// Bind `value` at the 1-based `index`.
    fn bind(&mut self, index: usize, value: BindValue) -> Result<(), String>;
}

/// Collects bound values in order. Handy for executors that pass parameters as a list.
impl StatementBinder for Vec<BindValue> {
    fn bind(&mut self, index: usize, value: BindValue) -> Result<(), String> {
        if index != self.len() + 1 {
            return Err(format!(
                "expected parameter {}, got {index}",
                self.len() + 1
            ));
        }
        self.push(value);
        Ok(())
    }
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Convert one parameter to its bindable form. `index` is 1-based and only used for errors.
pub fn to_bind_value(index: usize, value: &Value) -> DbResult<BindValue> {
    Ok(match value {
        Value::Null => BindValue::Null,
        Value::Bool(v) => BindValue::Bool(*v),
        Value::Int(v) => BindValue::Int(*v),
        Value::Real(v) => BindValue::Real(*v),
        Value::Text(s) => BindValue::Text(s.clone()),
        Value::Date(d) => BindValue::Timestamp(d.and_time(chrono::NaiveTime::MIN)),
        Value::Time(t) => BindValue::Timestamp(epoch().and_time(*t)),
        Value::Timestamp(ts) => BindValue::Timestamp(*ts),
        Value::Binary(b) => BindValue::Binary(b.clone()),
        Value::Json(_) => {
            return Err(DbError::binding(
                index,
                "json value must be encoded to text before binding",
            ));
        }
    })
}

/// Bind every parameter positionally, starting at index 1.
pub fn fill_statement<B>(binder: &mut B, params: &[Value]) -> DbResult<()>
where
    B: StatementBinder + ?Sized,
{
    for (i, param) in params.iter().enumerate() {
        let index = i + 1;
        let value = to_bind_value(index, param)?;
        binder
            .bind(index, value)
            .map_err(|message| DbError::binding(index, message))?;
    }
    Ok(())
}

/// Build a `Vec<Value>` parameter list from heterogeneous arguments.
///
/// ```
/// use recordkit::{params, Value};
///
/// let p = params![1, "a", None::<i64>];
/// assert_eq!(p, vec![Value::Int(1), Value::from("a"), Value::Null]);
/// ```
#[macro_export]
macro_rules! params {
    () => { ::std::vec::Vec::<$crate::Value>::new() };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::Value::from($value)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn normalizes_temporal_values() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let time = NaiveTime::from_hms_opt(13, 14, 15).unwrap();
        let ts = date.and_time(time);

        let mut bound: Vec<BindValue> = Vec::new();
        fill_statement(
            &mut bound,
            &[Value::Date(date), Value::Time(time), Value::Timestamp(ts)],
        )
        .unwrap();

        assert_eq!(
            bound,
            vec![
                BindValue::Timestamp(date.and_hms_opt(0, 0, 0).unwrap()),
                BindValue::Timestamp(
                    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap().and_time(time)
                ),
                BindValue::Timestamp(ts),
            ]
        );
    }

    #[test]
    fn binds_in_order() {
        let mut bound: Vec<BindValue> = Vec::new();
        fill_statement(&mut bound, &params![1, "x", true, None::<i64>]).unwrap();
        assert_eq!(
            bound,
            vec![
                BindValue::Int(1),
                BindValue::Text("x".into()),
                BindValue::Bool(true),
                BindValue::Null,
            ]
        );
    }

    #[test]
    fn raw_json_is_a_binding_error() {
        let mut bound: Vec<BindValue> = Vec::new();
        let err = fill_statement(
            &mut bound,
            &[Value::Int(1), Value::Json(serde_json::json!({"a": 1}))],
        )
        .unwrap_err();
        assert!(matches!(err, DbError::Binding { index: 2, .. }));
    }

    struct FailingBinder;

    impl StatementBinder for FailingBinder {
        fn bind(&mut self, _index: usize, _value: BindValue) -> Result<(), String> {
            Err("driver rejected value".to_string())
        }
    }

    #[test]
    fn binder_failures_are_wrapped() {
        let err = fill_statement(&mut FailingBinder, &params![1]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Binding error on parameter 1: driver rejected value"
        );
    }
}
