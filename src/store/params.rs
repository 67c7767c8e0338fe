//! Conversion of sea-query values into `may_postgres` parameters.
//!
//! Values are first moved into owned boxes, then borrowed as `&dyn ToSql` for
//! the duration of the closure. `SmallInt` stays `i16` so it binds to
//! `SMALLINT` columns.

use crate::executor::ExecError;
use may_postgres::types::ToSql;
use sea_query::{Value, Values};

type Param = Box<dyn ToSql + Sync>;

fn to_param(value: &Value) -> Result<Param, ExecError> {
    let param: Param = match value {
        Value::Bool(v) => Box::new(*v),
        Value::SmallInt(v) => Box::new(*v),
        Value::Int(v) => Box::new(*v),
        Value::BigInt(v) => Box::new(*v),
        Value::Double(v) => Box::new(*v),
        Value::String(v) => Box::new(v.clone()),
        other => {
            return Err(ExecError::UnsupportedParam(format!("{other:?}")))
        }
    };
    Ok(param)
}

/// Convert sea-query `values` and run `f` with them as `may_postgres` parameters
///
/// # Errors
///
/// Returns `ExecError::UnsupportedParam` if a value has a type this crate never binds,
/// otherwise whatever `f` returns.
pub fn with_converted_params<F, R>(values: &Values, f: F) -> Result<R, ExecError>
where
    F: FnOnce(&[&dyn ToSql]) -> Result<R, ExecError>,
{
    let owned = values
        .iter()
        .map(to_param)
        .collect::<Result<Vec<_>, _>>()?;
    let params: Vec<&dyn ToSql> = owned.iter().map(|p| p.as_ref() as &dyn ToSql).collect();
    f(&params)
}
