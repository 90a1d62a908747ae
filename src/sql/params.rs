//! Bind values for generated statements.

use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A value bound to a PostgreSQL placeholder. Each variant reports its own type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindValue {
    Int(i64),
    Text(String),
}

impl BindValue {
    /// Wraps `needle` as a `%needle%` LIKE pattern with wildcards in the input escaped.
    pub fn contains_pattern(needle: &str) -> Self {
        let mut out = String::with_capacity(needle.len() + 2);
        out.push('%');
        for c in needle.chars() {
            if matches!(c, '%' | '_' | '\\') {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('%');
        BindValue::Text(out)
    }
}

impl<'q> Encode<'q, Postgres> for BindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            BindValue::Int(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf),
            BindValue::Text(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)
            }
        }
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            BindValue::Int(_) => <i64 as Type<Postgres>>::type_info(),
            BindValue::Text(_) => <String as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for BindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}
