//! Column wrappers mapping the closed vocabularies onto PostgreSQL enums.
//!
//! The domain enums stay free of Diesel derives; each wrapper writes the
//! enum label as text and parses it back through the domain `FromStr`.

use std::io::Write;

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};

use crate::domain::{Audience, MoodMode, Tone};

use super::schema::sql_types;

macro_rules! pg_enum_column {
    ($wrapper:ident, $domain:ty, $sql:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
        #[diesel(sql_type = $sql)]
        pub(crate) struct $wrapper(pub(crate) $domain);

        impl ToSql<$sql, Pg> for $wrapper {
            fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
                out.write_all(self.0.as_str().as_bytes())?;
                Ok(IsNull::No)
            }
        }

        impl FromSql<$sql, Pg> for $wrapper {
            fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
                let label = std::str::from_utf8(bytes.as_bytes())?;
                Ok(Self(label.parse::<$domain>()?))
            }
        }

        impl From<$domain> for $wrapper {
            fn from(value: $domain) -> Self {
                Self(value)
            }
        }
    };
}

pg_enum_column!(PgMoodMode, MoodMode, sql_types::MoodMode);
pg_enum_column!(PgTone, Tone, sql_types::ToneType);
pg_enum_column!(PgAudience, Audience, sql_types::AudienceType);
