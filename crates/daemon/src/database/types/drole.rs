use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Sqlite, Type};

use common::prelude::Role;

/// A [`Role`] stored as its lowercase name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DRole(pub Role);

impl From<DRole> for Role {
    fn from(val: DRole) -> Self {
        val.0
    }
}

impl Decode<'_, Sqlite> for DRole {
    fn decode(value: SqliteValueRef<'_>) -> Result<Self, BoxDynError> {
        let s = <String as Decode<Sqlite>>::decode(value)?;
        Ok(Self(s.parse::<Role>()?))
    }
}

impl Encode<'_, Sqlite> for DRole {
    fn encode_by_ref(
        &self,
        args: &mut Vec<SqliteArgumentValue<'_>>,
    ) -> Result<IsNull, BoxDynError> {
        args.push(SqliteArgumentValue::Text(self.0.as_str().into()));
        Ok(IsNull::No)
    }
}

impl Type<Sqlite> for DRole {
    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <String as Type<Sqlite>>::compatible(ty)
    }

    fn type_info() -> SqliteTypeInfo {
        <String as Type<Sqlite>>::type_info()
    }
}
