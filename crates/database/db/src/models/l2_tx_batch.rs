use crate::{models::to_i64, DatabaseError};
use sea_orm::{entity::prelude::*, ActiveValue};

/// A database model that represents a batch of L2 transactions.
///
/// The batch is a sequencing marker, membership is recorded on the L2 transactions.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "l2_tx_batch")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    batch_number: i64,
}

/// The relation for the L2 transaction batch model.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

/// The active model behavior for the L2 transaction batch model.
impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<u64> for ActiveModel {
    type Error = DatabaseError;

    fn try_from(batch_number: u64) -> Result<Self, Self::Error> {
        Ok(Self { batch_number: ActiveValue::Set(to_i64("batch number", batch_number)?) })
    }
}
