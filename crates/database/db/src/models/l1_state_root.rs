use alloy_primitives::B256;
use crate::{models::to_i64, DatabaseError};
use sea_orm::{entity::prelude::*, ActiveValue};

/// A database model that represents a state root submitted to L1.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "l1_state_root")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    batch_number: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    batch_index: i64,
    state_root: Vec<u8>,
}

/// The relation for the L1 state root model.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The batch the state root belongs to.
    #[sea_orm(
        belongs_to = "super::l1_state_root_batch::Entity",
        from = "Column::BatchNumber",
        to = "super::l1_state_root_batch::Column::BatchNumber"
    )]
    Batch,
}

impl Related<super::l1_state_root_batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
}

/// The active model behavior for the L1 state root model.
impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<(u64, u64, B256)> for ActiveModel {
    type Error = DatabaseError;

    fn try_from(
        (batch_number, batch_index, state_root): (u64, u64, B256),
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            batch_number: ActiveValue::Set(to_i64("batch number", batch_number)?),
            batch_index: ActiveValue::Set(to_i64("batch index", batch_index)?),
            state_root: ActiveValue::Set(state_root.to_vec()),
        })
    }
}
