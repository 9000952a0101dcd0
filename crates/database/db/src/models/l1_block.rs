use alloy_primitives::B256;
use crate::{models::to_i64, DatabaseError};
use rollup_core_primitives::L1Block;
use sea_orm::{entity::prelude::*, ActiveValue};

/// A database model that represents an L1 block.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "l1_block")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    block_hash: Vec<u8>,
    parent_hash: Vec<u8>,
    block_number: i64,
    block_timestamp: i64,
    pub(crate) processed: bool,
}

/// The relation for the L1 block model.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

/// The active model behavior for the L1 block model.
impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<(L1Block, bool)> for ActiveModel {
    type Error = DatabaseError;

    fn try_from((block, processed): (L1Block, bool)) -> Result<Self, Self::Error> {
        Ok(Self {
            block_hash: ActiveValue::Set(block.hash.to_vec()),
            parent_hash: ActiveValue::Set(block.parent_hash.to_vec()),
            block_number: ActiveValue::Set(to_i64("block number", block.number)?),
            block_timestamp: ActiveValue::Set(to_i64("block timestamp", block.timestamp)?),
            processed: ActiveValue::Set(processed),
        })
    }
}

impl From<Model> for L1Block {
    fn from(value: Model) -> Self {
        Self {
            hash: B256::from_slice(&value.block_hash),
            parent_hash: B256::from_slice(&value.parent_hash),
            number: value.block_number as u64,
            timestamp: value.block_timestamp as u64,
        }
    }
}
