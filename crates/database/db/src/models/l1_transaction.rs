use alloy_primitives::{Address, B256};
use crate::{models::to_i64, DatabaseError};
use rollup_core_primitives::L1Transaction;
use sea_orm::{entity::prelude::*, ActiveValue};

/// A database model that represents an L1 transaction.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "l1_tx")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    tx_hash: Vec<u8>,
    block_hash: Vec<u8>,
    block_number: i64,
    tx_index: i64,
    from_address: Vec<u8>,
    to_address: Option<Vec<u8>>,
    nonce: i64,
    gas_limit: i64,
    gas_price: String,
    calldata: Vec<u8>,
}

/// The relation for the L1 transaction model.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

/// The active model behavior for the L1 transaction model.
impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<L1Transaction> for ActiveModel {
    type Error = DatabaseError;

    fn try_from(tx: L1Transaction) -> Result<Self, Self::Error> {
        Ok(Self {
            tx_hash: ActiveValue::Set(tx.hash.to_vec()),
            block_hash: ActiveValue::Set(tx.block_hash.to_vec()),
            block_number: ActiveValue::Set(to_i64("block number", tx.block_number)?),
            tx_index: ActiveValue::Set(to_i64("transaction index", tx.transaction_index)?),
            from_address: ActiveValue::Set(tx.from.to_vec()),
            to_address: ActiveValue::Set(tx.to.map(|to| to.to_vec())),
            nonce: ActiveValue::Set(to_i64("nonce", tx.nonce)?),
            gas_limit: ActiveValue::Set(to_i64("gas limit", tx.gas_limit)?),
            gas_price: ActiveValue::Set(tx.gas_price.to_string()),
            calldata: ActiveValue::Set(tx.input.to_vec()),
        })
    }
}

impl From<Model> for L1Transaction {
    fn from(value: Model) -> Self {
        Self {
            hash: B256::from_slice(&value.tx_hash),
            block_hash: B256::from_slice(&value.block_hash),
            block_number: value.block_number as u64,
            transaction_index: value.tx_index as u64,
            from: Address::from_slice(&value.from_address),
            to: value.to_address.map(|to| Address::from_slice(&to)),
            nonce: value.nonce as u64,
            gas_limit: value.gas_limit as u64,
            gas_price: value.gas_price.parse().expect("gas price is valid"),
            input: value.calldata.into(),
        }
    }
}
