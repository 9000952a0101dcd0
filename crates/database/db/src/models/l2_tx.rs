use alloy_primitives::{Address, B256};
use crate::{models::to_i64, DatabaseError};
use rollup_core_primitives::{L2Transaction, L2TransactionEntry, L2TransactionStatus};
use sea_orm::{entity::prelude::*, ActiveValue};

/// A database model that represents a transaction executed on L2.
///
/// The auto incremented id records insertion order, which is the order transactions are batched
/// in.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "l2_tx")]
pub struct Model {
    #[sea_orm(primary_key)]
    id: i64,
    tx_hash: Vec<u8>,
    block_number: i64,
    block_timestamp: i64,
    state_root: Vec<u8>,
    target: Vec<u8>,
    calldata: Vec<u8>,
    sender: Option<Vec<u8>>,
    gas_limit: Option<i64>,
    nonce: Option<i64>,
    signature: Option<Vec<u8>>,
    status: String,
    batch_number: Option<i64>,
    batch_index: Option<i64>,
}

/// The relation for the L2 transaction model.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The batch the transaction belongs to, once batched.
    #[sea_orm(
        belongs_to = "super::l2_tx_batch::Entity",
        from = "Column::BatchNumber",
        to = "super::l2_tx_batch::Column::BatchNumber"
    )]
    Batch,
}

impl Related<super::l2_tx_batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
}

/// The active model behavior for the L2 transaction model.
impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<L2Transaction> for ActiveModel {
    type Error = DatabaseError;

    fn try_from(tx: L2Transaction) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ActiveValue::NotSet,
            tx_hash: ActiveValue::Set(tx.tx_hash.to_vec()),
            block_number: ActiveValue::Set(to_i64("block number", tx.block_number)?),
            block_timestamp: ActiveValue::Set(to_i64("block timestamp", tx.block_timestamp)?),
            state_root: ActiveValue::Set(tx.state_root.to_vec()),
            target: ActiveValue::Set(tx.target.to_vec()),
            calldata: ActiveValue::Set(tx.calldata.to_vec()),
            sender: ActiveValue::Set(tx.sender.map(|s| s.to_vec())),
            gas_limit: ActiveValue::Set(tx.gas_limit.map(|g| to_i64("gas limit", g)).transpose()?),
            nonce: ActiveValue::Set(tx.nonce.map(|n| to_i64("nonce", n)).transpose()?),
            signature: ActiveValue::Set(tx.signature.map(|s| s.to_vec())),
            status: ActiveValue::Set(L2TransactionStatus::Unbatched.as_str().to_owned()),
            batch_number: ActiveValue::Set(None),
            batch_index: ActiveValue::Set(None),
        })
    }
}

impl From<Model> for L2TransactionEntry {
    fn from(value: Model) -> Self {
        Self {
            transaction: L2Transaction {
                tx_hash: B256::from_slice(&value.tx_hash),
                block_number: value.block_number as u64,
                block_timestamp: value.block_timestamp as u64,
                state_root: B256::from_slice(&value.state_root),
                target: Address::from_slice(&value.target),
                calldata: value.calldata.into(),
                sender: value.sender.map(|s| Address::from_slice(&s)),
                gas_limit: value.gas_limit.map(|g| g as u64),
                nonce: value.nonce.map(|n| n as u64),
                signature: value.signature.map(Into::into),
            },
            status: value.status.parse().expect("data persisted in database is valid"),
            batch_number: value.batch_number.map(|n| n as u64),
            batch_index: value.batch_index.map(|i| i as u64),
        }
    }
}
