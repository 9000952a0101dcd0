use sea_orm_migration::{prelude::*, schema::*};

const HASH_LENGTH: u32 = 32;
const ADDRESS_LENGTH: u32 = 20;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(L1Block::Table)
                    .if_not_exists()
                    .col(binary_len(L1Block::BlockHash, HASH_LENGTH).primary_key())
                    .col(binary_len(L1Block::ParentHash, HASH_LENGTH))
                    .col(big_integer(L1Block::BlockNumber))
                    .col(big_integer(L1Block::BlockTimestamp))
                    .col(boolean(L1Block::Processed))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(L1Tx::Table)
                    .if_not_exists()
                    .col(binary_len(L1Tx::TxHash, HASH_LENGTH).primary_key())
                    .col(binary_len(L1Tx::BlockHash, HASH_LENGTH))
                    .col(big_integer(L1Tx::BlockNumber))
                    .col(big_integer(L1Tx::TxIndex))
                    .col(binary_len(L1Tx::FromAddress, ADDRESS_LENGTH))
                    .col(binary_len_null(L1Tx::ToAddress, ADDRESS_LENGTH))
                    .col(big_integer(L1Tx::Nonce))
                    .col(big_integer(L1Tx::GasLimit))
                    .col(string(L1Tx::GasPrice))
                    .col(binary(L1Tx::Calldata))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(L1Tx::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(L1Block::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum L1Block {
    Table,
    BlockHash,
    ParentHash,
    BlockNumber,
    BlockTimestamp,
    Processed,
}

#[derive(DeriveIden)]
pub(crate) enum L1Tx {
    Table,
    TxHash,
    BlockHash,
    BlockNumber,
    TxIndex,
    FromAddress,
    ToAddress,
    Nonce,
    GasLimit,
    GasPrice,
    Calldata,
}
