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
                    .table(L2TxBatch::Table)
                    .if_not_exists()
                    .col(big_integer(L2TxBatch::BatchNumber).primary_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(L2Tx::Table)
                    .if_not_exists()
                    .col(pk_auto(L2Tx::Id))
                    .col(binary_len(L2Tx::TxHash, HASH_LENGTH).unique_key())
                    .col(big_integer(L2Tx::BlockNumber))
                    .col(big_integer(L2Tx::BlockTimestamp))
                    .col(binary_len(L2Tx::StateRoot, HASH_LENGTH))
                    .col(binary_len(L2Tx::Target, ADDRESS_LENGTH))
                    .col(binary(L2Tx::Calldata))
                    .col(binary_len_null(L2Tx::Sender, ADDRESS_LENGTH))
                    .col(big_integer_null(L2Tx::GasLimit))
                    .col(big_integer_null(L2Tx::Nonce))
                    .col(binary_null(L2Tx::Signature))
                    .col(string(L2Tx::Status))
                    .col(big_integer_null(L2Tx::BatchNumber))
                    .col(big_integer_null(L2Tx::BatchIndex))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_l2_tx_batch_number")
                            .from(L2Tx::Table, L2Tx::BatchNumber)
                            .to(L2TxBatch::Table, L2TxBatch::BatchNumber)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(L2Tx::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(L2TxBatch::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum L2TxBatch {
    Table,
    BatchNumber,
}

#[derive(DeriveIden)]
pub(crate) enum L2Tx {
    Table,
    Id,
    TxHash,
    BlockNumber,
    BlockTimestamp,
    StateRoot,
    Target,
    Calldata,
    Sender,
    GasLimit,
    Nonce,
    Signature,
    Status,
    BatchNumber,
    BatchIndex,
}
