use sea_orm_migration::{prelude::*, schema::*};

const HASH_LENGTH: u32 = 32;
const ADDRESS_LENGTH: u32 = 20;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The primary key on the batch number is what makes concurrent allocation safe.
        manager
            .create_table(
                Table::create()
                    .table(L1RollupTxBatch::Table)
                    .if_not_exists()
                    .col(big_integer(L1RollupTxBatch::BatchNumber).primary_key())
                    .col(binary_len(L1RollupTxBatch::L1TxHash, HASH_LENGTH))
                    .col(string(L1RollupTxBatch::Status))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(L1RollupTx::Table)
                    .if_not_exists()
                    .col(big_integer(L1RollupTx::BatchNumber))
                    .col(big_integer(L1RollupTx::BatchIndex))
                    .col(binary_len(L1RollupTx::L1TxHash, HASH_LENGTH))
                    .col(big_integer(L1RollupTx::L1BlockNumber))
                    .col(big_integer(L1RollupTx::L1Timestamp))
                    .col(integer(L1RollupTx::QueueOrigin))
                    .col(binary_len(L1RollupTx::Target, ADDRESS_LENGTH))
                    .col(binary(L1RollupTx::Calldata))
                    .col(binary_len_null(L1RollupTx::Sender, ADDRESS_LENGTH))
                    .col(binary_len_null(L1RollupTx::L1MessageSender, ADDRESS_LENGTH))
                    .col(big_integer_null(L1RollupTx::GasLimit))
                    .col(big_integer_null(L1RollupTx::Nonce))
                    .col(binary_null(L1RollupTx::Signature))
                    .primary_key(
                        Index::create().col(L1RollupTx::BatchNumber).col(L1RollupTx::BatchIndex),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_l1_rollup_tx_batch_number")
                            .from(L1RollupTx::Table, L1RollupTx::BatchNumber)
                            .to(L1RollupTxBatch::Table, L1RollupTxBatch::BatchNumber)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(L1RollupTx::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(L1RollupTxBatch::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum L1RollupTxBatch {
    Table,
    BatchNumber,
    L1TxHash,
    Status,
}

#[derive(DeriveIden)]
pub(crate) enum L1RollupTx {
    Table,
    BatchNumber,
    BatchIndex,
    L1TxHash,
    L1BlockNumber,
    L1Timestamp,
    QueueOrigin,
    Target,
    Calldata,
    Sender,
    L1MessageSender,
    GasLimit,
    Nonce,
    Signature,
}
