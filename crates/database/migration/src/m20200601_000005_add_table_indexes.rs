use super::{
    m20200601_000001_create_l1_block_table::L1Block,
    m20200601_000002_create_l1_rollup_tx_tables::L1RollupTxBatch,
    m20200601_000003_create_l1_state_root_tables::L1StateRootBatch,
    m20200601_000004_create_l2_tx_tables::L2Tx,
};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Lookups of processed blocks by number.
        manager
            .create_index(
                Index::create()
                    .name("idx_l1_block_block_number")
                    .col(L1Block::BlockNumber)
                    .table(L1Block::Table)
                    .to_owned(),
            )
            .await?;

        // Batch status scans.
        manager
            .create_index(
                Index::create()
                    .name("idx_l1_rollup_tx_batch_status")
                    .col(L1RollupTxBatch::Status)
                    .table(L1RollupTxBatch::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_l1_state_root_batch_status")
                    .col(L1StateRootBatch::Status)
                    .table(L1StateRootBatch::Table)
                    .to_owned(),
            )
            .await?;

        // Unbatched L2 transactions are grouped by timestamp.
        manager
            .create_index(
                Index::create()
                    .name("idx_l2_tx_status_block_timestamp")
                    .col(L2Tx::Status)
                    .col(L2Tx::BlockTimestamp)
                    .table(L2Tx::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_l2_tx_batch_number_batch_index")
                    .col(L2Tx::BatchNumber)
                    .col(L2Tx::BatchIndex)
                    .table(L2Tx::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table) in [
            ("idx_l1_block_block_number", L1Block::Table.into_iden()),
            ("idx_l1_rollup_tx_batch_status", L1RollupTxBatch::Table.into_iden()),
            ("idx_l1_state_root_batch_status", L1StateRootBatch::Table.into_iden()),
            ("idx_l2_tx_status_block_timestamp", L2Tx::Table.into_iden()),
            ("idx_l2_tx_batch_number_batch_index", L2Tx::Table.into_iden()),
        ] {
            manager.drop_index(Index::drop().name(name).table(table).to_owned()).await?;
        }

        Ok(())
    }
}
