use sea_orm_migration::{prelude::*, schema::*};

const HASH_LENGTH: u32 = 32;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(L1StateRootBatch::Table)
                    .if_not_exists()
                    .col(big_integer(L1StateRootBatch::BatchNumber).primary_key())
                    .col(binary_len(L1StateRootBatch::L1TxHash, HASH_LENGTH))
                    .col(string(L1StateRootBatch::Status))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(L1StateRoot::Table)
                    .if_not_exists()
                    .col(big_integer(L1StateRoot::BatchNumber))
                    .col(big_integer(L1StateRoot::BatchIndex))
                    .col(binary_len(L1StateRoot::StateRoot, HASH_LENGTH))
                    .primary_key(
                        Index::create().col(L1StateRoot::BatchNumber).col(L1StateRoot::BatchIndex),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_l1_state_root_batch_number")
                            .from(L1StateRoot::Table, L1StateRoot::BatchNumber)
                            .to(L1StateRootBatch::Table, L1StateRootBatch::BatchNumber)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(L1StateRoot::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(L1StateRootBatch::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum L1StateRootBatch {
    Table,
    BatchNumber,
    L1TxHash,
    Status,
}

#[derive(DeriveIden)]
enum L1StateRoot {
    Table,
    BatchNumber,
    BatchIndex,
    StateRoot,
}
