pub use sea_orm_migration::prelude::*;

mod m20200601_000001_create_l1_block_table;
mod m20200601_000002_create_l1_rollup_tx_tables;
mod m20200601_000003_create_l1_state_root_tables;
mod m20200601_000004_create_l2_tx_tables;
mod m20200601_000005_add_table_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20200601_000001_create_l1_block_table::Migration),
            Box::new(m20200601_000002_create_l1_rollup_tx_tables::Migration),
            Box::new(m20200601_000003_create_l1_state_root_tables::Migration),
            Box::new(m20200601_000004_create_l2_tx_tables::Migration),
            Box::new(m20200601_000005_add_table_indexes::Migration),
        ]
    }
}
