use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Company: list order is (created_at, id)
        manager
            .create_index(
                Index::create()
                    .name("idx_company_created_at_id")
                    .table(Company::Table)
                    .col(Company::CreatedAt)
                    .col(Company::Id)
                    .to_owned(),
            )
            .await?;

        // Company: seeder looks rows up by name
        manager
            .create_index(
                Index::create()
                    .name("idx_company_name")
                    .table(Company::Table)
                    .col(Company::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_company_created_at_id").table(Company::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_company_name").table(Company::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Company { Table, Id, Name, CreatedAt }
